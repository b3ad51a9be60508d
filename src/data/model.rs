use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Column – the fixed schema of the crime dataset
// ---------------------------------------------------------------------------

/// One of the known dataset columns.  The header name is the exact text
/// expected in the first row of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Disposition,
    Category,
    OffenderAge,
    VictimAge,
    OffenderRace,
    VictimRace,
    OffenderGender,
    VictimGender,
    ReportType,
    VictimFatalStatus,
}

impl Column {
    /// Every known column, in display order.
    pub const ALL: [Column; 10] = [
        Column::Disposition,
        Column::Category,
        Column::OffenderAge,
        Column::VictimAge,
        Column::OffenderRace,
        Column::VictimRace,
        Column::OffenderGender,
        Column::VictimGender,
        Column::ReportType,
        Column::VictimFatalStatus,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::Disposition => "Disposition",
            Column::Category => "Category",
            Column::OffenderAge => "Offender_Age",
            Column::VictimAge => "Victim_Age",
            Column::OffenderRace => "Offender_Race",
            Column::VictimRace => "Victim_Race",
            Column::OffenderGender => "Offender_Gender",
            Column::VictimGender => "Victim_Gender",
            Column::ReportType => "Report_Type",
            Column::VictimFatalStatus => "Victim_Fatal_Status",
        }
    }

    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == header)
    }

    /// Whether the column holds ages rather than category labels.
    pub fn is_numeric(self) -> bool {
        matches!(self, Column::OffenderAge | Column::VictimAge)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// MissingColumn – typed "chart unavailable" result
// ---------------------------------------------------------------------------

/// Returned by an aggregator when the dataset schema lacks the column it
/// needs.  The message is shown verbatim in place of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Column '{0}' not found in the data.")]
pub struct MissingColumn(pub Column);

// ---------------------------------------------------------------------------
// Record – one row of the file
// ---------------------------------------------------------------------------

/// A single crime record.  Every field is nullable: empty cells, and ages
/// that do not parse as numbers, become `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Record {
    #[serde(rename = "Disposition", default)]
    pub disposition: Option<String>,
    #[serde(rename = "Category", default)]
    pub category: Option<String>,
    #[serde(rename = "Offender_Age", default, deserialize_with = "csv::invalid_option")]
    pub offender_age: Option<f64>,
    #[serde(rename = "Victim_Age", default, deserialize_with = "csv::invalid_option")]
    pub victim_age: Option<f64>,
    #[serde(rename = "Offender_Race", default)]
    pub offender_race: Option<String>,
    #[serde(rename = "Victim_Race", default)]
    pub victim_race: Option<String>,
    #[serde(rename = "Offender_Gender", default)]
    pub offender_gender: Option<String>,
    #[serde(rename = "Victim_Gender", default)]
    pub victim_gender: Option<String>,
    #[serde(rename = "Report_Type", default)]
    pub report_type: Option<String>,
    #[serde(rename = "Victim_Fatal_Status", default)]
    pub victim_fatal_status: Option<String>,
}

impl Record {
    /// Text value of a categorical column.  Numeric columns always yield `None`.
    pub fn text(&self, column: Column) -> Option<&str> {
        let field = match column {
            Column::Disposition => &self.disposition,
            Column::Category => &self.category,
            Column::OffenderRace => &self.offender_race,
            Column::VictimRace => &self.victim_race,
            Column::OffenderGender => &self.offender_gender,
            Column::VictimGender => &self.victim_gender,
            Column::ReportType => &self.report_type,
            Column::VictimFatalStatus => &self.victim_fatal_status,
            Column::OffenderAge | Column::VictimAge => return None,
        };
        field.as_deref()
    }

    /// Numeric value of an age column.  Categorical columns always yield `None`.
    pub fn number(&self, column: Column) -> Option<f64> {
        match column {
            Column::OffenderAge => self.offender_age,
            Column::VictimAge => self.victim_age,
            _ => None,
        }
    }

    pub fn set_text(&mut self, column: Column, value: Option<String>) {
        let field = match column {
            Column::Disposition => &mut self.disposition,
            Column::Category => &mut self.category,
            Column::OffenderRace => &mut self.offender_race,
            Column::VictimRace => &mut self.victim_race,
            Column::OffenderGender => &mut self.offender_gender,
            Column::VictimGender => &mut self.victim_gender,
            Column::ReportType => &mut self.report_type,
            Column::VictimFatalStatus => &mut self.victim_fatal_status,
            Column::OffenderAge | Column::VictimAge => return,
        };
        *field = value;
    }

    pub fn set_number(&mut self, column: Column, value: Option<f64>) {
        match column {
            Column::OffenderAge => self.offender_age = value,
            Column::VictimAge => self.victim_age = value,
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – every column of the file, as text
// ---------------------------------------------------------------------------

/// The file as it was read, including columns no chart uses.  Backs the raw
/// data view; nulls are empty cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<csv::StringRecord>,
}

// ---------------------------------------------------------------------------
// CrimeDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded rows plus the set of known columns the file actually carried.
/// Built once and only ever handed out by shared reference.
#[derive(Debug, Clone, Default)]
pub struct CrimeDataset {
    /// All records, in file order.
    pub records: Vec<Record>,
    /// Known columns present in the file header.
    pub schema: BTreeSet<Column>,
    /// All columns of the file, for display.
    pub raw: RawTable,
}

impl CrimeDataset {
    pub fn new(records: Vec<Record>, schema: BTreeSet<Column>) -> Self {
        CrimeDataset {
            records,
            schema,
            raw: RawTable::default(),
        }
    }

    pub fn with_raw(mut self, raw: RawTable) -> Self {
        self.raw = raw;
        self
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Capability query: was this column part of the loaded file?
    pub fn has_column(&self, column: Column) -> bool {
        self.schema.contains(&column)
    }

    /// `Ok(())` when the column is present, the typed warning otherwise.
    pub fn require(&self, column: Column) -> Result<(), MissingColumn> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(MissingColumn(column))
        }
    }

    /// Known columns absent from the file.
    pub fn missing_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.has_column(*c))
            .collect()
    }

    /// Sorted distinct non-null values of a categorical column.
    pub fn distinct_values(&self, column: Column) -> BTreeSet<&str> {
        self.records.iter().filter_map(|r| r.text(column)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_header(column.header()), Some(column));
        }
        assert_eq!(Column::from_header("offender_age"), None);
    }

    #[test]
    fn missing_column_message() {
        let err = MissingColumn(Column::VictimRace);
        assert_eq!(err.to_string(), "Column 'Victim_Race' not found in the data.");
    }

    #[test]
    fn text_and_number_accessors_are_disjoint() {
        let mut record = Record::default();
        record.set_text(Column::Category, Some("Theft".into()));
        record.set_number(Column::OffenderAge, Some(31.0));
        record.set_text(Column::OffenderAge, Some("ignored".into()));

        assert_eq!(record.text(Column::Category), Some("Theft"));
        assert_eq!(record.number(Column::Category), None);
        assert_eq!(record.number(Column::OffenderAge), Some(31.0));
        assert_eq!(record.text(Column::OffenderAge), None);
    }

    #[test]
    fn capability_query_follows_schema() {
        let ds = CrimeDataset::new(Vec::new(), [Column::Category].into_iter().collect());
        assert!(ds.has_column(Column::Category));
        assert_eq!(ds.require(Column::Category), Ok(()));
        assert_eq!(
            ds.require(Column::Disposition),
            Err(MissingColumn(Column::Disposition))
        );
        assert_eq!(ds.missing_columns().len(), Column::ALL.len() - 1);
    }

    #[test]
    fn distinct_values_are_sorted_and_skip_nulls() {
        let records = ["Theft", "Assault", "Theft"]
            .iter()
            .map(|c| Record {
                category: Some(c.to_string()),
                ..Default::default()
            })
            .chain(std::iter::once(Record::default()))
            .collect();
        let ds = CrimeDataset::new(records, [Column::Category].into_iter().collect());
        let values: Vec<&str> = ds.distinct_values(Column::Category).into_iter().collect();
        assert_eq!(values, vec!["Assault", "Theft"]);
    }
}
