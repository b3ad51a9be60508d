use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::aggregate::{
    AGE_BINS, BinarySplit, GENDER_TOP_N, Histogram, ValueCounts, binary_split, histogram,
    value_counts,
};
use super::filter::{FilterSelection, FilteredView};
use super::model::{Column, CrimeDataset, MissingColumn};

pub const REPORT_TYPES: [&str; 2] = ["Incident Report", "Supplemental Report"];
pub const FATAL_STATUSES: [&str; 2] = ["Non-fatal", "Fatal"];

// ---------------------------------------------------------------------------
// Slot – one chart's data or the warning shown instead
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Slot<T> {
    Ready { data: T },
    Unavailable { warning: String },
}

impl<T> Slot<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Slot::Ready { data } => Some(data),
            Slot::Unavailable { .. } => None,
        }
    }
}

impl<T> From<Result<T, MissingColumn>> for Slot<T> {
    fn from(result: Result<T, MissingColumn>) -> Self {
        match result {
            Ok(data) => Slot::Ready { data },
            Err(missing) => Slot::Unavailable {
                warning: missing.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardSummary – every chart for one selection
// ---------------------------------------------------------------------------

/// Aggregates behind every chart on the page, computed in one pass from the
/// dataset and the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub disposition: String,
    pub category: String,
    pub total_records: usize,
    pub matching_records: usize,
    pub offender_age: Slot<Histogram>,
    pub victim_age: Slot<Histogram>,
    pub offender_race: Slot<ValueCounts>,
    pub victim_race: Slot<ValueCounts>,
    pub offender_gender: Slot<ValueCounts>,
    pub victim_gender: Slot<ValueCounts>,
    pub report_type: Slot<BinarySplit>,
    pub fatal_status: Slot<BinarySplit>,
    /// Category counts over the whole dataset, ignoring the selection.
    pub overall_categories: Slot<ValueCounts>,
}

impl DashboardSummary {
    pub fn compute(dataset: &CrimeDataset, selection: &FilterSelection) -> Self {
        let view = FilteredView::apply(dataset, selection);
        if view.is_empty() && !dataset.is_empty() {
            log::debug!(
                "{} / {} matches no records",
                selection.disposition,
                selection.category
            );
        }
        let everything = FilteredView::all(dataset);

        let top_genders =
            |column| value_counts(&view, column).map(|counts| counts.top(GENDER_TOP_N));

        DashboardSummary {
            disposition: selection.disposition.label().to_string(),
            category: selection.category.label().to_string(),
            total_records: dataset.len(),
            matching_records: view.len(),
            offender_age: histogram(&view, Column::OffenderAge, AGE_BINS).into(),
            victim_age: histogram(&view, Column::VictimAge, AGE_BINS).into(),
            offender_race: value_counts(&view, Column::OffenderRace).into(),
            victim_race: value_counts(&view, Column::VictimRace).into(),
            offender_gender: top_genders(Column::OffenderGender).into(),
            victim_gender: top_genders(Column::VictimGender).into(),
            report_type: binary_split(&view, Column::ReportType, REPORT_TYPES).into(),
            fatal_status: binary_split(&view, Column::VictimFatalStatus, FATAL_STATUSES).into(),
            overall_categories: value_counts(&everything, Column::Category).into(),
        }
    }

    /// Write the summary as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)
            .context("serialising dashboard summary")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Choice;
    use crate::data::fixtures::{dataset, row};

    fn sample() -> CrimeDataset {
        dataset(vec![
            row(&[
                (Column::Disposition, "Closed"),
                (Column::Category, "Theft"),
                (Column::OffenderAge, "25"),
                (Column::VictimAge, "40"),
                (Column::OffenderGender, "Male"),
                (Column::ReportType, "Incident Report"),
                (Column::VictimFatalStatus, "Non-fatal"),
            ]),
            row(&[
                (Column::Disposition, "Open"),
                (Column::Category, "Assault"),
                (Column::OffenderAge, "31"),
                (Column::OffenderGender, "Female"),
                (Column::ReportType, "Supplemental Report"),
                (Column::VictimFatalStatus, "Fatal"),
            ]),
            row(&[
                (Column::Disposition, "Closed"),
                (Column::Category, "Assault"),
                (Column::ReportType, "Incident Report"),
            ]),
        ])
    }

    #[test]
    fn overall_categories_ignore_selection() {
        let ds = sample();
        let selection = FilterSelection::new(Choice::Value("Open".into()), Choice::All);
        let summary = DashboardSummary::compute(&ds, &selection);

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.matching_records, 1);
        let overall = summary.overall_categories.ready().unwrap();
        assert_eq!(overall.get("Assault"), Some(2));
        assert_eq!(overall.get("Theft"), Some(1));

        let split = summary.report_type.ready().unwrap();
        assert_eq!(split.counts, [0, 1]);
        assert_eq!(split.percents, [0.0, 100.0]);
    }

    #[test]
    fn victim_age_histogram_reads_victim_ages() {
        let ds = sample();
        let summary = DashboardSummary::compute(&ds, &FilterSelection::default());
        let victim = summary.victim_age.ready().unwrap();
        assert_eq!(victim.total(), 1);
        assert_eq!(victim.min, 39.5);
        let offender = summary.offender_age.ready().unwrap();
        assert_eq!(offender.total(), 2);
    }

    #[test]
    fn missing_columns_become_warnings() {
        let records = vec![row(&[(Column::Category, "Theft")])];
        let ds = CrimeDataset::new(records, [Column::Category].into_iter().collect());
        let summary = DashboardSummary::compute(&ds, &FilterSelection::default());

        assert_eq!(
            summary.victim_race,
            Slot::Unavailable {
                warning: "Column 'Victim_Race' not found in the data.".into()
            }
        );
        assert!(summary.overall_categories.ready().is_some());
    }

    #[test]
    fn serialises_with_status_tags() {
        let ds = sample();
        let summary = DashboardSummary::compute(&ds, &FilterSelection::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["disposition"], "All");
        assert_eq!(json["fatal_status"]["status"], "ready");
        assert_eq!(json["fatal_status"]["data"]["column"], "Victim_Fatal_Status");
        assert_eq!(json["offender_gender"]["data"]["entries"][0][0], "Female");
    }
}
