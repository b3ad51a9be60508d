/// Data layer: records, loading, filtering and chart aggregation.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CrimeDataset (records + schema)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  dropdown selection → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  value counts, age histograms, binary splits
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  summary  │  one slot per dashboard chart
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::model::{Column, CrimeDataset, Record};

    /// Build a record from `(column, cell)` pairs; age cells are parsed.
    pub fn row(cells: &[(Column, &str)]) -> Record {
        let mut record = Record::default();
        for &(column, cell) in cells {
            if column.is_numeric() {
                record.set_number(column, cell.parse().ok());
            } else {
                record.set_text(column, Some(cell.to_string()));
            }
        }
        record
    }

    /// Dataset whose schema carries every known column.
    pub fn dataset(records: Vec<Record>) -> CrimeDataset {
        CrimeDataset::new(records, Column::ALL.into_iter().collect())
    }
}
