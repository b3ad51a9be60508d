use std::fmt;

use super::model::{Column, CrimeDataset, Record};

// ---------------------------------------------------------------------------
// Filter predicate: one dropdown choice per filterable column
// ---------------------------------------------------------------------------

/// Label of the catch-all dropdown entry.
pub const ALL_LABEL: &str = "All";

/// One dropdown selection: either no constraint or an exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Choice {
    #[default]
    All,
    Value(String),
}

impl Choice {
    /// Parse a user-supplied label; `"All"` means no constraint.
    pub fn parse(label: &str) -> Choice {
        if label == ALL_LABEL {
            Choice::All
        } else {
            Choice::Value(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Choice::All => ALL_LABEL,
            Choice::Value(v) => v,
        }
    }

    /// Null cells never match a specific value.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Choice::All => true,
            Choice::Value(wanted) => value == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The pair of currently chosen dropdown values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub disposition: Choice,
    pub category: Choice,
}

impl FilterSelection {
    pub fn new(disposition: Choice, category: Choice) -> Self {
        FilterSelection {
            disposition,
            category,
        }
    }

    /// Column / choice pairs, in the order the dropdowns are shown.
    pub fn constraints(&self) -> [(Column, &Choice); 2] {
        [
            (Column::Disposition, &self.disposition),
            (Column::Category, &self.category),
        ]
    }

    pub fn is_all(&self) -> bool {
        self.disposition == Choice::All && self.category == Choice::All
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.constraints()
            .iter()
            .all(|(column, choice)| choice.matches(record.text(*column)))
    }
}

// ---------------------------------------------------------------------------
// FilteredView – row indices passing the current selection
// ---------------------------------------------------------------------------

/// Records of a dataset that pass a [`FilterSelection`], in file order.
/// Recomputed on every interaction and borrowed from the dataset.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a CrimeDataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Apply a selection to the dataset.
    pub fn apply(dataset: &'a CrimeDataset, selection: &FilterSelection) -> Self {
        let indices = if selection.is_all() {
            (0..dataset.len()).collect()
        } else {
            dataset
                .records
                .iter()
                .enumerate()
                .filter(|(_, r)| selection.matches(r))
                .map(|(i, _)| i)
                .collect()
        };
        FilteredView { dataset, indices }
    }

    /// The whole dataset, unfiltered.
    pub fn all(dataset: &'a CrimeDataset) -> Self {
        Self::apply(dataset, &FilterSelection::default())
    }

    pub fn dataset(&self) -> &'a CrimeDataset {
        self.dataset
    }

    #[cfg(test)]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }
}

/// Dropdown entries for a column: `All` followed by every observed value, sorted.
pub fn filter_options(dataset: &CrimeDataset, column: Column) -> Vec<Choice> {
    std::iter::once(Choice::All)
        .chain(
            dataset
                .distinct_values(column)
                .into_iter()
                .map(|v| Choice::Value(v.to_string())),
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{dataset, row};

    fn sample() -> CrimeDataset {
        dataset(vec![
            row(&[(Column::Disposition, "Closed"), (Column::Category, "Theft")]),
            row(&[(Column::Disposition, "Open"), (Column::Category, "Theft")]),
            row(&[(Column::Disposition, "Closed"), (Column::Category, "Assault")]),
            row(&[(Column::Category, "Assault")]),
            row(&[(Column::Disposition, "Closed")]),
        ])
    }

    fn selection(disposition: &str, category: &str) -> FilterSelection {
        FilterSelection::new(Choice::parse(disposition), Choice::parse(category))
    }

    #[test]
    fn all_all_returns_everything() {
        let ds = sample();
        let view = FilteredView::apply(&ds, &FilterSelection::default());
        assert_eq!(view.len(), ds.len());
        assert_eq!(view.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn every_selection_is_a_subset() {
        let ds = sample();
        for d in filter_options(&ds, Column::Disposition) {
            for c in filter_options(&ds, Column::Category) {
                let view = FilteredView::apply(&ds, &FilterSelection::new(d.clone(), c.clone()));
                assert!(view.len() <= ds.len());
                assert!(view.records().all(|r| d.matches(r.disposition.as_deref())
                    && c.matches(r.category.as_deref())));
            }
        }
    }

    #[test]
    fn both_constraints_combine() {
        let ds = sample();
        let view = FilteredView::apply(&ds, &selection("Closed", "Theft"));
        assert_eq!(view.indices(), &[0]);
    }

    #[test]
    fn category_all_is_disposition_only() {
        let ds = sample();
        let closed_all = FilteredView::apply(&ds, &selection("Closed", "All"));
        let closed_only = FilteredView::apply(
            &ds,
            &FilterSelection {
                disposition: Choice::Value("Closed".into()),
                ..Default::default()
            },
        );
        assert_eq!(closed_all.indices(), closed_only.indices());
        assert_eq!(closed_all.indices(), &[0, 2, 4]);
    }

    #[test]
    fn nulls_never_match_a_value() {
        let ds = sample();
        let view = FilteredView::apply(&ds, &selection("All", "Assault"));
        assert_eq!(view.indices(), &[2, 3]);
        let view = FilteredView::apply(&ds, &selection("Open", "Assault"));
        assert!(view.is_empty());
    }

    #[test]
    fn options_start_with_all_and_are_sorted() {
        let ds = sample();
        let options: Vec<String> = filter_options(&ds, Column::Category)
            .iter()
            .map(|c| c.label().to_string())
            .collect();
        assert_eq!(options, vec!["All", "Assault", "Theft"]);
    }

    #[test]
    fn options_for_absent_column_are_just_all() {
        let ds = CrimeDataset::default();
        assert_eq!(filter_options(&ds, Column::Disposition), vec![Choice::All]);
    }
}
