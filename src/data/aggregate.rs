use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilteredView;
use super::model::{Column, MissingColumn};

/// Number of equal-width bins in the age histograms.
pub const AGE_BINS: usize = 20;

/// Gender pies show at most this many slices.
pub const GENDER_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Categorical: value → count
// ---------------------------------------------------------------------------

/// Occurrence count of each non-null value in a column, ordered by
/// descending count with ties broken by ascending value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCounts {
    pub column: Column,
    pub entries: Vec<(String, usize)>,
}

impl ValueCounts {
    /// Sum of all counts, i.e. the number of non-null cells.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    #[cfg(test)]
    pub fn get(&self, value: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, n)| *n)
    }

    /// Keep only the `n` largest entries.
    pub fn top(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn value_counts(view: &FilteredView<'_>, column: Column) -> Result<ValueCounts, MissingColumn> {
    view.dataset().require(column)?;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in view.records().filter_map(|r| r.text(column)) {
        *counts.entry(value).or_default() += 1;
    }

    // BTreeMap iteration is value-sorted; a stable sort keeps that as the tie-break.
    let mut entries: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(v, n)| (v.to_string(), n))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(ValueCounts { column, entries })
}

// ---------------------------------------------------------------------------
// Numeric: equal-width histogram
// ---------------------------------------------------------------------------

/// Equal-width binned distribution of a numeric column.
/// `counts` is empty when the view had no values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub column: Column,
    pub min: f64,
    pub max: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    fn empty(column: Column) -> Self {
        Histogram {
            column,
            min: 0.0,
            max: 0.0,
            bin_width: 0.0,
            counts: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Lower and upper edge of bin `i`.
    pub fn bin_range(&self, i: usize) -> (f64, f64) {
        let lo = self.min + i as f64 * self.bin_width;
        (lo, lo + self.bin_width)
    }

    pub fn bin_center(&self, i: usize) -> f64 {
        let (lo, hi) = self.bin_range(i);
        (lo + hi) / 2.0
    }
}

/// Bin the non-null values of `column` into `bins` equal-width bins over
/// `[min, max]`.  The last bin is closed so `max` is counted.  When every
/// value is identical the span widens to `[v - 0.5, v + 0.5]`.
pub fn histogram(
    view: &FilteredView<'_>,
    column: Column,
    bins: usize,
) -> Result<Histogram, MissingColumn> {
    view.dataset().require(column)?;

    let values: Vec<f64> = view
        .records()
        .filter_map(|r| r.number(column))
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() || bins == 0 {
        return Ok(Histogram::empty(column));
    }

    let mut min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if (max - min).abs() < f64::EPSILON {
        min -= 0.5;
        max += 0.5;
    }

    let bin_width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = ((v - min) / bin_width).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }

    Ok(Histogram {
        column,
        min,
        max,
        bin_width,
        counts,
    })
}

// ---------------------------------------------------------------------------
// Binary split: two target values as shares of the whole view
// ---------------------------------------------------------------------------

/// Counts of two target values and their share of the view, in percent
/// rounded to one decimal place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinarySplit {
    pub column: Column,
    pub labels: [String; 2],
    pub counts: [usize; 2],
    pub percents: [f64; 2],
    /// Size of the view, including records matching neither target.
    pub total: usize,
}

/// Percentage in tenths of a percent.  Exact ties round to the even tenth,
/// so 6.25 reads 6.2 and 93.75 reads 93.8.
fn tenths(count: usize, total: usize) -> usize {
    let scaled = count * 1000;
    let (quotient, remainder) = (scaled / total, scaled % total);
    match (remainder * 2).cmp(&total) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + quotient % 2,
    }
}

pub fn binary_split(
    view: &FilteredView<'_>,
    column: Column,
    targets: [&str; 2],
) -> Result<BinarySplit, MissingColumn> {
    view.dataset().require(column)?;

    let mut counts = [0usize; 2];
    for value in view.records().filter_map(|r| r.text(column)) {
        if let Some(slot) = targets.iter().position(|t| *t == value) {
            counts[slot] += 1;
        }
    }

    let total = view.len();
    let percents = if total == 0 {
        [0.0, 0.0]
    } else {
        let first = tenths(counts[0], total);
        // A complete split must read exactly 100.0 after rounding.
        let second = if counts[0] + counts[1] == total {
            1000 - first
        } else {
            tenths(counts[1], total)
        };
        [first as f64 / 10.0, second as f64 / 10.0]
    };

    Ok(BinarySplit {
        column,
        labels: targets.map(str::to_string),
        counts,
        percents,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{Choice, FilterSelection};
    use crate::data::fixtures::{dataset, row};
    use crate::data::model::CrimeDataset;

    fn categories(values: &[&str]) -> CrimeDataset {
        dataset(values.iter().map(|c| row(&[(Column::Category, c)])).collect())
    }

    fn ages(values: &[&str]) -> CrimeDataset {
        dataset(values.iter().map(|a| row(&[(Column::OffenderAge, a)])).collect())
    }

    #[test]
    fn counts_categories() {
        let ds = categories(&["Theft", "Assault", "Theft"]);
        let counts = value_counts(&FilteredView::all(&ds), Column::Category).unwrap();
        assert_eq!(
            counts.entries,
            vec![("Theft".to_string(), 2), ("Assault".to_string(), 1)]
        );
        assert_eq!(counts.get("Theft"), Some(2));
        assert_eq!(counts.get("Fraud"), None);
    }

    #[test]
    fn counts_sum_to_non_null_cells() {
        let mut records: Vec<_> = ["Black", "White", "Black", "Asian"]
            .iter()
            .map(|r| row(&[(Column::VictimRace, r)]))
            .collect();
        records.push(row(&[]));
        records.push(row(&[(Column::Category, "Theft")]));
        let ds = dataset(records);
        let view = FilteredView::all(&ds);
        let counts = value_counts(&view, Column::VictimRace).unwrap();
        let non_null = view.records().filter(|r| r.victim_race.is_some()).count();
        assert_eq!(counts.total(), non_null);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn ties_break_alphabetically() {
        let ds = categories(&["b", "a", "c", "c"]);
        let counts = value_counts(&FilteredView::all(&ds), Column::Category).unwrap();
        let order: Vec<&str> = counts.entries.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
        assert_eq!(counts.top(2).entries.len(), 2);
    }

    #[test]
    fn missing_column_is_typed() {
        let ds = CrimeDataset::new(Vec::new(), [Column::Category].into_iter().collect());
        let view = FilteredView::all(&ds);
        assert_eq!(
            value_counts(&view, Column::OffenderRace),
            Err(MissingColumn(Column::OffenderRace))
        );
        assert_eq!(
            histogram(&view, Column::VictimAge, AGE_BINS),
            Err(MissingColumn(Column::VictimAge))
        );
        assert_eq!(
            binary_split(&view, Column::ReportType, ["a", "b"]),
            Err(MissingColumn(Column::ReportType))
        );
    }

    #[test]
    fn histogram_spans_min_to_max() {
        let ds = ages(&["10", "20", "30", "", "not a number", "40"]);
        let hist = histogram(&FilteredView::all(&ds), Column::OffenderAge, 3).unwrap();
        assert_eq!(hist.min, 10.0);
        assert_eq!(hist.max, 40.0);
        assert_eq!(hist.bin_width, 10.0);
        // 10 | 20 | 30 and 40 (closed last bin)
        assert_eq!(hist.counts, vec![1, 1, 2]);
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.bin_range(1), (20.0, 30.0));
        assert_eq!(hist.bin_center(0), 15.0);
    }

    #[test]
    fn histogram_uses_twenty_bins() {
        let values: Vec<String> = (18..=77).map(|a| a.to_string()).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let ds = ages(&refs);
        let hist = histogram(&FilteredView::all(&ds), Column::OffenderAge, AGE_BINS).unwrap();
        assert_eq!(hist.counts.len(), AGE_BINS);
        assert_eq!(hist.total(), 60);
        assert!(hist.counts.iter().all(|&n| n == 3));
    }

    #[test]
    fn histogram_of_empty_view_has_no_bins() {
        let ds = ages(&["25", "35"]);
        let selection = FilterSelection::new(Choice::Value("Closed".into()), Choice::All);
        let view = FilteredView::apply(&ds, &selection);
        assert!(view.is_empty());
        let hist = histogram(&view, Column::OffenderAge, AGE_BINS).unwrap();
        assert!(hist.is_empty());
        assert_eq!(hist.total(), 0);
    }

    #[test]
    fn histogram_of_constant_values_widens_span() {
        let ds = ages(&["30", "30", "30"]);
        let hist = histogram(&FilteredView::all(&ds), Column::OffenderAge, AGE_BINS).unwrap();
        assert_eq!(hist.min, 29.5);
        assert_eq!(hist.max, 30.5);
        assert_eq!(hist.counts[AGE_BINS / 2], 3);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn split_reports_counts_and_percentages() {
        let ds = dataset(
            ["Incident Report", "Incident Report", "Supplemental Report", "Other"]
                .iter()
                .map(|t| row(&[(Column::ReportType, t)]))
                .collect(),
        );
        let split = binary_split(
            &FilteredView::all(&ds),
            Column::ReportType,
            ["Incident Report", "Supplemental Report"],
        )
        .unwrap();
        assert_eq!(split.counts, [2, 1]);
        assert_eq!(split.percents, [50.0, 25.0]);
        assert_eq!(split.total, 4);
        assert!(split.percents[0] + split.percents[1] <= 100.0);
    }

    #[test]
    fn complete_split_sums_to_exactly_one_hundred() {
        for fatal in 0..=7 {
            let records = (0..7)
                .map(|i| {
                    let status = if i < fatal { "Fatal" } else { "Non-fatal" };
                    row(&[(Column::VictimFatalStatus, status)])
                })
                .collect();
            let ds = dataset(records);
            let split = binary_split(
                &FilteredView::all(&ds),
                Column::VictimFatalStatus,
                ["Non-fatal", "Fatal"],
            )
            .unwrap();
            let sum = split.percents[0] + split.percents[1];
            assert!((sum - 100.0).abs() < 1e-9, "fatal={fatal} sum={sum}");
        }
    }

    #[test]
    fn rounds_to_one_decimal() {
        let ds = dataset(
            ["Fatal", "Non-fatal", "Non-fatal", "Unknown", "Unknown", "Unknown"]
                .iter()
                .map(|s| row(&[(Column::VictimFatalStatus, s)]))
                .collect(),
        );
        let split = binary_split(
            &FilteredView::all(&ds),
            Column::VictimFatalStatus,
            ["Non-fatal", "Fatal"],
        )
        .unwrap();
        assert_eq!(split.percents, [33.3, 16.7]);
    }

    #[test]
    fn empty_split_is_zero_not_an_error() {
        let ds = dataset(Vec::new());
        let split = binary_split(
            &FilteredView::all(&ds),
            Column::ReportType,
            ["Incident Report", "Supplemental Report"],
        )
        .unwrap();
        assert_eq!(split.counts, [0, 0]);
        assert_eq!(split.percents, [0.0, 0.0]);
    }

    #[test]
    fn exact_ties_round_to_even() {
        let records = (0..16)
            .map(|i| {
                let status = if i == 0 { "Fatal" } else { "Non-fatal" };
                row(&[(Column::VictimFatalStatus, status)])
            })
            .collect();
        let ds = dataset(records);
        let split = binary_split(
            &FilteredView::all(&ds),
            Column::VictimFatalStatus,
            ["Fatal", "Non-fatal"],
        )
        .unwrap();
        assert_eq!(split.counts, [1, 15]);
        assert_eq!(split.percents, [6.2, 93.8]);

        assert_eq!(tenths(1, 16), 62);
        assert_eq!(tenths(15, 16), 938);
        assert_eq!(tenths(3, 16), 188);
        assert_eq!(tenths(1, 3), 333);
    }
}
