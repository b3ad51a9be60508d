use std::path::{Path, PathBuf};

use crate::data::filter::{Choice, FilterSelection, filter_options};
use crate::data::model::{Column, CrimeDataset};
use crate::data::summary::DashboardSummary;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset; read-only once set.
    pub dataset: Option<CrimeDataset>,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Current dropdown values.
    pub selection: FilterSelection,

    /// Dropdown entries: `All` plus sorted observed values.
    pub disposition_options: Vec<Choice>,
    pub category_options: Vec<Choice>,

    /// Chart data for the current selection, rebuilt on every change.
    pub summary: Option<DashboardSummary>,

    /// `file://` URI of the banner image.
    pub header_image: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(header_image: Option<String>) -> Self {
        Self {
            header_image,
            ..Default::default()
        }
    }

    /// Ingest a newly loaded dataset and reset the filters to All / All.
    pub fn set_dataset(&mut self, dataset: CrimeDataset, source: PathBuf) {
        self.disposition_options = filter_options(&dataset, Column::Disposition);
        self.category_options = filter_options(&dataset, Column::Category);
        self.selection = FilterSelection::default();
        self.dataset = Some(dataset);
        self.source = Some(source);
        self.status_message = None;
        self.recompute();
    }

    pub fn set_selection(&mut self, selection: FilterSelection) {
        for (column, choice) in selection.constraints() {
            let options = match column {
                Column::Disposition => &self.disposition_options,
                _ => &self.category_options,
            };
            if !options.contains(choice) {
                log::warn!("'{choice}' is not an observed {column} value; nothing will match");
            }
        }
        self.selection = selection;
        self.recompute();
    }

    pub fn select_disposition(&mut self, choice: Choice) {
        if self.selection.disposition != choice {
            self.selection.disposition = choice;
            self.recompute();
        }
    }

    pub fn select_category(&mut self, choice: Choice) {
        if self.selection.category != choice {
            self.selection.category = choice;
            self.recompute();
        }
    }

    /// Re-run filtering and every aggregator for the current selection.
    pub fn recompute(&mut self) {
        self.summary = self
            .dataset
            .as_ref()
            .map(|ds| DashboardSummary::compute(ds, &self.selection));
        if let Some(summary) = &self.summary {
            log::debug!(
                "selection {}/{} matches {} of {} records",
                summary.disposition,
                summary.category,
                summary.matching_records,
                summary.total_records
            );
        }
    }

    /// Write the current summary to `path`, reporting the outcome in the status line.
    pub fn export_summary(&mut self, path: &Path) {
        let Some(summary) = &self.summary else {
            self.status_message = Some("Nothing to export: no dataset loaded".into());
            return;
        };
        match summary.write_json(path) {
            Ok(()) => {
                log::info!("Exported dashboard summary to {}", path.display());
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export summary: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
