use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CrimeDashApp {
    pub state: AppState,
}

impl CrimeDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CrimeDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: header, filters, charts, raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::header(ui, &self.state);
                    panels::filter_bar(ui, &mut self.state);
                    ui.separator();

                    let Some(summary) = &self.state.summary else {
                        ui.centered_and_justified(|ui: &mut Ui| {
                            ui.heading("Open a file to view the dashboard  (File → Open…)");
                        });
                        return;
                    };
                    charts::dashboard(ui, summary);

                    ui.separator();
                    if let Some(dataset) = &self.state.dataset {
                        egui::CollapsingHeader::new("📄 Raw Data")
                            .default_open(false)
                            .show(ui, |ui: &mut Ui| {
                                table::raw_data_table(ui, dataset);
                            });
                    }
                });
        });
    }
}
