use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::Choice;
use crate::state::AppState;

pub const TITLE: &str = "US Crime Analysis Dashboard";

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.summary.is_some(), egui::Button::new("Export summary…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(summary) = &state.summary {
            ui.label(format!(
                "{} records loaded, {} matching",
                summary.total_records, summary.matching_records
            ));
        }
        if let Some(source) = &state.source {
            ui.separator();
            ui.weak(source.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Header and filter controls
// ---------------------------------------------------------------------------

/// Banner image (when configured) and page title.
pub fn header(ui: &mut Ui, state: &AppState) {
    if let Some(uri) = &state.header_image {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri.as_str())
                    .max_width(ui.available_width())
                    .max_height(200.0),
            );
        });
    }
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(TITLE).size(28.0).strong());
    });
    ui.add_space(8.0);
}

/// The two dropdowns.  A pick is applied immediately.
pub fn filter_bar(ui: &mut Ui, state: &mut AppState) {
    let mut disposition = None;
    let mut category = None;

    ui.horizontal(|ui: &mut Ui| {
        disposition = choice_combo(
            ui,
            "Select Disposition",
            &state.selection.disposition,
            &state.disposition_options,
        );
        ui.add_space(24.0);
        category = choice_combo(
            ui,
            "Select Category",
            &state.selection.category,
            &state.category_options,
        );
    });

    if let Some(choice) = disposition {
        state.select_disposition(choice);
    }
    if let Some(choice) = category {
        state.select_category(choice);
    }
}

fn choice_combo(ui: &mut Ui, label: &str, current: &Choice, options: &[Choice]) -> Option<Choice> {
    let mut picked = None;
    egui::ComboBox::from_label(label)
        .selected_text(current.label())
        .width(200.0)
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                if ui.selectable_label(option == current, option.label()).clicked() {
                    picked = Some(option.clone());
                }
            }
        });
    picked
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open crime dataset")
        .add_filter("Supported files", &["csv", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => state.set_dataset(dataset, path),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard summary")
        .add_filter("JSON", &["json"])
        .set_file_name("dashboard_summary.json")
        .save_file();

    if let Some(path) = file {
        state.export_summary(&path);
    }
}
