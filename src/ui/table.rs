use eframe::egui::{TextStyle, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::CrimeDataset;

/// Scrollable table of the unfiltered file, every column as it was read.
pub fn raw_data_table(ui: &mut Ui, dataset: &CrimeDataset) {
    let raw = &dataset.raw;
    let row_height = ui.text_style_height(&TextStyle::Body) + 4.0;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .column(TableColumn::auto())
        .columns(TableColumn::auto().at_least(80.0), raw.headers.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for name in &raw.headers {
                header.col(|ui| {
                    ui.strong(name.as_str());
                });
            }
        })
        .body(|body| {
            body.rows(row_height, raw.rows.len(), |mut row| {
                let index = row.index();
                let cells = &raw.rows[index];
                row.col(|ui| {
                    ui.label(index.to_string());
                });
                for i in 0..raw.headers.len() {
                    row.col(|ui| {
                        ui.label(cells.get(i).unwrap_or_default());
                    });
                }
            });
        });
}
