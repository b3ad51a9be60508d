mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{Context, Result};
use app::CrimeDashApp;
use clap::Parser;
use config::Config;
use data::summary::DashboardSummary;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    // The dashboard cannot start without its dataset.
    let dataset = data::loader::load_file(&config.data)
        .with_context(|| format!("loading dataset {}", config.data.display()))?;
    let selection = config.selection();

    if let Some(out) = &config.export {
        let summary = DashboardSummary::compute(&dataset, &selection);
        summary.write_json(out)?;
        log::info!(
            "Wrote summary of {} / {} records to {}",
            summary.matching_records,
            summary.total_records,
            out.display()
        );
        return Ok(());
    }

    let mut state = AppState::new(config.header_uri());
    state.set_dataset(dataset, config.data.clone());
    state.set_selection(selection);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        ui::panels::TITLE,
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the jpg/png banner.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(CrimeDashApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
