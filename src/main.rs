mod app;
mod ui;

use std::sync::Arc;

use app::FlightboardApp;
use eframe::egui;
use flightboard::config::DashboardConfig;
use flightboard::data::year_loader::YearLoader;
use flightboard::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match DashboardConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration, using defaults: {e:#}");
            DashboardConfig::default()
        }
    };
    log::info!(
        "Reading {} from {}",
        config.file_pattern,
        config.data_dir.display()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Flightboard – European air traffic",
        options,
        Box::new(move |cc| {
            // Finished background loads wake the UI.
            let ctx = cc.egui_ctx.clone();
            let loader = YearLoader::new(Arc::new(config.source()))
                .with_notify(move || ctx.request_repaint());
            Ok(Box::new(FlightboardApp {
                state: AppState::new(config, loader),
            }))
        }),
    )
}
