mod app;
mod classifier;
mod color;
mod config;
mod data;
mod error;
mod predictor;
mod state;
mod ui;

use app::UpwellingApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Laut Tawar Upwelling Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(UpwellingApp::new(config)))),
    )
}
