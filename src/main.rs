mod app;
mod color;
mod config;
mod data;
mod error;
mod model;
mod pipeline;
mod state;
mod ui;

use app::IrisPredictorApp;
use config::AppConfig;
use eframe::egui;
use model::ModelHandle;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();
    log::info!("Starting with {config:?}");
    let model = ModelHandle::load(&config.model_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Iris Species Predictor",
        options,
        Box::new(move |_cc| Ok(Box::new(IrisPredictorApp::new(&config, model)))),
    )
}
