use std::sync::Arc;

use eframe::egui;
use florafind::{
    gui::FloraApp,
    persistence::JsonFileStore,
    AppSettings,
};
use tracing_subscriber::EnvFilter;

const CACHE_FILE: &str = "cache.json";

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("florafind=info")))
        .init();

    let settings = AppSettings::load();
    tracing::info!(api = %settings.api_url, per_page = settings.per_page, "Starting FloraFind");

    let store = Arc::new(JsonFileStore::in_app_dir(CACHE_FILE));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("FloraFind")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FloraFind",
        native_options,
        Box::new(move |cc| Ok(Box::new(FloraApp::new(cc, settings, store)?))),
    )
}
