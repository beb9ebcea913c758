mod app;
mod chart;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod worker;

use anyhow::Context;
use app::KuntastatApp;
use config::AppConfig;
use data::client::StatfinClient;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().context("reading configuration")?;
    log::info!(
        "Using table {} for years {}-{}",
        config.table_url,
        config.years.first,
        config.years.last
    );
    let client = StatfinClient::new(config.table_url.clone(), config.timeout)
        .context("building HTTP client")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 650.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Kuntastat – Municipality Statistics",
        options,
        Box::new(move |cc| Ok(Box::new(KuntastatApp::new(cc, config, client)))),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
