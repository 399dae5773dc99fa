mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::ValueOddsApp;
use eframe::egui;
use state::DashboardState;
use value_odds::config::{DashboardConfig, CONFIG_ENV};

fn main() -> Result<()> {
    env_logger::init();

    let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let cli_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DashboardConfig::resolve(env_path, cli_path).context("loading configuration")?;

    // The table is loaded once here and owned by the state for the session.
    let mut state = DashboardState::default();
    state.load(&config.source());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    let pattern = config.pattern();
    eframe::run_native(
        &config.title,
        options,
        Box::new(move |_cc| Ok(Box::new(ValueOddsApp::new(state, title, pattern)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
