// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod config;
mod error;
mod file_utils;
mod grouping;
mod image_cache;
mod image_loader;
mod manifest;
mod part;
mod scanner;
mod services;
mod startup;
mod state;
mod ui;

use clap::Parser;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = startup::Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cfg!(debug_assertions) {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let app = AppWindow::new()?;
    let app_state = state::AppState::new();

    // Setup all UI event handlers
    ui::setup_handlers(&app, app_state.clone());
    startup::configure_startup_opening(&app, &app_state, args);

    app.run()?;

    Ok(())
}
