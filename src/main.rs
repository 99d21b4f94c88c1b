mod config;
mod db;
mod error;
mod export;
mod models;
mod numeral;
mod quiz;
mod run;
mod ui;

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    config.ensure_data_dir()?;
    init_logging(&config)?;

    let args: Vec<String> = std::env::args().collect();
    let mut db = db::Database::open(&config.db_path)?;

    match args.len() {
        0 | 1 => run::as_tui(&mut db, &config),
        _ => run::as_cli(&args, &mut db, &config),
    }
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
        .with_context(|| format!("Failed to open log file: {}", config.log_path.display()))?;

    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("Invalid KITBAG_LOG filter: {}", config.log_filter))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .init();
    Ok(())
}
