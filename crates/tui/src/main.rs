mod app;
mod config;
mod error;
mod ui;

use std::{fs::OpenOptions, path::Path, sync::Mutex};

use crate::error::{AppError, Result};

/// The terminal belongs to the UI, so logs go to a file.
fn init_tracing(settings: &config::AppConfig) -> Result<()> {
    let path = Path::new(&settings.log_file);
    let log_error = |source: std::io::Error| AppError::LogFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(log_error)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(log_error)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budget_tui={level},budget_client={level}",
            level = settings.log_level
        ))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;
    init_tracing(&config)?;
    tracing::info!(base_url = %config.base_url, location = %config.location, "starting");

    let mut app = app::App::new(config)?;
    app.run()?;
    Ok(())
}
