use std::time::Duration;

use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/budget_tui.toml";
const ENV_PREFIX: &str = "BUDGET_TUI";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Bearer token attached to every request. Never read from the CLI.
    pub token: Option<String>,
    pub page_size: u64,
    pub items_page_size: u64,
    /// `0` keeps cached data until a mutation invalidates it.
    pub stale_after_secs: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub log_file: String,
    /// Location opened at startup, e.g. `/transactions?page=2`.
    pub location: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api/v1/".to_string(),
            token: None,
            page_size: 20,
            items_page_size: 5,
            stale_after_secs: 30,
            request_timeout_secs: 10,
            log_level: "info".to_string(),
            log_file: "config/budget_tui.log".to_string(),
            location: "/".to_string(),
        }
    }
}

impl AppConfig {
    pub fn stale_after(&self) -> Option<Duration> {
        (self.stale_after_secs > 0).then(|| Duration::from_secs(self.stale_after_secs))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Parser)]
#[command(name = "budget_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000/api/v1/).
    #[arg(long)]
    base_url: Option<String>,
    /// Location to open, e.g. "/transactions?page=2&transactionType=expense".
    #[arg(long)]
    location: Option<String>,
    /// Rows per page for transactions and categories.
    #[arg(long)]
    page_size: Option<u64>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
    /// Override log file path.
    #[arg(long)]
    log_file: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    resolve(Args::parse())
}

fn resolve(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(location) = args.location {
        settings.location = location;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }

    Ok(settings)
}
