use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Everything that stops the front-end before or while it runs. Request
/// failures inside the UI loop are shown on screen and never end up here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("cannot build the API client: {0}")]
    Client(#[from] budget_client::ClientError),
    #[error("cannot open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn log_file_error_names_the_path() {
        let err = AppError::LogFile {
            path: PathBuf::from("/var/log/budget/tui.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert_eq!(
            err.to_string(),
            "cannot open log file /var/log/budget/tui.log: permission denied"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
