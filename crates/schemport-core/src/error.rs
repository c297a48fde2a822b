use std::path::PathBuf;

/// Errors that can occur while loading a converter configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config RON: {0}")]
    Parse(String),
}
