use fintrack_config::ConfigError;
use fintrack_core::CoreError;
use fintrack_storage_json::StorageError;
use thiserror::Error;

/// Failures surfaced by the command line.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Snapshot error: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Not found: {0}")]
    NotFound(String),
}
