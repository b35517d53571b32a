use std::path::PathBuf;

use vidbench_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid configuration {key}='{value}': {reason}")]
    Config {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to read seed file {}: {source}", path.display())]
    SeedIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file {}: {source}", path.display())]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
