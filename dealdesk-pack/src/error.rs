//! Error types for the pack crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("Pack file not found: {0}")]
    MissingFile(String),

    #[error("Failed to read pack file {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse pack file {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid rule pack: {0}")]
    Invalid(String),
}
