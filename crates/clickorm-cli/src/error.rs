//! Error types for the command-line tool.

use std::path::PathBuf;

/// Errors that can occur while running a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A command needs table schemas but none were given.
    #[error("No schema file given (use --schema or CLICKORM_SCHEMA)")]
    MissingSchema,

    /// The schema file could not be read.
    #[error("Failed to read schema file '{path}': {source}")]
    Read {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The schema file is not valid JSON for a list of tables.
    #[error("Failed to parse schema file '{path}': {source}")]
    Parse {
        /// Path to the schema file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Statement compilation failed.
    #[error(transparent)]
    Compile(#[from] clickorm_core::Error),

    /// Parameters could not be encoded as JSON.
    #[error("Failed to encode parameters: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, CliError>;
