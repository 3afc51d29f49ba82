//! Errors raised by the development tools.

use sw_core::error::GameError;
use thiserror::Error;

/// Errors that can occur while loading data files or writing reports.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        /// Path to the file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A data file was rejected by the core.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Failed to encode the report.
    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Result type for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Read a whole data file into a string.
pub(crate) fn read_file(path: &std::path::Path) -> ToolResult<String> {
    std::fs::read_to_string(path).map_err(|source| ToolError::IoError {
        path: path.display().to_string(),
        source,
    })
}
