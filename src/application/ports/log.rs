//! Recorder log port interface

use std::path::PathBuf;

use thiserror::Error;

/// Recorder log errors
#[derive(Debug, Clone, Error)]
pub enum LogError {
    #[error("Failed to reset recorder log: {0}")]
    ResetFailed(String),

    #[error("Failed to write recorder log: {0}")]
    WriteFailed(String),

    #[error("Failed to read recorder log: {0}")]
    ReadFailed(String),
}

/// Port for the plain-text log the recorder writes into
pub trait RecorderLog: Send + Sync {
    /// Location the recorder's output is redirected to
    fn path(&self) -> PathBuf;

    /// Truncate (or create) the log for a new session
    fn reset(&self) -> Result<(), LogError>;

    /// Append a single line
    fn append(&self, line: &str) -> Result<(), LogError>;

    /// Last `max_lines` lines in original order.
    /// An absent log reads as empty.
    fn tail(&self, max_lines: usize) -> Result<Vec<String>, LogError>;
}
