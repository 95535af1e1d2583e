//! Process control port interface

use std::path::Path;

use thiserror::Error;

use super::capture::Invocation;

/// Process control errors
#[derive(Debug, Clone, Error)]
pub enum ProcessError {
    #[error("Recorder executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("Failed to launch recorder: {0}")]
    LaunchFailed(String),

    #[error("Failed to open recorder log: {0}")]
    LogUnavailable(String),

    #[error("Failed to signal process {pid}: {message}")]
    SignalFailed { pid: u32, message: String },
}

/// Result of delivering a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalDelivery {
    /// The process existed and received the signal
    Delivered,
    /// No process with that id exists
    NoSuchProcess,
    /// The id now belongs to another user's process, so it is not ours
    NotPermitted,
}

/// Port for launching and signalling OS processes
pub trait ProcessControl: Send + Sync {
    /// Launch `invocation` detached from the caller, with stdout and stderr
    /// appended to `log_path`.
    ///
    /// # Returns
    /// The process id of the new recorder
    fn launch(&self, invocation: &Invocation, log_path: &Path) -> Result<u32, ProcessError>;

    /// Existence probe. Must never terminate the process.
    fn is_alive(&self, pid: u32) -> bool;

    /// Send the graceful interrupt signal
    fn interrupt(&self, pid: u32) -> Result<SignalDelivery, ProcessError>;

    /// Send the forced kill signal
    fn kill(&self, pid: u32) -> Result<SignalDelivery, ProcessError>;
}
