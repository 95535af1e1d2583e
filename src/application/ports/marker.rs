//! Process marker port interface

use std::path::PathBuf;

use thiserror::Error;

/// Marker store errors
#[derive(Debug, Clone, Error)]
pub enum MarkerError {
    #[error("Failed to read process marker: {0}")]
    ReadFailed(String),

    #[error("Failed to write process marker: {0}")]
    WriteFailed(String),

    #[error("Failed to remove process marker: {0}")]
    RemoveFailed(String),

    #[error("Process marker already exists")]
    AlreadyExists,

    #[error("Another start is already in progress")]
    LockHeld,
}

/// What the marker currently holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerContents {
    Absent,
    Pid(u32),
    /// Present but not a positive decimal pid
    Invalid(String),
}

/// Port for the persisted process marker.
///
/// The marker is the single source of truth for "a recording is in
/// progress"; at most one exists at a time.
pub trait MarkerStore: Send + Sync {
    /// Location of the marker
    fn path(&self) -> PathBuf;

    /// Read the marker
    fn read(&self) -> Result<MarkerContents, MarkerError>;

    /// Create the marker holding `pid`. Fails with
    /// [`MarkerError::AlreadyExists`] rather than overwriting.
    fn create(&self, pid: u32) -> Result<(), MarkerError>;

    /// Remove the marker. Removing an absent marker succeeds.
    fn remove(&self) -> Result<(), MarkerError>;

    /// Take the exclusive start lock. Fails with [`MarkerError::LockHeld`]
    /// while another caller holds it.
    fn lock_start(&self) -> Result<(), MarkerError>;

    /// Release the start lock
    fn unlock_start(&self);
}
