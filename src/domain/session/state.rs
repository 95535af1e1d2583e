//! Recording session state machine

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Where the single recording slot currently stands.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> IDLE (stop)
///   RECORDING -> ORPHANED (recorder died on its own)
///   ORPHANED -> IDLE (heal, on the next status check)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording { process_id: u32 },
    /// A marker exists but its process is gone (or the marker is unreadable)
    Orphaned { process_id: Option<u32> },
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording { .. } => "recording",
            Self::Orphaned { .. } => "orphaned",
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    /// Status as reported to callers; an orphan reads as inactive
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Recording { process_id } => SessionStatus::active(*process_id),
            Self::Idle | Self::Orphaned { .. } => SessionStatus::inactive(),
        }
    }

    /// Transition from IDLE to RECORDING
    pub fn start(self, process_id: u32) -> Result<Self, InvalidStateTransition> {
        match self {
            Self::Idle => Ok(Self::Recording { process_id }),
            _ => Err(InvalidStateTransition {
                current_state: self,
                action: "start recording".to_string(),
            }),
        }
    }

    /// Transition from RECORDING to IDLE
    pub fn stop(self) -> Result<Self, InvalidStateTransition> {
        match self {
            Self::Recording { .. } => Ok(Self::Idle),
            _ => Err(InvalidStateTransition {
                current_state: self,
                action: "stop recording".to_string(),
            }),
        }
    }

    /// Transition from ORPHANED to IDLE
    pub fn heal(self) -> Result<Self, InvalidStateTransition> {
        match self {
            Self::Orphaned { .. } => Ok(Self::Idle),
            _ => Err(InvalidStateTransition {
                current_state: self,
                action: "clear stale marker".to_string(),
            }),
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Recording status as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,
}

impl SessionStatus {
    pub const fn inactive() -> Self {
        Self {
            active: false,
            process_id: None,
        }
    }

    pub const fn active(process_id: u32) -> Self {
        Self {
            active: true,
            process_id: Some(process_id),
        }
    }
}
