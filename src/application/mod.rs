//! Application layer - Use cases and port interfaces
//!
//! Contains the recording supervisor and trait definitions
//! for external system interactions.

pub mod ports;
pub mod request;
pub mod supervisor;

// Re-export use cases
pub use request::RecordingRequest;
pub use supervisor::{
    effective_fps, RecordingStarted, RecordingSupervisor, StopOutcome, StopPolicy,
    SupervisorError, ToggleOutcome, DEFAULT_TAIL_LINES, NO_LOG_PLACEHOLDER,
};
