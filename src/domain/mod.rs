//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod capture;
pub mod config;
pub mod error;
pub mod recording;
pub mod session;

// Re-export common types
pub use capture::{FrameRate, Resolution};
pub use config::AppConfig;
pub use error::*;
pub use recording::{Duration, OutputFile};
pub use session::{SessionState, SessionStatus};
