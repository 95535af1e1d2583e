//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod environment;
pub mod log;
pub mod marker;
pub mod notifier;
pub mod process;

// Re-export common types
pub use capture::{
    validate_passthrough, CaptureBackend, CaptureSettings, Invocation, InvocationError,
};
pub use config::ConfigStore;
pub use environment::EnvironmentProbe;
pub use log::{LogError, RecorderLog};
pub use marker::{MarkerContents, MarkerError, MarkerStore};
pub use notifier::{NotificationError, NotificationIcon, Notifier};
pub use process::{ProcessControl, ProcessError, SignalDelivery};
