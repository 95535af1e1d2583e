//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces, integrating
//! with the filesystem, POSIX signals, ffmpeg and the desktop.

pub mod capture;
pub mod config;
pub mod environment;
pub mod log;
pub mod marker;
pub mod notification;
pub mod process;

// Re-export adapters
pub use capture::{create_backend, AvFoundationCapture, CaptureBackendKind, X11Capture};
pub use config::XdgConfigStore;
pub use environment::SystemEnvironmentProbe;
pub use log::FileRecorderLog;
pub use marker::PidMarker;
pub use notification::{create_notifier, NoOpNotifier, NotifyRustNotifier};
pub use process::UnixProcessControl;
