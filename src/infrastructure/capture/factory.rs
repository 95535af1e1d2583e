//! Capture backend selection

use std::fmt;
use std::str::FromStr;

use crate::application::ports::CaptureBackend;

use super::avfoundation::AvFoundationCapture;
use super::x11::X11Capture;

/// User preference for the capture backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureBackendKind {
    /// Pick by target OS
    #[default]
    Auto,
    /// X11 display grab with PulseAudio
    X11,
    /// macOS AVFoundation
    AvFoundation,
}

impl CaptureBackendKind {
    /// Resolve `Auto` to the backend for this platform
    pub fn resolve(self) -> Self {
        match self {
            CaptureBackendKind::Auto if cfg!(target_os = "macos") => {
                CaptureBackendKind::AvFoundation
            }
            CaptureBackendKind::Auto => CaptureBackendKind::X11,
            other => other,
        }
    }
}

impl fmt::Display for CaptureBackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureBackendKind::Auto => write!(f, "auto"),
            CaptureBackendKind::X11 => write!(f, "x11"),
            CaptureBackendKind::AvFoundation => write!(f, "avfoundation"),
        }
    }
}

/// Error type for parsing a capture backend name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCaptureBackendError {
    pub value: String,
    pub valid_options: &'static str,
}

impl fmt::Display for ParseCaptureBackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid capture backend '{}'. Valid options: {}",
            self.value, self.valid_options
        )
    }
}

impl std::error::Error for ParseCaptureBackendError {}

impl FromStr for CaptureBackendKind {
    type Err = ParseCaptureBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(CaptureBackendKind::Auto),
            "x11" | "x11grab" => Ok(CaptureBackendKind::X11),
            "avfoundation" => Ok(CaptureBackendKind::AvFoundation),
            _ => Err(ParseCaptureBackendError {
                value: s.to_string(),
                valid_options: "auto, x11, avfoundation",
            }),
        }
    }
}

/// Create the capture backend for `kind`
pub fn create_backend(kind: CaptureBackendKind) -> Box<dyn CaptureBackend> {
    match kind.resolve() {
        CaptureBackendKind::AvFoundation => Box::new(AvFoundationCapture::new()),
        CaptureBackendKind::X11 | CaptureBackendKind::Auto => Box::new(X11Capture::new()),
    }
}
