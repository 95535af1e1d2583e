//! Capture backend port interface

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::capture::{FrameRate, Resolution};

/// Invalid capture settings, rejected before anything is spawned
#[derive(Debug, Clone, Error)]
pub enum InvocationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} contains a NUL byte")]
    NulByte { field: &'static str },

    #[error("Resolution {0} has an odd dimension; yuv420p output needs even width and height")]
    OddResolution(Resolution),

    #[error("Output path has no parent directory: {0}")]
    NoOutputDirectory(String),
}

/// Everything a backend needs to build one recorder invocation
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// Encoder executable
    pub recorder: String,
    /// Resolved output file
    pub output: PathBuf,
    /// Resolved display target
    pub display: String,
    /// Configured override or probed resolution
    pub resolution: Resolution,
    /// Frame rate, or the backend default when unset
    pub fps: Option<FrameRate>,
    /// Audio input passed verbatim
    pub audio_device: Option<String>,
    /// Video input passed verbatim
    pub input_device: Option<String>,
}

/// A fully built recorder command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Environment overrides applied to the child only
    pub env: Vec<(String, String)>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Platform capture strategy
pub trait CaptureBackend: Send + Sync {
    /// Short backend name (e.g. "x11")
    fn name(&self) -> &'static str;

    /// Frame rate used when none is configured
    fn default_fps(&self) -> FrameRate;

    /// Container extension for output files (without the dot)
    fn container_extension(&self) -> &'static str {
        "mp4"
    }

    /// Build a validated invocation from `settings`
    fn build(&self, settings: &CaptureSettings) -> Result<Invocation, InvocationError>;
}

/// Blanket implementation for boxed backend types
impl CaptureBackend for Box<dyn CaptureBackend> {
    fn name(&self) -> &'static str {
        self.as_ref().name()
    }

    fn default_fps(&self) -> FrameRate {
        self.as_ref().default_fps()
    }

    fn container_extension(&self) -> &'static str {
        self.as_ref().container_extension()
    }

    fn build(&self, settings: &CaptureSettings) -> Result<Invocation, InvocationError> {
        self.as_ref().build(settings)
    }
}

/// Validate a free-form value that is passed through to the recorder
pub fn validate_passthrough(field: &'static str, value: &str) -> Result<(), InvocationError> {
    if value.trim().is_empty() {
        return Err(InvocationError::Empty { field });
    }
    if value.contains('\0') {
        return Err(InvocationError::NulByte { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_rejects_empty_and_nul() {
        assert!(validate_passthrough("audio device", "default").is_ok());
        assert!(matches!(
            validate_passthrough("audio device", "  "),
            Err(InvocationError::Empty { .. })
        ));
        assert!(matches!(
            validate_passthrough("audio device", "a\0b"),
            Err(InvocationError::NulByte { .. })
        ));
    }

    #[test]
    fn invocation_display_quotes_spaced_args() {
        let invocation = Invocation {
            program: "ffmpeg".to_string(),
            args: vec!["-i".to_string(), "Built-in Microphone".to_string()],
            env: vec![("DISPLAY".to_string(), ":1".to_string())],
        };
        assert_eq!(
            invocation.to_string(),
            "DISPLAY=:1 ffmpeg -i \"Built-in Microphone\""
        );
    }
}
