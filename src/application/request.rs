//! Recording request built from merged configuration

use std::path::PathBuf;

use crate::domain::capture::{FrameRate, Resolution};
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Caller-supplied parameters for one recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingRequest {
    /// Base directory; created if missing
    pub output_dir: PathBuf,
    /// Encoder executable
    pub recorder: String,
    /// Frame rate override (backend default when unset)
    pub fps: Option<FrameRate>,
    /// Resolution override (probed when unset)
    pub resolution: Option<Resolution>,
    pub audio_device: Option<String>,
    pub input_device: Option<String>,
}

impl RecordingRequest {
    /// Request recording into `output_dir` with every other value defaulted
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            recorder: crate::domain::config::DEFAULT_RECORDER.to_string(),
            fps: None,
            resolution: None,
            audio_device: None,
            input_device: None,
        }
    }

    /// Validate and convert a merged config
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let fps = config
            .fps
            .as_deref()
            .map(|s| {
                s.parse::<FrameRate>()
                    .map_err(|e| ConfigError::ValidationError {
                        key: "fps".to_string(),
                        message: e.to_string(),
                    })
            })
            .transpose()?;

        let resolution = config
            .resolution
            .as_deref()
            .map(|s| {
                s.parse::<Resolution>()
                    .map_err(|e| ConfigError::ValidationError {
                        key: "resolution".to_string(),
                        message: e.to_string(),
                    })
            })
            .transpose()?;

        Ok(Self {
            output_dir: config.output_dir_or_default(),
            recorder: config.recorder_or_default().to_string(),
            fps,
            resolution,
            audio_device: non_blank(config.audio_device.as_deref()),
            input_device: non_blank(config.input_device.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
