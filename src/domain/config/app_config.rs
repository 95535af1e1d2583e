//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Default encoder executable
pub const DEFAULT_RECORDER: &str = "ffmpeg";

/// Default capture backend selection
pub const DEFAULT_BACKEND: &str = "auto";

/// Directory name used under the user's video directory
const OUTPUT_SUBDIR: &str = "screen-rec";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub output_dir: Option<String>,
    pub audio_device: Option<String>,
    pub input_device: Option<String>,
    pub fps: Option<String>,
    pub resolution: Option<String>,
    pub display: Option<String>,
    pub backend: Option<String>,
    pub recorder: Option<String>,
    pub stop_timeout: Option<String>,
    pub notify: Option<bool>,
}

impl AppConfig {
    /// Create config with default values.
    ///
    /// Device names, frame rate, resolution and display stay unset: their
    /// defaults depend on the capture backend and the running display.
    pub fn defaults() -> Self {
        Self {
            output_dir: Some(default_output_dir().to_string_lossy().to_string()),
            audio_device: None,
            input_device: None,
            fps: None,
            resolution: None,
            display: None,
            backend: Some(DEFAULT_BACKEND.to_string()),
            recorder: Some(DEFAULT_RECORDER.to_string()),
            stop_timeout: Some(Duration::default_stop_timeout().to_string()),
            notify: Some(false),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            output_dir: other.output_dir.or(self.output_dir),
            audio_device: other.audio_device.or(self.audio_device),
            input_device: other.input_device.or(self.input_device),
            fps: other.fps.or(self.fps),
            resolution: other.resolution.or(self.resolution),
            display: other.display.or(self.display),
            backend: other.backend.or(self.backend),
            recorder: other.recorder.or(self.recorder),
            stop_timeout: other.stop_timeout.or(self.stop_timeout),
            notify: other.notify.or(self.notify),
        }
    }

    /// Get output directory, or `<videos>/screen-rec` if not set
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_output_dir)
    }

    /// Get backend selection, or "auto" if not set
    pub fn backend_or_default(&self) -> &str {
        self.backend.as_deref().unwrap_or(DEFAULT_BACKEND)
    }

    /// Get recorder executable, or "ffmpeg" if not set
    pub fn recorder_or_default(&self) -> &str {
        self.recorder
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_RECORDER)
    }

    /// Get stop timeout as parsed Duration, or default if not set/invalid
    pub fn stop_timeout_or_default(&self) -> Duration {
        self.stop_timeout
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_stop_timeout)
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }
}

/// `<videos>/screen-rec`, falling back to `~/Videos` and then the temp dir
pub fn default_output_dir() -> PathBuf {
    dirs::video_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Videos")))
        .unwrap_or_else(std::env::temp_dir)
        .join(OUTPUT_SUBDIR)
}
