//! macOS screen capture through ffmpeg's avfoundation device

use crate::application::ports::{
    validate_passthrough, CaptureBackend, CaptureSettings, Invocation, InvocationError,
};
use crate::domain::capture::FrameRate;

use super::{check_common, string_args};

/// Device index of the first screen
const DEFAULT_VIDEO_DEVICE: &str = "1";
/// Device index of the default microphone
const DEFAULT_AUDIO_DEVICE: &str = "0";

/// Captures a macOS screen and microphone through one combined device selector,
/// encoded with VideoToolbox
pub struct AvFoundationCapture;

impl AvFoundationCapture {
    pub fn new() -> Self {
        Self
    }

    fn device(field: &'static str, value: Option<&String>, default: &'static str) -> Result<String, InvocationError> {
        match value {
            Some(v) => {
                validate_passthrough(field, v)?;
                Ok(v.clone())
            }
            None => Ok(default.to_string()),
        }
    }
}

impl Default for AvFoundationCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for AvFoundationCapture {
    fn name(&self) -> &'static str {
        "avfoundation"
    }

    fn default_fps(&self) -> FrameRate {
        FrameRate::FPS_30
    }

    fn build(&self, settings: &CaptureSettings) -> Result<Invocation, InvocationError> {
        let output = check_common(settings)?;
        let video = Self::device("input device", settings.input_device.as_ref(), DEFAULT_VIDEO_DEVICE)?;
        let audio = Self::device("audio device", settings.audio_device.as_ref(), DEFAULT_AUDIO_DEVICE)?;

        let fps = settings.fps.unwrap_or_else(|| self.default_fps());

        let mut args = string_args(&["-y", "-f", "avfoundation", "-framerate"]);
        args.push(fps.to_string());
        args.push("-video_size".to_string());
        args.push(settings.resolution.to_string());
        args.extend(string_args(&["-capture_cursor", "1", "-i"]));
        args.push(format!("{}:{}", video, audio));
        args.extend(string_args(&[
            "-c:v",
            "h264_videotoolbox",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
        ]));
        args.push(output);

        Ok(Invocation {
            program: settings.recorder.clone(),
            args,
            env: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::Resolution;
    use std::path::PathBuf;

    fn settings() -> CaptureSettings {
        CaptureSettings {
            recorder: "ffmpeg".to_string(),
            output: PathBuf::from("/Users/me/Movies/screen-rec/out.mp4"),
            display: ":0.0".to_string(),
            resolution: Resolution::new(2560, 1600),
            fps: None,
            audio_device: None,
            input_device: None,
        }
    }

    #[test]
    fn builds_default_argument_list() {
        let invocation = AvFoundationCapture::new().build(&settings()).unwrap();
        assert_eq!(
            invocation.args,
            vec![
                "-y", "-f", "avfoundation", "-framerate", "30", "-video_size", "2560x1600",
                "-capture_cursor", "1", "-i", "1:0", "-c:v", "h264_videotoolbox", "-pix_fmt",
                "yuv420p", "-c:a", "aac", "/Users/me/Movies/screen-rec/out.mp4",
            ]
        );
        assert!(invocation.env.is_empty());
    }

    #[test]
    fn named_devices_are_combined() {
        let mut s = settings();
        s.input_device = Some("Capture screen 0".to_string());
        s.audio_device = Some("MacBook Pro Microphone".to_string());
        let args = AvFoundationCapture::new().build(&s).unwrap().args;
        assert!(args.contains(&"Capture screen 0:MacBook Pro Microphone".to_string()));
    }

    #[test]
    fn rejects_nul_in_device() {
        let mut s = settings();
        s.input_device = Some("1\0".to_string());
        assert!(matches!(
            AvFoundationCapture::new().build(&s),
            Err(InvocationError::NulByte { field: "input device" })
        ));
    }
}
