//! X11 screen capture through ffmpeg's x11grab device

use crate::application::ports::{
    validate_passthrough, CaptureBackend, CaptureSettings, Invocation, InvocationError,
};
use crate::domain::capture::FrameRate;

use super::{check_common, string_args};

/// Audio source used when none is configured
const DEFAULT_AUDIO_DEVICE: &str = "default";

/// Captures an X11 display with PulseAudio sound, encoded with libx264
pub struct X11Capture;

impl X11Capture {
    pub fn new() -> Self {
        Self
    }

    /// x11grab input: the display with a `+x,y` origin appended when absent
    fn video_input(settings: &CaptureSettings) -> Result<String, InvocationError> {
        let source = match &settings.input_device {
            Some(device) => {
                validate_passthrough("input device", device)?;
                device.as_str()
            }
            None => {
                validate_passthrough("display", &settings.display)?;
                settings.display.as_str()
            }
        };

        if source.contains('+') {
            Ok(source.to_string())
        } else {
            Ok(format!("{}+0,0", source))
        }
    }
}

impl Default for X11Capture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for X11Capture {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn default_fps(&self) -> FrameRate {
        FrameRate::FPS_60
    }

    fn build(&self, settings: &CaptureSettings) -> Result<Invocation, InvocationError> {
        let output = check_common(settings)?;
        let video_input = Self::video_input(settings)?;

        let audio = match &settings.audio_device {
            Some(device) => {
                validate_passthrough("audio device", device)?;
                device.as_str()
            }
            None => DEFAULT_AUDIO_DEVICE,
        };

        let fps = settings.fps.unwrap_or_else(|| self.default_fps());
        let size = settings.resolution.to_string();

        let mut args = string_args(&["-y", "-f", "x11grab", "-framerate"]);
        args.push(fps.to_string());
        args.push("-video_size".to_string());
        args.push(size);
        args.push("-i".to_string());
        args.push(video_input);
        args.extend(string_args(&["-f", "pulse", "-i", audio]));
        args.extend(string_args(&[
            "-c:v",
            "libx264",
            "-preset",
            "ultrafast",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
        ]));
        args.push(output);

        Ok(Invocation {
            program: settings.recorder.clone(),
            args,
            env: vec![("DISPLAY".to_string(), settings.display.clone())],
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
            output: PathBuf::from("/videos/screen-rec/out.mp4"),
            display: ":1".to_string(),
            resolution: Resolution::new(1920, 1080),
            fps: None,
            audio_device: None,
            input_device: None,
        }
    }

    #[test]
    fn builds_default_argument_list() {
        let invocation = X11Capture::new().build(&settings()).unwrap();
        assert_eq!(invocation.program, "ffmpeg");
        assert_eq!(
            invocation.args,
            vec![
                "-y", "-f", "x11grab", "-framerate", "60", "-video_size", "1920x1080", "-i",
                ":1+0,0", "-f", "pulse", "-i", "default", "-c:v", "libx264", "-preset",
                "ultrafast", "-pix_fmt", "yuv420p", "-c:a", "aac",
                "/videos/screen-rec/out.mp4",
            ]
        );
        assert_eq!(
            invocation.env,
            vec![("DISPLAY".to_string(), ":1".to_string())]
        );
    }

    #[test]
    fn configured_devices_and_fps_pass_through() {
        let mut s = settings();
        s.fps = Some(FrameRate::new(24).unwrap());
        s.audio_device = Some("alsa_input.usb-mic".to_string());
        s.input_device = Some(":0.0+1920,0".to_string());

        let args = X11Capture::new().build(&s).unwrap().args;
        assert!(args.windows(2).any(|w| w == ["-framerate", "24"]));
        assert!(args.windows(2).any(|w| w == ["-i", ":0.0+1920,0"]));
        assert!(args.windows(2).any(|w| w == ["-i", "alsa_input.usb-mic"]));
    }

    #[test]
    fn rejects_odd_resolution() {
        let mut s = settings();
        s.resolution = Resolution::new(1366, 767);
        assert!(matches!(
            X11Capture::new().build(&s),
            Err(InvocationError::OddResolution(_))
        ));
    }

    #[test]
    fn rejects_blank_audio_device() {
        let mut s = settings();
        s.audio_device = Some(" ".to_string());
        assert!(matches!(
            X11Capture::new().build(&s),
            Err(InvocationError::Empty { field: "audio device" })
        ));
    }

    #[test]
    fn rejects_output_without_directory() {
        let mut s = settings();
        s.output = PathBuf::from("out.mp4");
        assert!(matches!(
            X11Capture::new().build(&s),
            Err(InvocationError::NoOutputDirectory(_))
        ));
    }
}
