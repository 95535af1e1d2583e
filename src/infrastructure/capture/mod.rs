//! Capture backend infrastructure module

mod avfoundation;
mod factory;
mod x11;

pub use avfoundation::AvFoundationCapture;
pub use factory::{create_backend, CaptureBackendKind, ParseCaptureBackendError};
pub use x11::X11Capture;

use crate::application::ports::{validate_passthrough, CaptureSettings, InvocationError};

/// Checks shared by every backend; returns the output path as an argument
fn check_common(settings: &CaptureSettings) -> Result<String, InvocationError> {
    validate_passthrough("recorder", &settings.recorder)?;

    let resolution = settings.resolution;
    if resolution.width() % 2 != 0 || resolution.height() % 2 != 0 {
        return Err(InvocationError::OddResolution(resolution));
    }

    let output = settings.output.to_string_lossy().to_string();
    match settings.output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {}
        _ => return Err(InvocationError::NoOutputDirectory(output)),
    }
    validate_passthrough("output path", &output)?;

    Ok(output)
}

fn string_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
