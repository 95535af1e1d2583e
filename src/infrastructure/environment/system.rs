//! System environment probe

use std::env;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::application::ports::EnvironmentProbe;
use crate::domain::capture::{Resolution, FALLBACK_RESOLUTION};

/// Display used when neither config nor `$DISPLAY` names one
pub const FALLBACK_DISPLAY: &str = ":0.0";

/// Upper bound on how long a display-info utility may take
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Probe backed by the platform's display-info utility
/// (`xdpyinfo` on Linux, `system_profiler` on macOS)
pub struct SystemEnvironmentProbe {
    display_override: Option<String>,
}

impl SystemEnvironmentProbe {
    pub fn new() -> Self {
        Self {
            display_override: None,
        }
    }

    /// Use a configured display instead of `$DISPLAY`
    pub fn with_display(display: Option<String>) -> Self {
        Self {
            display_override: display,
        }
    }

    /// Run a utility and return its stdout, or None on any failure
    async fn capture_stdout(program: &str, args: &[&str]) -> Option<String> {
        let run = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .output();

        match timeout(PROBE_TIMEOUT, run).await {
            Ok(Ok(output)) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => {
                debug!(program, status = %output.status, "display probe exited unsuccessfully");
                None
            }
            Ok(Err(e)) => {
                debug!(program, error = %e, "display probe could not run");
                None
            }
            Err(_) => {
                debug!(program, "display probe timed out");
                None
            }
        }
    }

    #[cfg(target_os = "macos")]
    async fn probe(&self, _display_target: &str) -> Option<Resolution> {
        let out = Self::capture_stdout("system_profiler", &["SPDisplaysDataType"]).await?;
        parse_system_profiler(&out)
    }

    #[cfg(not(target_os = "macos"))]
    async fn probe(&self, display_target: &str) -> Option<Resolution> {
        let out = Self::capture_stdout("xdpyinfo", &["-display", display_target]).await?;
        parse_xdpyinfo(&out)
    }
}

impl Default for SystemEnvironmentProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnvironmentProbe for SystemEnvironmentProbe {
    fn resolve_display_target(&self) -> String {
        pick_display(self.display_override.as_deref(), env::var("DISPLAY").ok().as_deref())
    }

    async fn resolve_resolution(&self, display_target: &str) -> String {
        match self.probe(display_target).await {
            Some(resolution) => resolution.to_string(),
            None => FALLBACK_RESOLUTION.to_string(),
        }
    }
}

/// First non-blank of configured display, environment display, fallback
fn pick_display(configured: Option<&str>, environment: Option<&str>) -> String {
    configured
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| environment.map(str::trim).filter(|s| !s.is_empty()))
        .unwrap_or(FALLBACK_DISPLAY)
        .to_string()
}

/// Parse `dimensions:    1920x1080 pixels (508x285 millimeters)`
pub fn parse_xdpyinfo(output: &str) -> Option<Resolution> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("dimensions:"))
        .find_map(|rest| rest.split_whitespace().next()?.parse().ok())
}

/// Parse `Resolution: 2560 x 1600 Retina` (first display wins)
pub fn parse_system_profiler(output: &str) -> Option<Resolution> {
    output
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Resolution:"))
        .find_map(|rest| {
            let mut parts = rest.split_whitespace();
            let width = parts.next()?;
            let sep = parts.next()?;
            let height = parts.next()?;
            if !sep.eq_ignore_ascii_case("x") {
                return None;
            }
            format!("{}x{}", width, height).parse().ok()
        })
}
