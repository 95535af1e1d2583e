//! Frame rate value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::FrameRateParseError;

/// Highest frame rate accepted for screen capture
pub const MAX_FRAME_RATE: u32 = 240;

/// Capture frame rate in frames per second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate(u32);

impl FrameRate {
    pub const FPS_30: FrameRate = FrameRate(30);
    pub const FPS_60: FrameRate = FrameRate(60);

    /// Create a frame rate, rejecting zero and values above [`MAX_FRAME_RATE`]
    pub fn new(fps: u32) -> Result<Self, FrameRateParseError> {
        if fps == 0 || fps > MAX_FRAME_RATE {
            return Err(FrameRateParseError {
                input: fps.to_string(),
                max: MAX_FRAME_RATE,
            });
        }
        Ok(Self(fps))
    }

    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl FromStr for FrameRate {
    type Err = FrameRateParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fps: u32 = s.trim().parse().map_err(|_| FrameRateParseError {
            input: s.to_string(),
            max: MAX_FRAME_RATE,
        })?;
        Self::new(fps).map_err(|_| FrameRateParseError {
            input: s.to_string(),
            max: MAX_FRAME_RATE,
        })
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
