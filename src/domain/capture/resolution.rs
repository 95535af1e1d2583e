//! Screen resolution value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::ResolutionParseError;

/// Resolution used when the display cannot be probed
pub const FALLBACK_RESOLUTION: &str = "1920x1080";

/// Capture geometry, `WIDTHxHEIGHT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The fixed fallback (1920x1080)
    pub const fn fallback() -> Self {
        Self::new(1920, 1080)
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    /// Accepts `1920x1080`, `1920X1080` and `1920 x 1080`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolutionParseError {
            input: s.to_string(),
        };

        let lower = s.trim().to_lowercase();
        let (w, h) = lower.split_once('x').ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
