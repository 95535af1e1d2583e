//! Capture parameter value objects

mod frame_rate;
mod resolution;

pub use frame_rate::{FrameRate, MAX_FRAME_RATE};
pub use resolution::{Resolution, FALLBACK_RESOLUTION};
