//! Environment probe infrastructure module

mod system;

pub use system::{parse_system_profiler, parse_xdpyinfo, SystemEnvironmentProbe, FALLBACK_DISPLAY};
