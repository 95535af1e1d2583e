//! Recording domain module

mod duration;
mod output_file;

pub use duration::{Duration, DEFAULT_STOP_TIMEOUT_MS, KILL_WAIT_MS};
pub use output_file::{filesystem_safe_timestamp, OutputFile, FILE_PREFIX};
