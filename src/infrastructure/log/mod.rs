//! Recorder log infrastructure module

mod file_log;

pub use file_log::FileRecorderLog;
