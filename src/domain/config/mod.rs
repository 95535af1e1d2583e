//! Configuration domain module

mod app_config;

pub use app_config::{default_output_dir, AppConfig, DEFAULT_BACKEND, DEFAULT_RECORDER};
