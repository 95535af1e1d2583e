//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>ms, <number>s, <number>m, or <number>m<number>s (e.g., 500ms, 2s, 1m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a frame rate is not a usable positive integer
#[derive(Debug, Clone, Error)]
#[error("Invalid frame rate: \"{input}\". Expected a whole number between 1 and {max}")]
pub struct FrameRateParseError {
    pub input: String,
    pub max: u32,
}

/// Error when a resolution is not in WIDTHxHEIGHT form
#[derive(Debug, Clone, Error)]
#[error("Invalid resolution: \"{input}\". Expected WIDTHxHEIGHT (e.g., 1920x1080)")]
pub struct ResolutionParseError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
