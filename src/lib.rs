//! screen-rec - a detached screen recording supervisor
//!
//! Starts an ffmpeg screen recorder that outlives the command that launched
//! it, remembers it through a pid marker file, and stops it gracefully on
//! the next invocation.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, session state machine, and errors
//! - **Application**: The recording supervisor and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (pid marker, log file,
//!   POSIX signals, capture backends, display probe, notifications)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

#[cfg(not(unix))]
compile_error!("screen-rec supports Unix platforms only");

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
