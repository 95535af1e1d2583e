//! Process marker infrastructure module

mod pid_marker;

pub use pid_marker::PidMarker;
