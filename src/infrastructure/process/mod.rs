//! Process control infrastructure module

mod unix;

pub use unix::{pid_exists, UnixProcessControl};
