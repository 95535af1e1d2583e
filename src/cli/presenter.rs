//! CLI presenter for output formatting

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::session::SessionStatus;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Clear the spinner and report success
    pub fn spinner_success(&mut self, message: &str) {
        self.stop_spinner();
        self.success(message);
    }

    /// Clear the spinner and report failure
    pub fn spinner_fail(&mut self, message: &str) {
        self.stop_spinner();
        self.error(message);
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print recording status to stdout
    pub fn recording_status(&self, status: &SessionStatus) {
        let line = format_status(status);
        if status.active {
            println!("{} {}", "●".red(), line);
        } else {
            println!("{} {}", "○".dimmed(), line);
        }
    }

    /// Print recorder log lines to stdout
    pub fn log_lines(&self, lines: &[String]) {
        for line in lines {
            println!("{}", line);
        }
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// One-line human description of a status
pub fn format_status(status: &SessionStatus) -> String {
    match (status.active, status.process_id) {
        (true, Some(pid)) => format!("Recording (PID: {})", pid),
        (true, None) => "Recording".to_string(),
        (false, _) => "Not recording".to_string(),
    }
}
