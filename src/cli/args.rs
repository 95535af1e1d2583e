//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::application::DEFAULT_TAIL_LINES;
use crate::domain::config::AppConfig;

/// screen-rec - toggle a detached screen recording
#[derive(Parser, Debug)]
#[command(name = "screen-rec")]
#[command(version)]
#[command(about = "Start and stop a detached ffmpeg screen recording")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory recordings are written to
    #[arg(short = 'o', long, value_name = "DIR", global = true)]
    pub output_dir: Option<String>,

    /// Capture frame rate (1-240)
    #[arg(long, value_name = "FPS", global = true)]
    pub fps: Option<String>,

    /// Capture size, overriding the probed resolution (e.g., 1920x1080)
    #[arg(long, value_name = "WxH", global = true)]
    pub resolution: Option<String>,

    /// Audio input passed verbatim to the recorder
    #[arg(long, value_name = "DEVICE", global = true)]
    pub audio_device: Option<String>,

    /// Video input passed verbatim to the recorder
    #[arg(long, value_name = "DEVICE", global = true)]
    pub input_device: Option<String>,

    /// Capture backend (auto, x11, avfoundation)
    #[arg(long, value_name = "BACKEND", global = true)]
    pub backend: Option<String>,

    /// Show desktop notifications
    #[arg(long, global = true)]
    pub notify: bool,

    /// Defaults to toggle
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Flags as a config layer; unset flags stay None
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            output_dir: self.output_dir.clone(),
            audio_device: self.audio_device.clone(),
            input_device: self.input_device.clone(),
            fps: self.fps.clone(),
            resolution: self.resolution.clone(),
            backend: self.backend.clone(),
            notify: if self.notify { Some(true) } else { None },
            ..Default::default()
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start recording if idle, stop if recording
    Toggle,
    /// Start a recording
    Start,
    /// Stop the active recording
    Stop,
    /// Show whether a recording is active
    Status {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
        /// Keep running and report every change until interrupted
        #[arg(short = 'w', long)]
        watch: bool,
        /// Also show the last N recorder log lines
        #[arg(short = 'l', long, value_name = "N", default_value_t = 0)]
        lines: usize,
    },
    /// Show the tail of the recorder log
    Log {
        /// Number of lines
        #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_TAIL_LINES)]
        lines: usize,
    },
    /// Open the recordings directory
    Open,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "output_dir",
    "audio_device",
    "input_device",
    "fps",
    "resolution",
    "display",
    "backend",
    "recorder",
    "stop_timeout",
    "notify",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["screen-rec"]);
        assert!(cli.command.is_none());
        assert!(cli.output_dir.is_none());
        assert!(cli.fps.is_none());
        assert!(!cli.notify);
        assert_eq!(cli.to_config(), AppConfig::empty());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "screen-rec",
            "start",
            "--fps",
            "30",
            "--resolution",
            "1280x720",
            "-o",
            "/tmp/rec",
            "--notify",
        ]);
        assert!(matches!(cli.command, Some(Commands::Start)));

        let config = cli.to_config();
        assert_eq!(config.fps, Some("30".to_string()));
        assert_eq!(config.resolution, Some("1280x720".to_string()));
        assert_eq!(config.output_dir, Some("/tmp/rec".to_string()));
        assert_eq!(config.notify, Some(true));
    }

    #[test]
    fn cli_parses_status_options() {
        let cli = Cli::parse_from(["screen-rec", "status", "--json", "--lines", "5"]);
        match cli.command {
            Some(Commands::Status { json, watch, lines }) => {
                assert!(json);
                assert!(!watch);
                assert_eq!(lines, 5);
            }
            other => panic!("Expected Status command, got {:?}", other),
        }
    }

    #[test]
    fn log_defaults_to_tail_lines() {
        let cli = Cli::parse_from(["screen-rec", "log"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Log {
                lines: DEFAULT_TAIL_LINES
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["screen-rec", "config", "set", "fps", "30"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "fps");
            assert_eq!(value, "30");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("output_dir"));
        assert!(is_valid_config_key("stop_timeout"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
