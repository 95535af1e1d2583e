//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::capture::{FrameRate, Resolution};
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;
use crate::infrastructure::capture::CaptureBackendKind;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match get_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = get_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Read a key as its display string
fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "output_dir" => config.output_dir.clone(),
        "audio_device" => config.audio_device.clone(),
        "input_device" => config.input_device.clone(),
        "fps" => config.fps.clone(),
        "resolution" => config.resolution.clone(),
        "display" => config.display.clone(),
        "backend" => config.backend.clone(),
        "recorder" => config.recorder.clone(),
        "stop_timeout" => config.stop_timeout.clone(),
        "notify" => config.notify.map(|b| b.to_string()),
        _ => None,
    }
}

/// Validate `value` for `key` and store it
fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };
    let text = || Some(value.to_string());

    match key {
        "fps" => {
            value.parse::<FrameRate>().map_err(|e| invalid(e.to_string()))?;
            config.fps = text();
        }
        "resolution" => {
            value.parse::<Resolution>().map_err(|e| invalid(e.to_string()))?;
            config.resolution = text();
        }
        "stop_timeout" => {
            value.parse::<Duration>().map_err(|e| invalid(e.to_string()))?;
            config.stop_timeout = text();
        }
        "backend" => {
            let kind = value
                .parse::<CaptureBackendKind>()
                .map_err(|e| invalid(e.to_string()))?;
            config.backend = Some(kind.to_string());
        }
        "notify" => {
            let flag = parse_bool(value)
                .map_err(|_| invalid("Value must be 'true' or 'false'".to_string()))?;
            config.notify = Some(flag);
        }
        _ => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            match key {
                "output_dir" => config.output_dir = text(),
                "audio_device" => config.audio_device = text(),
                "input_device" => config.input_device = text(),
                "display" => config.display = text(),
                "recorder" => config.recorder = text(),
                _ => return Err(invalid("Unknown key".to_string())),
            }
        }
    }
    Ok(())
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn set_then_get_every_key() {
        let samples = [
            ("output_dir", "/srv/rec"),
            ("audio_device", "default"),
            ("input_device", ":0.0+0,0"),
            ("fps", "30"),
            ("resolution", "1280x720"),
            ("display", ":1"),
            ("backend", "x11"),
            ("recorder", "/usr/bin/ffmpeg"),
            ("stop_timeout", "5s"),
            ("notify", "true"),
        ];
        assert_eq!(samples.len(), VALID_CONFIG_KEYS.len());

        let mut config = AppConfig::empty();
        for (key, value) in samples {
            set_value(&mut config, key, value).unwrap();
            assert_eq!(get_value(&config, key).as_deref(), Some(value));
        }
    }

    #[test]
    fn backend_is_normalised() {
        let mut config = AppConfig::empty();
        set_value(&mut config, "backend", "AVFoundation").unwrap();
        assert_eq!(config.backend.as_deref(), Some("avfoundation"));
    }

    #[test]
    fn validate_fps() {
        let mut config = AppConfig::empty();
        assert!(set_value(&mut config, "fps", "0").is_err());
        assert!(set_value(&mut config, "fps", "241").is_err());
        assert!(set_value(&mut config, "fps", "fast").is_err());
        assert!(config.fps.is_none());
    }

    #[test]
    fn validate_resolution_and_timeout() {
        let mut config = AppConfig::empty();
        assert!(set_value(&mut config, "resolution", "wide").is_err());
        assert!(set_value(&mut config, "stop_timeout", "soon").is_err());
        assert!(set_value(&mut config, "stop_timeout", "750ms").is_ok());
    }

    #[test]
    fn validate_backend_and_notify() {
        let mut config = AppConfig::empty();
        assert!(set_value(&mut config, "backend", "wayland").is_err());
        assert!(set_value(&mut config, "notify", "maybe").is_err());
    }

    #[test]
    fn blank_text_values_rejected() {
        let mut config = AppConfig::empty();
        let err = set_value(&mut config, "recorder", "  ").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { ref key, .. } if key == "recorder"));
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(check_key("api_key").is_err());
        assert!(check_key("fps").is_ok());
    }
}
