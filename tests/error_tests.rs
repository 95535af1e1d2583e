//! Error scenario integration tests

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Binary with every user location redirected into `dir`
fn screen_rec_bin(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_screen-rec"));
    cmd.env("TMPDIR", dir.path())
        .env("HOME", dir.path())
        .env("XDG_CACHE_HOME", dir.path().join("cache"))
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("SCREEN_REC_OUTPUT_DIR", dir.path().join("videos"));
    cmd
}

fn run(dir: &TempDir, args: &[&str]) -> Output {
    screen_rec_bin(dir)
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn write_config(dir: &TempDir, contents: &str) {
    let config_dir = dir.path().join("config/screen-rec");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), contents).unwrap();
}

#[test]
fn invalid_fps_flag_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["start", "--fps", "0"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("fps"),
        "Expected error about fps, got: {}",
        stderr
    );
    assert!(!dir.path().join("screen-rec.pid").exists());
}

#[test]
fn invalid_resolution_flag_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["--resolution", "huge", "start"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("resolution"),
        "Expected error about resolution, got: {}",
        stderr
    );
}

#[test]
fn invalid_backend_flag_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["status", "--backend", "wayland"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Valid options"),
        "Expected backend options, got: {}",
        stderr
    );
}

#[test]
fn invalid_stop_timeout_in_config_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_config(&dir, "stop_timeout = \"whenever\"\n");

    let output = run(&dir, &["stop"]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("stop_timeout"),
        "Expected error about stop_timeout, got: {}",
        stderr
    );
}

#[test]
fn unparseable_config_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_config(&dir, "fps = [\n");

    let output = run(&dir, &["status", "--json"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"active\":false}\n");
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["pause"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_get_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["config", "get", "unknown_key"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["config", "set", "unknown_key", "value"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("Valid"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_fps() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["config", "set", "fps", "500"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("fps") && stderr.contains("240"),
        "Expected error about frame rate range, got: {}",
        stderr
    );
    assert!(!dir.path().join("config/screen-rec/config.toml").exists());
}

#[test]
fn config_set_invalid_boolean() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["config", "set", "notify", "maybe"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("true") || stderr.contains("false"),
        "Expected error about invalid boolean, got: {}",
        stderr
    );
}

#[test]
fn config_list_with_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&dir, &["config", "list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("not set") && stdout.contains("output_dir"),
        "Expected config list output, got: {}",
        stdout
    );
}
