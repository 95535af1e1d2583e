//! Command runners

use std::env;
use std::process::ExitCode;
use std::time::Duration as StdDuration;

use crate::application::ports::{ConfigStore, NotificationIcon, Notifier};
use crate::application::{
    effective_fps, RecordingRequest, RecordingStarted, RecordingSupervisor, StopOutcome,
    StopPolicy, SupervisorError, ToggleOutcome,
};
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;
use crate::infrastructure::capture::{create_backend, CaptureBackendKind};
use crate::infrastructure::{
    create_notifier, FileRecorderLog, PidMarker, SystemEnvironmentProbe, UnixProcessControl,
    XdgConfigStore,
};

use super::args::Commands;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Overrides `output_dir` from the environment
pub const OUTPUT_DIR_ENV: &str = "SCREEN_REC_OUTPUT_DIR";

/// Log lines shown after a failed start
const FAILURE_TAIL_LINES: usize = 5;

/// Status polling interval in watch mode
const WATCH_INTERVAL: StdDuration = StdDuration::from_millis(500);

/// Supervisor wired to the real adapters
pub type Supervisor =
    RecordingSupervisor<PidMarker, FileRecorderLog, UnixProcessControl, SystemEnvironmentProbe>;

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    let env_config = AppConfig {
        output_dir: env::var(OUTPUT_DIR_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// Build the supervisor described by `config`
pub fn build_supervisor(config: &AppConfig) -> Result<Supervisor, ConfigError> {
    let kind = config
        .backend_or_default()
        .parse::<CaptureBackendKind>()
        .map_err(|e| ConfigError::ValidationError {
            key: "backend".to_string(),
            message: e.to_string(),
        })?;

    let grace = match config.stop_timeout.as_deref() {
        Some(s) => s.parse::<Duration>().map_err(|e| ConfigError::ValidationError {
            key: "stop_timeout".to_string(),
            message: e.to_string(),
        })?,
        None => Duration::default_stop_timeout(),
    };

    let probe = SystemEnvironmentProbe::with_display(config.display.clone());
    let supervisor = RecordingSupervisor::new(
        PidMarker::new(),
        FileRecorderLog::new(),
        UnixProcessControl::new(),
        probe,
        create_backend(kind),
    )
    .with_stop_policy(StopPolicy {
        grace,
        ..StopPolicy::default()
    });

    Ok(supervisor)
}

/// Run a recording command against the merged config
pub async fn run(command: Commands, config: AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    if let Commands::Open = command {
        return run_open(&config, &presenter);
    }

    let supervisor = match build_supervisor(&config) {
        Ok(s) => s,
        Err(e) => return usage_error(&presenter, &e),
    };
    let notifier = create_notifier(config.notify_or_default());

    match command {
        Commands::Start => {
            let request = match RecordingRequest::from_config(&config) {
                Ok(r) => r,
                Err(e) => return usage_error(&presenter, &e),
            };
            run_start(&supervisor, &request, &notifier, &presenter).await
        }
        Commands::Stop => run_stop(&supervisor, &notifier, &mut presenter).await,
        Commands::Toggle => {
            let request = match RecordingRequest::from_config(&config) {
                Ok(r) => r,
                Err(e) => return usage_error(&presenter, &e),
            };
            run_toggle(&supervisor, &request, &notifier, &mut presenter).await
        }
        Commands::Status { json, watch, lines } => {
            run_status(&supervisor, json, watch, lines, &presenter).await
        }
        Commands::Log { lines } => {
            presenter.log_lines(&supervisor.tail_log(lines));
            ExitCode::from(EXIT_SUCCESS)
        }
        Commands::Open | Commands::Config { .. } => ExitCode::from(EXIT_USAGE_ERROR),
    }
}

async fn run_start(
    supervisor: &Supervisor,
    request: &RecordingRequest,
    notifier: &impl Notifier,
    presenter: &Presenter,
) -> ExitCode {
    match supervisor.start(request).await {
        Ok(started) => {
            report_started(supervisor, request, &started, notifier, presenter).await;
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => report_failure(supervisor, &e, notifier, presenter).await,
    }
}

async fn run_stop(
    supervisor: &Supervisor,
    notifier: &impl Notifier,
    presenter: &mut Presenter,
) -> ExitCode {
    presenter.start_spinner("Stopping recorder...");
    match supervisor.stop().await {
        Ok(outcome) => {
            report_stopped(outcome, notifier, presenter).await;
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.stop_spinner();
            report_failure(supervisor, &e, notifier, presenter).await
        }
    }
}

async fn run_toggle(
    supervisor: &Supervisor,
    request: &RecordingRequest,
    notifier: &impl Notifier,
    presenter: &mut Presenter,
) -> ExitCode {
    // Only decides whether a spinner is worth showing
    if matches!(supervisor.current_state().await, Ok(state) if state.is_recording()) {
        presenter.start_spinner("Stopping recorder...");
    }

    match supervisor.toggle(request).await {
        Ok(ToggleOutcome::Started(started)) => {
            presenter.stop_spinner();
            report_started(supervisor, request, &started, notifier, presenter).await;
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(ToggleOutcome::Stopped(outcome)) => {
            report_stopped(outcome, notifier, presenter).await;
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.stop_spinner();
            report_failure(supervisor, &e, notifier, presenter).await
        }
    }
}

async fn run_status(
    supervisor: &Supervisor,
    json: bool,
    watch: bool,
    lines: usize,
    presenter: &Presenter,
) -> ExitCode {
    let shutdown = ShutdownSignal::new();
    if watch {
        if let Err(e) = shutdown.setup().await {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let mut last = None;
    loop {
        let status = match supervisor.status().await {
            Ok(s) => s,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
        };

        if last != Some(status) {
            if json {
                match serde_json::to_string(&status) {
                    Ok(line) => presenter.output(&line),
                    Err(e) => {
                        presenter.error(&format!("Failed to encode status: {}", e));
                        return ExitCode::from(EXIT_ERROR);
                    }
                }
            } else {
                presenter.recording_status(&status);
            }
            last = Some(status);
        }

        if !watch {
            break;
        }
        tokio::time::sleep(WATCH_INTERVAL).await;
        if shutdown.is_shutdown() {
            break;
        }
    }

    if lines > 0 && !json {
        presenter.log_lines(&supervisor.tail_log(lines));
    }

    ExitCode::from(EXIT_SUCCESS)
}

fn run_open(config: &AppConfig, presenter: &Presenter) -> ExitCode {
    let dir = config.output_dir_or_default();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        presenter.error(&format!("Failed to create {}: {}", dir.display(), e));
        return ExitCode::from(EXIT_ERROR);
    }

    match open::that(&dir) {
        Ok(()) => {
            presenter.info(&format!("Opened {}", dir.display()));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&format!("Failed to open {}: {}", dir.display(), e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn report_started(
    supervisor: &Supervisor,
    request: &RecordingRequest,
    started: &RecordingStarted,
    notifier: &impl Notifier,
    presenter: &Presenter,
) {
    presenter.success(&format!("Recording started (PID: {})", started.process_id));
    presenter.info(&format!(
        "Saving to {} ({} fps, {})",
        started.output_file.display(),
        effective_fps(supervisor.backend(), request),
        supervisor.backend().name()
    ));

    let body = started.output_file.display().to_string();
    notify(notifier, "Recording started", &body, NotificationIcon::Recording).await;
}

async fn report_stopped(outcome: StopOutcome, notifier: &impl Notifier, presenter: &mut Presenter) {
    match outcome {
        StopOutcome::NotRunning => {
            presenter.stop_spinner();
            presenter.info("No recording in progress");
        }
        StopOutcome::AlreadyExited { process_id } => {
            presenter.spinner_success(&format!(
                "Recorder (PID: {}) had already exited",
                process_id
            ));
            notify(notifier, "Recording stopped", "Recorder had already exited", NotificationIcon::Stopped).await;
        }
        StopOutcome::Stopped { process_id } => {
            presenter.spinner_success(&format!("Recording stopped (PID: {})", process_id));
            notify(notifier, "Recording stopped", "Recording saved", NotificationIcon::Stopped).await;
        }
        StopOutcome::Killed { process_id } => {
            presenter.spinner_fail(&format!(
                "Recorder (PID: {}) ignored the interrupt and was killed",
                process_id
            ));
            presenter.warn("The output file may be truncated or unplayable");
            notify(
                notifier,
                "Recording killed",
                "The output file may be truncated or unplayable",
                NotificationIcon::Warning,
            )
            .await;
        }
    }
}

async fn report_failure(
    supervisor: &Supervisor,
    error: &SupervisorError,
    notifier: &impl Notifier,
    presenter: &Presenter,
) -> ExitCode {
    presenter.error(&error.to_string());

    if let SupervisorError::SpawnFailed(_) = error {
        presenter.info(&format!("Recorder log: {}", supervisor.log_path().display()));
        presenter.log_lines(&supervisor.tail_log(FAILURE_TAIL_LINES));
    }

    notify(notifier, "Recording failed", &error.to_string(), NotificationIcon::Error).await;
    ExitCode::from(EXIT_ERROR)
}

fn usage_error(presenter: &Presenter, error: &ConfigError) -> ExitCode {
    presenter.error(&error.to_string());
    ExitCode::from(EXIT_USAGE_ERROR)
}

/// Notification failures never change the outcome
async fn notify(notifier: &impl Notifier, title: &str, body: &str, icon: NotificationIcon) {
    if let Err(e) = notifier.notify(title, body, icon).await {
        tracing::debug!(error = %e, "notification not shown");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_supervisor_with_defaults() {
        let supervisor = build_supervisor(&AppConfig::defaults()).unwrap();
        assert!(supervisor.marker_path().ends_with("screen-rec.pid"));
        assert!(supervisor.log_path().ends_with("recorder.log"));
    }

    #[test]
    fn build_supervisor_honours_backend() {
        let config = AppConfig {
            backend: Some("avfoundation".to_string()),
            ..AppConfig::defaults()
        };
        let supervisor = build_supervisor(&config).unwrap();
        assert_eq!(supervisor.backend().name(), "avfoundation");
    }

    #[test]
    fn build_supervisor_rejects_bad_backend() {
        let config = AppConfig {
            backend: Some("wayland".to_string()),
            ..AppConfig::defaults()
        };
        assert!(matches!(
            build_supervisor(&config),
            Err(ConfigError::ValidationError { ref key, .. }) if key == "backend"
        ));
    }

    #[test]
    fn build_supervisor_rejects_bad_stop_timeout() {
        let config = AppConfig {
            stop_timeout: Some("eventually".to_string()),
            ..AppConfig::defaults()
        };
        assert!(matches!(
            build_supervisor(&config),
            Err(ConfigError::ValidationError { ref key, .. }) if key == "stop_timeout"
        ));
    }
}
