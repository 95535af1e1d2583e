//! Recording supervisor use case
//!
//! Owns the lifecycle of at most one recorder subprocess. Callers are
//! short-lived and re-invoked repeatedly, so the only state that survives
//! between calls is the process marker.

use std::path::PathBuf;
use std::time::{Duration as StdDuration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::capture::{FrameRate, Resolution};
use crate::domain::recording::{Duration, OutputFile};
use crate::domain::session::{InvalidStateTransition, SessionState, SessionStatus};

use super::ports::{
    CaptureBackend, CaptureSettings, EnvironmentProbe, Invocation, InvocationError, LogError,
    MarkerContents, MarkerError, MarkerStore, ProcessControl, ProcessError, RecorderLog,
    SignalDelivery,
};
use super::request::RecordingRequest;

/// Shown by [`RecordingSupervisor::tail_log`] when there is nothing to show
pub const NO_LOG_PLACEHOLDER: &str = "No recorder output yet.";

/// Default number of log lines shown to users
pub const DEFAULT_TAIL_LINES: usize = 20;

/// Errors from the supervisor
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("A recording is already in progress (PID: {0})")]
    AlreadyRecording(u32),

    #[error("Another start is already in progress")]
    StartInProgress,

    #[error("Invalid capture settings: {0}")]
    InvalidSettings(#[from] InvocationError),

    #[error("Failed to create output directory {path}: {message}")]
    OutputDirectory { path: String, message: String },

    #[error("Failed to start recorder: {0}")]
    SpawnFailed(#[source] ProcessError),

    #[error("{0}")]
    Signal(#[source] ProcessError),

    #[error("Recorder (PID: {pid}) is still running after a forced kill")]
    StopFailed { pid: u32 },

    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// A successfully launched recording
#[derive(Debug, Clone)]
pub struct RecordingStarted {
    pub process_id: u32,
    pub output_file: PathBuf,
    /// Held only by the caller; not persisted
    pub started_at: DateTime<Utc>,
    pub invocation: Invocation,
}

/// How a stop request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// No marker existed
    NotRunning,
    /// The marker pointed at a process that was already gone
    AlreadyExited { process_id: u32 },
    /// The recorder exited after the interrupt signal
    Stopped { process_id: u32 },
    /// The recorder ignored the interrupt and was killed.
    /// Its output file is likely truncated and unplayable.
    Killed { process_id: u32 },
}

impl StopOutcome {
    pub fn process_id(&self) -> Option<u32> {
        match self {
            Self::NotRunning => None,
            Self::AlreadyExited { process_id }
            | Self::Stopped { process_id }
            | Self::Killed { process_id } => Some(*process_id),
        }
    }

    /// Whether the recorder had to be force-killed
    pub fn was_forced(&self) -> bool {
        matches!(self, Self::Killed { .. })
    }
}

/// Result of a toggle
#[derive(Debug, Clone)]
pub enum ToggleOutcome {
    Started(RecordingStarted),
    Stopped(StopOutcome),
}

/// Timing for graceful stop and kill escalation
#[derive(Debug, Clone, Copy)]
pub struct StopPolicy {
    /// Time the recorder gets to finalize after the interrupt
    pub grace: Duration,
    /// Time the recorder gets to vanish after the kill
    pub kill_wait: Duration,
    /// Liveness polling interval while waiting
    pub poll_interval: StdDuration,
}

impl Default for StopPolicy {
    fn default() -> Self {
        Self {
            grace: Duration::default_stop_timeout(),
            kill_wait: Duration::kill_wait(),
            poll_interval: StdDuration::from_millis(50),
        }
    }
}

/// Single-slot recording supervisor
pub struct RecordingSupervisor<M, L, P, E>
where
    M: MarkerStore,
    L: RecorderLog,
    P: ProcessControl,
    E: EnvironmentProbe,
{
    marker: M,
    log: L,
    process: P,
    probe: E,
    backend: Box<dyn CaptureBackend>,
    policy: StopPolicy,
    /// Serialises operations issued through this instance
    guard: Mutex<()>,
}

/// Releases the start lock when dropped
struct StartLock<'a, M: MarkerStore> {
    marker: &'a M,
}

impl<M: MarkerStore> Drop for StartLock<'_, M> {
    fn drop(&mut self) {
        self.marker.unlock_start();
    }
}

impl<M, L, P, E> RecordingSupervisor<M, L, P, E>
where
    M: MarkerStore,
    L: RecorderLog,
    P: ProcessControl,
    E: EnvironmentProbe,
{
    /// Create a new supervisor with the default stop policy
    pub fn new(marker: M, log: L, process: P, probe: E, backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            marker,
            log,
            process,
            probe,
            backend,
            policy: StopPolicy::default(),
            guard: Mutex::new(()),
        }
    }

    /// Replace the stop policy
    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The capture backend in use
    pub fn backend(&self) -> &dyn CaptureBackend {
        self.backend.as_ref()
    }

    /// Location of the recorder log
    pub fn log_path(&self) -> PathBuf {
        self.log.path()
    }

    /// Location of the process marker
    pub fn marker_path(&self) -> PathBuf {
        self.marker.path()
    }

    /// Current state without healing an orphaned marker
    pub async fn current_state(&self) -> Result<SessionState, SupervisorError> {
        let _guard = self.guard.lock().await;
        self.inspect()
    }

    /// Report whether a recording is active.
    ///
    /// A marker whose process is gone is deleted and reported as inactive.
    pub async fn status(&self) -> Result<SessionStatus, SupervisorError> {
        let _guard = self.guard.lock().await;
        Ok(self.refresh()?.status())
    }

    /// Launch a recorder. Rejected while another recording is active.
    pub async fn start(&self, request: &RecordingRequest) -> Result<RecordingStarted, SupervisorError> {
        let _guard = self.guard.lock().await;
        self.start_locked(request).await
    }

    /// Stop the active recorder, escalating to a kill if it ignores the interrupt
    pub async fn stop(&self) -> Result<StopOutcome, SupervisorError> {
        let _guard = self.guard.lock().await;
        self.stop_locked().await
    }

    /// Start when idle, stop when recording
    pub async fn toggle(&self, request: &RecordingRequest) -> Result<ToggleOutcome, SupervisorError> {
        let _guard = self.guard.lock().await;
        if self.refresh()?.is_recording() {
            Ok(ToggleOutcome::Stopped(self.stop_locked().await?))
        } else {
            Ok(ToggleOutcome::Started(self.start_locked(request).await?))
        }
    }

    /// Last `max_lines` lines of the recorder log, or a single placeholder
    /// line when the log is absent, empty or unreadable. Never fails.
    pub fn tail_log(&self, max_lines: usize) -> Vec<String> {
        if max_lines == 0 {
            return Vec::new();
        }
        match self.log.tail(max_lines) {
            Ok(lines) if lines.is_empty() => vec![NO_LOG_PLACEHOLDER.to_string()],
            Ok(lines) => lines,
            Err(e) => {
                debug!(error = %e, "recorder log unreadable");
                vec![format!("Unable to read recorder log: {}", e)]
            }
        }
    }

    fn inspect(&self) -> Result<SessionState, SupervisorError> {
        let state = match self.marker.read()? {
            MarkerContents::Absent => SessionState::Idle,
            MarkerContents::Invalid(raw) => {
                debug!(contents = %raw, "process marker is not a pid");
                SessionState::Orphaned { process_id: None }
            }
            MarkerContents::Pid(pid) if self.process.is_alive(pid) => {
                SessionState::Recording { process_id: pid }
            }
            MarkerContents::Pid(pid) => SessionState::Orphaned {
                process_id: Some(pid),
            },
        };
        Ok(state)
    }

    /// Inspect, deleting the marker of a dead recorder
    fn refresh(&self) -> Result<SessionState, SupervisorError> {
        let state = self.inspect()?;
        if let SessionState::Orphaned { process_id } = state {
            info!(?process_id, "removing stale process marker");
            self.marker.remove()?;
            return Ok(state.heal()?);
        }
        Ok(state)
    }

    async fn start_locked(&self, request: &RecordingRequest) -> Result<RecordingStarted, SupervisorError> {
        let state = self.refresh()?;
        if let SessionState::Recording { process_id } = state {
            return Err(SupervisorError::AlreadyRecording(process_id));
        }

        self.marker.lock_start().map_err(|e| match e {
            MarkerError::LockHeld => SupervisorError::StartInProgress,
            other => other.into(),
        })?;
        let _lock = StartLock {
            marker: &self.marker,
        };

        let started_at = Utc::now();
        let output = OutputFile::timestamped(
            &request.output_dir,
            started_at,
            self.backend.container_extension(),
        );
        tokio::fs::create_dir_all(&request.output_dir)
            .await
            .map_err(|e| SupervisorError::OutputDirectory {
                path: request.output_dir.display().to_string(),
                message: e.to_string(),
            })?;

        let display = self.probe.resolve_display_target();
        let resolution = match request.resolution {
            Some(resolution) => resolution,
            None => self.probed_resolution(&display).await,
        };

        let settings = CaptureSettings {
            recorder: request.recorder.clone(),
            output: output.path().to_path_buf(),
            display,
            resolution,
            fps: request.fps,
            audio_device: request.audio_device.clone(),
            input_device: request.input_device.clone(),
        };
        let invocation = self.backend.build(&settings)?;

        self.log.reset()?;
        self.log
            .append(&format!("[{}] {}", started_at.to_rfc3339(), invocation))?;

        let pid = match self.process.launch(&invocation, &self.log.path()) {
            Ok(pid) => pid,
            Err(e) => {
                warn!(error = %e, recorder = %invocation.program, "recorder failed to spawn");
                if let Err(log_err) = self.log.append(&format!("Failed to start recorder: {}", e)) {
                    debug!(error = %log_err, "could not record spawn failure");
                }
                return Err(SupervisorError::SpawnFailed(e));
            }
        };

        if let Err(e) = self.persist(state, pid) {
            warn!(pid, error = %e, "marker not written; killing unsupervised recorder");
            let _ = self.process.kill(pid);
            return Err(e);
        }

        info!(pid, output = %output.path().display(), backend = self.backend.name(), "recording started");

        Ok(RecordingStarted {
            process_id: pid,
            output_file: output.into_path_buf(),
            started_at,
            invocation,
        })
    }

    fn persist(&self, state: SessionState, pid: u32) -> Result<(), SupervisorError> {
        state.start(pid)?;
        match self.marker.create(pid) {
            Ok(()) => Ok(()),
            Err(MarkerError::AlreadyExists) => match self.marker.read()? {
                MarkerContents::Pid(other) => Err(SupervisorError::AlreadyRecording(other)),
                _ => Err(MarkerError::AlreadyExists.into()),
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn probed_resolution(&self, display: &str) -> Resolution {
        let probed = self.probe.resolve_resolution(display).await;
        probed.parse().unwrap_or_else(|_| {
            debug!(probed = %probed, "probe returned an unusable resolution");
            Resolution::fallback()
        })
    }

    async fn stop_locked(&self) -> Result<StopOutcome, SupervisorError> {
        let pid = match self.marker.read()? {
            MarkerContents::Absent => return Ok(StopOutcome::NotRunning),
            MarkerContents::Invalid(_) => {
                self.marker.remove()?;
                return Ok(StopOutcome::NotRunning);
            }
            MarkerContents::Pid(pid) => pid,
        };

        let outcome = self.terminate(pid).await?;
        self.marker.remove()?;
        SessionState::Recording { process_id: pid }.stop()?;
        info!(pid, ?outcome, "recording stopped");
        Ok(outcome)
    }

    async fn terminate(&self, pid: u32) -> Result<StopOutcome, SupervisorError> {
        // The marker is forgotten whenever the recorder cannot be reached
        match self.process.interrupt(pid) {
            Ok(SignalDelivery::Delivered) => {}
            Ok(SignalDelivery::NoSuchProcess) => {
                return Ok(StopOutcome::AlreadyExited { process_id: pid });
            }
            Ok(SignalDelivery::NotPermitted) => {
                debug!(pid, "marker pid now belongs to another user");
                return Ok(StopOutcome::AlreadyExited { process_id: pid });
            }
            Err(e) => {
                warn!(pid, error = %e, "could not interrupt recorder; forgetting it");
                return Ok(StopOutcome::AlreadyExited { process_id: pid });
            }
        }

        if self.wait_for_exit(pid, self.policy.grace).await {
            return Ok(StopOutcome::Stopped { process_id: pid });
        }

        warn!(pid, grace = %self.policy.grace, "recorder ignored interrupt; sending kill");
        match self.process.kill(pid).map_err(SupervisorError::Signal)? {
            SignalDelivery::Delivered => {}
            // Exited between the last probe and the kill
            SignalDelivery::NoSuchProcess | SignalDelivery::NotPermitted => {
                return Ok(StopOutcome::Stopped { process_id: pid });
            }
        }

        if self.wait_for_exit(pid, self.policy.kill_wait).await {
            Ok(StopOutcome::Killed { process_id: pid })
        } else {
            Err(SupervisorError::StopFailed { pid })
        }
    }

    /// Poll liveness until the process is gone or `within` elapses
    async fn wait_for_exit(&self, pid: u32, within: Duration) -> bool {
        let deadline = Instant::now() + within.as_std();
        loop {
            if !self.process.is_alive(pid) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(self.policy.poll_interval).await;
        }
    }
}

/// Frame rate a backend will actually use for `request`
pub fn effective_fps(backend: &dyn CaptureBackend, request: &RecordingRequest) -> FrameRate {
    request.fps.unwrap_or_else(|| backend.default_fps())
}
