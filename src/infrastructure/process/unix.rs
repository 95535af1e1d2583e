//! Unix process control via signals

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use tracing::debug;

use crate::application::ports::{Invocation, ProcessControl, ProcessError, SignalDelivery};

/// Convert to a nix pid, refusing values that would address a process group
fn to_pid(pid: u32) -> Option<Pid> {
    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => Some(Pid::from_raw(raw)),
        _ => None,
    }
}

/// Zero-signal existence probe for a process we may signal.
///
/// EPERM means the id was recycled by another user's process, which can
/// never be a recorder we launched. A zombie still answers the probe but
/// is not running.
pub fn pid_exists(pid: u32) -> bool {
    let Some(target) = to_pid(pid) else {
        return false;
    };
    match signal::kill(target, None) {
        Ok(()) => !is_zombie(pid),
        Err(_) => false,
    }
}

/// Process state from `/proc/<pid>/stat` is `Z`
#[cfg(target_os = "linux")]
fn is_zombie(pid: u32) -> bool {
    std::fs::read_to_string(format!("/proc/{}/stat", pid))
        .ok()
        .and_then(|stat| {
            // The command name may contain spaces and parentheses
            let rest = &stat[stat.rfind(')')? + 1..];
            rest.split_whitespace().next().map(|state| state == "Z")
        })
        .unwrap_or(false)
}

#[cfg(not(target_os = "linux"))]
fn is_zombie(_pid: u32) -> bool {
    false
}

/// Process control using POSIX signals
pub struct UnixProcessControl;

impl UnixProcessControl {
    pub fn new() -> Self {
        Self
    }

    fn send(pid: u32, sig: Signal) -> Result<SignalDelivery, ProcessError> {
        let Some(target) = to_pid(pid) else {
            return Ok(SignalDelivery::NoSuchProcess);
        };
        match signal::kill(target, sig) {
            Ok(()) => Ok(SignalDelivery::Delivered),
            Err(Errno::ESRCH) => Ok(SignalDelivery::NoSuchProcess),
            Err(Errno::EPERM) => Ok(SignalDelivery::NotPermitted),
            Err(e) => Err(ProcessError::SignalFailed {
                pid,
                message: e.to_string(),
            }),
        }
    }
}

impl Default for UnixProcessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessControl for UnixProcessControl {
    fn launch(&self, invocation: &Invocation, log_path: &Path) -> Result<u32, ProcessError> {
        let stdout = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(|e| ProcessError::LogUnavailable(e.to_string()))?;
        let stderr = stdout
            .try_clone()
            .map_err(|e| ProcessError::LogUnavailable(e.to_string()))?;

        // Own process group: a Ctrl+C aimed at the caller's terminal must
        // not reach the recorder.
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .process_group(0)
            .spawn()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    ProcessError::ExecutableNotFound(invocation.program.clone())
                } else {
                    ProcessError::LaunchFailed(e.to_string())
                }
            })?;

        let pid = child.id();

        // Reap the recorder if this process outlives it, so an exited
        // recorder does not linger as a zombie that still answers probes.
        let reaper = thread::Builder::new()
            .name(format!("reap-{}", pid))
            .spawn(move || {
                let status = child.wait();
                debug!(pid, ?status, "recorder exited");
            });
        if let Err(e) = reaper {
            debug!(pid, error = %e, "could not start reaper thread");
        }

        Ok(pid)
    }

    fn is_alive(&self, pid: u32) -> bool {
        pid_exists(pid)
    }

    fn interrupt(&self, pid: u32) -> Result<SignalDelivery, ProcessError> {
        Self::send(pid, Signal::SIGINT)
    }

    fn kill(&self, pid: u32) -> Result<SignalDelivery, ProcessError> {
        Self::send(pid, Signal::SIGKILL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_until_gone(pid: u32) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if !pid_exists(pid) {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }

    fn sleeper(secs: &str) -> Invocation {
        Invocation {
            program: "sleep".to_string(),
            args: vec![secs.to_string()],
            env: Vec::new(),
        }
    }

    #[test]
    fn own_process_exists() {
        assert!(pid_exists(std::process::id()));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn unreaped_child_is_not_alive() {
        let mut child = Command::new("true").spawn().unwrap();
        let pid = child.id();
        // Let it exit without reaping
        let deadline = Instant::now() + Duration::from_secs(5);
        while !is_zombie(pid) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!pid_exists(pid));
        child.wait().unwrap();
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn foreign_process_is_not_ours() {
        use std::os::unix::fs::MetadataExt;

        let dir = tempfile::tempdir().unwrap();
        let own_uid = std::fs::metadata(dir.path()).unwrap().uid();
        let init_uid = std::fs::metadata("/proc/1").unwrap().uid();
        // Root may signal anything; only meaningful for an unprivileged user
        if own_uid == 0 || own_uid == init_uid {
            return;
        }
        assert!(!pid_exists(1));
    }

    #[test]
    fn zero_and_overflowing_pids_never_exist() {
        assert!(!pid_exists(0));
        assert!(!pid_exists(u32::MAX));
        assert_eq!(
            UnixProcessControl::send(0, Signal::SIGINT).unwrap(),
            SignalDelivery::NoSuchProcess
        );
    }

    #[test]
    fn launch_interrupt_and_reap() {
        let dir = tempfile::tempdir().unwrap();
        let control = UnixProcessControl::new();

        let pid = control
            .launch(&sleeper("30"), &dir.path().join("out.log"))
            .unwrap();
        assert!(control.is_alive(pid));

        assert_eq!(control.interrupt(pid).unwrap(), SignalDelivery::Delivered);
        assert!(wait_until_gone(pid));
        assert_eq!(control.interrupt(pid).unwrap(), SignalDelivery::NoSuchProcess);
    }

    #[test]
    fn launch_redirects_output_and_env() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("out.log");
        let control = UnixProcessControl::new();

        let invocation = Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo out $SCREEN_REC_TEST; echo err >&2".to_string()],
            env: vec![("SCREEN_REC_TEST".to_string(), "value".to_string())],
        };
        let pid = control.launch(&invocation, &log).unwrap();
        assert!(wait_until_gone(pid));

        let contents = std::fs::read_to_string(&log).unwrap();
        assert!(contents.contains("out value"));
        assert!(contents.contains("err"));
    }

    #[test]
    fn launch_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = Invocation {
            program: "screen-rec-definitely-missing".to_string(),
            args: Vec::new(),
            env: Vec::new(),
        };
        let err = UnixProcessControl::new()
            .launch(&invocation, &dir.path().join("out.log"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::ExecutableNotFound(_)));
    }
}
