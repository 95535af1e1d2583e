//! PID marker file for the active recorder

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process;

use tracing::debug;

use crate::application::ports::{MarkerContents, MarkerError, MarkerStore};
use crate::infrastructure::process::pid_exists;

/// Marker file name inside the temp directory
const MARKER_FILE_NAME: &str = "screen-rec.pid";

/// PID marker backed by a file in the temp directory.
///
/// Writes are create-exclusive; a companion `.lock` file holding the
/// starter's own pid serialises concurrent starts across processes.
pub struct PidMarker {
    path: PathBuf,
}

impl PidMarker {
    /// Create a marker at the default location
    pub fn new() -> Self {
        Self {
            path: std::env::temp_dir().join(MARKER_FILE_NAME),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the start lock
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn try_create_lock(&self) -> Result<bool, MarkerError> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.lock_path())
        {
            Ok(mut file) => {
                write!(file, "{}", process::id()).map_err(|e| {
                    MarkerError::WriteFailed(format!("Failed to write start lock: {}", e))
                })?;
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(MarkerError::WriteFailed(format!(
                "Failed to create start lock: {}",
                e
            ))),
        }
    }

    /// A lock left behind by a starter that no longer exists
    fn lock_is_stale(&self) -> bool {
        match fs::read_to_string(self.lock_path()) {
            Ok(contents) => owner_is_gone(&contents),
            Err(e) => e.kind() == ErrorKind::NotFound,
        }
    }

    /// Move an abandoned lock out of the way without deleting a fresh one.
    ///
    /// The lock is renamed to a private name first, so only one reclaimer
    /// wins it. If what was moved turns out to belong to a live starter it
    /// is linked back (create-exclusive). A starter can still slip in while
    /// the lock is briefly absent; the create-exclusive marker write is the
    /// final guard against two recorders.
    fn reclaim_stale_lock(&self) {
        let mut private = self.lock_path().into_os_string();
        private.push(format!(".{}", process::id()));
        let private = PathBuf::from(private);

        if fs::rename(self.lock_path(), &private).is_err() {
            return;
        }

        let abandoned = fs::read_to_string(&private)
            .map(|contents| owner_is_gone(&contents))
            .unwrap_or(true);
        if abandoned {
            debug!(path = %self.lock_path().display(), "removed abandoned start lock");
        } else if let Err(e) = fs::hard_link(&private, self.lock_path()) {
            debug!(error = %e, "start lock was re-created meanwhile");
        }
        let _ = fs::remove_file(&private);
    }

    fn lock_is_ours(&self) -> bool {
        fs::read_to_string(self.lock_path())
            .map(|contents| contents.trim() == process::id().to_string())
            .unwrap_or(false)
    }
}

fn owner_is_gone(lock_contents: &str) -> bool {
    match lock_contents.trim().parse::<u32>() {
        Ok(owner) => !pid_exists(owner),
        Err(_) => true,
    }
}

impl Default for PidMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerStore for PidMarker {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn read(&self) -> Result<MarkerContents, MarkerError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(MarkerContents::Absent),
            Err(e) => return Err(MarkerError::ReadFailed(e.to_string())),
        };

        match contents.trim().parse::<u32>() {
            Ok(pid) if pid > 0 => Ok(MarkerContents::Pid(pid)),
            _ => Ok(MarkerContents::Invalid(contents)),
        }
    }

    fn create(&self, pid: u32) -> Result<(), MarkerError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| {
                if e.kind() == ErrorKind::AlreadyExists {
                    MarkerError::AlreadyExists
                } else {
                    MarkerError::WriteFailed(format!("Failed to create marker: {}", e))
                }
            })?;

        write!(file, "{}", pid)
            .map_err(|e| MarkerError::WriteFailed(format!("Failed to write PID: {}", e)))?;

        Ok(())
    }

    fn remove(&self) -> Result<(), MarkerError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MarkerError::RemoveFailed(e.to_string())),
        }
    }

    fn lock_start(&self) -> Result<(), MarkerError> {
        if self.try_create_lock()? {
            return Ok(());
        }

        if self.lock_is_stale() {
            self.reclaim_stale_lock();
            if self.try_create_lock()? {
                return Ok(());
            }
        }

        Err(MarkerError::LockHeld)
    }

    fn unlock_start(&self) {
        if self.lock_is_ours() {
            let _ = fs::remove_file(self.lock_path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::temp_dir;

    fn marker_in(dir: &tempfile::TempDir) -> PidMarker {
        PidMarker::with_path(dir.path().join("test.pid"))
    }

    #[test]
    fn new_uses_temp_dir() {
        let marker = PidMarker::new();
        assert_eq!(marker.path(), temp_dir().join("screen-rec.pid"));
    }

    #[test]
    fn lock_path_appends_suffix() {
        let marker = PidMarker::with_path("/custom/path.pid");
        assert_eq!(marker.lock_path(), PathBuf::from("/custom/path.pid.lock"));
    }

    #[test]
    fn read_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(marker_in(&dir).read().unwrap(), MarkerContents::Absent);
    }

    #[test]
    fn create_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let marker = marker_in(&dir);
        marker.create(4321).unwrap();
        assert_eq!(marker.read().unwrap(), MarkerContents::Pid(4321));
        assert_eq!(fs::read_to_string(marker.path()).unwrap(), "4321");
    }

    #[test]
    fn create_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let marker = marker_in(&dir);
        marker.create(1).unwrap();
        assert!(matches!(marker.create(2), Err(MarkerError::AlreadyExists)));
        assert_eq!(marker.read().unwrap(), MarkerContents::Pid(1));
    }

    #[test]
    fn read_tolerates_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let marker = marker_in(&dir);
        fs::write(marker.path(), "77\n").unwrap();
        assert_eq!(marker.read().unwrap(), MarkerContents::Pid(77));
    }

    #[test]
    fn read_invalid_contents() {
        let dir = tempfile::tempdir().unwrap();
        let marker = marker_in(&dir);
        fs::write(marker.path(), "0").unwrap();
        assert!(matches!(marker.read().unwrap(), MarkerContents::Invalid(_)));
        fs::write(marker.path(), "garbage").unwrap();
        assert!(matches!(marker.read().unwrap(), MarkerContents::Invalid(_)));
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let marker = marker_in(&dir);
        marker.create(5).unwrap();
        marker.remove().unwrap();
        marker.remove().unwrap();
        assert_eq!(marker.read().unwrap(), MarkerContents::Absent);
    }

    #[test]
    fn start_lock_is_exclusive() {
        let dir = tempfile::tempdir().unwrap();
        let marker = marker_in(&dir);
        marker.lock_start().unwrap();
        assert!(matches!(marker.lock_start(), Err(MarkerError::LockHeld)));
        marker.unlock_start();
        marker.lock_start().unwrap();
    }

    #[test]
    fn abandoned_start_lock_is_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let marker = marker_in(&dir);
        fs::write(marker.lock_path(), "not-a-pid").unwrap();
        marker.lock_start().unwrap();
        assert_eq!(
            fs::read_to_string(marker.lock_path()).unwrap(),
            process::id().to_string()
        );
    }

    #[test]
    fn reclaim_puts_back_a_live_owners_lock() {
        let dir = tempfile::tempdir().unwrap();
        let marker = marker_in(&dir);
        let mut owner = process::Command::new("sleep").arg("30").spawn().unwrap();
        fs::write(marker.lock_path(), owner.id().to_string()).unwrap();

        marker.reclaim_stale_lock();

        assert_eq!(
            fs::read_to_string(marker.lock_path()).unwrap(),
            owner.id().to_string()
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        owner.kill().unwrap();
        owner.wait().unwrap();
    }

    #[test]
    fn unlock_leaves_another_starters_lock() {
        let dir = tempfile::tempdir().unwrap();
        let marker = marker_in(&dir);
        fs::write(marker.lock_path(), "1").unwrap();
        marker.unlock_start();
        assert!(marker.lock_path().exists());
    }
}
