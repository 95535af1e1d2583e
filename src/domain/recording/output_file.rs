//! Output file naming

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

/// Prefix of every recording file name
pub const FILE_PREFIX: &str = "screen-rec";

/// Path of a recording produced by one session.
///
/// The name is derived from the start timestamp, so two sessions started
/// at least a second apart never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    path: PathBuf,
}

impl OutputFile {
    /// Build `<dir>/screen-rec-<timestamp>.<extension>`
    pub fn timestamped(dir: &Path, at: DateTime<Utc>, extension: &str) -> Self {
        let name = format!(
            "{}-{}.{}",
            FILE_PREFIX,
            filesystem_safe_timestamp(at),
            extension
        );
        Self {
            path: dir.join(name),
        }
    }

    /// Full path of the recording
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the recording is written into
    pub fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

/// RFC 3339 timestamp with `:` and `.` replaced so it is valid on every filesystem
pub fn filesystem_safe_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, secs).unwrap()
    }

    #[test]
    fn timestamp_has_no_colons_or_periods() {
        let stamp = filesystem_safe_timestamp(at(7));
        assert_eq!(stamp, "2024-03-09T14-05-07-000Z");
        assert!(!stamp.contains(':'));
        assert!(!stamp.contains('.'));
    }

    #[test]
    fn output_file_lives_in_directory() {
        let file = OutputFile::timestamped(Path::new("/tmp/out"), at(7), "mp4");
        assert_eq!(file.dir(), Some(Path::new("/tmp/out")));
        assert_eq!(
            file.path(),
            Path::new("/tmp/out/screen-rec-2024-03-09T14-05-07-000Z.mp4")
        );
    }

    #[test]
    fn output_files_one_second_apart_differ() {
        let dir = Path::new("/tmp/out");
        let first = OutputFile::timestamped(dir, at(7), "mp4");
        let second = OutputFile::timestamped(dir, at(8), "mp4");
        assert_ne!(first, second);
    }
}
