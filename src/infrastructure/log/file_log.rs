//! File-backed recorder log

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::application::ports::{LogError, RecorderLog};

/// Log file name inside the scratch directory
const LOG_FILE_NAME: &str = "recorder.log";

/// Bytes read per step when scanning the log backwards
const TAIL_CHUNK: u64 = 8 * 1024;

/// Plain-text log the recorder's stdout and stderr are appended to
pub struct FileRecorderLog {
    path: PathBuf,
}

impl FileRecorderLog {
    /// Create a log at `<cache>/screen-rec/recorder.log`
    pub fn new() -> Self {
        let dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("screen-rec");
        Self {
            path: dir.join(LOG_FILE_NAME),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent(&self) -> std::io::Result<()> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

impl Default for FileRecorderLog {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderLog for FileRecorderLog {
    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn reset(&self) -> Result<(), LogError> {
        self.ensure_parent()
            .and_then(|_| File::create(&self.path).map(|_| ()))
            .map_err(|e| LogError::ResetFailed(e.to_string()))
    }

    fn append(&self, line: &str) -> Result<(), LogError> {
        self.ensure_parent()
            .map_err(|e| LogError::WriteFailed(e.to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| LogError::WriteFailed(e.to_string()))?;

        writeln!(file, "{}", line).map_err(|e| LogError::WriteFailed(e.to_string()))
    }

    fn tail(&self, max_lines: usize) -> Result<Vec<String>, LogError> {
        if max_lines == 0 {
            return Ok(Vec::new());
        }

        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LogError::ReadFailed(e.to_string())),
        };

        let bytes = read_tail(&mut file, max_lines, TAIL_CHUNK)
            .map_err(|e| LogError::ReadFailed(e.to_string()))?;

        Ok(last_lines(&String::from_utf8_lossy(&bytes), max_lines))
    }
}

/// Bytes holding at least the last `max_lines` complete lines of `file`.
///
/// Reads backwards from the end in `chunk`-sized steps, so a long
/// recording's log is never loaded whole.
fn read_tail<R: Read + Seek>(file: &mut R, max_lines: usize, chunk: u64) -> io::Result<Vec<u8>> {
    let mut start = file.seek(SeekFrom::End(0))?;
    let mut buf = Vec::new();
    let mut newlines = 0;

    while start > 0 && newlines <= max_lines {
        let step = chunk.min(start);
        start -= step;
        file.seek(SeekFrom::Start(start))?;

        let mut block = vec![0; step as usize];
        file.read_exact(&mut block)?;
        newlines += block.iter().filter(|&&b| b == b'\n').count();
        block.extend_from_slice(&buf);
        buf = block;
    }

    if start > 0 {
        // Partial first line
        if let Some(pos) = buf.iter().position(|&b| b == b'\n') {
            buf.drain(..=pos);
        }
    }
    Ok(buf)
}

/// Last `max_lines` lines of `text`.
///
/// Encoders redraw their progress line with carriage returns; only the
/// final redraw of such a line is kept.
fn last_lines(text: &str, max_lines: usize) -> Vec<String> {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.rsplit('\r').find(|s| !s.is_empty()).unwrap_or(""))
        .collect();

    let skip = lines.len().saturating_sub(max_lines);
    lines[skip..].iter().map(|s| s.to_string()).collect()
}
