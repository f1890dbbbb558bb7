//! Rolling Logger
//!
//! File logger for desktop apps:
//! - lines go to `<app_name>.log` inside the log directory
//! - once the file passes a size limit it is rolled to `<app_name>.1.log`,
//!   older files shift up and the oldest is dropped
//! - the most recent lines are also kept in memory (circular buffer) so a UI
//!   can show them without touching the disk
//!
//! `log` records are bridged into `tracing`, so crates logging through either
//! facade end up in the same file.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

/// Default size at which the active log file is rolled
pub const DEFAULT_MAX_FILE_BYTES: u64 = 2 * 1024 * 1024;
/// Default number of rolled files kept next to the active one
pub const DEFAULT_MAX_FILES: usize = 3;
/// Default number of lines kept in memory
pub const DEFAULT_BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<RollingWriter> = OnceLock::new();

/// Limits for a [`RollingWriter`]
#[derive(Debug, Clone, Copy)]
pub struct RollingOptions {
    pub max_file_bytes: u64,
    pub max_files: usize,
    pub buffer_lines: usize,
}

impl Default for RollingOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: DEFAULT_MAX_FILES,
            buffer_lines: DEFAULT_BUFFER_LINES,
        }
    }
}

struct RollingState {
    dir: PathBuf,
    app_name: String,
    options: RollingOptions,
    file: Option<File>,
    written: u64,
    recent: VecDeque<String>,
    partial: String,
}

impl RollingState {
    fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.app_name))
    }

    fn rolled_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}.log", self.app_name, index))
    }

    fn open_active(&mut self) -> io::Result<()> {
        let path = self.active_path();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        self.written = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.file = Some(file);
        Ok(())
    }

    fn roll(&mut self) -> io::Result<()> {
        // Close before renaming (required on Windows)
        self.file = None;

        if self.options.max_files == 0 {
            fs::remove_file(self.active_path()).or_else(ignore_not_found)?;
        } else {
            fs::remove_file(self.rolled_path(self.options.max_files)).or_else(ignore_not_found)?;
            for index in (1..self.options.max_files).rev() {
                let from = self.rolled_path(index);
                if from.exists() {
                    fs::rename(&from, self.rolled_path(index + 1))?;
                }
            }
            let active = self.active_path();
            if active.exists() {
                fs::rename(&active, self.rolled_path(1))?;
            }
        }

        self.open_active()
    }

    fn remember(&mut self, chunk: &str) {
        self.partial.push_str(chunk);
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            let line = line.trim_end_matches(['\r', '\n']).to_string();
            if self.options.buffer_lines == 0 {
                continue;
            }
            if self.recent.len() == self.options.buffer_lines {
                self.recent.pop_front();
            }
            self.recent.push_back(line);
        }
    }

    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.file.is_none() {
            self.open_active()?;
        }
        if self.written > 0 && self.written + buf.len() as u64 > self.options.max_file_bytes {
            self.roll()?;
        }
        if let Some(file) = self.file.as_mut() {
            file.write_all(buf)?;
            self.written += buf.len() as u64;
        }
        self.remember(&String::from_utf8_lossy(buf));
        Ok(())
    }
}

fn ignore_not_found(err: io::Error) -> io::Result<()> {
    if err.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(err)
    }
}

/// Shared handle to the rolling file + in-memory buffer.
///
/// Cloning is cheap; all clones write to the same file.
#[derive(Clone)]
pub struct RollingWriter {
    state: Arc<Mutex<RollingState>>,
}

impl RollingWriter {
    /// Create the log directory (if needed) and open `<app_name>.log` for appending
    pub fn new(dir: impl Into<PathBuf>, app_name: &str, options: RollingOptions) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let mut state = RollingState {
            dir,
            app_name: app_name.to_string(),
            options,
            file: None,
            written: 0,
            recent: VecDeque::with_capacity(options.buffer_lines),
            partial: String::new(),
        };
        state.open_active()?;

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
        })
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => state.recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        state.write_bytes(buf)
    }
}

/// Per-event writer handed out to `tracing_subscriber`
pub struct RollingHandle {
    writer: RollingWriter,
}

impl Write for RollingHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .writer
            .state
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer poisoned"))?;
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RollingWriter {
    type Writer = RollingHandle;

    fn make_writer(&'a self) -> Self::Writer {
        RollingHandle {
            writer: self.clone(),
        }
    }
}

/// Local wall-clock timestamps, millisecond precision
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global logger writing into `log_dir`.
///
/// Also bridges `log` macros into the same sink. Calling it a second time
/// returns an error and leaves the first logger in place.
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), String> {
    init_logger_with(log_dir, app_name, RollingOptions::default())
}

/// Same as [`init_logger`] with explicit limits
pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    options: RollingOptions,
) -> Result<(), String> {
    if LOGGER.get().is_some() {
        return Err("logger already initialized".to_string());
    }

    let writer = RollingWriter::new(log_dir.as_ref(), app_name, options)
        .map_err(|e| format!("Failed to open log file: {}", e))?;

    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_timer(LocalTime)
        .with_ansi(false)
        .with_target(true)
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    LOGGER
        .set(writer)
        .map_err(|_| "logger already initialized".to_string())?;

    tracing::info!(app = app_name, "logger initialized");
    Ok(())
}

/// Lines buffered by the global logger (empty before [`init_logger`])
pub fn recent_lines() -> Vec<String> {
    LOGGER.get().map(|w| w.recent_lines()).unwrap_or_default()
}

fn ensure_initialized() -> Result<(), String> {
    if LOGGER.get().is_some() {
        Ok(())
    } else {
        Err("logger not initialized".to_string())
    }
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_initialized()?;
    tracing::error!("{}", msg);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(max_file_bytes: u64, max_files: usize, buffer_lines: usize) -> RollingOptions {
        RollingOptions {
            max_file_bytes,
            max_files,
            buffer_lines,
        }
    }

    #[test]
    fn test_writes_to_active_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(dir.path(), "App", RollingOptions::default()).unwrap();

        let mut handle = writer.make_writer();
        handle.write_all(b"first line\nsecond line\n").unwrap();
        handle.flush().unwrap();

        let content = fs::read_to_string(dir.path().join("App.log")).unwrap();
        assert_eq!(content, "first line\nsecond line\n");
        assert_eq!(writer.recent_lines(), vec!["first line", "second line"]);
    }

    #[test]
    fn test_partial_lines_are_buffered_until_newline() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(dir.path(), "App", RollingOptions::default()).unwrap();

        let mut handle = writer.make_writer();
        handle.write_all(b"half").unwrap();
        assert!(writer.recent_lines().is_empty());
        handle.write_all(b" done\n").unwrap();
        assert_eq!(writer.recent_lines(), vec!["half done"]);
    }

    #[test]
    fn test_circular_buffer_keeps_latest() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(dir.path(), "App", options(1024 * 1024, 2, 3)).unwrap();

        let mut handle = writer.make_writer();
        for i in 0..5 {
            handle.write_all(format!("line {}\n", i).as_bytes()).unwrap();
        }
        assert_eq!(writer.recent_lines(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_rolls_when_size_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        let writer = RollingWriter::new(dir.path(), "App", options(10, 2, 10)).unwrap();

        let mut handle = writer.make_writer();
        handle.write_all(b"aaaaaaaa\n").unwrap();
        handle.write_all(b"bbbbbbbb\n").unwrap();
        handle.write_all(b"cccccccc\n").unwrap();
        handle.write_all(b"dddddddd\n").unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("App.log")).unwrap(), "dddddddd\n");
        assert_eq!(fs::read_to_string(dir.path().join("App.1.log")).unwrap(), "cccccccc\n");
        assert_eq!(fs::read_to_string(dir.path().join("App.2.log")).unwrap(), "bbbbbbbb\n");
        // Oldest file dropped
        assert!(!dir.path().join("App.3.log").exists());
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("App.log"), "old\n").unwrap();

        let writer = RollingWriter::new(dir.path(), "App", RollingOptions::default()).unwrap();
        writer.make_writer().write_all(b"new\n").unwrap();

        let content = fs::read_to_string(dir.path().join("App.log")).unwrap();
        assert_eq!(content, "old\nnew\n");
    }

    #[test]
    fn test_helpers_require_init() {
        if LOGGER.get().is_none() {
            assert!(info("not yet").is_err());
        }
    }
}
