//! Shared logging setup for the render manager binaries.
//!
//! Library code only emits `tracing` events; whoever installs the subscriber
//! decides where they go. The binary calls [`init_logging`], tests install
//! scoped subscribers of their own.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "render_manager=info";
const VERBOSE_LOG_FILTER: &str = "render_manager=debug";
const QUIET_CONSOLE_FILTER: &str = "warn";
const MAX_LOG_FILES: usize = 5;
const MAX_LOG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Environment variable overriding the render manager home directory.
pub const HOME_ENV: &str = "RENDER_MANAGER_HOME";

/// Logging configuration for a render manager binary.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    /// Mirror info/debug events on stderr instead of warnings only.
    pub verbose: bool,
}

/// Install the global subscriber: a rotating file under [`logs_dir`] plus stderr.
///
/// `RUST_LOG` overrides both filters.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    let file_writer = SharedRotatingWriter::open(&log_dir, config.app_name)
        .context("Failed to initialize rotating log writer")?;

    let env_filter = EnvFilter::try_from_default_env().ok();
    let file_filter = env_filter
        .clone()
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));
    let console_filter = match (env_filter, config.verbose) {
        (Some(filter), _) => filter,
        (None, true) => EnvFilter::new(VERBOSE_LOG_FILTER),
        (None, false) => EnvFilter::new(QUIET_CONSOLE_FILTER),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_filter(console_filter),
        )
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(())
}

/// Home directory: `$RENDER_MANAGER_HOME`, else `~/.render_manager`.
pub fn render_manager_home() -> PathBuf {
    if let Ok(override_path) = std::env::var(HOME_ENV) {
        return PathBuf::from(override_path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".render_manager")
}

/// Logs directory: `<home>/logs`
pub fn logs_dir() -> PathBuf {
    render_manager_home().join("logs")
}

/// Ensure the logs directory exists and return it.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

/// Size-capped log file. `<name>.log` is active, `<name>.log.1` is the most
/// recent rotation and `<name>.log.<max_files - 1>` the oldest kept.
struct RotatingFile {
    dir: PathBuf,
    stem: String,
    max_files: usize,
    max_size: u64,
    file: Option<File>,
    written: u64,
}

impl RotatingFile {
    fn open(dir: &Path, name: &str, max_files: usize, max_size: u64) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let mut rotating = Self {
            dir: dir.to_path_buf(),
            stem: sanitize_name(name),
            max_files: max_files.max(1),
            max_size,
            file: None,
            written: 0,
        };
        rotating.reopen()?;
        if rotating.written > rotating.max_size {
            rotating.rotate()?;
        }
        Ok(rotating)
    }

    fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.stem))
    }

    fn archive_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.stem, index))
    }

    fn reopen(&mut self) -> io::Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.active_path())?;
        self.written = file.metadata()?.len();
        self.file = Some(file);
        Ok(())
    }

    fn rotate(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }

        let archives = self.max_files - 1;
        if archives == 0 {
            // Nothing is archived: start the active file over.
            fs::remove_file(self.active_path()).or_else(ignore_missing)?;
            return self.reopen();
        }

        fs::remove_file(self.archive_path(archives)).or_else(ignore_missing)?;
        for index in (1..archives).rev() {
            fs::rename(self.archive_path(index), self.archive_path(index + 1))
                .or_else(ignore_missing)?;
        }
        fs::rename(self.active_path(), self.archive_path(1)).or_else(ignore_missing)?;

        self.reopen()
    }
}

fn ignore_missing(err: io::Error) -> io::Result<()> {
    if err.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(err)
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written + buf.len() as u64 > self.max_size {
            self.rotate()?;
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))?;
        let written = file.write(buf)?;
        self.written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

#[derive(Clone)]
struct SharedRotatingWriter {
    inner: Arc<Mutex<RotatingFile>>,
}

impl SharedRotatingWriter {
    fn open(dir: &Path, app_name: &str) -> Result<Self> {
        let file = RotatingFile::open(dir, app_name, MAX_LOG_FILES, MAX_LOG_FILE_SIZE)
            .with_context(|| format!("Failed to open log file for {}", app_name))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(file)),
        })
    }

    fn with_file<T>(&self, f: impl FnOnce(&mut RotatingFile) -> io::Result<T>) -> io::Result<T> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        f(&mut *guard)
    }
}

impl Write for SharedRotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedRotatingWriter {
    type Writer = SharedRotatingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' { ch } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("render-manager"), "render-manager");
        assert_eq!(sanitize_name("render manager/v1"), "render_manager_v1");
    }

    #[test]
    fn test_rotation_keeps_bounded_archives() {
        let temp = TempDir::new().unwrap();
        let mut file = RotatingFile::open(temp.path(), "rm", 3, 8).unwrap();

        for chunk in ["aaaaaaaa", "bbbbbbbb", "cccccccc", "dddddddd"] {
            file.write_all(chunk.as_bytes()).unwrap();
        }
        file.flush().unwrap();

        let active = fs::read_to_string(temp.path().join("rm.log")).unwrap();
        let newest = fs::read_to_string(temp.path().join("rm.log.1")).unwrap();
        let oldest = fs::read_to_string(temp.path().join("rm.log.2")).unwrap();
        assert_eq!(active, "dddddddd");
        assert_eq!(newest, "cccccccc");
        assert_eq!(oldest, "bbbbbbbb");
        assert!(!temp.path().join("rm.log.3").exists());
    }

    #[test]
    fn test_single_file_rotation_truncates() {
        let temp = TempDir::new().unwrap();
        let mut file = RotatingFile::open(temp.path(), "solo", 1, 4).unwrap();

        file.write_all(b"1234").unwrap();
        file.write_all(b"5678").unwrap();
        file.flush().unwrap();

        let active = fs::read_to_string(temp.path().join("solo.log")).unwrap();
        assert_eq!(active, "5678");
        assert!(!temp.path().join("solo.log.1").exists());
    }

    #[test]
    fn test_reopen_appends_to_existing_log() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.log"), "old\n").unwrap();

        let mut file = RotatingFile::open(temp.path(), "app", 5, 1024).unwrap();
        file.write_all(b"new\n").unwrap();
        file.flush().unwrap();

        let content = fs::read_to_string(temp.path().join("app.log")).unwrap();
        assert_eq!(content, "old\nnew\n");
    }
}
