//! Logging for EMStudio.
//!
//! Two destinations are registered once directories exist: a size-rotating text file at the
//! resolved log path (one backup, `log.txt.1`) and stderr. `EMSTUDIO_LOG` overrides the
//! default filter.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "EMSTUDIO_LOG";
pub const LOG_MAX_BYTES: u64 = 100 * 1024;
const DEFAULT_FILTER: &str = "info,emscore=trace,emstudio=trace";

/// Append-only file that moves itself to `<name>.1` once it grows past `max_bytes`.
/// If a rotation fails, the file keeps growing in place for the rest of the run.
pub struct RotatingFile {
    path: PathBuf,
    backup: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    rotation_failed: bool,
}

impl RotatingFile {
    pub fn open(path: &Path, max_bytes: u64) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path: path.to_path_buf(),
            backup: backup_path(path),
            file,
            written,
            max_bytes,
            rotation_failed: false,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.backup.exists() {
            fs::remove_file(&self.backup)?;
        }
        fs::rename(&self.path, &self.backup)?;
        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.rotation_failed
            && self.written > 0
            && self.written + buf.len() as u64 > self.max_bytes
        {
            if let Err(err) = self.rotate() {
                eprintln!(
                    "[logging] failed to rotate {}: {err}; appending without rotation",
                    self.path.display()
                );
                self.rotation_failed = true;
            }
        }
        let count = self.file.write(buf)?;
        self.written += count as u64;
        Ok(count)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".1");
    path.with_file_name(name)
}

/// Installs the global subscriber. Keep the returned guard alive until exit so buffered
/// lines reach the file.
pub fn initialise_logging(log_file: &Path) -> Option<WorkerGuard> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);
    let subscriber = tracing_subscriber::registry().with(filter).with(stderr_layer);

    match RotatingFile::open(log_file, LOG_MAX_BYTES) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            subscriber
                .with(
                    fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(true),
                )
                .init();
            tracing::debug!(path = %log_file.display(), "file logging enabled");
            Some(guard)
        }
        Err(err) => {
            eprintln!("[logging] failed to open log file {}: {err}", log_file.display());
            subscriber.init();
            None
        }
    }
}
