//! Access log writer module
//!
//! Thread-safe access log output to a file or stdout.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

/// Global access log writer instance
static ACCESS_LOG: OnceLock<LogTarget> = OnceLock::new();

/// Set once the first failed write has been reported
static WRITE_FAILURE_REPORTED: AtomicBool = AtomicBool::new(false);

/// Log output target
enum LogTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file, or any other sink
    Writer(Mutex<Box<dyn Write + Send>>),
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Write one line to the log target
///
/// A lock poisoned by a panicking writer is taken over; the line is still written.
fn write_to_target(target: &LogTarget, message: &str) -> io::Result<()> {
    match target {
        LogTarget::Stdout => writeln!(io::stdout().lock(), "{message}"),
        LogTarget::Writer(writer) => {
            let mut writer = writer.lock().unwrap_or_else(PoisonError::into_inner);
            writeln!(writer, "{message}")
        }
    }
}

/// Warn about a failed write, only the first time
///
/// Returns whether this call emitted the warning.
fn report_write_failure(err: &io::Error) -> bool {
    let first = !WRITE_FAILURE_REPORTED.swap(true, Ordering::Relaxed);
    if first {
        tracing::warn!("Failed to write access log: {err}; further failures are not reported");
    }
    first
}

/// Initialize the global access log writer
///
/// This should be called once at application startup.
/// Returns error if the log file cannot be opened.
pub fn init(access_log_file: Option<&str>) -> io::Result<()> {
    let target = match access_log_file {
        Some(path) => LogTarget::Writer(Mutex::new(Box::new(open_log_file(path)?))),
        None => LogTarget::Stdout,
    };
    ACCESS_LOG.set(target).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Access log writer already initialized",
        )
    })
}

/// Write one access log line, to stdout if `init()` was never called
pub fn write_access(message: &str) {
    if let Err(err) = write_to_target(ACCESS_LOG.get().unwrap_or(&LogTarget::Stdout), message) {
        report_write_failure(&err);
    }
}
