//! Logging and tracing configuration
//!
//! Logs always go to stderr so that stdout carries only the test report.
//! A copy can also be written to a file when one is configured.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for the CLI
///
/// Logs are controlled by the `RUST_LOG` environment variable. When it is
/// unset, `level` applies to this crate and dependencies log at WARN.
///
/// The returned guard flushes the log file on drop and must be held for
/// the life of the process.
pub fn init_cli(level: &str, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fsbdd={level},warn")));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let (file_layer, guard) = match log_file.and_then(file_writer) {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Open a non-blocking appender for `path`, creating its directory
///
/// A relative path is taken relative to the current directory. Any
/// failure is reported on stderr and leaves file logging disabled.
fn file_writer(
    path: &Path,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name()?.to_string_lossy().into_owned();

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: Could not create log directory '{}': {}", dir.display(), e);
        return None;
    }

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir);
    match appender {
        Ok(appender) => Some(tracing_appender::non_blocking(appender)),
        Err(e) => {
            eprintln!("Warning: Could not open log file '{}': {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_writer_creates_log_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("logs").join("fsbdd.log");

        let writer = file_writer(&path);
        assert!(writer.is_some());
        assert!(path.is_file());
    }

    #[test]
    fn test_file_writer_on_directory_is_disabled() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("taken")).unwrap();

        assert!(file_writer(&temp.path().join("taken")).is_none());
    }
}
