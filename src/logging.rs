//! File-backed tracing setup.
//!
//! The terminal belongs to the dashboard, so log output goes to a plain file
//! (`dpswatch.log` by default). `RUST_LOG` takes precedence over the
//! configured level.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging to `path` at `level`.
///
/// Returns a `WorkerGuard` that must be held until exit so buffered lines
/// are flushed. If the file cannot be created, logging stays disabled and
/// `None` is returned.
pub fn init(path: &Path, level: &str) -> Option<WorkerGuard> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path.file_name()?;

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            // Subscriber is not installed yet and the TUI has not started
            eprintln!("Failed to open log file {}: {}", path.display(), e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .try_init()
        .is_err()
    {
        return None;
    }

    tracing::info!(log_file = %path.display(), level, "dpswatch logging initialized");
    Some(guard)
}
