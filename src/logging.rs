//! File logging.
//!
//! The TUI owns the terminal, so log lines go to rotating files under
//! `<tack dir>/logs/`. Lines are `event=... key=value` metadata; card text is
//! never logged.

use std::path::Path;
use std::sync::OnceLock;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};

const LOG_FILE_BASENAME: &str = "tack";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGER: OnceLock<LoggerHandle> = OnceLock::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log level {level:?}: {reason}")]
    InvalidLevel { level: String, reason: String },
    #[error("failed to start logger: {0}")]
    Start(String),
}

/// Start file logging once per process. Later calls are no-ops.
pub fn init_logging(level: &str, tack_dir: &Path) -> Result<(), LoggingError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }

    let log_dir = tack_dir.join("logs");
    let handle = Logger::try_with_str(level)
        .map_err(|e| LoggingError::InvalidLevel {
            level: level.to_string(),
            reason: e.to_string(),
        })?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|e| LoggingError::Start(e.to_string()))?;

    let _ = LOGGER.set(handle);

    log::info!(
        "event=app_start version={} log_dir={}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );
    Ok(())
}

/// Write out buffered log lines. The handle lives in a static and is never
/// dropped, so this must run before the process exits.
pub fn flush_logging() {
    if let Some(handle) = LOGGER.get() {
        handle.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_rejects_unknown_level() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_logging("tack=loud", dir.path()).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidLevel { ref level, .. } if level == "tack=loud"));
        assert!(LOGGER.get().is_none());
    }

    #[test]
    fn flush_without_logger_is_a_noop() {
        flush_logging();
        assert!(LOGGER.get().is_none());
    }
}
