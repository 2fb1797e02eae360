//! Console and rotating file logging

use anyhow::{Context, Result};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::settings::{LogConfig, LogRotation};

const LOG_FILE_PREFIX: &str = "lumacast";
const LOG_FILE_SUFFIX: &str = "log";

/// Handle to keep the logging worker thread alive
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Initialize the logging system
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    config
        .ensure_log_directory()
        .context("Failed to create log directory")?;

    // RUST_LOG takes precedence over the configured level
    let config_filter = EnvFilter::builder()
        .with_default_directive(config.parse_level().into())
        .from_env_lossy();

    let console_layer = config.console_output.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr) // stdout is reserved for --check output
            .with_ansi(true)
            .with_target(false)
            .with_filter(config_filter.clone())
    });

    let (file_layer, guard) = if config.file_output {
        let (non_blocking, worker_guard) = tracing_appender::non_blocking(file_appender(config)?);

        eprintln!(
            "Logging to {:?} ({:?} rotation)",
            config.log_directory, config.rotation
        );

        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_filter(config_filter);

        (
            Some(layer),
            Some(LogGuard {
                _guard: worker_guard,
            }),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized at level: {}", config.level);

    Ok(guard)
}

/// Log file writer for `config.log_directory`.
///
/// Files are named `lumacast.<date>.log` when rotating and `lumacast.log`
/// otherwise. Past `max_log_files` the oldest rotated files are removed.
pub fn file_appender(config: &LogConfig) -> Result<RollingFileAppender> {
    let rotation = match config.rotation {
        LogRotation::Never => Rotation::NEVER,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
    };

    let mut builder = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX);
    if config.max_log_files > 0 {
        builder = builder.max_log_files(config.max_log_files);
    }

    builder
        .build(&config.log_directory)
        .with_context(|| format!("Failed to open log file in {:?}", config.log_directory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    fn file_config(dir: &std::path::Path, rotation: LogRotation) -> LogConfig {
        LogConfig {
            file_output: true,
            log_directory: dir.to_path_buf(),
            rotation,
            ..Default::default()
        }
    }

    fn log_files(dir: &std::path::Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_unrotated_file_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = file_config(dir.path(), LogRotation::Never);

        for line in ["first run", "second run"] {
            let mut appender = file_appender(&config).unwrap();
            writeln!(appender, "{}", line).unwrap();
            appender.flush().unwrap();
        }

        assert_eq!(log_files(dir.path()), vec!["lumacast.log".to_string()]);
        let contents = fs::read_to_string(dir.path().join("lumacast.log")).unwrap();
        assert_eq!(contents, "first run\nsecond run\n");
    }

    #[test]
    fn test_daily_file_is_dated() {
        let dir = tempfile::tempdir().unwrap();
        let mut appender = file_appender(&file_config(dir.path(), LogRotation::Daily)).unwrap();
        writeln!(appender, "hello").unwrap();
        appender.flush().unwrap();

        let files = log_files(dir.path());
        assert_eq!(files.len(), 1);
        let name = &files[0];
        assert!(name.starts_with("lumacast."), "{}", name);
        assert!(name.ends_with(".log"), "{}", name);
        assert_ne!(name, "lumacast.log");
    }

    #[test]
    fn test_unwritable_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"").unwrap();

        let err = file_appender(&file_config(&blocker, LogRotation::Never)).unwrap_err();
        assert!(err.to_string().contains("Failed to open log file"));
    }
}
