use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::shared::config::{CONFIG, LoggingConfig};

const LOG_FILE_PREFIX: &str = "strata.log";

/// Keeps the background file writer alive; buffered lines are flushed when
/// it is dropped.
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_writer: WorkerGuard,
}

/// Installs the global subscriber from the loaded configuration.
pub fn init() -> anyhow::Result<LoggingGuard> {
    init_with(&CONFIG.logging)
}

/// Stdout at `stdout_level` plus a daily-rolling file under `log_dir` at
/// `file_level`. Fails if a level does not parse or a subscriber is already
/// installed.
pub fn init_with(settings: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let stdout_filter: LevelFilter = settings.stdout_level.parse()?;
    let file_filter: LevelFilter = settings.file_level.parse()?;

    let appender = tracing_appender::rolling::daily(&settings.log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).with_filter(stdout_filter))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(file_writer)
                .with_filter(file_filter),
        )
        .try_init()?;

    info!(
        target: "strata::logging",
        log_dir = %settings.log_dir,
        stdout_level = %stdout_filter,
        file_level = %file_filter,
        "Logging initialized"
    );
    Ok(LoggingGuard {
        _file_writer: guard,
    })
}

/// Test subscriber writing to the captured test output. `STRATA_LOG`
/// overrides the default `strata=debug` directive.
#[cfg(test)]
pub fn init_for_tests() {
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("STRATA_LOG")
            .unwrap_or_else(|_| EnvFilter::new("strata=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
