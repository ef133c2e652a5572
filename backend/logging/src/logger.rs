//! Structured Logger
//!
//! Wraps `tracing` with a console layer on stderr, an optional daily-rolling
//! JSON file, and `RUST_LOG`-based level control.

use std::path::Path;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber.
///
/// Stdout is left to program output (extracted lines, status messages), so
/// the console layer writes to stderr. With `log_dir` set, NDJSON also goes
/// to `<log_dir>/cloudsight.log.YYYY-MM-DD`; a directory that cannot be
/// created is an error and no subscriber is installed.
pub fn init_logger(log_dir: Option<&Path>, level: &str) -> Result<(), InitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let file_layer = match log_dir {
        Some(dir) => {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("cloudsight.log")
                .build(dir)?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file_appender)
                    .with_ansi(false),
            )
        }
        None => None,
    };

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
