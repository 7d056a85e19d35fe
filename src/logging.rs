use crate::config::LogSettings;
use crate::error::ConfigError;
use std::io;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Dependencies that log far more than the bot itself.
const NOISY_TARGETS: &[&str] = &["serenity", "tungstenite", "hyper", "reqwest", "rustls", "h2"];

/// Filter directives for `level`, with noisy dependencies capped at `warn`.
pub fn filter_directives(level: Level) -> String {
    let mut directives = vec![level.as_str().to_ascii_lowercase()];
    directives.extend(NOISY_TARGETS.iter().map(|target| format!("{target}=warn")));
    directives.join(",")
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(level)))
}

/// Initializes console and rolling file logging.
///
/// The returned guard flushes the file writer when dropped, so keep it alive
/// until the process exits.
pub fn init(settings: &LogSettings) -> Result<WorkerGuard, ConfigError> {
    std::fs::create_dir_all(&settings.dir).map_err(|source| ConfigError::LogDirectory {
        path: settings.dir.clone(),
        source,
    })?;

    let (prefix, suffix) = settings.file_parts();
    let mut builder = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .max_log_files(settings.max_files);
    if let Some(suffix) = suffix {
        builder = builder.filename_suffix(suffix);
    }
    let appender = builder
        .build(&settings.dir)
        .map_err(|err| ConfigError::LogDirectory {
            path: settings.dir.clone(),
            source: io::Error::other(err),
        })?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter(settings.level))
        .init();

    Ok(guard)
}

/// Console-only logging, used when the configuration is too broken for `init`.
pub fn init_console() {
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter(Level::INFO))
        .try_init();
}
