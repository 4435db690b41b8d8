//! Logging setup
//!
//! Human-readable logs go to stderr. When `PORTAL_LOG_DIR` is set, JSON
//! logs are also written to a daily rolling file in that directory.
//! The filter comes from `PORTAL_LOG`, falling back to `RUST_LOG`, then
//! to `edu_portal_core=info`.

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "edu_portal_core=info";
const LOG_FILE_PREFIX: &str = "edu-portal.log";

fn env_filter() -> Result<EnvFilter> {
    let directives = std::env::var("PORTAL_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    Ok(EnvFilter::try_new(directives)?)
}

/// Initialize the global subscriber
///
/// Keep the returned guard alive for the life of the program; dropping it
/// stops the file writer.
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter()?);

    let (file_layer, guard) = match std::env::var("PORTAL_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(env_filter()?);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
