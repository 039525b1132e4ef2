use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LogLevel};

/// Install the process-wide tracing subscriber, writing to stdout.
///
/// JSON output is flattened for log aggregators and carries thread ids so
/// events can be attributed to a shard; text output is the pretty format
/// for interactive runs. A `RUST_LOG` environment variable, when present,
/// takes precedence over the configured `level`. Call once, before the
/// shards are spawned.
pub fn init_logging(level: LogLevel, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    match format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .flatten_event(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Text => {
            let layer = fmt::layer().pretty().with_target(true);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
    }
}
