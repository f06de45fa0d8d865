//! Telemetry bootstrap (tracing subscriber).

use anyhow::Result;

/// Install the global subscriber. `RUST_LOG` wins over `log_level`; logs go
/// to stderr so stdout stays free for the match summary.
pub fn init_telemetry(log_level: Option<&str>, json_logs: bool) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = if json_logs {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };

    tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()?;

    tracing::info!(target: "telemetry", log_level = level, json_logs, "telemetry initialized");
    Ok(())
}
