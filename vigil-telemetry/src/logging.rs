//! ## vigil-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! Human-readable or JSON lines on stderr, filtered through `RUST_LOG` when
//! set and by the `-v` count otherwise.

use tracing::info_span;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

/// Output encoding for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Install the global subscriber. Calling it twice is harmless: the
    /// second subscriber is ignored.
    pub fn init(format: LogFormat, verbosity: u8) {
        let builder = fmt()
            .with_env_filter(Self::filter(verbosity))
            .with_writer(std::io::stderr)
            .with_target(false);

        let result = match format {
            LogFormat::Text => builder.try_init(),
            LogFormat::Json => builder.json().flatten_event(true).try_init(),
        };
        if let Err(e) = result {
            tracing::debug!("Logger already initialised: {e}");
        }
    }

    /// `RUST_LOG` wins; otherwise 0 → info, 1 → debug, 2+ → trace.
    pub fn filter(verbosity: u8) -> EnvFilter {
        let level = match verbosity {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    }

    /// Audit record for one alert attempt. Emitted exactly once per
    /// invocation, whatever the outcome.
    pub fn log_alert(event_kind: &str, username: &str, delivered: bool, detail: &str) {
        let span = info_span!("security_event", event_type = event_kind);
        let _entered = span.enter();

        if delivered {
            tracing::info!(user = username, detail, "Security alert delivered");
        } else {
            tracing::warn!(user = username, detail, "Security alert not delivered");
        }
    }
}
