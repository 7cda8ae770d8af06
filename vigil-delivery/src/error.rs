use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Why the bot API host could not be reached.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no response from {host} within {timeout:?}")]
    Timeout { host: String, timeout: Duration },

    #[error("cannot reach {host}: {source}")]
    Unreachable {
        host: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Why an alert was not delivered. Request URLs are stripped from the
/// wrapped transport errors because they embed the bot token.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("cannot attach evidence {}: {source}", path.display())]
    Evidence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Telegram API error (HTTP {status}): {description}")]
    Api { status: u16, description: String },
}

impl From<reqwest::Error> for DeliveryError {
    fn from(error: reqwest::Error) -> Self {
        DeliveryError::Transport(error.without_url())
    }
}
