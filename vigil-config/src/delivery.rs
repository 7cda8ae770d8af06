//! Delivery channel configuration (Telegram bot API endpoint and timeouts).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Delivery channel configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct DeliveryConfig {
    /// Base URL of the bot API; also the reachability probe target.
    #[validate(url)]
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Reachability probe timeout (seconds).
    #[validate(range(min = 1, max = 30))]
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Timeout for a single send request (seconds).
    #[validate(range(min = 1, max = 120))]
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl DeliveryConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".into()
}

fn default_probe_timeout() -> u64 {
    3
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            probe_timeout_secs: default_probe_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}
