//! Reachability check against the bot API host.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use tracing::{debug, warn};
use vigil_config::DeliveryConfig;

use crate::error::{DeliveryError, ProbeError};

/// Decides whether a delivery attempt is worth making at all.
pub trait ConnectivityProbe {
    fn probe(&self) -> Result<(), ProbeError>;

    /// `probe` folded to a bool; the reason is logged.
    fn is_reachable(&self) -> bool {
        match self.probe() {
            Ok(()) => true,
            Err(e) => {
                warn!("Connectivity check failed: {e}");
                false
            }
        }
    }
}

/// One GET to the API base URL. Any HTTP response, whatever its status,
/// proves the host is reachable.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let timeout = config.probe_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .redirect(Policy::none())
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DeliveryError::Client)?;
        Ok(Self {
            client,
            url: config.api_base.clone(),
            timeout,
        })
    }
}

impl ConnectivityProbe for HttpProbe {
    fn probe(&self) -> Result<(), ProbeError> {
        match self.client.get(&self.url).send() {
            Ok(response) => {
                debug!(url = %self.url, status = %response.status(), "API host reachable");
                Ok(())
            }
            Err(e) if e.is_timeout() => Err(ProbeError::Timeout {
                host: self.url.clone(),
                timeout: self.timeout,
            }),
            Err(e) => Err(ProbeError::Unreachable {
                host: self.url.clone(),
                source: e.without_url(),
            }),
        }
    }
}
