//! # Vigil Configuration
//!
//! Configuration for the login alert agent. A single JSON file carries the
//! delivery credentials at its top level and optional `delivery` / `capture`
//! sections; every setting other than the credentials has a default.
//!
//! ## Layering
//! 1. Default values
//! 2. The JSON file (default `/etc/security-monitor/config.json`)
//! 3. `VIGIL_*` environment variables, `__` separating nested keys
//!    (`VIGIL_CAPTURE__TIMEOUT_SECS=8`)

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod capture;
mod credentials;
mod delivery;
mod error;
mod validation;

pub use capture::CaptureConfig;
pub use credentials::{CredentialStore, Credentials, FileCredentialStore};
pub use delivery::DeliveryConfig;
pub use error::ConfigError;

/// Well-known location of the agent configuration.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/security-monitor/config.json";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "VIGIL_";

/// Top-level agent configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct AgentConfig {
    /// Bot token and chat id. Not validated here: incomplete credentials are
    /// a delivery-time condition, not a configuration error.
    #[serde(flatten)]
    pub credentials: Credentials,

    /// Delivery channel endpoint and timeouts.
    #[serde(default)]
    #[validate(nested)]
    pub delivery: DeliveryConfig,

    /// Camera evidence capture.
    #[serde(default)]
    #[validate(nested)]
    pub capture: CaptureConfig,
}

impl AgentConfig {
    /// Load and validate the configuration at `path`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Self = Figment::from(Serialized::defaults(AgentConfig::default()))
            .merge(layered_figment(path)?)
            .extract()
            .map_err(|source| ConfigError::Parsing {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;
        config.validate()?;
        Ok(config)
    }
}

/// The file at `path` with environment overrides on top. A missing file is
/// an error rather than an empty provider.
pub(crate) fn layered_figment(path: &Path) -> Result<Figment, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    Ok(Figment::new()
        .merge(Json::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__")))
}
