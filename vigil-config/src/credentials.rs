//! Delivery credentials and the stores they are loaded from.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error};

use crate::{layered_figment, ConfigError};

/// Bot token and destination chat, as found at the top level of the
/// configuration file.
#[derive(Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "telegram_token", default)]
    pub bot_token: String,

    /// Chat ids are integers on the wire; accept either form.
    #[serde(rename = "telegram_chat_id", default, deserialize_with = "deserialize_id")]
    pub chat_id: String,
}

impl Credentials {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    /// Names of the configuration fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.bot_token.trim().is_empty() {
            missing.push("telegram_token");
        }
        if self.chat_id.trim().is_empty() {
            missing.push("telegram_chat_id");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.bot_token.is_empty() {
            "<empty>"
        } else {
            "<redacted>"
        };
        f.debug_struct("Credentials")
            .field("bot_token", &token)
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdValue {
    Num(i64),
    Str(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdValue::deserialize(deserializer)? {
        IdValue::Num(n) => n.to_string(),
        IdValue::Str(s) => s.trim().to_string(),
    })
}

/// Source of delivery credentials. Loading never fails: an unreadable store
/// yields empty credentials and the caller decides what that means.
pub trait CredentialStore {
    fn load(&self) -> Credentials;
}

/// Reads credentials from the JSON configuration file, with `VIGIL_*`
/// environment variables layered on top.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn try_load(&self) -> Result<Credentials, ConfigError> {
        layered_figment(&self.path)?
            .extract()
            .map_err(|source| ConfigError::Parsing {
                path: self.path.clone(),
                source: Box::new(source),
            })
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Credentials {
        match self.try_load() {
            Ok(credentials) => {
                debug!(path = %self.path.display(), ?credentials, "Loaded credentials");
                credentials
            }
            Err(e) => {
                error!("Failed to load credentials: {e}");
                Credentials::default()
            }
        }
    }
}
