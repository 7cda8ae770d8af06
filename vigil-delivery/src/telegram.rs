//! Telegram bot API sender.
//!
//! Photo alerts go to `sendPhoto` as multipart with the message as caption;
//! everything else goes to `sendMessage` as JSON. Both use the HTML parse
//! mode. A single attempt is made; only HTTP 200 counts as delivered.

use std::fmt;
use std::path::Path;

use reqwest::blocking::{multipart::Form, Client, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};
use vigil_config::{Credentials, DeliveryConfig};
use vigil_core::AlertMessage;

use crate::error::DeliveryError;

const PARSE_MODE: &str = "HTML";

/// Longest API error body kept in a [`DeliveryError::Api`].
const MAX_DESCRIPTION: usize = 512;

/// How a delivered alert was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Photo,
    Text,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Photo => f.write_str("photo"),
            DeliveryMode::Text => f.write_str("text"),
        }
    }
}

/// Sends a composed alert to the delivery channel.
///
/// Callers check credentials and connectivity first. Implementations never
/// delete the evidence file.
pub trait AlertSender {
    fn deliver(
        &self,
        credentials: &Credentials,
        message: &AlertMessage,
        evidence: Option<&Path>,
    ) -> Result<DeliveryMode, DeliveryError>;
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Deserialize)]
struct ApiReply {
    description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    api_base: String,
}

impl TelegramClient {
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(DeliveryError::Client)?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, token, method)
    }

    fn send_photo(
        &self,
        credentials: &Credentials,
        message: &AlertMessage,
        photo: &Path,
    ) -> Result<Response, DeliveryError> {
        let form = Form::new()
            .text("chat_id", credentials.chat_id.clone())
            .text("caption", message.text().to_string())
            .text("parse_mode", PARSE_MODE)
            .file("photo", photo)
            .map_err(|source| DeliveryError::Evidence {
                path: photo.to_path_buf(),
                source,
            })?;

        let response = self
            .client
            .post(self.endpoint(&credentials.bot_token, "sendPhoto"))
            .multipart(form)
            .send()?;
        info!("Photo sent: {}", response.status());
        Ok(response)
    }

    fn send_text(
        &self,
        credentials: &Credentials,
        message: &AlertMessage,
    ) -> Result<Response, DeliveryError> {
        let body = SendMessage {
            chat_id: &credentials.chat_id,
            text: message.text(),
            parse_mode: PARSE_MODE,
        };
        let response = self
            .client
            .post(self.endpoint(&credentials.bot_token, "sendMessage"))
            .json(&body)
            .send()?;
        info!("Message sent: {}", response.status());
        Ok(response)
    }
}

/// Turns a non-200 reply into an error, preferring Telegram's own
/// `description` over the raw body.
fn check_status(response: Response) -> Result<(), DeliveryError> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(());
    }

    let body = response.text().unwrap_or_default();
    let mut description = serde_json::from_str::<ApiReply>(&body)
        .ok()
        .and_then(|reply| reply.description)
        .unwrap_or(body);
    if description.len() > MAX_DESCRIPTION {
        let mut cut = MAX_DESCRIPTION;
        while !description.is_char_boundary(cut) {
            cut -= 1;
        }
        description.truncate(cut);
    }
    Err(DeliveryError::Api {
        status: status.as_u16(),
        description,
    })
}

impl AlertSender for TelegramClient {
    #[instrument(level = "debug", skip_all, fields(kind = %message.kind()))]
    fn deliver(
        &self,
        credentials: &Credentials,
        message: &AlertMessage,
        evidence: Option<&Path>,
    ) -> Result<DeliveryMode, DeliveryError> {
        // The file may vanish after this check; `send_photo` then fails
        // with `DeliveryError::Evidence` instead of silently downgrading.
        let photo = evidence.filter(|path| path.exists());
        if let (Some(path), None) = (evidence, photo) {
            debug!(path = %path.display(), "Evidence file gone, sending text only");
        }

        let (mode, response) = match photo {
            Some(path) => (
                DeliveryMode::Photo,
                self.send_photo(credentials, message, path),
            ),
            None => (DeliveryMode::Text, self.send_text(credentials, message)),
        };

        match response.and_then(check_status) {
            Ok(()) => Ok(mode),
            Err(e) => {
                error!(%mode, "Alert delivery failed: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = TelegramClient::new(&DeliveryConfig {
            api_base: "https://api.telegram.org/".into(),
            ..DeliveryConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.endpoint("123:abc", "sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn modes_display_lowercase() {
        assert_eq!(DeliveryMode::Photo.to_string(), "photo");
        assert_eq!(DeliveryMode::Text.to_string(), "text");
    }
}
