//! Alert message composition.
//!
//! The body uses Telegram's HTML parse mode (`<b>`, `<i>`), so free-form
//! fields are escaped before they are embedded.

use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, TimeZone};

use crate::events::EventKind;

/// Timestamp layout shown in the alert body.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Longest username and host shown in an alert, counted in characters.
///
/// Even if every kept character escapes to a five-character entity, the
/// rendered text stays under Telegram's 1024-character caption limit.
const MAX_FIELD_CHARS: usize = 64;

/// A rendered alert, ready to be sent as message text or photo caption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    kind: EventKind,
    text: String,
}

impl AlertMessage {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for AlertMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build the alert body for one event.
pub fn compose<Tz>(
    username: &str,
    kind: EventKind,
    host: &str,
    timestamp: &DateTime<Tz>,
) -> AlertMessage
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let marker = kind.marker();
    let text = format!(
        "{marker} <b>SECURITY ALERT</b> {marker}\n\
         \n\
         🖥️ <b>System:</b> {host}\n\
         👤 <b>User:</b> {user}\n\
         🔐 <b>Event:</b> {label}\n\
         🕐 <b>Time:</b> {time}\n\
         \n\
         <i>Automated Security Notification</i>",
        host = escape_html(&shorten(host, MAX_FIELD_CHARS)),
        user = escape_html(&shorten(username, MAX_FIELD_CHARS)),
        label = kind.label(),
        time = timestamp.format(TIMESTAMP_FORMAT),
    );
    AlertMessage { kind, text }
}

/// Cut `raw` to at most `max` characters, marking the cut with an ellipsis.
fn shorten(raw: &str, max: usize) -> Cow<'_, str> {
    if raw.chars().count() <= max {
        return Cow::Borrowed(raw);
    }
    let kept: String = raw.chars().take(max.saturating_sub(1)).collect();
    Cow::Owned(format!("{kept}…"))
}

/// Escape the characters Telegram's HTML mode treats as markup.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
