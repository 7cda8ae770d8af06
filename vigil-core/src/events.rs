//! ## vigil-core::events
//! **Login event classification**
//!
//! The caller passes the event kind as a free-form string. Parsing never
//! fails: anything that is not a known kind becomes [`EventKind::Other`].

use std::fmt;
use std::str::FromStr;

/// Closed classification of the condition that triggered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Success,
    Failed,
    Startup,
    Other,
}

impl EventKind {
    /// Case-insensitive, whitespace-tolerant parse.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => EventKind::Success,
            "FAILED" => EventKind::Failed,
            "STARTUP" => EventKind::Startup,
            _ => EventKind::Other,
        }
    }

    /// Canonical upper-case spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Success => "SUCCESS",
            EventKind::Failed => "FAILED",
            EventKind::Startup => "STARTUP",
            EventKind::Other => "OTHER",
        }
    }

    /// Status line shown in the alert.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Success => "LOGIN SUCCESS",
            EventKind::Failed => "LOGIN FAILED",
            EventKind::Startup => "SYSTEM STARTED",
            EventKind::Other => "UNKNOWN EVENT",
        }
    }

    /// Decorative marker framing the alert header.
    pub fn marker(&self) -> &'static str {
        match self {
            EventKind::Success => "✅",
            EventKind::Failed => "🚨",
            EventKind::Startup => "🟢",
            EventKind::Other => "⚠️",
        }
    }

    /// Only login attempts justify touching the camera.
    pub fn wants_evidence(&self) -> bool {
        matches!(self, EventKind::Success | EventKind::Failed)
    }
}

impl FromStr for EventKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EventKind::parse(s))
    }
}

impl From<&str> for EventKind {
    fn from(raw: &str) -> Self {
        EventKind::parse(raw)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
