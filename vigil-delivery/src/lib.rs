//! # Vigil Delivery
//!
//! Talks to the Telegram bot API: a short reachability probe and a
//! single-attempt sender that posts either a photo with caption or a plain
//! HTML message.

pub mod error;
pub mod probe;
pub mod telegram;

pub use error::{DeliveryError, ProbeError};
pub use probe::{ConnectivityProbe, HttpProbe};
pub use telegram::{AlertSender, DeliveryMode, TelegramClient};
