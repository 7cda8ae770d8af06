//! # vigil-core
//!
//! Domain types shared by the alert pipeline: the login event classification,
//! the rendered alert message, host identity, the prioritized candidate
//! selection used for evidence sources, and the pipeline state machine.
//!
//! ### Key Submodules:
//! - `events`: `EventKind`, parsed leniently from the caller's argument
//! - `message`: Telegram HTML alert composition
//! - `host`: host identity lookup
//! - `select`: first-responsive-candidate selection
//! - `state`: `PipelineState` transitions

pub mod events;
pub mod host;
pub mod message;
pub mod select;
pub mod state;

pub use events::EventKind;
pub use message::{compose, AlertMessage};
pub use state::PipelineState;
