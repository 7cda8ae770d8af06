//! vigil-capture
//!
//! Still-image evidence for login alerts. The camera capturer walks the
//! configured devices in priority order and shells out to a still-capture
//! utility (`fswebcam` by default) for the first one that is present.

pub mod camera;
pub mod error;
pub mod evidence;

pub use camera::CameraCapturer;
pub use error::CaptureError;
pub use evidence::{Evidence, EvidenceSource};
