//! Host identity shown in alerts.

use sysinfo::System;
use tracing::warn;

pub const UNKNOWN_HOST: &str = "unknown-host";

/// The node name of this machine, or [`UNKNOWN_HOST`] when the OS does not
/// report one.
pub fn host_identity() -> String {
    match System::host_name().filter(|name| !name.trim().is_empty()) {
        Some(name) => name.trim().to_string(),
        None => {
            warn!("Host name unavailable, using '{UNKNOWN_HOST}'");
            UNKNOWN_HOST.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_never_blank() {
        let host = host_identity();
        assert!(!host.is_empty());
        assert_eq!(host, host.trim());
    }
}
