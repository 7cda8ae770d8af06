// vigil-config/src/validation.rs
//! Custom validation functions for configuration.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static RESOLUTION: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]{1,4}x[1-9][0-9]{1,4}$").ok());

/// Validate that the device list is non-empty and only holds absolute paths.
pub fn validate_device_list(devices: &[PathBuf]) -> Result<(), ValidationError> {
    if devices.is_empty() {
        return Err(ValidationError::new("no_capture_devices"));
    }
    if devices.iter().any(|d| !d.is_absolute()) {
        return Err(ValidationError::new("relative_device_path"));
    }
    Ok(())
}

/// Validate a capture resolution such as `640x480`.
pub fn validate_resolution(resolution: &str) -> Result<(), ValidationError> {
    let re = RESOLUTION
        .as_ref()
        .ok_or_else(|| ValidationError::new("invalid_regex"))?;
    if re.is_match(resolution) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_resolution"))
    }
}

/// Validate the capture tool name: a single program, no arguments smuggled in.
pub fn validate_tool(tool: &str) -> Result<(), ValidationError> {
    if tool.is_empty() || tool.chars().any(char::is_whitespace) {
        Err(ValidationError::new("invalid_capture_tool"))
    } else {
        Ok(())
    }
}
