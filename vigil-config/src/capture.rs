// vigil-config/src/capture.rs
//! Camera evidence capture configuration.
//!
//! Describes which video devices are tried (in priority order), how the
//! external still-capture utility is invoked and where the transient image
//! files live.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Evidence capture configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct CaptureConfig {
    /// Candidate camera devices, highest priority first.
    #[validate(custom(function = validation::validate_device_list))]
    #[serde(default = "default_devices")]
    pub devices: Vec<PathBuf>,

    /// Still-capture utility (looked up on `PATH` unless absolute).
    #[validate(custom(function = validation::validate_tool))]
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Requested image resolution, `<width>x<height>`.
    #[validate(custom(function = validation::validate_resolution))]
    #[serde(default = "default_resolution")]
    pub resolution: String,

    /// Upper bound for a single capture attempt (seconds).
    #[validate(range(min = 1, max = 60))]
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Directory for transient evidence files, created on demand.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Images of this size or smaller are treated as corrupt captures.
    #[validate(range(min = 1, max = 16777216))]
    #[serde(default = "default_min_size", deserialize_with = "deserialize_size")]
    pub min_size: u64,
}

impl CaptureConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_devices() -> Vec<PathBuf> {
    ["/dev/video0", "/dev/video1", "/dev/video2"]
        .into_iter()
        .map(PathBuf::from)
        .collect()
}

fn default_tool() -> String {
    "fswebcam".into()
}

fn default_resolution() -> String {
    "640x480".into()
}

fn default_timeout() -> u64 {
    5
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("/tmp/security-photos")
}

fn default_min_size() -> u64 {
    1024
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Num(u64),
    Str(String),
}

/// Accepts either a plain byte count or a human-friendly size such as `"1KiB"`.
fn deserialize_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match SizeValue::deserialize(deserializer)? {
        SizeValue::Num(n) => Ok(n),
        SizeValue::Str(s) => parse_size(&s).map_err(serde::de::Error::custom),
    }
}

fn parse_size(raw: &str) -> Result<u64, String> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);
    let number: f64 = number
        .parse()
        .map_err(|_| format!("invalid size '{raw}'"))?;
    let multiplier = match unit.trim().to_lowercase().as_str() {
        "" | "b" => 1.0,
        "kb" | "kib" | "k" => 1024.0,
        "mb" | "mib" | "m" => 1024.0 * 1024.0,
        other => return Err(format!("unknown size unit '{other}'")),
    };
    Ok((number * multiplier) as u64)
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            devices: default_devices(),
            tool: default_tool(),
            resolution: default_resolution(),
            timeout_secs: default_timeout(),
            scratch_dir: default_scratch_dir(),
            min_size: default_min_size(),
        }
    }
}
