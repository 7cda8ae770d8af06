//! Error types for configuration loading and validation

use std::path::PathBuf;
use thiserror::Error;
use validator::ValidationErrors;

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file exists but could not be read or decoded (bad JSON, wrong types).
    #[error("cannot parse configuration {}: {source}", path.display())]
    Parsing {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },

    /// Values were decoded but failed validation.
    #[error("invalid configuration: {}", format_validation_errors(.0))]
    Validation(#[source] ValidationErrors),
}

/// Flattens nested validation errors into a single log-friendly line,
/// e.g. `capture.resolution: invalid_resolution; delivery.api_base: url`.
fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut entries = Vec::new();
    collect_validation_errors("", errors, &mut entries);
    entries.sort();
    entries.join("; ")
}

fn collect_validation_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(msg) => msg.to_string(),
                        None => error.code.to_string(),
                    };
                    out.push(format!("{path}: {message}"));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_validation_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_errors(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ConfigError {
    fn from(errors: ValidationErrors) -> Self {
        ConfigError::Validation(errors)
    }
}
