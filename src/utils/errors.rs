use std::path::PathBuf;
use thiserror::Error;

/// Raised when the static inputs of a resolution are missing or malformed.
///
/// Resolution either fully succeeds or fails with one of these before any
/// plugin descriptor is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Configuration error: required input `{field}` is missing")]
    Missing { field: &'static str },

    #[error("Configuration error: `{field}` is malformed: {reason}")]
    Malformed { field: &'static str, reason: String },

    #[error("Configuration error: `{field}` at {} is unreadable: {reason}", .path.display())]
    Unreadable {
        field: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Configuration error: {0}")]
    Invalid(String),
}

impl ConfigurationError {
    pub fn missing(field: &'static str) -> Self {
        Self::Missing { field }
    }

    pub fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field,
            reason: reason.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Name of the offending input, when the error is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing { field }
            | Self::Malformed { field, .. }
            | Self::Unreadable { field, .. } => Some(*field),
            Self::Invalid(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

impl From<serde_json::Error> for ConfigurationError {
    fn from(err: serde_json::Error) -> Self {
        ConfigurationError::invalid(format!("JSON error: {}", err))
    }
}
