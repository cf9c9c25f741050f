//! Error types for ATA.
//!
//! SQL generation itself never fails; these only come out of loading and
//! checking configuration.

use thiserror::Error;

/// The main error type for ATA operations.
#[derive(Debug, Error)]
pub enum AtaError {
    /// A configuration value is out of range or not an identifier.
    #[error("Invalid value for '{key}': '{value}'")]
    InvalidValue { key: &'static str, value: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl AtaError {
    /// Create an invalid value error.
    pub fn invalid(key: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
        }
    }
}

/// Result type alias for ATA operations.
pub type AtaResult<T> = Result<T, AtaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AtaError::invalid("default_limit", "0");
        assert_eq!(err.to_string(), "Invalid value for 'default_limit': '0'");
    }
}
