//! Error types for loading tuning and level data.
//!
//! The simulation itself never fails: it only consumes trusted level data.
//! These errors cover the one place untrusted text enters the crate, which is
//! JSON supplied by a level designer or a settings file.

use std::fmt;

/// Errors that can occur while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    Parse(serde_json::Error),
    /// A value parsed correctly but lies outside its usable range.
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },
    /// A level set contained no levels.
    EmptyLevelSet,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Failed to parse config JSON: {}", e),
            ConfigError::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "{} = {} is out of range (expected {})", field, value, expected),
            ConfigError::EmptyLevelSet => write!(f, "Level set must contain at least one level"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}
