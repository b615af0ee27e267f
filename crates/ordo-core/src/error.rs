//! Error types for ORDO collections

use thiserror::Error;

/// Core ORDO errors
///
/// Every failure is non-mutating: an action that returns one of these has
/// not built or committed a partial sequence.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrdoError {
    // Record errors
    #[error("Identifier \"{field}\" is not present in record at position {position}")]
    MissingIdentifier { field: String, position: usize },

    #[error("Identifier {0} already exists and no duplicate handler was supplied")]
    DuplicateIdentifier(String),

    // Locator errors
    #[error("Locator not found: {0}")]
    LocatorNotFound(String),

    #[error("Attempted to move record at position {index} onto itself")]
    InvalidMove { index: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl OrdoError {
    pub fn missing_identifier(field: &str, position: usize) -> Self {
        OrdoError::MissingIdentifier {
            field: field.to_string(),
            position,
        }
    }

    pub fn duplicate<K: std::fmt::Debug>(key: &K) -> Self {
        OrdoError::DuplicateIdentifier(format!("{key:?}"))
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        OrdoError::LocatorNotFound(what.to_string())
    }
}

/// Result type for ORDO operations
pub type OrdoResult<T> = Result<T, OrdoError>;
