//! Error types for LexForge.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every LexForge crate.
///
/// Variants follow the failure classes the wizard distinguishes: transport
/// and backend failures are surfaced to the caller, disabled actions and
/// validation gaps are reported without side effects, and a failed security
/// check during draft migration is kept apart from ordinary errors because it
/// blocks automatic recovery of the draft.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LexforgeError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// An action was requested while its preconditions do not hold
    #[error("Action disabled: {0}")]
    ActionDisabled(String),

    /// User input rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// The backend refused to hand an anonymous draft over to the signed-in user
    #[error("Security check failed for draft '{draft_id}': {message}")]
    SecurityCheckFailed { draft_id: String, message: String },

    /// A lifecycle transition that the current contract state does not allow
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// An import file that is not a JSON contract export
    #[error("Invalid import: {0}")]
    InvalidImport(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LexforgeError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Backend error
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    /// Creates an ActionDisabled error
    pub fn action_disabled(message: impl Into<String>) -> Self {
        Self::ActionDisabled(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a SecurityCheckFailed error
    pub fn security_check_failed(draft_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SecurityCheckFailed {
            draft_id: draft_id.into(),
            message: message.into(),
        }
    }

    /// Creates an InvalidTransition error
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::InvalidTransition(message.into())
    }

    /// Creates an InvalidImport error
    pub fn invalid_import(message: impl Into<String>) -> Self {
        Self::InvalidImport(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a Migration error
    pub fn migration(message: impl Into<String>) -> Self {
        Self::Migration(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
            || matches!(self, Self::Backend { status: 404, .. })
    }

    /// Check if this is a security check failure
    pub fn is_security_failure(&self) -> bool {
        matches!(self, Self::SecurityCheckFailed { .. })
    }

    /// Check if this is an ActionDisabled error
    pub fn is_action_disabled(&self) -> bool {
        matches!(self, Self::ActionDisabled(_))
    }

    /// Check if the failure came from the transport or the backend
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Backend { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for LexforgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LexforgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LexforgeError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for LexforgeError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for LexforgeError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::EntityNotFound(id) => Self::not_found("entity", id),
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// Conversion from String (for error messages)
impl From<String> for LexforgeError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, LexforgeError>`.
pub type Result<T> = std::result::Result<T, LexforgeError>;
