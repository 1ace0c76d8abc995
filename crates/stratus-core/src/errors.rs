//! Unified error system for Stratus core
//!
//! A single error type shared by the pure components and the effect
//! interfaces. Poll fetch errors are carried generically by the poller and
//! do not need to be `StratusError`.

use serde::{Deserialize, Serialize};

/// Unified error type for all Stratus operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StratusError {
    /// Malformed address or CIDR text
    #[error("Parse error: {message}")]
    Parse {
        /// What could not be parsed, and why
        message: String,
    },

    /// A value parsed but violates a domain invariant
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the violated invariant
        message: String,
    },

    /// The resource query capability reported a failure
    #[error("Query failed: {message}")]
    Query {
        /// Error message from the query backend
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Permission denied by the query backend
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Error message describing the permission issue
        message: String,
    },

    /// Configuration could not be loaded or parsed
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl StratusError {
    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a query error
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for errors produced by local parsing or validation, as opposed
    /// to errors reported by an external collaborator.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Validation { .. })
    }

    /// The message without its category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Parse { message }
            | Self::Validation { message }
            | Self::Query { message }
            | Self::NotFound { message }
            | Self::PermissionDenied { message }
            | Self::Config { message }
            | Self::Internal { message } => message,
        }
    }
}

/// Standard Result type for Stratus operations
pub type Result<T> = std::result::Result<T, StratusError>;

impl From<std::io::Error> for StratusError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(err.to_string()),
            _ => Self::internal(err.to_string()),
        }
    }
}
