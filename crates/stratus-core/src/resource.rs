//! Compute resource identity and lifecycle state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque provider identifier for a compute resource (e.g. `i-0abc123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(String);

impl ResourceId {
    /// Wrap a provider identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Lifecycle state of an instance.
///
/// Decoded from the provider's numeric state code. Only the low byte is
/// significant; the high byte is reserved for provider-internal use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceState {
    /// Code 0
    Pending,
    /// Code 16
    Running,
    /// Code 32
    ShuttingDown,
    /// Code 48
    Terminated,
    /// Code 64
    Stopping,
    /// Code 80
    Stopped,
    /// Any other code
    Unknown(u8),
}

impl ResourceState {
    /// Decode a provider state code.
    pub fn from_code(code: u16) -> Self {
        match (code & 0xFF) as u8 {
            0 => Self::Pending,
            16 => Self::Running,
            32 => Self::ShuttingDown,
            48 => Self::Terminated,
            64 => Self::Stopping,
            80 => Self::Stopped,
            other => Self::Unknown(other),
        }
    }

    /// Encode back to the provider state code.
    pub fn code(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Running => 16,
            Self::ShuttingDown => 32,
            Self::Terminated => 48,
            Self::Stopping => 64,
            Self::Stopped => 80,
            Self::Unknown(code) => *code,
        }
    }

    /// True for states an instance stays in without further action.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Running | Self::Stopped | Self::Terminated)
    }
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::ShuttingDown => write!(f, "shutting-down"),
            Self::Terminated => write!(f, "terminated"),
            Self::Stopping => write!(f, "stopping"),
            Self::Stopped => write!(f, "stopped"),
            Self::Unknown(code) => write!(f, "unknown({code})"),
        }
    }
}
