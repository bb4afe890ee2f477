//! Error types for Townsfolk.

use std::path::PathBuf;

use thiserror::Error;

use crate::ids::ScriptId;

/// Top-level error type for Townsfolk operations.
///
/// Only construction and content loading can fail. Once an NPC is running,
/// every failure path resolves to a behavioral fallback instead.
#[derive(Debug, Error)]
pub enum TownsfolkError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Content file with an extension no loader understands
    #[error("Unsupported content format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Errors in NPC configuration data, detected at load or construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No profile was supplied for an NPC
    #[error("NPC profile is missing")]
    MissingProfile,

    /// A referenced dialogue script does not exist
    #[error("Dialogue script not found: {0}")]
    MissingScript(ScriptId),

    /// A patrol route has no waypoints
    #[error("Waypoint route is empty")]
    EmptyRoute,

    /// A dialogue script has no lines
    #[error("Dialogue script '{0}' has no lines")]
    EmptyScript(ScriptId),

    /// A profile field holds an unusable value
    #[error("Invalid profile field '{field}': {reason}")]
    InvalidProfile {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type alias for Townsfolk operations.
pub type TownsfolkResult<T> = Result<T, TownsfolkError>;
