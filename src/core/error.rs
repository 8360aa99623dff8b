//! Error types for the core module.

use super::template::TemplateError;

/// Core error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Template could not be parsed or rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Version string or release file is malformed.
    #[error("invalid version: {0}")]
    InvalidVersion(String),

    /// Build number variable is set but not a non-negative integer.
    #[error("invalid build number in ${var}: {value:?}")]
    InvalidBuildNumber {
        /// Environment variable that was read.
        var: String,
        /// Offending value.
        value: String,
    },

    /// Namespace cannot be emitted as an identifier.
    #[error("invalid namespace: {0:?}")]
    InvalidNamespace(String),

    /// Project name cannot be embedded in a comment.
    #[error("invalid project name: {0:?}")]
    InvalidProject(String),

    /// C++ version type or include cannot be emitted.
    #[error("invalid C++ option {name}: {value:?}")]
    InvalidCppOption {
        /// Option name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// Commit hash cannot be embedded in a string literal.
    #[error("invalid commit hash: {0:?}")]
    InvalidHash(String),

    /// Git probing failed.
    #[error("git error: {0}")]
    Git(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
