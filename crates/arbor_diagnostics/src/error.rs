//! Error type shared by the node model, the renderer and the inspector.

use thiserror::Error;

/// Failure kinds surfaced by diagnostics operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiagnosticsError {
    /// Malformed input, e.g. a node name ending in `:`.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown or already-disposed reference id.
    #[error("id does not exist: {id}")]
    NotFound { id: String },

    /// Operation not valid in the current state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Capability not implemented by this node kind.
    #[error("{operation} is not supported by {kind}")]
    Unsupported {
        operation: &'static str,
        kind: &'static str,
    },
}

impl DiagnosticsError {
    pub fn not_found(id: impl Into<String>) -> Self {
        DiagnosticsError::NotFound { id: id.into() }
    }
}

/// Result alias for diagnostics operations.
pub type DiagnosticsResult<T> = Result<T, DiagnosticsError>;
