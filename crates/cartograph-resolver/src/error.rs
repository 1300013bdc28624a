use cartograph_spec::ModelError;
use thiserror::Error;

/// Errors produced while resolving a `$ref` (E3001–E3006).
///
/// A target that cannot be built into its typed object surfaces as
/// [`ResolveError::Model`] under the model error's own code (E2001–E2004).
///
/// Path-carrying variants hold both the reference being resolved and the
/// portion of its pointer walked up to and including the failing segment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// E3001: The reference is malformed, or a local-only step got a
    /// non-local reference.
    #[error("E3001: invalid reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// E3002: A `$ref` chain came back to a reference already being resolved.
    #[error("E3002: circular reference detected: {chain}")]
    Circular { chain: String },

    /// E3003: The reference points into another document.
    #[error("E3003: external references are not supported: {0}")]
    UnsupportedExternal(String),

    /// E3004: A mapping along the pointer lacks the next key.
    #[error("E3004: reference path not found: {reference} (failed at {traversed})")]
    PathNotFound { reference: String, traversed: String },

    /// E3005: A list segment is not a number or is out of bounds.
    #[error("E3005: invalid array index in reference: {reference} (failed at {traversed})")]
    InvalidArrayIndex { reference: String, traversed: String },

    /// E3006: The pointer continues past a scalar.
    #[error("E3006: cannot navigate through non-mapping/list value: {reference} (failed at {traversed})")]
    CannotNavigate { reference: String, traversed: String },

    /// The target was found but could not be built into its typed object.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ResolveError {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::InvalidReference { .. } => "E3001",
            ResolveError::Circular { .. } => "E3002",
            ResolveError::UnsupportedExternal(_) => "E3003",
            ResolveError::PathNotFound { .. } => "E3004",
            ResolveError::InvalidArrayIndex { .. } => "E3005",
            ResolveError::CannotNavigate { .. } => "E3006",
            ResolveError::Model(e) => e.code(),
        }
    }

    pub fn is_circular(&self) -> bool {
        matches!(self, ResolveError::Circular { .. })
    }
}
