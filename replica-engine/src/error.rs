//! Error types for the copy engine.

use thiserror::Error;

/// Result type for copy operations.
pub type CopyResult<T> = Result<T, CopyError>;

/// Errors that abort a deep copy.
///
/// Any failure discards the partially built copy.
#[derive(Debug, Error)]
pub enum CopyError {
    /// The default construction path of a record type is unavailable.
    #[error("cannot construct {type_name}: {reason}")]
    Construction { type_name: String, reason: String },

    /// A field could not be read from the original or written to the copy.
    #[error("cannot access field `{field}` of {type_name}: {reason}")]
    FieldAccess {
        type_name: String,
        field: String,
        reason: String,
    },

    /// An array slot received a value its element type does not accept.
    #[error("array of {expected} cannot hold {found} at index {index}")]
    ElementType {
        expected: String,
        found: String,
        index: usize,
    },

    /// The value belongs to no copyable category.
    #[error("values of type {0} cannot be copied")]
    Unsupported(String),

    /// A reference cycle was reached while shared structure tracking is off.
    #[error("reference cycle through {0}")]
    Cycle(String),

    /// Nesting went deeper than the configured limit.
    #[error("graph nesting exceeds the depth limit of {0}")]
    DepthExceeded(usize),

    /// Copy options could not be parsed.
    #[error("invalid copy options: {0}")]
    Config(#[from] toml::de::Error),

    /// The value model rejected an operation.
    #[error("value model error: {0}")]
    Model(#[from] replica_types::Error),
}
