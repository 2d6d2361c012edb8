//! Error types for dbkit

use thiserror::Error;

/// Result type alias for dbkit operations
pub type DbiResult<T> = Result<T, DbiError>;

/// Error types raised while configuring builders.
///
/// Every builder-side variant is a configuration-time contract violation: it is
/// returned by the call that introduced the bad value, never deferred to
/// `build()` or execution.
#[derive(Debug, Error)]
pub enum DbiError {
    /// Column, table or constraint name is not a plain SQL identifier
    #[error("Invalid identifier: '{0}' must match ^[a-zA-Z_][a-zA-Z0-9_]*$")]
    InvalidIdentifier(String),

    /// Column type string was empty
    #[error("Column type cannot be empty (column '{column}')")]
    EmptyColumnType { column: String },

    /// Join keyword was not one of left/right/inner
    #[error("Unknown join type: '{0}'")]
    UnknownJoinType(String),

    /// A required definition field was empty
    #[error("{definition} requires a non-empty {field}")]
    MissingField {
        definition: &'static str,
        field: &'static str,
    },

    /// No working table was set before it was needed
    #[error("No table set on builder")]
    MissingTable,

    /// Two statement intents were requested on the same builder
    #[error("Cannot combine {requested} with {existing} on the same builder")]
    ConflictingIntent {
        existing: &'static str,
        requested: &'static str,
    },

    /// `build()` was called with nothing to render
    #[error("Nothing to build: no select list and no DDL intent")]
    EmptyBuild,

    /// Execution error reported by a `Model` implementation
    #[error("Execution error: {0}")]
    Execution(String),
}

impl DbiError {
    /// Create an invalid identifier error
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier(name.into())
    }

    /// Create a missing field error for a definition object
    pub fn missing_field(definition: &'static str, field: &'static str) -> Self {
        Self::MissingField { definition, field }
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Check if this is an invalid identifier error
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, Self::InvalidIdentifier(_))
    }

    /// Check if this is a conflicting intent error
    pub fn is_conflicting_intent(&self) -> bool {
        matches!(self, Self::ConflictingIntent { .. })
    }
}
