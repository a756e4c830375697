//! Transformation errors.
//!
//! Every semantic violation aborts the whole transformation; there is no
//! partial program and no warning level.

use thiserror::Error;

use crate::types::Type;

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Errors that can occur while transforming a syntax tree into IR.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// A variable was read or assigned without being declared in any
    /// enclosing scope.
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    /// A call names a function with no registered overloads.
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    /// The callee exists but none of its overloads takes exactly the
    /// argument types supplied.
    #[error(
        "no overload of '{name}' matches {requested}; candidates: {}",
        .candidates.join(", ")
    )]
    NoMatchingOverload {
        name: String,
        requested: String,
        candidates: Vec<String>,
    },

    /// Declared and inferred types disagree.
    #[error("type mismatch in {context}: expected {expected}, found {actual}")]
    TypeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    /// No operator matches the operand types, even after the non-strict
    /// fallback.
    #[error("invalid operation '{signature}'")]
    InvalidOperation { signature: String },

    /// A swizzle component that does not exist on the vector type.
    #[error("invalid component '{component}' for {ty}")]
    InvalidVectorComponent { ty: Type, component: String },

    /// The tree has the wrong shape for its position (a non-comparison used
    /// as a condition, a binary operator with three operands, ...).
    #[error("structural error: {0}")]
    Structural(String),
}

/// Category of a [`TransformError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformErrorKind {
    UnknownVariable,
    UnknownFunction,
    NoMatchingOverload,
    TypeMismatch,
    InvalidOperation,
    InvalidVectorComponent,
    Structural,
}

impl TransformError {
    pub fn kind(&self) -> TransformErrorKind {
        match self {
            TransformError::UnknownVariable { .. } => TransformErrorKind::UnknownVariable,
            TransformError::UnknownFunction { .. } => TransformErrorKind::UnknownFunction,
            TransformError::NoMatchingOverload { .. } => TransformErrorKind::NoMatchingOverload,
            TransformError::TypeMismatch { .. } => TransformErrorKind::TypeMismatch,
            TransformError::InvalidOperation { .. } => TransformErrorKind::InvalidOperation,
            TransformError::InvalidVectorComponent { .. } => {
                TransformErrorKind::InvalidVectorComponent
            }
            TransformError::Structural(_) => TransformErrorKind::Structural,
        }
    }

    pub(crate) fn unknown_variable(name: &str) -> Self {
        TransformError::UnknownVariable {
            name: name.to_string(),
        }
    }

    pub(crate) fn mismatch(
        context: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        TransformError::TypeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub(crate) fn structural(message: impl Into<String>) -> Self {
        TransformError::Structural(message.into())
    }
}
