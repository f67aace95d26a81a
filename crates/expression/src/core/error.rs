//! Error types for expression evaluation.
//!
//! Each subsystem has its own narrow error enum; [`ExpressionError`]
//! is the coarse wrapper callers see, carrying the original cause so
//! the evaluation surface stays stable as internals change.

/// Result alias used throughout the crate.
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Errors from dotted-path resolution through a payload.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    /// A segment named a key the current mapping does not have.
    #[error("Missing key in expression: {path}")]
    MissingKey {
        /// The full dotted path being resolved.
        path: String,
    },

    /// A segment tried to descend into a non-mapping value.
    #[error("Cannot descend into non-mapping value at segment '{segment}' of path '{path}'")]
    NotAMapping {
        /// The segment that could not be applied.
        segment: String,
        /// The full dotted path being resolved.
        path: String,
    },

    /// An intermediate segment resolved to null; only the final
    /// segment may legitimately be null.
    #[error("Null value at intermediate segment '{segment}' of path '{path}'")]
    NullIntermediate {
        /// The segment whose value was null.
        segment: String,
        /// The full dotted path being resolved.
        path: String,
    },
}

/// Errors from operator resolution.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OperatorError {
    /// The token is not a supported comparison operator, even after
    /// alias normalization.
    #[error(
        "Unsupported operator '{original}' (normalized: '{normalized}') — allowed operators: {allowed}"
    )]
    Unsupported {
        /// The token as written in the expression.
        original: String,
        /// The token after alias normalization.
        normalized: String,
        /// The supported operator set, for the error message.
        allowed: &'static str,
    },
}

/// Errors from relaxed-mode pairwise coercion.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoercionError {
    /// Coercion across an unresolved symbolic reference is refused.
    #[error("Cannot coerce unresolved reference: {0}")]
    UnresolvedReference(String),

    /// A value that passed the numeric pre-check still failed to cast
    /// to the target variant (e.g. a float-formed string to integer).
    #[error("Cannot coerce '{value}' to {target}")]
    CastFailed {
        /// The offending value, rendered.
        value: String,
        /// The target type name.
        target: &'static str,
    },
}

/// The single error surface of expression evaluation.
///
/// Every internal failure is wrapped into one of these variants; the
/// profile layer adds positional context on top.
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    /// The expression did not split into `lhs operator rhs`.
    #[error("Unsupported expression format: '{0}'")]
    Format(String),

    /// The operator token is unsupported.
    #[error(transparent)]
    Operator(#[from] OperatorError),

    /// Path resolution failed (strict mode only; relaxed degrades).
    #[error(transparent)]
    Path(#[from] PathError),

    /// Strict mode could not treat the rhs token as a literal.
    #[error("Invalid RHS literal: '{0}'")]
    InvalidRhs(String),

    /// Strict comparison across differing runtime types.
    #[error("Incompatible types: {left} vs {right}")]
    TypeMismatch {
        /// Type name of the resolved lhs.
        left: &'static str,
        /// Type name of the resolved rhs.
        right: &'static str,
    },

    /// Relaxed-mode coercion failed in a non-degradable way.
    #[error("Type coercion failed in relaxed mode: {0}")]
    Coercion(#[from] CoercionError),

    /// The final comparison itself failed (unorderable operands,
    /// invalid regex, unsupported membership container).
    #[error("Comparison failed: {0}")]
    Comparison(String),
}
