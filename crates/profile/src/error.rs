//! Error types for profile loading and enforcement.

use verdict_expression::ExpressionError;

/// Errors raised while loading a rule document from disk.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document could not be read. The OS error text is preserved
    /// so callers see the familiar "No such file or directory".
    #[error("Failed to load profile at '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML.
    #[error("Failed to load profile at '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but does not have the expected shape.
    #[error("Invalid rule structure: {0}")]
    Structure(String),
}

/// Errors raised while enforcing a profile against a payload.
///
/// A [`Violation`](ProfileError::Violation) is the expected outcome of
/// a triggering rule; [`Evaluation`](ProfileError::Evaluation) means
/// the rule itself is broken. Both carry the rule's position so the
/// offending entry can be found in the document.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// A rule's condition evaluated to true against the payload.
    #[error("[Rule {index}] {message}")]
    Violation { index: usize, message: String },

    /// A rule's condition could not be evaluated at all.
    #[error("[Rule {index}] {message} — Evaluation error for '{condition}': {source}")]
    Evaluation {
        index: usize,
        message: String,
        condition: String,
        #[source]
        source: ExpressionError,
    },
}
