//! Comparison operator registry.
//!
//! A closed enum of operator kinds plus a fixed alias table for the
//! malformed variants that show up in hand-written rule documents
//! (`===`, `>>` and friends). Resolution normalizes first, then maps to
//! a kind; the comparison semantics themselves live in the evaluator so
//! the regex cache is at hand.

use std::fmt;

use crate::core::OperatorError;

/// The supported comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Membership in a list, string, or mapping keys.
    In,
    /// Negated membership.
    NotIn,
    /// Full regex match; the pattern operand must be a string.
    Matches,
}

/// Malformed operator spellings and their canonical forms.
///
/// The arithmetic entries normalize to tokens that remain unsupported;
/// they exist so the resulting error names the canonical form.
const ALIASES: &[(&str, &str)] = &[
    ("===", "=="),
    ("!==", "!="),
    (">>", ">"),
    ("<<", "<"),
    (">==", ">="),
    ("<==", "<="),
    ("++", "+"),
    ("--", "-"),
    ("%%", "%"),
];

/// The supported operator set, for error messages.
pub const SUPPORTED_OPERATORS: &str = "==, !=, <, <=, >, >=, in, not in, matches";

/// Maps known malformed variants to canonical tokens; unknown tokens
/// pass through trimmed.
#[must_use]
pub fn normalize_operator(token: &str) -> &str {
    let trimmed = token.trim();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map_or(trimmed, |(_, canonical)| canonical)
}

impl Operator {
    /// Resolves a token to an operator kind, normalizing aliases first.
    ///
    /// Failure names both the original and normalized forms so a rule
    /// author can see what their `>==` was read as.
    pub fn resolve(token: &str) -> Result<Self, OperatorError> {
        let normalized = normalize_operator(token);
        match normalized {
            "==" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "in" => Ok(Self::In),
            "not in" | "not_in" => Ok(Self::NotIn),
            "matches" => Ok(Self::Matches),
            _ => Err(OperatorError::Unsupported {
                original: token.trim().to_string(),
                normalized: normalized.to_string(),
                allowed: SUPPORTED_OPERATORS,
            }),
        }
    }

    /// The canonical token for this operator.
    #[must_use]
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Matches => "matches",
        }
    }

    /// True for `<`, `<=`, `>`, `>=`.
    #[must_use]
    pub const fn is_ordering(&self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
