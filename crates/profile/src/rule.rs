//! Validation rules and their evaluation.

use verdict_expression::{CoercionMode, Evaluator, ExpressionResult, Value};

/// One validation rule: a condition that, when true, raises a message.
///
/// The serialized field names follow the rule-document format: `if` for
/// the condition and `raise` for the message. `strict_type_check` is
/// the legacy spelling of the default strict mode and is kept for
/// document compatibility; `type_check_mode` supersedes it.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct Rule {
    #[serde(rename = "if")]
    pub condition: String,

    #[serde(rename = "raise", default)]
    pub message: String,

    #[serde(default)]
    pub strict_type_check: bool,

    #[serde(default)]
    pub type_check_mode: Option<CoercionMode>,
}

impl Rule {
    pub fn new(condition: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            message: message.into(),
            strict_type_check: false,
            type_check_mode: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: CoercionMode) -> Self {
        self.type_check_mode = Some(mode);
        self
    }

    /// The coercion mode this rule evaluates under when no caller
    /// override is given. `strict_type_check` and an absent
    /// `type_check_mode` both mean strict.
    #[must_use]
    pub fn mode(&self) -> CoercionMode {
        self.type_check_mode.unwrap_or_default()
    }
}

/// Evaluates a rule's condition against a payload.
///
/// A blank condition never triggers and reports `true` without touching
/// the evaluator, matching the invariant that incomplete rules are
/// inert. `mode_override` takes precedence over the rule's own mode.
pub fn evaluate_rule(
    evaluator: &Evaluator,
    rule: &Rule,
    payload: &Value,
    mode_override: Option<CoercionMode>,
) -> ExpressionResult<bool> {
    if rule.condition.trim().is_empty() {
        tracing::debug!("blank rule condition, reporting true");
        return Ok(true);
    }
    let mode = mode_override.unwrap_or_else(|| rule.mode());
    evaluator.evaluate(&rule.condition, payload, mode)
}
