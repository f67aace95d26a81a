//! Profile enforcement: evaluate rules in order, halt on the first
//! trigger.

use std::path::{Path, PathBuf};

use verdict_expression::{Evaluator, Value};

use crate::error::ProfileError;
use crate::loader::load_rule_document;
use crate::rule::{evaluate_rule, Rule};

/// Where the rules come from: a document on disk or a materialized
/// list.
#[derive(Debug, Clone)]
pub enum ProfileSource {
    Document(PathBuf),
    Rules(Vec<Rule>),
}

impl From<PathBuf> for ProfileSource {
    fn from(path: PathBuf) -> Self {
        Self::Document(path)
    }
}

impl From<&Path> for ProfileSource {
    fn from(path: &Path) -> Self {
        Self::Document(path.to_path_buf())
    }
}

impl From<&str> for ProfileSource {
    fn from(path: &str) -> Self {
        Self::Document(PathBuf::from(path))
    }
}

impl From<Vec<Rule>> for ProfileSource {
    fn from(rules: Vec<Rule>) -> Self {
        Self::Rules(rules)
    }
}

/// Enforces validation profiles against payloads.
///
/// Owns the expression evaluator (and with it the compiled-regex
/// cache), so one enforcer should be reused across payloads.
#[derive(Debug, Default)]
pub struct ProfileEnforcer {
    evaluator: Evaluator,
}

impl ProfileEnforcer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates every rule in order against the payload.
    ///
    /// Rules with blank conditions are skipped. The first rule whose
    /// condition holds ends enforcement with
    /// [`ProfileError::Violation`]; a rule that cannot be evaluated
    /// ends it with [`ProfileError::Evaluation`]. Later rules are
    /// never inspected after a failure.
    pub fn enforce(
        &self,
        source: impl Into<ProfileSource>,
        payload: &Value,
    ) -> Result<(), ProfileError> {
        let rules = match source.into() {
            ProfileSource::Document(path) => load_rule_document(&path)?,
            ProfileSource::Rules(rules) => rules,
        };
        tracing::debug!(rule_count = rules.len(), "enforcing profile");

        for (index, rule) in rules.iter().enumerate() {
            if rule.condition.trim().is_empty() {
                tracing::debug!(index, "skipping rule with blank condition");
                continue;
            }
            let message = if rule.message.is_empty() {
                format!("Rule {index} failed")
            } else {
                rule.message.clone()
            };

            let triggered = evaluate_rule(&self.evaluator, rule, payload, None).map_err(
                |source| ProfileError::Evaluation {
                    index,
                    message: message.clone(),
                    condition: rule.condition.clone(),
                    source,
                },
            )?;

            if triggered {
                tracing::debug!(index, condition = %rule.condition, "rule triggered");
                return Err(ProfileError::Violation { index, message });
            }
        }
        Ok(())
    }
}

/// One-shot enforcement with a fresh enforcer.
pub fn enforce_profile(
    source: impl Into<ProfileSource>,
    payload: &Value,
) -> Result<(), ProfileError> {
    ProfileEnforcer::new().enforce(source, payload)
}
