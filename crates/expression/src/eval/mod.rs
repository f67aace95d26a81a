//! Expression evaluation against nested payloads.
//!
//! An expression is three whitespace-separated tokens, `lhs operator
//! rhs`, where the lhs is a dotted payload path and the rhs is a
//! literal (or, in relaxed mode, a second payload path). The evaluator
//! owns a compiled-regex cache for the `matches` operator, so one
//! instance should be reused across rules.

use std::cmp::Ordering;
use std::collections::HashMap;

use parking_lot::Mutex;
use regex::Regex;

use crate::coerce::{
    coerce_numeric, coerce_string, coerce_types_for_comparison, is_unsafe_comparison_token,
    relaxed_equals, safe_float,
};
use crate::core::{ExpressionError, ExpressionResult, Value};
use crate::literal::{is_literal, is_symbolic_reference, parse_literal};
use crate::operator::Operator;
use crate::path::resolve_path;

/// Patterns longer than this are rejected before compilation.
const MAX_REGEX_PATTERN_LEN: usize = 1000;

/// The compiled-regex cache is cleared once it reaches this many
/// entries.
const MAX_REGEX_CACHE_SIZE: usize = 100;

/// How operand types are reconciled before comparison.
///
/// Strict requires identical runtime types and fails loudly; relaxed
/// coerces compatible forms and degrades to `false` when operands
/// cannot be reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoercionMode {
    #[default]
    Strict,
    Relaxed,
}

/// Evaluates `lhs operator rhs` expressions against a payload.
#[derive(Debug, Default)]
pub struct Evaluator {
    regex_cache: Mutex<HashMap<String, Regex>>,
}

impl Evaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluates a single expression against the payload.
    ///
    /// Empty payloads still allow literal-only expressions (`5 == 5`).
    /// Otherwise the lhs token is resolved as a dotted path; in strict
    /// mode resolution failures and type mismatches are errors, in
    /// relaxed mode unresolved operands degrade to null and the
    /// comparison degrades to `false` rather than failing.
    pub fn evaluate(
        &self,
        expression: &str,
        payload: &Value,
        mode: CoercionMode,
    ) -> ExpressionResult<bool> {
        let expression = expression.trim();
        tracing::debug!(expression, ?mode, "evaluating expression");

        let (lhs_token, op_token, rhs_token) = split_expression(expression)?;
        let operator = Operator::resolve(op_token)?;

        if payload_is_empty(payload) && is_literal(lhs_token) && is_literal(rhs_token) {
            let lhs = parse_literal(lhs_token);
            let rhs = parse_literal(rhs_token);
            tracing::debug!(%lhs, %operator, %rhs, "literal-only fast path");
            return self.apply_operator(operator, &lhs, &rhs);
        }

        let lhs = match resolve_path(payload, lhs_token) {
            Ok(value) => value.clone(),
            Err(err) if mode == CoercionMode::Relaxed => {
                tracing::debug!(path = lhs_token, %err, "lhs unresolved, degrading to null");
                Value::Null
            }
            Err(err) => return Err(err.into()),
        };

        let mut rhs_from_payload = false;
        let rhs = if is_symbolic_reference(rhs_token) {
            if mode == CoercionMode::Relaxed {
                match resolve_path(payload, rhs_token) {
                    Ok(value) => {
                        rhs_from_payload = true;
                        value.clone()
                    }
                    Err(err) => {
                        tracing::debug!(path = rhs_token, %err, "rhs unresolved, degrading to null");
                        Value::Null
                    }
                }
            } else {
                return Err(ExpressionError::InvalidRhs(rhs_token.to_string()));
            }
        } else {
            parse_literal(rhs_token)
        };

        match mode {
            CoercionMode::Relaxed => {
                if lhs.is_null()
                    || rhs.is_null()
                    || is_symbolic_reference(lhs_token)
                    || is_symbolic_reference(rhs_token)
                {
                    tracing::debug!("skipping coercion for unresolved or symbolic operand");
                    return Ok(self.relaxed_compare(operator, &lhs, &rhs));
                }
                // rhs_from_payload implies a symbolic rhs token, which
                // the shortcut above already returned on. The guard
                // stays: a value resolved live from the payload must
                // never be re-coerced through the literal rules.
                let (lhs, rhs) = if rhs_from_payload {
                    (lhs, rhs)
                } else {
                    coerce_types_for_comparison(&lhs, &rhs)?
                };
                Ok(self.relaxed_compare(operator, &lhs, &rhs))
            }
            CoercionMode::Strict => {
                if !lhs.same_type(&rhs) {
                    return Err(ExpressionError::TypeMismatch {
                        left: lhs.type_name(),
                        right: rhs.type_name(),
                    });
                }
                self.apply_operator(operator, &lhs, &rhs)
            }
        }
    }

    /// Strict comparison over type-checked operands.
    fn apply_operator(
        &self,
        operator: Operator,
        lhs: &Value,
        rhs: &Value,
    ) -> ExpressionResult<bool> {
        match operator {
            Operator::Eq => Ok(lhs == rhs),
            Operator::Ne => Ok(lhs != rhs),
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
                let ordering = order_values(lhs, rhs)?;
                Ok(ordering_holds(operator, ordering))
            }
            Operator::In => strict_membership(lhs, rhs),
            Operator::NotIn => strict_membership(lhs, rhs).map(|held| !held),
            Operator::Matches => {
                let Value::Str(pattern) = rhs else {
                    return Err(ExpressionError::TypeMismatch {
                        left: "string",
                        right: rhs.type_name(),
                    });
                };
                self.regex_full_match(&coerce_string(lhs), pattern)
            }
        }
    }

    /// Relaxed comparison. Never fails: operands that cannot be
    /// reconciled for the operator compare as `false`.
    fn relaxed_compare(&self, operator: Operator, lhs: &Value, rhs: &Value) -> bool {
        if is_unsafe_comparison_token(lhs) || is_unsafe_comparison_token(rhs) {
            return false;
        }
        match operator {
            Operator::Eq => relaxed_equals(lhs, rhs),
            Operator::Ne => !relaxed_equals(lhs, rhs),
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => {
                if let (Some(l), Some(r)) = (coerce_numeric(lhs), coerce_numeric(rhs)) {
                    l.partial_cmp(&r)
                        .is_some_and(|ord| ordering_holds(operator, ord))
                } else if let (Value::Str(l), Value::Str(r)) = (lhs, rhs) {
                    ordering_holds(operator, l.trim().cmp(r.trim()))
                } else {
                    false
                }
            }
            Operator::In => relaxed_membership(lhs, rhs),
            Operator::NotIn => !relaxed_membership(lhs, rhs),
            Operator::Matches => match rhs {
                Value::Str(pattern) => self
                    .regex_full_match(&coerce_string(lhs), pattern)
                    .unwrap_or(false),
                _ => false,
            },
        }
    }

    /// Full-match regex test with an anchored, cached compilation.
    fn regex_full_match(&self, text: &str, pattern: &str) -> ExpressionResult<bool> {
        if pattern.len() > MAX_REGEX_PATTERN_LEN {
            return Err(ExpressionError::Comparison(format!(
                "regex pattern exceeds {MAX_REGEX_PATTERN_LEN} bytes"
            )));
        }

        let mut cache = self.regex_cache.lock();
        if let Some(re) = cache.get(pattern) {
            return Ok(re.is_match(text));
        }

        let anchored = format!("^(?:{pattern})$");
        let re = Regex::new(&anchored).map_err(|err| {
            ExpressionError::Comparison(format!("invalid regex '{pattern}': {err}"))
        })?;
        let matched = re.is_match(text);

        if cache.len() >= MAX_REGEX_CACHE_SIZE {
            cache.clear();
        }
        cache.insert(pattern.to_string(), re);
        Ok(matched)
    }
}

/// Splits an expression into `(lhs, operator, rhs)` tokens.
///
/// Exactly three whitespace-separated tokens, with one exception: four
/// tokens whose middle pair is `not in` collapse into the negated
/// membership operator.
fn split_expression(expression: &str) -> ExpressionResult<(&str, &str, &str)> {
    let parts: Vec<&str> = expression.split_whitespace().collect();
    match parts.as_slice() {
        [lhs, op, rhs] => Ok((*lhs, *op, *rhs)),
        [lhs, "not", "in", rhs] => Ok((*lhs, "not in", *rhs)),
        _ => Err(ExpressionError::Format(expression.to_string())),
    }
}

/// A null or empty-mapping payload carries no resolvable keys.
fn payload_is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Map(entries) => entries.is_empty(),
        _ => false,
    }
}

const fn ordering_holds(operator: Operator, ordering: Ordering) -> bool {
    match operator {
        Operator::Lt => matches!(ordering, Ordering::Less),
        Operator::Le => !matches!(ordering, Ordering::Greater),
        Operator::Gt => matches!(ordering, Ordering::Greater),
        Operator::Ge => !matches!(ordering, Ordering::Less),
        _ => false,
    }
}

/// Orders operands of identical or numerically compatible variants.
fn order_values(lhs: &Value, rhs: &Value) -> ExpressionResult<Ordering> {
    let unordered = || {
        ExpressionError::Comparison(format!(
            "cannot order {} against {}",
            lhs.type_name(),
            rhs.type_name()
        ))
    };
    match (lhs, rhs) {
        (Value::Int(l), Value::Int(r)) => Ok(l.cmp(r)),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let l = safe_float(lhs).ok_or_else(unordered)?;
            let r = safe_float(rhs).ok_or_else(unordered)?;
            l.partial_cmp(&r)
                .ok_or_else(|| ExpressionError::Comparison("cannot order against NaN".into()))
        }
        (Value::Str(l), Value::Str(r)) => Ok(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Ok(l.cmp(r)),
        _ => Err(unordered()),
    }
}

/// Strict membership: the container decides the semantics.
fn strict_membership(needle: &Value, container: &Value) -> ExpressionResult<bool> {
    match container {
        Value::List(items) => Ok(items.contains(needle)),
        Value::Str(haystack) => match needle {
            Value::Str(n) => Ok(haystack.contains(n.as_str())),
            _ => Err(ExpressionError::Comparison(format!(
                "substring membership requires a string needle, got {}",
                needle.type_name()
            ))),
        },
        Value::Map(entries) => match needle {
            Value::Str(key) => Ok(entries.contains_key(key)),
            _ => Err(ExpressionError::Comparison(format!(
                "mapping membership requires a string key, got {}",
                needle.type_name()
            ))),
        },
        _ => Err(ExpressionError::Comparison(format!(
            "membership is not defined over {}",
            container.type_name()
        ))),
    }
}

/// Relaxed membership: element equality is relaxed, substring needles
/// are rendered, and non-containers are simply not members.
fn relaxed_membership(needle: &Value, container: &Value) -> bool {
    match container {
        Value::List(items) => items.iter().any(|item| relaxed_equals(needle, item)),
        Value::Str(haystack) => haystack.contains(&coerce_string(needle)),
        Value::Map(entries) => entries.contains_key(&coerce_string(needle)),
        _ => false,
    }
}
