//! Type coercion for strict and relaxed comparisons.
//!
//! Two families live here. Single-value coercers ([`coerce_numeric`],
//! [`coerce_boolean`], [`coerce_string`], [`safe_float`]) convert one
//! value toward a target type, answering `None` when they cannot.
//! Pairwise coercers ([`relaxed_cast`], [`relaxed_equals`],
//! [`coerce_types_for_comparison`]) unify two operands for relaxed-mode
//! comparison.
//!
//! Strict-mode failures are loud and specific; relaxed mode never fails
//! on a legitimate mismatch, it degrades to `None`/`false`. The only
//! hard errors in this module are the ones the contract requires:
//! coercion across an unresolved symbolic reference, and a numeric
//! pre-checked string that still cannot reach the target variant.

use crate::core::{CoercionError, Value};
use crate::literal::{is_symbolic_reference, is_valid_numeric_string};

/// 2^63 as a float; integral floats at or beyond this magnitude have
/// no exact i64 counterpart.
const I64_RANGE_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The relaxed-cast target ladder, in the order [`relaxed_equals`]
/// tries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastType {
    Bool,
    Int,
    Float,
    Str,
}

/// Coerces toward a finite float.
///
/// Booleans and native numerics convert directly; strings are trimmed
/// and parsed. NaN and infinities are rejected in every form, as are
/// thousand separators and unit suffixes (they fail the parse).
#[must_use]
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => Some(*i as f64),
        Value::Float(x) => x.is_finite().then_some(*x),
        Value::Str(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        Value::Null | Value::List(_) | Value::Map(_) => None,
    }
}

/// Coerces recognizable boolean forms: `true`/`1` and `false`/`0`,
/// case-insensitively for strings. Anything else is `None`.
#[must_use]
pub fn coerce_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Int(0) => Some(false),
        Value::Int(1) => Some(true),
        Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Strips a string, renders anything else.
#[must_use]
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Str(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Float-or-none, without the finiteness filtering of
/// [`coerce_numeric`]. `"nan"` parses here; the relaxed comparators
/// guard against it separately.
#[must_use]
pub fn safe_float(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Int(i) => Some(*i as f64),
        Value::Float(x) => Some(*x),
        Value::Str(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::List(_) | Value::Map(_) => None,
    }
}

/// Defensive relaxed-mode casting toward one target variant.
///
/// A value already of the target type passes through. Strings are
/// recognized by form (boolean words, digit runs, float syntax with
/// NaN rejected); the remaining scalar cross-casts are the closed set a
/// comparison can meaningfully use. Unsafe or unrecognized cases are
/// `None`, never an error.
#[must_use]
pub fn relaxed_cast(value: &Value, target: CastType) -> Option<Value> {
    match target {
        CastType::Bool => coerce_boolean(value).map(Value::Bool),
        CastType::Int => match value {
            Value::Int(i) => Some(Value::Int(*i)),
            Value::Bool(b) => Some(Value::Int(i64::from(*b))),
            // The range guard keeps `as` from saturating floats beyond
            // i64 into a spurious i64::MAX equality.
            Value::Float(x)
                if x.is_finite() && x.fract() == 0.0 && x.abs() < I64_RANGE_BOUND =>
            {
                Some(Value::Int(*x as i64))
            }
            Value::Str(s) => s.trim().parse::<i64>().ok().map(Value::Int),
            _ => None,
        },
        CastType::Float => match value {
            Value::Float(x) => (!x.is_nan()).then_some(Value::Float(*x)),
            Value::Int(i) => Some(Value::Float(*i as f64)),
            Value::Bool(b) => Some(Value::Float(if *b { 1.0 } else { 0.0 })),
            Value::Str(s) => {
                let x = s.trim().parse::<f64>().ok()?;
                (!x.is_nan()).then_some(Value::Float(x))
            }
            _ => None,
        },
        CastType::Str => match value {
            Value::Str(s) => Some(Value::Str(s.clone())),
            Value::Bool(b) => Some(Value::Str(b.to_string())),
            Value::Int(i) => Some(Value::Str(i.to_string())),
            Value::Float(x) => Some(Value::Str(x.to_string())),
            _ => None,
        },
    }
}

/// True when the value is one of the strings that poison relaxed
/// comparison outright.
pub(crate) fn is_unsafe_comparison_token(value: &Value) -> bool {
    matches!(
        value,
        Value::Str(s) if matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "nan" | "not_a_number"
        )
    )
}

/// Centralized relaxed equality.
///
/// Rejects outright if either operand is the string `"nan"` or
/// `"not_a_number"`. Nulls compare equal only to each other. Otherwise
/// both operands are cast along the bool → int → float → string ladder,
/// accepting the first type where both sides cast and compare equal.
#[must_use]
pub fn relaxed_equals(lhs: &Value, rhs: &Value) -> bool {
    if is_unsafe_comparison_token(lhs) || is_unsafe_comparison_token(rhs) {
        tracing::debug!(%lhs, %rhs, "unsafe operand, rejecting relaxed comparison");
        return false;
    }

    match (lhs, rhs) {
        (Value::Null, Value::Null) => return true,
        (Value::Null, _) | (_, Value::Null) => return false,
        _ => {}
    }

    for target in [CastType::Bool, CastType::Int, CastType::Float, CastType::Str] {
        if let (Some(l), Some(r)) = (relaxed_cast(lhs, target), relaxed_cast(rhs, target)) {
            if l == r {
                tracing::debug!(%lhs, %rhs, ?target, "relaxed match");
                return true;
            }
        }
    }
    false
}

/// Unifies two operands for a relaxed structured comparison.
///
/// Operands pass through unchanged when either is null, when a
/// non-numeric string meets a number (blocked, not an error), or when
/// no rule applies. Coercion across an unresolved symbolic reference is
/// refused with an error: comparing against a path that never resolved
/// is a rule bug, not a mismatch.
pub fn coerce_types_for_comparison(
    left: &Value,
    right: &Value,
) -> Result<(Value, Value), CoercionError> {
    tracing::debug!(%left, %right, "attempting type coercion");

    if left.is_null() || right.is_null() {
        tracing::debug!("skipping coercion due to unresolved operand");
        return Ok((left.clone(), right.clone()));
    }

    for operand in [left, right] {
        if let Value::Str(s) = operand {
            if is_symbolic_reference(s) {
                return Err(CoercionError::UnresolvedReference(s.clone()));
            }
        }
    }

    if matches!(left, Value::Bool(_)) || matches!(right, Value::Bool(_)) {
        if let (Some(l), Some(r)) = (coerce_boolean(left), coerce_boolean(right)) {
            return Ok((Value::Bool(l), Value::Bool(r)));
        }
        // No recognizable boolean form on the other side; leave both alone.
        return Ok((left.clone(), right.clone()));
    }

    match (left, right) {
        (Value::Str(s), Value::Int(_) | Value::Float(_)) => {
            if is_valid_numeric_string(s) {
                Ok((cast_numeric_string(s, right)?, right.clone()))
            } else {
                tracing::debug!("blocked invalid string-to-numeric coercion (left)");
                Ok((left.clone(), right.clone()))
            }
        }
        (Value::Int(_) | Value::Float(_), Value::Str(s)) => {
            if is_valid_numeric_string(s) {
                Ok((left.clone(), cast_numeric_string(s, left)?))
            } else {
                tracing::debug!("blocked invalid string-to-numeric coercion (right)");
                Ok((left.clone(), right.clone()))
            }
        }
        (Value::Str(a), Value::Str(b))
            if is_valid_numeric_string(a) && is_valid_numeric_string(b) =>
        {
            if let (Ok(ia), Ok(ib)) = (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
                return Ok((Value::Int(ia), Value::Int(ib)));
            }
            if let (Ok(xa), Ok(xb)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
                return Ok((Value::Float(xa), Value::Float(xb)));
            }
            Ok((left.clone(), right.clone()))
        }
        _ => {
            tracing::debug!("coercion fallback: using original values");
            Ok((left.clone(), right.clone()))
        }
    }
}

/// Casts a numeric-valid string to the numeric variant of `target`.
///
/// The string passed the float pre-check, so a failure here (a
/// float-formed string against an integer operand) is a hard coercion
/// error rather than a silent fallback.
fn cast_numeric_string(s: &str, target: &Value) -> Result<Value, CoercionError> {
    match target {
        Value::Int(_) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| CoercionError::CastFailed {
                value: s.to_string(),
                target: "integer",
            }),
        Value::Float(_) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| CoercionError::CastFailed {
                value: s.to_string(),
                target: "float",
            }),
        _ => Err(CoercionError::CastFailed {
            value: s.to_string(),
            target: target.type_name(),
        }),
    }
}
