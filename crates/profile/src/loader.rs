//! Rule-document loading.
//!
//! A rule document is a YAML mapping with a `rules` sequence:
//!
//! ```yaml
//! rules:
//!   - if: "domain.nx == 0"
//!     raise: "Grid resolution is degenerate"
//!     type_check_mode: relaxed
//! ```
//!
//! Loading is forgiving about individual records (a record without a
//! string `if` is dropped, not fatal) but strict about the document
//! shape itself.

use std::path::Path;

use verdict_expression::CoercionMode;

use crate::error::DocumentError;
use crate::rule::Rule;

/// Loads and normalizes the rules of a YAML document.
///
/// A document without a `rules` key yields an empty list. Records
/// missing a string `if` are dropped with a debug log; `raise` defaults
/// to `Rule <i> failed`; unknown `type_check_mode` values warn and fail
/// closed to strict.
pub fn load_rule_document(path: impl AsRef<Path>) -> Result<Vec<Rule>, DocumentError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let document: serde_yaml::Value =
        serde_yaml::from_str(&text).map_err(|source| DocumentError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    tracing::debug!(path = %path.display(), "loaded rule document");

    if !document.is_mapping() {
        return Err(DocumentError::Structure(
            "expected a top-level mapping".into(),
        ));
    }
    let Some(raw_rules) = document.get("rules") else {
        return Ok(Vec::new());
    };
    let Some(records) = raw_rules.as_sequence() else {
        return Err(DocumentError::Structure(
            "expected list under 'rules' key".into(),
        ));
    };

    let mut rules = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for (index, record) in records.iter().enumerate() {
        let Some(condition) = record.get("if").and_then(serde_yaml::Value::as_str) else {
            tracing::debug!(index, "skipping malformed rule: missing 'if' expression");
            skipped += 1;
            continue;
        };
        let message = record
            .get("raise")
            .and_then(serde_yaml::Value::as_str)
            .map_or_else(|| format!("Rule {index} failed"), str::to_string);
        let strict_type_check = record
            .get("strict_type_check")
            .and_then(serde_yaml::Value::as_bool)
            .unwrap_or(false);
        let type_check_mode = match record.get("type_check_mode").and_then(serde_yaml::Value::as_str)
        {
            Some("strict") => Some(CoercionMode::Strict),
            Some("relaxed") => Some(CoercionMode::Relaxed),
            Some(other) => {
                tracing::warn!(index, mode = other, "unknown type_check_mode, using strict");
                Some(CoercionMode::Strict)
            }
            None => None,
        };

        rules.push(Rule {
            condition: condition.to_string(),
            message,
            strict_type_check,
            type_check_mode,
        });
    }

    if skipped > 0 {
        tracing::debug!(skipped, "dropped malformed rule records");
    }
    Ok(rules)
}
