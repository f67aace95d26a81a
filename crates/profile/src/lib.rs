//! Rule-profile enforcement for nested payloads.
//!
//! A profile is an ordered list of rules, each a single comparison
//! expression (`if`) with a message to raise when it holds (`raise`).
//! Enforcement walks the rules in order and stops at the first one
//! that triggers or fails to evaluate. Profiles load from YAML
//! documents or are built in code.
//!
//! ```no_run
//! use verdict_profile::{enforce_profile, Value};
//!
//! let payload = Value::from(serde_json::json!({"domain": {"nx": 64}}));
//! enforce_profile("profiles/mesh.yaml", &payload)?;
//! # Ok::<(), verdict_profile::ProfileError>(())
//! ```
//!
//! Expression syntax and coercion semantics live in
//! [`verdict_expression`]; this crate adds the rule document format
//! and the halt-on-first-violation enforcement loop.

pub mod enforcer;
pub mod error;
pub mod loader;
pub mod rule;

pub use crate::enforcer::{enforce_profile, ProfileEnforcer, ProfileSource};
pub use crate::error::{DocumentError, ProfileError};
pub use crate::loader::load_rule_document;
pub use crate::rule::{evaluate_rule, Rule};

pub use verdict_expression::{CoercionMode, Evaluator, ExpressionError, Value};
