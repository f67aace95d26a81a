//! Expression evaluation for rule conditions over nested payloads.
//!
//! An expression is a single three-token comparison, `lhs operator
//! rhs`: the lhs names a dotted path into the payload, the rhs is a
//! literal (or a second path in relaxed mode). Two coercion modes
//! govern how operand types are reconciled:
//!
//! - [`CoercionMode::Strict`] requires identical runtime types and
//!   fails with a descriptive error on any mismatch.
//! - [`CoercionMode::Relaxed`] coerces compatible forms (numeric
//!   strings, boolean words) and degrades to `false` instead of
//!   erroring when operands cannot be reconciled.
//!
//! ```
//! use verdict_expression::{CoercionMode, Evaluator, Value};
//!
//! let payload = Value::from(serde_json::json!({"domain": {"nx": 5}}));
//! let evaluator = Evaluator::new();
//!
//! let hit = evaluator.evaluate("domain.nx >= 5", &payload, CoercionMode::Strict)?;
//! assert!(hit);
//! # Ok::<(), verdict_expression::ExpressionError>(())
//! ```

pub mod coerce;
pub mod core;
pub mod eval;
pub mod literal;
pub mod operator;
pub mod path;

pub use crate::coerce::{
    coerce_boolean, coerce_numeric, coerce_string, relaxed_equals, CastType,
};
pub use crate::core::{
    CoercionError, ExpressionError, ExpressionResult, OperatorError, PathError, Value,
};
pub use crate::eval::{CoercionMode, Evaluator};
pub use crate::literal::{is_literal, is_symbolic_reference, parse_literal, parse_token};
pub use crate::operator::Operator;
pub use crate::path::resolve_path;
