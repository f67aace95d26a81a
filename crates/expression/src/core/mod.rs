//! Foundation types: the tagged value model and the error surface.

pub mod error;
pub mod value;

pub use error::{CoercionError, ExpressionError, ExpressionResult, OperatorError, PathError};
pub use value::Value;
