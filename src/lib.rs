mod checker;
mod error;
pub mod parse;
mod types;

pub use checker::{RuleChecker, RuleCheckerBuilder, DEFAULT_MAX_DEPTH};
pub use error::EvalError;
pub use types::{
    fnv1a, CompareOp, FastLookup, Method, MethodError, MethodRegistry, Value, ValueType,
    DEFAULT_SLOT_COUNT,
};
