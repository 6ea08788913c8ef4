use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::lookup::{FastLookup, DEFAULT_SLOT_COUNT};
use super::value::{CompareOp, Value, ValueType};

/// Failure reported by a method operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MethodError {
    #[error("type mismatch: type {left} vs {right}")]
    TypeMismatch { left: ValueType, right: ValueType },

    #[error("unsupported operation '{method}' with type '{ty}'")]
    Unsupported { method: String, ty: ValueType },

    /// Free-form failure for host-defined methods.
    #[error("{0}")]
    Custom(String),
}

/// A binary operator invoked as `receiver.name(argument)`.
///
/// Implemented for every `Fn(&Value, &Value) -> Result<bool, MethodError>`
/// closure or function that is `Send + Sync`.
pub trait Method: Send + Sync {
    /// Apply the operator to the receiver variable and the call argument.
    ///
    /// # Errors
    ///
    /// Returns [`MethodError`] when the operands are not valid for this method.
    fn call(&self, receiver: &Value, argument: &Value) -> Result<bool, MethodError>;
}

impl<F> Method for F
where
    F: Fn(&Value, &Value) -> Result<bool, MethodError> + Send + Sync,
{
    fn call(&self, receiver: &Value, argument: &Value) -> Result<bool, MethodError> {
        self(receiver, argument)
    }
}

/// Instance-local registry of named methods.
#[derive(Clone, Default)]
pub struct MethodRegistry {
    methods: FastLookup<Arc<dyn Method>>,
}

impl MethodRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_slots(DEFAULT_SLOT_COUNT)
    }

    #[must_use]
    pub fn with_slots(slot_count: usize) -> Self {
        Self {
            methods: FastLookup::with_slots(slot_count),
        }
    }

    /// Create a registry holding the built-in methods.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.install_defaults();
        registry
    }

    /// Register or replace a method.
    pub fn register(&mut self, name: &str, method: impl Method + 'static) {
        debug!(name, "registering method");
        self.methods.set(name, Arc::new(method));
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Method> {
        self.methods.get(name).map(|method| &**method)
    }

    pub fn clear(&mut self) {
        debug!("clearing methods");
        self.methods.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Install `eq`, `neq`, `gt`, `gte`, `lt`, `lte`, `contains` and `in`,
    /// replacing any method of the same name.
    pub fn install_defaults(&mut self) {
        for op in [
            CompareOp::Eq,
            CompareOp::Neq,
            CompareOp::Gt,
            CompareOp::Gte,
            CompareOp::Lt,
            CompareOp::Lte,
        ] {
            self.register(op.name(), move |a: &Value, b: &Value| a.compare(op, b));
        }
        self.register("contains", |a: &Value, b: &Value| a.contains(b));
        self.register("in", |a: &Value, b: &Value| a.is_in(b));
    }
}

impl fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.methods.iter().map(|(name, _)| name).collect();
        names.sort_unstable();
        f.debug_struct("MethodRegistry")
            .field("methods", &names)
            .finish()
    }
}
