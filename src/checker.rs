use tracing::{debug, trace};

use crate::error::EvalError;
use crate::parse::Evaluator;
use crate::types::{FastLookup, Method, MethodRegistry, Value, DEFAULT_SLOT_COUNT};

/// Default limit on nested `(`, `!`/`not` and `[`.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Builder for configuring a [`RuleChecker`].
///
/// # Example
///
/// ```
/// use rulecheck::RuleChecker;
///
/// let mut checker = RuleChecker::builder().max_depth(16).build();
/// checker.set_variable("age", 21);
/// assert_eq!(checker.evaluate("age.gte(18)"), Ok(true));
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct RuleCheckerBuilder {
    slot_count: usize,
    max_depth: usize,
    default_methods: bool,
}

impl Default for RuleCheckerBuilder {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            max_depth: DEFAULT_MAX_DEPTH,
            default_methods: true,
        }
    }
}

impl RuleCheckerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of direct slots in the variable and method tables.
    pub fn slot_count(mut self, slot_count: usize) -> Self {
        self.slot_count = slot_count.max(1);
        self
    }

    /// Maximum nesting depth accepted by [`RuleChecker::evaluate`].
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Whether the built-in methods are installed. Defaults to `true`.
    pub fn default_methods(mut self, enabled: bool) -> Self {
        self.default_methods = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> RuleChecker {
        debug!(
            slot_count = self.slot_count,
            max_depth = self.max_depth,
            default_methods = self.default_methods,
            "building rule checker"
        );
        let mut methods = MethodRegistry::with_slots(self.slot_count);
        if self.default_methods {
            methods.install_defaults();
        }
        RuleChecker {
            variables: FastLookup::with_slots(self.slot_count),
            methods,
            max_depth: self.max_depth,
        }
    }
}

/// Evaluates rule expressions such as `age.gte(18) && name.contains("Jo")`
/// against named variables.
///
/// Evaluation takes `&self` and mutation takes `&mut self`, so a checker can
/// be shared read-only behind an `Arc`, or behind a `RwLock` when bindings
/// change between evaluations.
#[derive(Debug, Clone)]
pub struct RuleChecker {
    variables: FastLookup<Value>,
    methods: MethodRegistry,
    max_depth: usize,
}

impl Default for RuleChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleChecker {
    /// A checker with default settings and the built-in methods.
    #[must_use]
    pub fn new() -> Self {
        RuleCheckerBuilder::new().build()
    }

    pub fn builder() -> RuleCheckerBuilder {
        RuleCheckerBuilder::new()
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn set_variable(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        debug!(name, %value, "setting variable");
        self.variables.set(name, value);
    }

    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn clear_variables(&mut self) {
        debug!("clearing variables");
        self.variables.clear();
    }

    /// Register or replace the method invoked as `receiver.name(argument)`.
    pub fn register_method(&mut self, name: &str, method: impl Method + 'static) {
        self.methods.register(name, method);
    }

    pub fn clear_methods(&mut self) {
        self.methods.clear();
    }

    /// Install the built-in methods, replacing host methods of the same name.
    pub fn init_default_methods(&mut self) {
        debug!("installing default methods");
        self.methods.install_defaults();
    }

    #[must_use]
    pub fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    /// Evaluate `expression` to a boolean.
    ///
    /// Evaluation stops at the first error. A failed evaluation leaves the
    /// checker unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] for syntax errors, unknown variables or methods,
    /// and failures reported by a method.
    pub fn evaluate(&self, expression: &str) -> Result<bool, EvalError> {
        let outcome =
            Evaluator::new(expression, &self.variables, &self.methods, self.max_depth).run();
        trace!(expression, ?outcome, "evaluated");
        outcome
    }
}
