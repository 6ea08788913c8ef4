mod lookup;
mod method;
mod value;

pub use lookup::{fnv1a, FastLookup, DEFAULT_SLOT_COUNT};
pub use method::{Method, MethodError, MethodRegistry};
pub use value::{CompareOp, Value, ValueType};
