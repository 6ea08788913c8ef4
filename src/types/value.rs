use std::fmt;

use super::method::MethodError;

/// Supported value types for rule evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 32-bit signed integer.
    Int(i32),
    /// A 32-bit floating-point number.
    Float(f32),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of values. Elements need not share a type.
    Array(Vec<Value>),
}

/// The type of a [`Value`], displayed as its single-character tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Int,
    Float,
    String,
    Array,
}

/// Comparison operators backing the `eq`, `neq`, `gt`, `gte`, `lt` and `lte` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// The method name this operator is registered under.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Neq => "neq",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
        }
    }

    fn apply<T: PartialOrd + ?Sized>(self, a: &T, b: &T) -> bool {
        match self {
            CompareOp::Eq => a == b,
            CompareOp::Neq => a != b,
            CompareOp::Gt => a > b,
            CompareOp::Gte => a >= b,
            CompareOp::Lt => a < b,
            CompareOp::Lte => a <= b,
        }
    }
}

impl ValueType {
    /// Single-character tag used in error messages.
    #[must_use]
    pub fn tag(self) -> char {
        match self {
            ValueType::Int => 'i',
            ValueType::Float => 'f',
            ValueType::String => 's',
            ValueType::Array => 'a',
        }
    }
}

impl Value {
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
        }
    }

    /// Compare this value to another using the given operator.
    ///
    /// Both operands must have the same type; there is no promotion between
    /// ints and floats. Arrays support no comparison at all.
    ///
    /// # Errors
    ///
    /// [`MethodError::TypeMismatch`] when the operand types differ and
    /// [`MethodError::Unsupported`] when both are arrays.
    pub fn compare(&self, op: CompareOp, other: &Value) -> Result<bool, MethodError> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(op.apply(a, b)),
            (Value::Float(a), Value::Float(b)) => Ok(op.apply(a, b)),
            (Value::String(a), Value::String(b)) => Ok(op.apply(a.as_str(), b.as_str())),
            (Value::Array(_), Value::Array(_)) => Err(MethodError::Unsupported {
                method: op.name().to_owned(),
                ty: ValueType::Array,
            }),
            _ => Err(MethodError::TypeMismatch {
                left: self.value_type(),
                right: other.value_type(),
            }),
        }
    }

    /// Substring test: `self` must be a string containing `needle`.
    ///
    /// # Errors
    ///
    /// [`MethodError::Unsupported`] when `self` is not a string and
    /// [`MethodError::TypeMismatch`] when `needle` is not a string.
    pub fn contains(&self, needle: &Value) -> Result<bool, MethodError> {
        let Value::String(haystack) = self else {
            return Err(MethodError::Unsupported {
                method: "contains".to_owned(),
                ty: self.value_type(),
            });
        };
        match needle {
            Value::String(needle) => Ok(haystack.contains(needle.as_str())),
            other => Err(MethodError::TypeMismatch {
                left: ValueType::String,
                right: other.value_type(),
            }),
        }
    }

    /// Membership test of `self` in `container`.
    ///
    /// A string container performs a substring test and requires `self` to be
    /// a string. An array container matches when an element has the same type
    /// and compares equal.
    ///
    /// # Errors
    ///
    /// [`MethodError::Unsupported`] when `container` is neither a string nor
    /// an array, [`MethodError::TypeMismatch`] for a non-string needle in a
    /// string container.
    pub fn is_in(&self, container: &Value) -> Result<bool, MethodError> {
        match container {
            Value::String(_) => container.contains(self).map_err(|_| MethodError::TypeMismatch {
                left: self.value_type(),
                right: ValueType::String,
            }),
            Value::Array(items) => Ok(items.iter().any(|item| item == self)),
            other => Err(MethodError::Unsupported {
                method: "in".to_owned(),
                ty: other.value_type(),
            }),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Array(v.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_i32() {
        assert_eq!(Value::from(42), Value::Int(42));
    }

    #[test]
    fn from_f32() {
        assert_eq!(Value::from(2.5_f32), Value::Float(2.5));
    }

    #[test]
    fn from_str() {
        assert_eq!(Value::from("hello"), Value::String("hello".to_owned()));
    }

    #[test]
    fn from_vec() {
        assert_eq!(
            Value::from(vec![1, 2]),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::String("hello".into()).to_string(), "\"hello\"");
        assert_eq!(
            Value::from(vec![Value::Int(1), Value::from("x")]).to_string(),
            "[1, \"x\"]"
        );
    }

    #[test]
    fn type_tags() {
        assert_eq!(Value::Int(0).value_type().to_string(), "i");
        assert_eq!(Value::Float(0.0).value_type().to_string(), "f");
        assert_eq!(Value::from("").value_type().to_string(), "s");
        assert_eq!(Value::Array(vec![]).value_type().to_string(), "a");
    }

    #[test]
    fn compare_int() {
        let a = Value::Int(10);
        let b = Value::Int(20);
        assert_eq!(a.compare(CompareOp::Eq, &b), Ok(false));
        assert_eq!(a.compare(CompareOp::Neq, &b), Ok(true));
        assert_eq!(a.compare(CompareOp::Lt, &b), Ok(true));
        assert_eq!(a.compare(CompareOp::Lte, &b), Ok(true));
        assert_eq!(a.compare(CompareOp::Gt, &b), Ok(false));
        assert_eq!(a.compare(CompareOp::Gte, &b), Ok(false));
        assert_eq!(a.compare(CompareOp::Gte, &a), Ok(true));
        assert_eq!(a.compare(CompareOp::Lte, &a), Ok(true));
    }

    #[test]
    fn compare_float_is_exact() {
        let a = Value::Float(2.0);
        assert_eq!(a.compare(CompareOp::Eq, &Value::Float(2.0)), Ok(true));
        assert_eq!(
            a.compare(CompareOp::Eq, &Value::Float(1.999_999_9)),
            Ok(false)
        );
        assert_eq!(a.compare(CompareOp::Gt, &Value::Float(1.5)), Ok(true));
    }

    #[test]
    fn compare_string_lexicographic() {
        let a = Value::from("apple");
        let b = Value::from("banana");
        assert_eq!(a.compare(CompareOp::Lt, &b), Ok(true));
        assert_eq!(a.compare(CompareOp::Eq, &b), Ok(false));
        assert_eq!(b.compare(CompareOp::Gte, &a), Ok(true));
    }

    #[test]
    fn compare_type_mismatch() {
        let err = Value::Int(2).compare(CompareOp::Eq, &Value::Float(2.0));
        assert_eq!(
            err,
            Err(MethodError::TypeMismatch {
                left: ValueType::Int,
                right: ValueType::Float,
            })
        );
    }

    #[test]
    fn compare_arrays_unsupported() {
        let a = Value::from(vec![1]);
        let err = a.compare(CompareOp::Gt, &a).unwrap_err();
        assert_eq!(err.to_string(), "unsupported operation 'gt' with type 'a'");
    }

    #[test]
    fn contains_substring() {
        let s = Value::from("my string");
        assert_eq!(s.contains(&Value::from("string")), Ok(true));
        assert_eq!(s.contains(&Value::from("stringo")), Ok(false));
        assert_eq!(s.contains(&Value::from("")), Ok(true));
    }

    #[test]
    fn contains_on_non_string() {
        let err = Value::Int(1).contains(&Value::from("1")).unwrap_err();
        assert_eq!(err.to_string(), "unsupported operation 'contains' with type 'i'");
        let err = Value::from("1").contains(&Value::Int(1)).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: type s vs i");
    }

    #[test]
    fn in_string() {
        let needle = Value::from("my string");
        assert_eq!(needle.is_in(&Value::from("this is my string example")), Ok(true));
        assert_eq!(needle.is_in(&Value::from("string")), Ok(false));
        let err = Value::Int(1).is_in(&Value::from("1")).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: type i vs s");
    }

    #[test]
    fn in_array_matches_type_and_value() {
        let arr = Value::from(vec![Value::Int(1), Value::Float(2.0), Value::from("x")]);
        assert_eq!(Value::Int(1).is_in(&arr), Ok(true));
        assert_eq!(Value::Float(2.0).is_in(&arr), Ok(true));
        assert_eq!(Value::Int(2).is_in(&arr), Ok(false));
        assert_eq!(Value::Float(1.0).is_in(&arr), Ok(false));
        assert_eq!(Value::from("x").is_in(&arr), Ok(true));
    }

    #[test]
    fn in_unsupported_container() {
        let err = Value::Int(1).is_in(&Value::Int(1)).unwrap_err();
        assert_eq!(err.to_string(), "unsupported operation 'in' with type 'i'");
    }
}
