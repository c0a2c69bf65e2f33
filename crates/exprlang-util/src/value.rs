//! The dynamically typed value every expression evaluates to.
//!
//! [`Value`] is a tagged union over the eight shapes an expression can
//! produce or consume: a 64-bit integer, a 32-bit float, a boolean, a
//! string, an accessor path (ordered sequence of strings), a list (ordered
//! sequence of values, built by the `SEPARATE` operator), a nested
//! parameter map, and a callable function reference.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::{Error, TypeError};
use crate::span::Span;

/// A host function bound into the expression's function map.
///
/// Mirrors the callable alias an embedding host would expose: given a
/// single argument value (a scalar, or a [`Value::List`] built by chained
/// `SEPARATE` stages for multi-argument calls), it returns a value or an
/// error. Wrapped in `Rc` because a compiled expression may be evaluated
/// many times and the same callable is shared across every evaluation.
pub type Callable = Rc<dyn Fn(&Value) -> Result<Value, Error>>;

/// The parameter bag an expression is evaluated against: a flat or nested
/// map from variable name to value, consulted by `VARIABLE` and `ACCESS`
/// stages.
pub type ParamBag = FxHashMap<String, Value>;

/// The value a stage with no operand evaluates to: the empty-argument
/// position of a zero-argument function call, and the whole of an empty
/// prepared expression. There is no dedicated "unit" tag in this value
/// model, so both cases share this one.
pub const NONE_SENTINEL: Value = Value::Bool(true);

/// A runtime value.
///
/// `Value` carries exactly one tag at a time. Arithmetic and comparison
/// helpers live on this type; the operators that drive them (what to do
/// with two `Value`s for `PLUS`, `EQ`, and so on) live in the stage
/// operator library.
#[derive(Clone)]
pub enum Value {
    /// A 64-bit signed integer, produced by integer and hex-integer literals.
    Int(i64),
    /// A 32-bit float, produced by float literals and most arithmetic.
    Float(f32),
    /// A boolean, produced by `true`/`false` literals and logical operators.
    Bool(bool),
    /// A string, produced by string literals and string concatenation.
    String(String),
    /// An accessor path: the dotted or bracketed segments of a `VARIABLE.field` reference.
    Array(Vec<String>),
    /// An ordered sequence of values, accumulated by `SEPARATE` for multi-argument calls.
    List(Vec<Value>),
    /// A nested parameter object (an accessor root resolves into one of these).
    Map(FxHashMap<String, Value>),
    /// An opaque, reference-counted, identity-compared function binding.
    Callable(Callable),
}

impl Value {
    /// Human-readable tag name, used in type-error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Callable(_) => "callable",
        }
    }

    /// True if this value is a string.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// True if this value is a boolean.
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// True if this value is a 64-bit integer.
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// True if this value is a 32-bit float.
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// True if this value is an integer or a float.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// True if this value is an accessor path.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Coerce to a string.
    ///
    /// Strings pass through unchanged; ints, floats, and bools render as
    /// their canonical textual form. Any other tag is a type error.
    pub fn as_string(&self, span: Span) -> Result<String, Error> {
        match self {
            Value::String(s) => Ok(s.clone()),
            Value::Int(n) => Ok(n.to_string()),
            Value::Float(n) => Ok(format_float(*n)),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(Error::Type(TypeError::CheckFailed {
                symbol: "as_string".to_string(),
                reason: format!("cannot coerce {} to string", other.type_name()),
                span,
            })),
        }
    }

    /// Coerce to a float. Only ints and floats coerce; everything else is a type error.
    pub fn as_numeric(&self, span: Span) -> Result<f64, Error> {
        match self {
            Value::Int(n) => Ok(*n as f64),
            Value::Float(n) => Ok(*n as f64),
            other => Err(Error::Type(TypeError::CheckFailed {
                symbol: "as_numeric".to_string(),
                reason: format!("cannot coerce {} to a number", other.type_name()),
                span,
            })),
        }
    }

    /// Coerce to a boolean. Only `Bool` coerces; everything else is a type error.
    pub fn as_bool(&self, span: Span) -> Result<bool, Error> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(Error::Type(TypeError::CheckFailed {
                symbol: "as_bool".to_string(),
                reason: format!("cannot coerce {} to bool", other.type_name()),
                span,
            })),
        }
    }

    /// Numeric view used by ordering comparisons; `None` for non-numeric tags.
    fn numeric(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Ordering for `<`, `<=`, `>`, `>=`.
    ///
    /// Two strings compare lexicographically; two numeric values (in any
    /// combination of `Int`/`Float`) compare numerically. Any other
    /// combination has no defined ordering.
    pub fn partial_compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            _ => self.numeric()?.partial_cmp(&other.numeric()?),
        }
    }
}

/// Equality for `==`/`!=`.
///
/// Same-tag values compare structurally. An `Int` and a `Float` compare by
/// numeric coercion. Every other cross-tag pair is unequal. Callables
/// compare by pointer identity, never structurally — two distinct
/// closures with identical behavior are not equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f32) == *b
            }
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::Bool(v) => write!(f, "Bool({v})"),
            Value::String(v) => write!(f, "String({v:?})"),
            Value::Array(v) => write!(f, "Array({v:?})"),
            Value::List(v) => write!(f, "List({v:?})"),
            Value::Map(v) => write!(f, "Map({v:?})"),
            Value::Callable(rc) => write!(f, "Callable({:p})", Rc::as_ptr(rc)),
        }
    }
}

/// Canonical textual form for a float: integral values print without a
/// trailing `.0` suffix removed — they keep it, since `100.0` (not `100`)
/// is what string-concatenation results in the testable scenarios expect.
fn format_float(value: f32) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(Value::String("x".into()).is_string());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Int(1).is_int());
        assert!(Value::Float(1.0).is_float());
        assert!(Value::Int(1).is_numeric());
        assert!(Value::Float(1.0).is_numeric());
        assert!(Value::Array(vec!["a".into()]).is_array());
        assert!(!Value::List(vec![]).is_array());
    }

    #[test]
    fn equality_cross_tag_numeric() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_eq!(Value::Float(2.0), Value::Int(2));
        assert_ne!(Value::Int(2), Value::Int(3));
    }

    #[test]
    fn equality_cross_tag_other_is_false() {
        assert_ne!(Value::Int(1), Value::Bool(true));
        assert_ne!(Value::String("1".into()), Value::Int(1));
    }

    #[test]
    fn callable_equality_is_by_identity() {
        let a: Callable = Rc::new(|v: &Value| Ok(v.clone()));
        let b = a.clone();
        let c: Callable = Rc::new(|v: &Value| Ok(v.clone()));
        assert_eq!(Value::Callable(a), Value::Callable(b));
        assert_ne!(
            Value::Callable(c.clone()),
            Value::Callable(Rc::new(|v: &Value| Ok(v.clone())))
        );
        let _ = c;
    }

    #[test]
    fn ordering_strings_lexicographic() {
        let a = Value::String("abc".into());
        let b = Value::String("abd".into());
        assert_eq!(a.partial_compare(&b), Some(Ordering::Less));
    }

    #[test]
    fn ordering_numeric_cross_tag() {
        let a = Value::Int(3);
        let b = Value::Float(3.5);
        assert_eq!(a.partial_compare(&b), Some(Ordering::Less));
    }

    #[test]
    fn ordering_undefined_across_string_and_number() {
        let a = Value::String("3".into());
        let b = Value::Int(3);
        assert_eq!(a.partial_compare(&b), None);
    }

    #[test]
    fn as_string_coerces_numeric_and_bool() {
        assert_eq!(Value::Int(3).as_string(Span::DUMMY).unwrap(), "3");
        assert_eq!(Value::Bool(true).as_string(Span::DUMMY).unwrap(), "true");
        assert_eq!(Value::Float(100.0).as_string(Span::DUMMY).unwrap(), "100.0");
    }

    #[test]
    fn as_string_rejects_array() {
        let err = Value::Array(vec!["a".into()]).as_string(Span::DUMMY);
        assert!(err.is_err());
    }

    #[test]
    fn as_numeric_rejects_string() {
        assert!(Value::String("3".into()).as_numeric(Span::DUMMY).is_err());
    }

    #[test]
    fn as_bool_only_accepts_bool() {
        assert!(Value::Bool(false).as_bool(Span::DUMMY).is_ok());
        assert!(Value::Int(0).as_bool(Span::DUMMY).is_err());
    }
}
