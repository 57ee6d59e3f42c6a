//! Runtime value types for field comparison.
//!
//! The [`Value`] enum represents the runtime value of a field extracted from
//! an object by a [`Resolve`] accessor. Scalars are compared directly; an
//! [`Value::Object`] is a nested object the path resolver can descend into,
//! and [`Value::List`] marks a multi-valued field that can't be traversed.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::traits::Resolve;

/// Runtime value for comparison, borrowed from the source object.
///
/// # Example
///
/// ```
/// use strainer::{Number, Resolve, Value};
///
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// impl Resolve for Person {
///     fn resolve_field(&self, field: &str) -> Option<Value<'_>> {
///         match field {
///             "name" => Some(Value::String(&self.name)),
///             "age" => Some(Value::Number(Number::from(self.age))),
///             _ => None,
///         }
///     }
/// }
/// ```
#[derive(Clone)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Textual value rendered on demand, e.g. an enum's display form.
    Text(String),
    /// Numeric value.
    Number(Number),
    /// Instant in time.
    Date(DateTime<Utc>),
    /// Boolean value.
    Bool(bool),
    /// Nested object the resolver can descend into.
    Object(&'a dyn Resolve),
    /// Multi-valued field holding the given number of elements.
    List(usize),
    /// Field present but holding no value.
    Null,
}

impl<'a> Value<'a> {
    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if this is a `List` value.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns `true` if this is an `Object` value.
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    /// Extracts the borrowed string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the date value, if present.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the nested object, if present.
    pub fn as_object(&self) -> Option<&'a dyn Resolve> {
        match self {
            Value::Object(o) => Some(*o),
            _ => None,
        }
    }

    /// Returns the textual form of a scalar value.
    ///
    /// Objects, lists and nulls have no textual form.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Date(d) => Some(Cow::Owned(d.to_rfc3339_opts(SecondsFormat::AutoSi, true))),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Object(_) | Value::List(_) | Value::Null => None,
        }
    }

    /// Returns a short name for the kind of this value, used in errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::String(_) | Value::Text(_) => "string",
            Value::Number(_) => "number",
            Value::Date(_) => "date",
            Value::Bool(_) => "bool",
            Value::Object(_) => "object",
            Value::List(_) => "list",
            Value::Null => "null",
        }
    }
}

impl std::fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Date(d) => f.debug_tuple("Date").field(d).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Object(_) => f.write_str("Object(..)"),
            Value::List(len) => f.debug_tuple("List").field(len).finish(),
            Value::Null => f.write_str("Null"),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => std::ptr::addr_eq(*a, *b),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (a, b) => match (a.as_str(), b.as_str()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::String(s)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(s: &'a String) -> Self {
        Value::String(s)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<DateTime<Utc>> for Value<'_> {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Numeric value supporting the integer, float and double filter types.
///
/// Integers compare exactly across `I64` and `U64`. Other mixed pairs
/// convert both sides to `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned integer above `i64::MAX`.
    U64(u64),
    /// 32-bit floating point.
    F32(f32),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F32(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Converts the number to f32, rounding to the nearest representable
    /// value.
    pub fn to_f32(self) -> f32 {
        match self {
            Number::F32(n) => n,
            other => other.to_f64() as f32,
        }
    }

    fn to_i128(self) -> Option<i128> {
        match self {
            Number::I64(n) => Some(i128::from(n)),
            Number::U64(n) => Some(i128::from(n)),
            Number::F32(_) | Number::F64(_) => None,
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::F32(a), Number::F32(b)) => a.partial_cmp(&b),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => match (self.to_i128(), other.to_i128()) {
                (Some(a), Some(b)) => Some(a.cmp(&b)),
                _ => self.to_f64().partial_cmp(&other.to_f64()),
            },
        }
    }

    /// Compares two numbers at single precision.
    pub fn compare_f32(self, other: Number) -> Option<Ordering> {
        self.to_f32().partial_cmp(&other.to_f32())
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F32(n) => write!(f, "{n}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! number_from_int {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Number {
            fn from(n: $ty) -> Self {
                Number::I64(i64::from(n))
            }
        })*
    };
}

number_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! number_from_wide {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Number {
            fn from(n: $ty) -> Self {
                match i64::try_from(n) {
                    Ok(n) => Number::I64(n),
                    Err(_) => Number::U64(n as u64),
                }
            }
        })*
    };
}

number_from_wide!(u64, usize, isize);

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::F32(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}
