//! Field accessor traits.
//!
//! [`Resolve`] is the per-type accessor table the path resolver walks. It is
//! typically generated by `#[derive(Resolve)]` from the `strainer-macros`
//! crate, but can also be implemented by hand. [`ToDate`] converts the date
//! types commonly found on entities into the instant the engine compares.

use std::rc::Rc;
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::Result;
use crate::value::{Number, Value};

/// Trait for types whose fields can be filtered and sorted on.
///
/// # Derive Usage
///
/// ```ignore
/// use strainer::{Filter, FilterField, Op, Resolve};
///
/// #[derive(Resolve)]
/// struct Person {
///     #[field(String)]
///     name: String,
///     #[field(Integer)]
///     age: u32,
///     #[field(Nested)]
///     address: Option<Address>,
/// }
/// ```
///
/// # Manual Implementation
///
/// ```
/// use strainer::{Number, Resolve, Value};
///
/// struct Person {
///     name: String,
///     age: u32,
///     nickname: Option<String>,
/// }
///
/// impl Resolve for Person {
///     fn resolve_field(&self, field: &str) -> Option<Value<'_>> {
///         match field {
///             "name" => Some(Value::String(&self.name)),
///             "age" => Some(Value::Number(Number::from(self.age))),
///             "nickname" => Some(self.nickname.as_deref().into()),
///             _ => None,
///         }
///     }
/// }
/// ```
pub trait Resolve {
    /// Returns the value of a single field.
    ///
    /// Returns `None` when the type has no accessor named `field`, and
    /// `Some(Value::Null)` when the accessor exists but holds no value.
    fn resolve_field(&self, field: &str) -> Option<Value<'_>>;

    /// Resolves a dotted field path starting at this object.
    fn resolve_path(&self, path: &str) -> Result<Value<'_>>
    where
        Self: Sized,
    {
        crate::path::resolve(path, self)
    }
}

impl<T: Resolve + ?Sized> Resolve for &T {
    fn resolve_field(&self, field: &str) -> Option<Value<'_>> {
        (**self).resolve_field(field)
    }
}

impl<T: Resolve + ?Sized> Resolve for Box<T> {
    fn resolve_field(&self, field: &str) -> Option<Value<'_>> {
        (**self).resolve_field(field)
    }
}

impl<T: Resolve + ?Sized> Resolve for Rc<T> {
    fn resolve_field(&self, field: &str) -> Option<Value<'_>> {
        (**self).resolve_field(field)
    }
}

impl<T: Resolve + ?Sized> Resolve for Arc<T> {
    fn resolve_field(&self, field: &str) -> Option<Value<'_>> {
        (**self).resolve_field(field)
    }
}

/// JSON documents are schemaless: any key of an object resolves, a missing
/// key reading as null. Non-object values have no fields.
impl Resolve for serde_json::Value {
    fn resolve_field(&self, field: &str) -> Option<Value<'_>> {
        match self {
            serde_json::Value::Object(map) => Some(map.get(field).map_or(Value::Null, json_value)),
            _ => None,
        }
    }
}

fn json_value(value: &serde_json::Value) -> Value<'_> {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Number::I64)
            .or_else(|| n.as_u64().map(Number::U64))
            .or_else(|| n.as_f64().map(Number::F64))
            .map_or(Value::Null, Value::Number),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::List(items.len()),
        serde_json::Value::Object(_) => Value::Object(value),
    }
}

/// Helper trait for converting date types to a UTC instant.
///
/// This trait is used by the `#[derive(Resolve)]` macro when a field is
/// marked with `#[field(Date)]`.
///
/// # Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use strainer::ToDate;
///
/// struct Millis(i64);
///
/// impl ToDate for Millis {
///     fn to_date(&self) -> DateTime<Utc> {
///         self.0.to_date()
///     }
/// }
/// ```
pub trait ToDate {
    /// Converts this value to an instant.
    fn to_date(&self) -> DateTime<Utc>;
}

impl<Tz: TimeZone> ToDate for DateTime<Tz> {
    fn to_date(&self) -> DateTime<Utc> {
        self.with_timezone(&Utc)
    }
}

impl ToDate for NaiveDateTime {
    fn to_date(&self) -> DateTime<Utc> {
        self.and_utc()
    }
}

impl ToDate for SystemTime {
    fn to_date(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(*self)
    }
}

/// Milliseconds since the Unix epoch, saturating at the representable range.
impl ToDate for i64 {
    fn to_date(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(*self).unwrap_or(if *self < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
    }
}
