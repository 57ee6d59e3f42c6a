//! Filter clauses and their evaluation.
//!
//! A [`FilterField`] is one clause as a client sends it: a field path, an
//! operator, a raw string value and a declared type. A [`Filter`] is an
//! ordered list of clauses combined with AND. Before evaluation each clause
//! is compiled into a [`Predicate`], which holds the coerced operand (and the
//! compiled regular expression for `LIKE`), so malformed input is rejected
//! once per request rather than once per element.

use std::borrow::Cow;
use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::coerce::{parse_date, Operand, TypedValue};
use crate::error::{Result, StrainerError};
use crate::op::{FilterType, Op};
use crate::path;
use crate::traits::Resolve;
use crate::value::{Number, Value};

/// A single filter clause as received from a client.
///
/// # Example
///
/// ```
/// use strainer::{FilterField, FilterType, Op};
///
/// let clause = FilterField::new("age", Op::Gte, "18").with_type(FilterType::Integer);
/// assert_eq!(clause.kind(), FilterType::Integer);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The comparison operator.
    pub op: Op,
    /// Dotted path of the field to compare.
    pub field: String,
    /// Raw value; absent for the null checks.
    #[serde(default)]
    pub value: Option<String>,
    /// Declared type of the value. `None` reads as `STRING`.
    #[serde(default, rename = "type")]
    pub kind: Option<FilterType>,
}

impl FilterField {
    /// Creates a clause with a string-typed value.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<String>) -> Self {
        FilterField {
            op,
            field: field.into(),
            value: Some(value.into()),
            kind: None,
        }
    }

    /// Creates a value-less clause, as used by `ISNULL` and `ISNOTNULL`.
    pub fn without_value(field: impl Into<String>, op: Op) -> Self {
        FilterField {
            op,
            field: field.into(),
            value: None,
            kind: None,
        }
    }

    /// Sets the declared type.
    pub fn with_type(mut self, kind: FilterType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Returns the declared type, defaulting to `STRING`.
    pub fn kind(&self) -> FilterType {
        self.kind.unwrap_or_default()
    }
}

/// An ordered list of clauses, all of which must hold.
///
/// # Example
///
/// ```
/// use strainer::{Filter, FilterType, Op};
///
/// let filter = Filter::new()
///     .and("name", Op::Likeic, "^al")
///     .and_typed("age", Op::Lt, "30", FilterType::Integer)
///     .and_not_null("email");
/// assert_eq!(filter.fields.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub fields: Vec<FilterField>,
}

impl Filter {
    /// Creates an empty filter, which matches everything.
    pub fn new() -> Self {
        Filter::default()
    }

    /// Adds a string-typed clause.
    pub fn and(self, field: &str, op: Op, value: &str) -> Self {
        self.push(FilterField::new(field, op, value))
    }

    /// Adds a clause with a declared type.
    pub fn and_typed(self, field: &str, op: Op, value: &str, kind: FilterType) -> Self {
        self.push(FilterField::new(field, op, value).with_type(kind))
    }

    /// Adds an `ISNULL` clause.
    pub fn and_null(self, field: &str) -> Self {
        self.push(FilterField::without_value(field, Op::IsNull))
    }

    /// Adds an `ISNOTNULL` clause.
    pub fn and_not_null(self, field: &str) -> Self {
        self.push(FilterField::without_value(field, Op::IsNotNull))
    }

    /// Adds a prepared clause.
    pub fn push(mut self, field: FilterField) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns `true` if this filter has no clauses.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compiles every clause, failing on the first invalid one.
    pub fn compile(&self) -> Result<Vec<Predicate>> {
        self.fields.iter().map(Predicate::compile).collect()
    }
}

impl From<Vec<FilterField>> for Filter {
    fn from(fields: Vec<FilterField>) -> Self {
        Filter { fields }
    }
}

/// A compiled filter clause, ready to be tested against elements.
#[derive(Debug, Clone)]
pub struct Predicate {
    path: String,
    op: Op,
    kind: FilterType,
    operand: Operand,
    pattern: Option<Regex>,
}

impl Predicate {
    /// Validates and coerces a client clause.
    pub fn compile(field: &FilterField) -> Result<Self> {
        let operand = Operand::parse(field.op, field.kind(), field.value.as_deref())?;
        Predicate::from_parts(&field.field, field.op, field.kind(), operand)
    }

    /// Builds a predicate from an already coerced operand.
    pub fn from_parts(path: &str, op: Op, kind: FilterType, operand: Operand) -> Result<Self> {
        path::segments(path)?;
        if !op.supports(kind) {
            return Err(StrainerError::UnsupportedOperatorForType { op, kind });
        }

        let pattern = match (op.is_pattern_op(), operand.as_scalar()) {
            (true, Some(TypedValue::String(source))) => Some(
                RegexBuilder::new(source)
                    .case_insensitive(op == Op::Likeic)
                    .build()
                    .map_err(|e| StrainerError::invalid_value(source, kind, e))?,
            ),
            (true, _) => {
                return Err(StrainerError::invalid_value("", kind, "missing pattern"));
            }
            (false, _) => None,
        };

        tracing::trace!(path, %op, %kind, "compiled filter clause");
        Ok(Predicate {
            path: path.to_string(),
            op,
            kind,
            operand,
            pattern,
        })
    }

    /// Returns the field path this predicate tests.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the operator.
    pub fn op(&self) -> Op {
        self.op
    }

    /// Returns the declared type.
    pub fn kind(&self) -> FilterType {
        self.kind
    }

    /// Returns the coerced operand.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }

    /// Resolves this predicate's path on `item` and tests the value.
    pub fn matches(&self, item: &dyn Resolve) -> Result<bool> {
        let value = path::resolve(&self.path, item)?;
        self.test(&value)
    }

    /// Tests an already resolved field value.
    ///
    /// Absent values only satisfy `ISNULL`; every other operator treats
    /// them as non-matching.
    pub fn test(&self, value: &Value<'_>) -> Result<bool> {
        match self.op {
            Op::IsNull => return Ok(value.is_null()),
            Op::IsNotNull => return Ok(!value.is_null()),
            _ => {}
        }
        if value.is_null() {
            return Ok(false);
        }

        let subject = Subject::from_value(&self.path, self.kind, value)?;
        let subject = if self.op.is_case_insensitive() {
            subject.fold_case()
        } else {
            subject
        };

        let op = self.op.normalize();
        Ok(match (&self.operand, &self.pattern) {
            (_, Some(regex)) => match &subject {
                Subject::Text(text) => regex.is_match(text),
                _ => false,
            },
            (Operand::List(items), _) => {
                let member = items
                    .iter()
                    .any(|item| subject.compare(item) == Some(Ordering::Equal));
                match op {
                    Op::In => member,
                    Op::Nin => !member,
                    _ => false,
                }
            }
            (Operand::Scalar(target), _) => subject
                .compare(target)
                .is_some_and(|ordering| op.eval_ordering(ordering)),
            (Operand::None, _) => false,
        })
    }
}

/// A field value converted to the clause's declared type.
enum Subject<'v> {
    Text(Cow<'v, str>),
    Number(Number),
    Date(DateTime<Utc>),
}

impl<'v> Subject<'v> {
    fn from_value(path: &str, kind: FilterType, value: &'v Value<'_>) -> Result<Self> {
        match kind {
            FilterType::String => value
                .text()
                .map(Subject::Text)
                .ok_or_else(|| StrainerError::unsupported_type(path, value.kind_name())),
            FilterType::Integer | FilterType::Float | FilterType::Double => value
                .as_number()
                .map(Subject::Number)
                .ok_or_else(|| StrainerError::unsupported_type(path, value.kind_name())),
            FilterType::Date => match value {
                Value::Date(d) => Ok(Subject::Date(*d)),
                Value::String(_) | Value::Text(_) => value
                    .as_str()
                    .and_then(|s| parse_date(s).ok())
                    .map(Subject::Date)
                    .ok_or_else(|| StrainerError::unsupported_type(path, "non-date string")),
                other => Err(StrainerError::unsupported_type(path, other.kind_name())),
            },
        }
    }

    fn fold_case(self) -> Self {
        match self {
            Subject::Text(text) => Subject::Text(Cow::Owned(text.to_lowercase())),
            other => other,
        }
    }

    fn compare(&self, target: &TypedValue) -> Option<Ordering> {
        match (self, target) {
            (Subject::Text(text), TypedValue::String(s)) => Some(text.as_ref().cmp(s.as_str())),
            (Subject::Number(n), TypedValue::Integer(i)) => n.compare(Number::I64(*i)),
            (Subject::Number(n), TypedValue::Float(f)) => n.compare_f32(Number::F32(*f)),
            (Subject::Number(n @ Number::F32(_)), TypedValue::Double(d)) => {
                n.compare_f32(Number::F64(*d))
            }
            (Subject::Number(n), TypedValue::Double(d)) => n.compare(Number::F64(*d)),
            (Subject::Date(d), TypedValue::Date(t)) => Some(d.cmp(t)),
            _ => None,
        }
    }
}

/// Keeps the items satisfying every predicate, in their input order.
///
/// Evaluation of an item stops at its first failing predicate.
pub(crate) fn retain_matching<'a, T: Resolve>(
    items: Vec<&'a T>,
    predicates: &[Predicate],
) -> Result<Vec<&'a T>> {
    if predicates.is_empty() {
        return Ok(items);
    }

    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        if matches_all(item, predicates)? {
            kept.push(item);
        }
    }
    Ok(kept)
}

fn matches_all(item: &dyn Resolve, predicates: &[Predicate]) -> Result<bool> {
    for predicate in predicates {
        if !predicate.matches(item)? {
            return Ok(false);
        }
    }
    Ok(true)
}
