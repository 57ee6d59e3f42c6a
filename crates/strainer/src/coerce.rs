//! Typed coercion of raw filter values.
//!
//! Clients send every filter value as a string together with a declared
//! [`FilterType`]. This module turns that pair into a [`TypedValue`], or a
//! list of them for the membership operators. Both the in-memory evaluator
//! and the query descriptor builder go through [`Operand::parse`], so the two
//! execution paths accept and reject exactly the same input.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::{Result, StrainerError};
use crate::op::{FilterType, Op};

/// Format accepted for date-times without an offset, read as UTC.
const NAIVE_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A filter value coerced to its declared type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Float(f32),
    Double(f64),
    Date(DateTime<Utc>),
}

impl TypedValue {
    /// Returns the declared type this value was coerced to.
    pub fn kind(&self) -> FilterType {
        match self {
            TypedValue::String(_) => FilterType::String,
            TypedValue::Integer(_) => FilterType::Integer,
            TypedValue::Float(_) => FilterType::Float,
            TypedValue::Double(_) => FilterType::Double,
            TypedValue::Date(_) => FilterType::Date,
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// The right-hand side of a filter clause after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// No value; used by `ISNULL` and `ISNOTNULL`.
    None,
    /// A single value, or the pattern of a `LIKE` clause.
    Scalar(TypedValue),
    /// The members of an `IN`-family clause.
    List(Vec<TypedValue>),
}

impl Operand {
    /// Validates `op` against `kind` and coerces the raw value.
    ///
    /// - Operators without semantics for `kind` fail with
    ///   `UnsupportedOperatorForType`.
    /// - Null checks ignore the raw value.
    /// - List operators require `[a,b,...]`.
    /// - Case-insensitive operators lowercase the value; `LIKEIC` keeps its
    ///   pattern verbatim and matches case-insensitively instead.
    pub fn parse(op: Op, kind: FilterType, raw: Option<&str>) -> Result<Operand> {
        if !op.supports(kind) {
            return Err(StrainerError::UnsupportedOperatorForType { op, kind });
        }
        if op.is_null_check() {
            return Ok(Operand::None);
        }

        let raw = raw.ok_or_else(|| StrainerError::invalid_value("", kind, "missing value"))?;

        if op.is_list_op() {
            let items = split_list(raw)?
                .into_iter()
                .map(|item| {
                    let item = match kind {
                        FilterType::String => item,
                        _ => item.trim(),
                    };
                    coerce_folded(item, kind, op.is_case_insensitive())
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Operand::List(items));
        }
        if op.is_pattern_op() {
            return Ok(Operand::Scalar(TypedValue::String(raw.to_string())));
        }
        coerce_folded(raw, kind, op.is_case_insensitive()).map(Operand::Scalar)
    }

    /// Returns the single value, if this is a scalar operand.
    pub fn as_scalar(&self) -> Option<&TypedValue> {
        match self {
            Operand::Scalar(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the list members, if this is a list operand.
    pub fn as_list(&self) -> Option<&[TypedValue]> {
        match self {
            Operand::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Coerces a raw value to the declared type.
pub fn coerce(raw: &str, kind: FilterType) -> Result<TypedValue> {
    match kind {
        FilterType::String => Ok(TypedValue::String(raw.to_string())),
        FilterType::Integer => raw
            .parse::<i64>()
            .map(TypedValue::Integer)
            .map_err(|e| StrainerError::invalid_value(raw, kind, e)),
        FilterType::Float => raw
            .parse::<f32>()
            .map(TypedValue::Float)
            .map_err(|e| StrainerError::invalid_value(raw, kind, e)),
        FilterType::Double => raw
            .parse::<f64>()
            .map(TypedValue::Double)
            .map_err(|e| StrainerError::invalid_value(raw, kind, e)),
        FilterType::Date => parse_date(raw).map(TypedValue::Date),
    }
}

fn coerce_folded(raw: &str, kind: FilterType, fold_case: bool) -> Result<TypedValue> {
    if fold_case {
        coerce(&raw.to_lowercase(), kind)
    } else {
        coerce(raw, kind)
    }
}

/// Parses an ISO-8601 date-time.
///
/// Values carrying an offset (`2024-05-01T10:00:00+02:00`, `...Z`) are
/// converted to UTC; values without one are read as UTC.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_DATE_TIME)
        .map(|naive| naive.and_utc())
        .map_err(|e| StrainerError::invalid_value(raw, FilterType::Date, e))
}

/// Splits a bracketed list value into its elements.
///
/// Elements keep their surrounding whitespace. `[]` is the empty list. A
/// value without surrounding brackets fails with `MalformedListValue`.
pub fn split_list(raw: &str) -> Result<Vec<&str>> {
    let inner = raw
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| StrainerError::MalformedListValue {
            value: raw.to_string(),
        })?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(inner.split(',').collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn string_passes_through() {
        assert_eq!(
            coerce(" Mixed Case ", FilterType::String).unwrap(),
            TypedValue::String(" Mixed Case ".to_string())
        );
    }

    #[test]
    fn numbers_parse_per_declared_type() {
        assert_eq!(
            coerce("-42", FilterType::Integer).unwrap(),
            TypedValue::Integer(-42)
        );
        assert_eq!(
            coerce("1.5", FilterType::Float).unwrap(),
            TypedValue::Float(1.5)
        );
        assert_eq!(
            coerce("2.25", FilterType::Double).unwrap(),
            TypedValue::Double(2.25)
        );
    }

    #[test]
    fn non_numeric_input_is_invalid() {
        for kind in [FilterType::Integer, FilterType::Float, FilterType::Double] {
            assert!(matches!(
                coerce("twelve", kind),
                Err(StrainerError::InvalidFilterValue { .. })
            ));
        }
        assert!(matches!(
            coerce("1.5", FilterType::Integer),
            Err(StrainerError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn dates_parse_as_instants() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(parse_date("2024-05-01T08:00:00Z").unwrap(), expected);
        assert_eq!(parse_date("2024-05-01T10:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_date("2024-05-01T08:00:00").unwrap(), expected);
        assert_eq!(
            parse_date("2024-05-01T08:00:00.000Z").unwrap(),
            expected
        );
    }

    #[test]
    fn malformed_dates_are_invalid() {
        for raw in ["2024-05-01", "yesterday", "2024-13-01T00:00:00Z", ""] {
            assert!(
                matches!(
                    parse_date(raw),
                    Err(StrainerError::InvalidFilterValue { .. })
                ),
                "{raw} should not parse"
            );
        }
    }

    #[test]
    fn lists_require_brackets() {
        assert_eq!(split_list("[a,b]").unwrap(), vec!["a", "b"]);
        assert_eq!(split_list("[a, b ,c]").unwrap(), vec!["a", " b ", "c"]);
        assert!(split_list("[]").unwrap().is_empty());
        for raw in ["a,b", "[a,b", "a,b]", ""] {
            assert!(matches!(
                split_list(raw),
                Err(StrainerError::MalformedListValue { .. })
            ));
        }
    }

    #[test]
    fn string_list_elements_keep_whitespace() {
        let operand = Operand::parse(Op::In, FilterType::String, Some("[a, b]")).unwrap();
        assert_eq!(
            operand.as_list().unwrap(),
            &[TypedValue::String("a".into()), TypedValue::String(" b".into())]
        );
    }

    #[test]
    fn operand_lists_coerce_each_element() {
        let operand = Operand::parse(Op::In, FilterType::Integer, Some("[1, 2,3]")).unwrap();
        assert_eq!(
            operand.as_list().unwrap(),
            &[
                TypedValue::Integer(1),
                TypedValue::Integer(2),
                TypedValue::Integer(3)
            ]
        );

        assert!(matches!(
            Operand::parse(Op::Nin, FilterType::Integer, Some("[1,x]")),
            Err(StrainerError::InvalidFilterValue { .. })
        ));
    }

    #[test]
    fn case_insensitive_operands_are_lowercased() {
        let operand = Operand::parse(Op::Inic, FilterType::String, Some("[Foo,BAR]")).unwrap();
        assert_eq!(
            operand,
            Operand::List(vec![
                TypedValue::String("foo".into()),
                TypedValue::String("bar".into())
            ])
        );

        let operand = Operand::parse(Op::Eqic, FilterType::String, Some("Alice")).unwrap();
        assert_eq!(operand.as_scalar().unwrap().as_str(), Some("alice"));

        let operand = Operand::parse(Op::Likeic, FilterType::String, Some("^Al")).unwrap();
        assert_eq!(operand.as_scalar().unwrap().as_str(), Some("^Al"));
    }

    #[test]
    fn operand_rejects_unsupported_combinations() {
        assert!(matches!(
            Operand::parse(Op::Like, FilterType::Date, Some("2024")),
            Err(StrainerError::UnsupportedOperatorForType {
                op: Op::Like,
                kind: FilterType::Date
            })
        ));
    }

    #[test]
    fn null_checks_take_no_value() {
        assert_eq!(
            Operand::parse(Op::IsNull, FilterType::Date, None).unwrap(),
            Operand::None
        );
        assert_eq!(
            Operand::parse(Op::IsNotNull, FilterType::Integer, Some("ignored")).unwrap(),
            Operand::None
        );
    }

    #[test]
    fn missing_value_is_invalid() {
        assert!(matches!(
            Operand::parse(Op::Eq, FilterType::String, None),
            Err(StrainerError::InvalidFilterValue { .. })
        ));
    }
}
