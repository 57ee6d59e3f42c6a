//! Filter operators and declared value types.
//!
//! [`Op`] lists every supported filter operator; [`FilterType`] is the type
//! tag a client declares for a clause. Together they form the operator x type
//! matrix: [`Op::supports`] says which cells have defined semantics.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Comparison operator for a filter clause.
///
/// Operators are grouped by the types they support:
/// - **Any type**: `Eq`, `Neq`, `Gt`, `Gte`, `Lt`, `Lte`, `In`, `Nin`
/// - **String only**: `Eqic`, `Neqic`, `Like`, `Likeic`, `Inic`, `Ninic`
/// - **Type-agnostic**: `IsNull`, `IsNotNull`
///
/// The `ic` suffix marks the case-insensitive variant of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Op {
    /// Equal.
    Eq,
    /// Equal, ignoring case.
    Eqic,
    /// Not equal.
    Neq,
    /// Not equal, ignoring case.
    Neqic,
    /// Regular expression search.
    Like,
    /// Regular expression search, ignoring case.
    Likeic,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Member of a list.
    In,
    /// Member of a list, ignoring case.
    Inic,
    /// Not a member of a list.
    Nin,
    /// Not a member of a list, ignoring case.
    Ninic,
    /// Value is absent.
    IsNull,
    /// Value is present.
    IsNotNull,
}

impl Op {
    /// Returns `true` for the `ic` variants.
    pub fn is_case_insensitive(self) -> bool {
        matches!(self, Op::Eqic | Op::Neqic | Op::Likeic | Op::Inic | Op::Ninic)
    }

    /// Returns `true` for operators whose value is a bracketed list.
    pub fn is_list_op(self) -> bool {
        matches!(self, Op::In | Op::Inic | Op::Nin | Op::Ninic)
    }

    /// Returns `true` for operators that test presence and take no value.
    pub fn is_null_check(self) -> bool {
        matches!(self, Op::IsNull | Op::IsNotNull)
    }

    /// Returns `true` for the regular expression operators.
    pub fn is_pattern_op(self) -> bool {
        matches!(self, Op::Like | Op::Likeic)
    }

    /// Maps an `ic` variant to its case-sensitive counterpart.
    ///
    /// Case folding happens on the operands, so evaluation only needs
    /// the base operator.
    pub fn normalize(self) -> Op {
        match self {
            Op::Eqic => Op::Eq,
            Op::Neqic => Op::Neq,
            Op::Likeic => Op::Like,
            Op::Inic => Op::In,
            Op::Ninic => Op::Nin,
            other => other,
        }
    }

    /// Returns `true` if this operator has defined semantics for `kind`.
    pub fn supports(self, kind: FilterType) -> bool {
        match kind {
            FilterType::String => true,
            FilterType::Integer | FilterType::Float | FilterType::Double | FilterType::Date => {
                !self.is_case_insensitive() && !self.is_pattern_op()
            }
        }
    }

    /// Evaluates an ordering-based operator given the ordering of the
    /// field value relative to the filter value.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self.normalize() {
            Op::Eq => ordering == Ordering::Equal,
            Op::Neq => ordering != Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Returns the wire name of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "EQ",
            Op::Eqic => "EQIC",
            Op::Neq => "NEQ",
            Op::Neqic => "NEQIC",
            Op::Like => "LIKE",
            Op::Likeic => "LIKEIC",
            Op::Gt => "GT",
            Op::Gte => "GTE",
            Op::Lt => "LT",
            Op::Lte => "LTE",
            Op::In => "IN",
            Op::Inic => "INIC",
            Op::Nin => "NIN",
            Op::Ninic => "NINIC",
            Op::IsNull => "ISNULL",
            Op::IsNotNull => "ISNOTNULL",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared type of a filter clause's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FilterType {
    /// Textual value; the field's textual form is compared.
    #[default]
    String,
    /// 64-bit signed integer.
    Integer,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// ISO-8601 date-time, compared as an instant.
    Date,
}

impl FilterType {
    /// Returns `true` for the numeric types.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FilterType::Integer | FilterType::Float | FilterType::Double
        )
    }

    /// Returns the wire name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterType::String => "STRING",
            FilterType::Integer => "INTEGER",
            FilterType::Float => "FLOAT",
            FilterType::Double => "DOUBLE",
            FilterType::Date => "DATE",
        }
    }
}

impl std::fmt::Display for FilterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
