//! Sort keys and the multi-key comparator.
//!
//! Provides [`Dir`] for sort direction, [`SortField`] for one key and
//! [`Sort`] for an ordered list of keys. The first key is the primary one;
//! later keys only break ties.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrainerError};
use crate::path;
use crate::traits::Resolve;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the wire name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "ASC",
            Dir::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Dotted path of the field to sort by.
    pub field: String,
    /// The sort direction.
    #[serde(default)]
    pub order: Dir,
}

impl SortField {
    /// Creates a sort key with the given direction.
    pub fn new(field: impl Into<String>, order: Dir) -> Self {
        SortField {
            field: field.into(),
            order,
        }
    }

    /// Creates an ascending sort key.
    pub fn asc(field: impl Into<String>) -> Self {
        SortField::new(field, Dir::Asc)
    }

    /// Creates a descending sort key.
    pub fn desc(field: impl Into<String>) -> Self {
        SortField::new(field, Dir::Desc)
    }
}

/// An ordered list of sort keys.
///
/// ```
/// use strainer::{Dir, Sort};
///
/// let sort = Sort::new().asc("lastName").desc("age");
/// assert_eq!(sort.fields[1].order, Dir::Desc);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    #[serde(default)]
    pub fields: Vec<SortField>,
}

impl Sort {
    /// Creates an empty sort, which leaves order unchanged.
    pub fn new() -> Self {
        Sort::default()
    }

    /// Appends an ascending key.
    pub fn asc(self, field: &str) -> Self {
        self.by(field, Dir::Asc)
    }

    /// Appends a descending key.
    pub fn desc(self, field: &str) -> Self {
        self.by(field, Dir::Desc)
    }

    /// Appends a key with the given direction.
    pub fn by(mut self, field: &str, order: Dir) -> Self {
        self.fields.push(SortField::new(field, order));
        self
    }

    /// Returns `true` if this sort has no keys.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Compares two items key by key.
    ///
    /// A key whose value is absent on either side gives no signal and the
    /// next key decides. Returns `Equal` when no key decides.
    pub fn compare(&self, a: &dyn Resolve, b: &dyn Resolve) -> Result<Ordering> {
        for key in &self.fields {
            let (left, right) = path::resolve_pair(&key.field, Some(a), Some(b))?;
            if let Some(ordering) = compare_values(&key.field, &left, &right)? {
                if ordering != Ordering::Equal {
                    return Ok(key.order.apply(ordering));
                }
            }
        }
        Ok(Ordering::Equal)
    }
}

impl From<Vec<SortField>> for Sort {
    fn from(fields: Vec<SortField>) -> Self {
        Sort { fields }
    }
}

/// Compares two resolved field values in ascending order.
///
/// Numbers compare numerically and dates chronologically; any other scalar
/// pair compares by textual form. Returns `Ok(None)` when either side is
/// absent or a number is NaN. Nested objects cannot be ordered and fail
/// with `UnsupportedFieldType`.
pub fn compare_values(path: &str, a: &Value<'_>, b: &Value<'_>) -> Result<Option<Ordering>> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => Ok(None),
        (Value::Object(_) | Value::List(_), _) => {
            Err(StrainerError::unsupported_type(path, a.kind_name()))
        }
        (_, Value::Object(_) | Value::List(_)) => {
            Err(StrainerError::unsupported_type(path, b.kind_name()))
        }
        (Value::Number(x), Value::Number(y)) => Ok(x.compare(*y)),
        (Value::Date(x), Value::Date(y)) => Ok(Some(x.cmp(y))),
        _ => Ok(a.text().zip(b.text()).map(|(x, y)| x.cmp(&y))),
    }
}

/// Sorts items by `sort`, keeping equal items in their input order.
pub(crate) fn sort_items<'a, T: Resolve>(items: Vec<&'a T>, sort: &Sort) -> Result<Vec<&'a T>> {
    if sort.is_empty() || items.is_empty() {
        return Ok(items);
    }
    // every key must resolve to an orderable value, whatever the size
    let first: &dyn Resolve = items[0];
    for key in &sort.fields {
        let (value, _) = path::resolve_pair(&key.field, Some(first), None)?;
        compare_values(&key.field, &value, &value)?;
    }
    try_stable_sort(items, |a, b| sort.compare(*a, *b))
}

/// Bottom-up merge sort with a fallible comparator.
///
/// The first comparator error aborts the sort. Equal elements keep their
/// relative order, and a comparator that is not a total order never causes
/// a panic.
pub(crate) fn try_stable_sort<E, F>(items: Vec<E>, mut cmp: F) -> Result<Vec<E>>
where
    E: Copy,
    F: FnMut(&E, &E) -> Result<Ordering>,
{
    let len = items.len();
    if len < 2 {
        return Ok(items);
    }

    let mut src = items;
    let mut dst = Vec::with_capacity(len);
    let mut width = 1;
    while width < len {
        dst.clear();
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut i, mut j) = (start, mid);
            while i < mid && j < end {
                // right run wins only when strictly smaller
                if cmp(&src[j], &src[i])? == Ordering::Less {
                    dst.push(src[j]);
                    j += 1;
                } else {
                    dst.push(src[i]);
                    i += 1;
                }
            }
            dst.extend_from_slice(&src[i..mid]);
            dst.extend_from_slice(&src[j..end]);
            start = end;
        }
        std::mem::swap(&mut src, &mut dst);
        width *= 2;
    }
    Ok(src)
}
