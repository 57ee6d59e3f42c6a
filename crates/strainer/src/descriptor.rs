//! Backend-neutral query descriptors.
//!
//! A [`QueryDescriptor`] is what gets handed to a query executor when the
//! data lives in a backend rather than in memory. Its filter values are
//! coerced with the same rules the in-memory evaluator applies, so a
//! request that fails in one path fails identically in the other.

use serde::Serialize;

use crate::clause::{Filter, Predicate};
use crate::coerce::Operand;
use crate::error::Result;
use crate::op::{FilterType, Op};
use crate::ordering::{Dir, Sort, SortField};
use crate::pagination::{DefaultsSource, Pagination};

/// One ordering key of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryOrder {
    pub field: String,
    pub order: Dir,
}

/// One filter clause of a descriptor, with its value already coerced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryFilter {
    pub field: String,
    pub op: Op,
    #[serde(rename = "type")]
    pub kind: FilterType,
    pub value: Operand,
}

impl QueryFilter {
    /// Rebuilds the in-memory predicate for this clause.
    pub fn predicate(&self) -> Result<Predicate> {
        Predicate::from_parts(&self.field, self.op, self.kind, self.value.clone())
    }
}

/// A filter/sort/pagination request translated for a query executor.
///
/// Without forced pagination both window bounds are `None`, meaning every
/// matching entity is requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryDescriptor {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
    pub order: Vec<QueryOrder>,
    pub filters: Vec<QueryFilter>,
    pub fields: Vec<String>,
}

impl QueryDescriptor {
    /// Translates a request into a descriptor.
    ///
    /// With `force_pagination`, a missing pagination is replaced by the
    /// defaults; otherwise it is left out. Missing bounds of a supplied
    /// pagination are always filled from `defaults`.
    pub fn build(
        pagination: Option<&Pagination>,
        sort: Option<&Sort>,
        filter: Option<&Filter>,
        defaults: &dyn DefaultsSource,
        force_pagination: bool,
    ) -> Result<Self> {
        let window = match pagination {
            Some(p) => Some(*p),
            None if force_pagination => Some(Pagination::default()),
            None => None,
        };
        let (limit, offset) = match window {
            Some(p) => {
                let (limit, offset) = p.resolve(defaults);
                (Some(limit), Some(offset))
            }
            None => (None, None),
        };

        let order = sort
            .map(|s| {
                s.fields
                    .iter()
                    .map(|f| QueryOrder {
                        field: f.field.clone(),
                        order: f.order,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let filters = filter
            .map(|f| {
                f.fields
                    .iter()
                    .map(|field| {
                        let predicate = Predicate::compile(field)?;
                        Ok(QueryFilter {
                            field: field.field.clone(),
                            op: field.op,
                            kind: field.kind(),
                            value: predicate.operand().clone(),
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        Ok(QueryDescriptor {
            offset,
            limit,
            order,
            filters,
            fields: Vec::new(),
        })
    }

    /// Sets the field projection.
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Returns the ordering keys as a [`Sort`].
    pub fn sort(&self) -> Sort {
        self.order
            .iter()
            .map(|o| SortField::new(o.field.clone(), o.order))
            .collect::<Vec<_>>()
            .into()
    }
}

/// Derives the dotted field projection from a selection set.
///
/// Selection keys are slash-separated paths such as `result/address/city`.
/// When the `result` root is selected, only paths below it are kept, with
/// the root stripped. A path that is a dotted prefix of another selected
/// path is dropped so only leaves remain.
///
/// ```
/// use strainer::projection;
///
/// let fields = projection(&["pagination", "pagination/total", "result", "result/name",
///     "result/address", "result/address/city"]);
/// assert_eq!(fields, vec!["name", "address.city"]);
/// ```
pub fn projection<S: AsRef<str>>(selection: &[S]) -> Vec<String> {
    let keys: Vec<&str> = selection.iter().map(AsRef::as_ref).collect();
    let under_result = keys.contains(&"result");

    let mut fields: Vec<String> = Vec::new();
    for key in keys {
        let path = if under_result {
            match key.split_once('/') {
                Some(("result", rest)) => rest,
                _ => continue,
            }
        } else {
            key
        };
        let dotted = path.replace('/', ".");
        if !dotted.is_empty() && !fields.contains(&dotted) {
            fields.push(dotted);
        }
    }

    fields
        .iter()
        .filter(|f| !fields.iter().any(|other| is_parent_of(f, other)))
        .cloned()
        .collect()
}

fn is_parent_of(parent: &str, path: &str) -> bool {
    path.strip_prefix(parent)
        .is_some_and(|rest| rest.starts_with('.'))
}
