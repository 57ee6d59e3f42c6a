//! Dotted field path resolution.
//!
//! A path such as `owner.address.city` is followed one segment at a time,
//! asking the current object's [`Resolve`] table for each segment. Traversal
//! through multi-valued fields is refused: there is no way to tell which
//! element to follow.

use crate::error::{Result, StrainerError};
use crate::traits::Resolve;
use crate::value::Value;

/// Splits a dotted path into its segments.
///
/// An empty path, or a path with an empty segment (`a..b`, `.a`), names no
/// accessor and fails with `UnresolvableField`.
pub fn segments(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    match segments.iter().find(|s| s.is_empty()) {
        Some(_) => Err(StrainerError::unresolvable(path, "")),
        None => Ok(segments),
    }
}

/// Resolves `path` against a single source object.
///
/// A null intermediate value leaves nothing to resolve the next segment on
/// and fails with `UnresolvableField`.
pub fn resolve<'a>(path: &str, source: &'a dyn Resolve) -> Result<Value<'a>> {
    let segments = segments(path)?;
    walk(path, &segments, source, false)
}

/// Resolves `path` against two source objects, as needed when comparing a
/// pair of elements during sorting.
///
/// The first source must be present. A missing second source, or a null
/// intermediate value on either side, yields a `Null` leaf for that side so
/// the caller can apply its own null-handling policy.
pub fn resolve_pair<'a, 'b>(
    path: &str,
    first: Option<&'a dyn Resolve>,
    second: Option<&'b dyn Resolve>,
) -> Result<(Value<'a>, Value<'b>)> {
    let segments = segments(path)?;
    let first = first.ok_or_else(|| StrainerError::unresolvable(path, segments[0]))?;
    let left = walk(path, &segments, first, true)?;
    let right = match second {
        Some(second) => walk(path, &segments, second, true)?,
        None => Value::Null,
    };
    Ok((left, right))
}

fn walk<'a>(
    path: &str,
    segments: &[&str],
    source: &'a dyn Resolve,
    null_is_absent: bool,
) -> Result<Value<'a>> {
    let mut current = source;
    let last = segments.len() - 1;

    for (i, segment) in segments.iter().enumerate() {
        let value = current
            .resolve_field(segment)
            .ok_or_else(|| StrainerError::unresolvable(path, segment))?;

        if value.is_list() {
            return Err(StrainerError::unsupported_type(path, "list"));
        }
        if i == last {
            return Ok(value);
        }

        current = match value {
            Value::Object(next) => next,
            Value::Null if null_is_absent => return Ok(Value::Null),
            _ => return Err(StrainerError::unresolvable(path, segments[i + 1])),
        };
    }

    // segments() never returns an empty list
    Ok(Value::Null)
}
