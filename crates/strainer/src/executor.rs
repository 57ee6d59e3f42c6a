//! Delegated query execution.

use crate::clause::{retain_matching, Predicate};
use crate::descriptor::{QueryDescriptor, QueryFilter};
use crate::error::{Result, StrainerError};
use crate::ordering::sort_items;
use crate::traits::Resolve;

/// A backend that can serve a [`QueryDescriptor`].
///
/// How the backend maps field paths onto its storage is up to the
/// implementation; it only has to honor the descriptor's filters, ordering
/// and window.
pub trait QueryExecutor<T> {
    /// Error reported by the backend.
    type Error: Into<Box<dyn std::error::Error + Send + Sync>>;

    /// Fetches the page of entities described by `query`.
    fn fetch(&self, query: &QueryDescriptor) -> std::result::Result<Vec<T>, Self::Error>;

    /// Counts every entity matching `query`'s filters, ignoring its window.
    fn count(&self, query: &QueryDescriptor) -> std::result::Result<usize, Self::Error>;
}

impl<T, E: QueryExecutor<T> + ?Sized> QueryExecutor<T> for &E {
    type Error = E::Error;

    fn fetch(&self, query: &QueryDescriptor) -> std::result::Result<Vec<T>, Self::Error> {
        (**self).fetch(query)
    }

    fn count(&self, query: &QueryDescriptor) -> std::result::Result<usize, Self::Error> {
        (**self).count(query)
    }
}

/// An executor backed by an owned vector.
///
/// Descriptors are evaluated with the in-memory filter and sort, so results
/// match what [`Request::process`](crate::Request::process) returns for the
/// same request.
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor<T> {
    items: Vec<T>,
}

impl<T> MemoryExecutor<T> {
    pub fn new(items: Vec<T>) -> Self {
        MemoryExecutor { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: Resolve> MemoryExecutor<T> {
    fn matching(&self, query: &QueryDescriptor) -> Result<Vec<&T>> {
        let predicates = query
            .filters
            .iter()
            .map(QueryFilter::predicate)
            .collect::<Result<Vec<Predicate>>>()?;
        retain_matching(self.items.iter().collect(), &predicates)
    }
}

impl<T: Resolve + Clone> QueryExecutor<T> for MemoryExecutor<T> {
    type Error = StrainerError;

    fn fetch(&self, query: &QueryDescriptor) -> Result<Vec<T>> {
        let sorted = sort_items(self.matching(query)?, &query.sort())?;
        let offset = query.offset.unwrap_or(0);
        let limit = query.limit.unwrap_or(usize::MAX);
        Ok(sorted
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count(&self, query: &QueryDescriptor) -> Result<usize> {
        Ok(self.matching(query)?.len())
    }
}

impl<T> From<Vec<T>> for MemoryExecutor<T> {
    fn from(items: Vec<T>) -> Self {
        MemoryExecutor::new(items)
    }
}
