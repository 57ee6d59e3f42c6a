//! Request builder and pipeline.
//!
//! A [`Request`] bundles the optional filter, sort and pagination a client
//! sent and runs them either against an in-memory slice
//! ([`Request::process`]) or through a [`QueryExecutor`]
//! ([`Request::execute`]).

use serde::{Deserialize, Serialize};

use crate::clause::{retain_matching, Filter};
use crate::descriptor::{projection, QueryDescriptor};
use crate::error::{Result, StrainerError};
use crate::executor::QueryExecutor;
use crate::ordering::{sort_items, Sort};
use crate::pagination::{paginate, wrap_page, DefaultsSource, Pagination, PaginationWrapper};
use crate::traits::Resolve;

/// A filter, sort and pagination request.
///
/// Each part is optional; a missing part leaves that stage a no-op, except
/// that a missing pagination still pages by the configured defaults.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use strainer::{Defaults, Filter, FilterType, Op, Pagination, Request, Sort};
///
/// let people = vec![
///     json!({"name": "Ana", "age": 31}),
///     json!({"name": "Bo", "age": 17}),
///     json!({"name": "Cy", "age": 45}),
/// ];
///
/// let page = Request::new()
///     .filter(Filter::new().and_typed("age", Op::Gte, "18", FilterType::Integer))
///     .sort(Sort::new().desc("age"))
///     .pagination(Pagination::new(10, 0))
///     .process(&people, &Defaults::default())
///     .unwrap();
///
/// assert_eq!(page.pagination.total, 2);
/// assert_eq!(page.result[0]["name"], "Cy");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub filter: Option<Filter>,
    #[serde(default)]
    pub sort: Option<Sort>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl Request {
    /// Creates an empty request.
    pub fn new() -> Self {
        Request::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    // ========================================================================
    // In-memory execution
    // ========================================================================

    /// Filters, sorts and pages `items`.
    ///
    /// The caller's slice is never reordered; the result borrows from it.
    /// The reported total counts the filtered items before windowing.
    pub fn process<'a, T: Resolve>(
        &self,
        items: &'a [T],
        defaults: &dyn DefaultsSource,
    ) -> Result<PaginationWrapper<&'a T>> {
        let ordered = self.process_unpaginated(items)?;
        let page = paginate(ordered, self.pagination.as_ref(), defaults);
        tracing::debug!(
            total = page.pagination.total,
            limit = page.pagination.limit,
            offset = page.pagination.offset,
            returned = page.len(),
            "paginated request"
        );
        Ok(page)
    }

    /// Filters and sorts `items` without windowing.
    pub fn process_unpaginated<'a, T: Resolve>(&self, items: &'a [T]) -> Result<Vec<&'a T>> {
        tracing::debug!(
            items = items.len(),
            clauses = self.filter.as_ref().map_or(0, |f| f.fields.len()),
            sort_keys = self.sort.as_ref().map_or(0, |s| s.fields.len()),
            "processing request"
        );
        let filtered = filter(items, self.filter.as_ref())?;
        sort_refs(filtered, self.sort.as_ref())
    }

    // ========================================================================
    // Delegated execution
    // ========================================================================

    /// Translates this request into a [`QueryDescriptor`].
    pub fn descriptor(
        &self,
        defaults: &dyn DefaultsSource,
        force_pagination: bool,
    ) -> Result<QueryDescriptor> {
        QueryDescriptor::build(
            self.pagination.as_ref(),
            self.sort.as_ref(),
            self.filter.as_ref(),
            defaults,
            force_pagination,
        )
    }

    /// Runs this request through `executor` and wraps the returned page.
    ///
    /// `selection` is the requested output shape (see [`projection`]); pass
    /// an empty slice to fetch every field.
    pub fn execute<T, E>(
        &self,
        executor: &E,
        selection: &[&str],
        defaults: &dyn DefaultsSource,
    ) -> Result<PaginationWrapper<T>>
    where
        E: QueryExecutor<T> + ?Sized,
    {
        let query = self
            .descriptor(defaults, true)?
            .with_fields(projection(selection));
        tracing::debug!(
            limit = ?query.limit,
            offset = ?query.offset,
            filters = query.filters.len(),
            fields = query.fields.len(),
            "delegating request"
        );
        let page = executor.fetch(&query).map_err(StrainerError::executor)?;
        let total = executor.count(&query).map_err(StrainerError::executor)?;
        Ok(wrap_page(page, self.pagination.as_ref(), total, defaults))
    }

    /// Runs this request through `executor` without a window, returning
    /// every matching entity.
    pub fn execute_unpaginated<T, E>(
        &self,
        executor: &E,
        selection: &[&str],
        defaults: &dyn DefaultsSource,
    ) -> Result<Vec<T>>
    where
        E: QueryExecutor<T> + ?Sized,
    {
        let query = self
            .descriptor(defaults, false)?
            .with_fields(projection(selection));
        tracing::debug!(filters = query.filters.len(), "delegating unpaginated request");
        executor.fetch(&query).map_err(StrainerError::executor)
    }
}

/// Keeps the items of `items` matching every clause of `filter`, in order.
///
/// Clauses are only validated when there is something to filter, so an
/// empty slice never fails.
pub fn filter<'a, T: Resolve>(items: &'a [T], filter: Option<&Filter>) -> Result<Vec<&'a T>> {
    let refs: Vec<&'a T> = items.iter().collect();
    match filter {
        Some(filter) if !filter.is_empty() && !refs.is_empty() => {
            retain_matching(refs, &filter.compile()?)
        }
        _ => Ok(refs),
    }
}

/// Returns the items of `items` ordered by `sort`.
///
/// The sort is stable: items equal on every key keep their input order.
pub fn sort<'a, T: Resolve>(items: &'a [T], sort: Option<&Sort>) -> Result<Vec<&'a T>> {
    sort_refs(items.iter().collect(), sort)
}

fn sort_refs<'a, T: Resolve>(items: Vec<&'a T>, sort: Option<&Sort>) -> Result<Vec<&'a T>> {
    match sort {
        Some(sort) => sort_items(items, sort),
        None => Ok(items),
    }
}
