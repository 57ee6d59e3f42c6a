//! Pagination windows and the response envelope.
//!
//! A [`Pagination`] carries the window a client asked for, either bound of
//! which may be missing. Missing bounds are filled from a [`DefaultsSource`]
//! when the window is applied, never when the request is built, so a change
//! of configured defaults affects every later request.

use serde::{Deserialize, Serialize};

/// Limit used when neither the request nor the configuration sets one.
pub const DEFAULT_LIMIT: usize = 20;

/// Offset used when neither the request nor the configuration sets one.
pub const DEFAULT_OFFSET: usize = 0;

/// Source of the default window bounds, queried once per resolution.
pub trait DefaultsSource {
    fn default_limit(&self) -> usize;
    fn default_offset(&self) -> usize;
}

impl<D: DefaultsSource + ?Sized> DefaultsSource for &D {
    fn default_limit(&self) -> usize {
        (**self).default_limit()
    }

    fn default_offset(&self) -> usize {
        (**self).default_offset()
    }
}

/// Fixed default window bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub limit: usize,
    pub offset: usize,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl DefaultsSource for Defaults {
    fn default_limit(&self) -> usize {
        self.limit
    }

    fn default_offset(&self) -> usize {
        self.offset
    }
}

/// The window a client requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

impl Pagination {
    /// Creates a window with both bounds set.
    pub fn new(limit: usize, offset: usize) -> Self {
        Pagination {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Sets the maximum number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Fills missing bounds from `defaults`, returning `(limit, offset)`.
    pub fn resolve(&self, defaults: &dyn DefaultsSource) -> (usize, usize) {
        (
            self.limit.unwrap_or_else(|| defaults.default_limit()),
            self.offset.unwrap_or_else(|| defaults.default_offset()),
        )
    }
}

/// The window actually applied, with the pre-window item count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationOutput {
    pub limit: usize,
    pub offset: usize,
    pub total: usize,
}

impl PaginationOutput {
    /// Resolves `pagination` (or the defaults, when absent) against `total`.
    pub fn resolve(
        pagination: Option<&Pagination>,
        total: usize,
        defaults: &dyn DefaultsSource,
    ) -> Self {
        let (limit, offset) = pagination
            .copied()
            .unwrap_or_default()
            .resolve(defaults);
        PaginationOutput {
            limit,
            offset,
            total,
        }
    }

    /// Returns the half-open index range of the window within `0..total`.
    ///
    /// Offsets at or past the end give an empty range.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset.min(self.total);
        let end = start.saturating_add(self.limit).min(self.total);
        start..end
    }
}

/// A page of results with its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationWrapper<T> {
    pub pagination: PaginationOutput,
    pub result: Vec<T>,
}

impl<T> PaginationWrapper<T> {
    /// Wraps a page with its metadata.
    pub fn new(pagination: PaginationOutput, result: Vec<T>) -> Self {
        PaginationWrapper { pagination, result }
    }

    /// Converts every result, keeping the metadata.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginationWrapper<U> {
        PaginationWrapper {
            pagination: self.pagination,
            result: self.result.into_iter().map(f).collect(),
        }
    }

    /// Returns the number of results on this page.
    pub fn len(&self) -> usize {
        self.result.len()
    }

    /// Returns `true` if this page is empty.
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Returns the results, dropping the metadata.
    pub fn into_result(self) -> Vec<T> {
        self.result
    }
}

impl<T: Clone> PaginationWrapper<&T> {
    /// Clones the borrowed results into an owned page.
    pub fn cloned(self) -> PaginationWrapper<T> {
        self.map(T::clone)
    }
}

/// Applies a window to an already filtered and sorted collection.
///
/// The collection size before windowing is reported as the total.
pub fn paginate<T>(
    items: Vec<T>,
    pagination: Option<&Pagination>,
    defaults: &dyn DefaultsSource,
) -> PaginationWrapper<T> {
    let output = PaginationOutput::resolve(pagination, items.len(), defaults);
    let range = output.range();
    let result = items
        .into_iter()
        .skip(range.start)
        .take(range.len())
        .collect();
    PaginationWrapper::new(output, result)
}

/// Wraps a page produced elsewhere, such as by a query executor.
///
/// The page is taken as is; `total` is the item count before windowing.
pub fn wrap_page<T>(
    page: Vec<T>,
    pagination: Option<&Pagination>,
    total: usize,
    defaults: &dyn DefaultsSource,
) -> PaginationWrapper<T> {
    PaginationWrapper::new(PaginationOutput::resolve(pagination, total, defaults), page)
}
