//! Strainer - filter, sort and pagination resolution for object collections.
//!
//! Strainer takes the declarative filter, sort and pagination arguments a
//! client sends with a list query and either applies them to an in-memory
//! collection or translates them into a neutral [`QueryDescriptor`] for a
//! backend to execute. It supports:
//!
//! - Dotted field paths resolved at runtime (`owner.address.city`)
//! - Sixteen operators, with case-insensitive variants for strings
//! - Typed values: strings, integers, floats, doubles and dates
//! - Multi-key stable sorting with per-key direction
//! - Offset/limit windows with configurable defaults and accurate totals
//!
//! # Quick Start
//!
//! ```rust
//! use strainer::{Defaults, Filter, Number, Op, Pagination, Request, Resolve, Sort, Value};
//!
//! struct Task {
//!     name: String,
//!     priority: i32,
//! }
//!
//! impl Resolve for Task {
//!     fn resolve_field(&self, field: &str) -> Option<Value<'_>> {
//!         match field {
//!             "name" => Some(Value::String(&self.name)),
//!             "priority" => Some(Value::Number(Number::from(self.priority))),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let tasks = vec![
//!     Task { name: "Write docs".into(), priority: 3 },
//!     Task { name: "Fix bug".into(), priority: 5 },
//!     Task { name: "Old task".into(), priority: 1 },
//! ];
//!
//! let page = Request::new()
//!     .filter(Filter::new().and("name", Op::Neqic, "old task"))
//!     .sort(Sort::new().desc("priority"))
//!     .pagination(Pagination::new(10, 0))
//!     .process(&tasks, &Defaults::default())
//!     .unwrap();
//!
//! assert_eq!(page.pagination.total, 2);
//! assert_eq!(page.result[0].name, "Fix bug");
//! ```
//!
//! # Operators and Types
//!
//! Every clause declares the type its value is coerced to (`STRING` when
//! omitted):
//!
//! | Type | Operators |
//! |------|-----------|
//! | STRING | all, including `EQIC`, `NEQIC`, `LIKE`, `LIKEIC`, `INIC`, `NINIC` |
//! | INTEGER, FLOAT, DOUBLE, DATE | `EQ`, `NEQ`, `GT`, `GTE`, `LT`, `LTE`, `IN`, `NIN`, `ISNULL`, `ISNOTNULL` |
//!
//! `LIKE` is a regular expression searched anywhere in the value. List
//! operators take values of the form `[a,b,c]`. A null field only matches
//! `ISNULL`.
//!
//! # Delegated Execution
//!
//! [`Request::execute`] builds a [`QueryDescriptor`] with the same value
//! coercion as the in-memory path and hands it to a [`QueryExecutor`].
//! [`MemoryExecutor`] is an executor over an owned vector.

mod clause;
mod coerce;
mod config;
mod descriptor;
mod error;
mod executor;
mod op;
mod ordering;
mod pagination;
mod path;
mod request;
mod traits;
mod value;

pub use clause::{Filter, FilterField, Predicate};
pub use coerce::{coerce, parse_date, split_list, Operand, TypedValue};
pub use config::EngineConfig;
pub use descriptor::{projection, QueryDescriptor, QueryFilter, QueryOrder};
pub use error::{Result, StrainerError};
pub use executor::{MemoryExecutor, QueryExecutor};
pub use op::{FilterType, Op};
pub use ordering::{compare_values, Dir, Sort, SortField};
pub use pagination::{
    paginate, wrap_page, Defaults, DefaultsSource, Pagination, PaginationOutput,
    PaginationWrapper, DEFAULT_LIMIT, DEFAULT_OFFSET,
};
pub use path::{resolve as resolve_path, resolve_pair};
pub use request::{filter, sort, Request};
pub use traits::{Resolve, ToDate};
pub use value::{Number, Value};

#[cfg(feature = "derive")]
pub use strainer_macros::Resolve;
