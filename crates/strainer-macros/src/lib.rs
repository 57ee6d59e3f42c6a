//! Proc macros for Strainer.
//!
//! This crate provides [`Resolve`], a derive macro generating the field
//! accessor table that strainer's path resolver walks when filtering and
//! sorting. Use it through the `derive` feature of the `strainer` crate.
//!
//! For working examples, see `strainer/tests/resolve_derive.rs`.

mod resolve;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Resolve` trait for filterable structs.
///
/// Only fields carrying a `#[field(...)]` kind are exposed; every other
/// field is invisible to filter and sort paths.
///
/// # Field Attributes
///
/// | Attribute | Field type | Exposed as |
/// |-----------|------------|------------|
/// | `String` | `String`, `&str`, anything `AsRef<str>` | string |
/// | `Integer` | integer primitives | number |
/// | `Float` | `f32` | number |
/// | `Double` | `f64`, `f32` | number |
/// | `Date` | anything implementing `ToDate` | date |
/// | `Bool` | `bool` | boolean |
/// | `Text` | anything implementing `Display` (e.g. enums) | string |
/// | `Nested` | a type implementing `Resolve` | object the path can descend into |
/// | `List` | collections with `len()` | list (paths may not traverse it) |
/// | `skip` | | not exposed |
/// | `rename = "..."` | | custom path segment name |
///
/// Wrapping any of these in `Option` exposes `None` as null.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Person::NAME`, `Person::BIRTH_DATE`)
/// 2. Implementation of `Resolve::resolve_field()`
///
/// # Example
///
/// ```ignore
/// use strainer::{Defaults, Filter, Op, Request, Resolve};
///
/// #[derive(Resolve)]
/// struct Address {
///     #[field(String)]
///     city: String,
/// }
///
/// #[derive(Resolve)]
/// struct Person {
///     #[field(String)]
///     name: String,
///
///     #[field(Integer)]
///     age: u8,
///
///     #[field(Nested)]
///     address: Option<Address>,
///
///     #[field(skip)]
///     password_hash: String,
/// }
///
/// let filter = Filter::new().and("address.city", Op::Eqic, "ljubljana");
/// let page = Request::new().filter(filter).process(&people, &Defaults::default())?;
/// ```
#[proc_macro_derive(Resolve, attributes(field))]
pub fn resolve_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    resolve::resolve_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
