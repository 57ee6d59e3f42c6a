//! Implementation of the `#[derive(Resolve)]` macro.
//!
//! Generates the field accessor table the strainer path resolver walks,
//! along with field name constants, from `#[field(...)]` annotations.

mod attrs;
mod derive;

pub use derive::resolve_derive_impl;
