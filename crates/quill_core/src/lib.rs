//! Provide the pure type algebra shared by every Quill component.
//!
//! This crate is small and dependency-free. It contains deterministic value types and helpers that the
//! checker uses to describe what a variable, parameter, or return value may hold:
//! - [`types::Atomic`]: a single type term (a primitive such as `int`, or a class name),
//! - [`types::Union`]: a set of atomics meaning "any of these", with the special `mixed` marker,
//! - [`types::parse`]: the type-string grammar used by declarations, docblocks, and the built-in signature database.
//!
//! ## Notes
//!
//! - This is a “semantic core” crate: **no IO**, no global state, and no knowledge of the class hierarchy. Anything
//!   that needs inheritance information takes it as a closure or lives in the checker crate.
//! - Primitive spellings and their aliases live in [`lang::primitives`] so the parser, the checker, and the CLI agree
//!   on what `integer` or `double` mean.

pub mod lang;
pub mod types;

pub use types::{Atomic, TypeParseError, Union};
