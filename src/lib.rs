#![forbid(unsafe_code)]
//! Quill: callable-level type checking for a dynamically typed language.
//!
//! Quill verifies functions, methods, and closures against their declared signatures. It resolves parameter types
//! from declarations and docblocks, selects built-in overloads at call sites, memoises method effects, and compares
//! declared return types with what a body actually returns. Statement-level analysis is delegated to a
//! [`BodyWalker`](checker::BodyWalker); class and signature knowledge come from a [`Codebase`](codebase::Codebase).
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. Analysis findings are never Rust
//!   errors; they are [`Issue`](quill_syntax::diagnostics::Issue) values. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a checker bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod callmap;
pub mod checker;
pub mod cli;
pub mod codebase;
pub mod config;

pub use quill_core::{Atomic, TypeParseError, Union};
pub use quill_syntax::{ast, diagnostics};

pub use callmap::{CallMap, CallMapError};
pub use checker::{BodyWalker, CallableChecker, CallableKind, CheckEnv, Context, EffectMemo, SourceInfo, TypeMatcher};
pub use codebase::{ClassEntry, ClassHierarchy, Codebase, MemoryCodebase, SignatureStore};
pub use config::{CheckerConfig, IssueLevel, MatchPolicy};
