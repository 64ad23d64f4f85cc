//! Shared syntax model for Quill: declaration AST and diagnostics.
//!
//! Parsing source text is not part of Quill. Front ends build these nodes from their own parser output and hand
//! them to the checker, which only needs declaration-level structure (names, parameters, type hints, defaults,
//! docblocks) plus enough of each body to find `return` and `throw` statements.
//!
//! ## Notes
//! - Spans carry a 1-based `line` next to byte offsets, since every diagnostic is reported as `(file, line)`.
//! - Expression types inferred by a body walker are *not* stored on nodes; they live in a side table keyed by span
//!   so the AST can be shared immutably.
//!
//! ## Examples
//! ```rust
//! use quill_syntax::ast::{FunctionLike, Param, Span, TypeHint};
//!
//! let decl = FunctionLike::function("greet", Span::at_line(3))
//!     .with_param(Param::new("name").with_type(TypeHint::keyword("string")));
//! assert_eq!(decl.params.len(), 1);
//! assert!(!decl.has_statements());
//! ```

pub mod ast;
pub mod diagnostics;
