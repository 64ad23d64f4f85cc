//! Type algebra: atomics, unions, and the type-string grammar.
//!
//! ## Examples
//! ```rust
//! use quill_core::types::Union;
//!
//! let declared = Union::parse("int|null").unwrap();
//! assert!(declared.is_nullable());
//! assert!(Union::int().is_in(&declared));
//! assert_eq!(declared.to_string(), "int|null");
//! ```

mod atomic;
pub mod parse;
mod union;

pub use atomic::Atomic;
pub use union::Union;

/// Error produced when a type string does not follow the grammar in [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeParseError {
    /// The string was empty or whitespace.
    Empty,
    /// The string ended where a type name or closing `>` was expected.
    UnexpectedEnd,
    /// A delimiter appeared where a type name was expected, or trailing input remained.
    UnexpectedToken { token: String, position: usize },
    /// A generic parameter list was not closed.
    UnbalancedBrackets(String),
}

impl std::fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeParseError::Empty => write!(f, "empty type string"),
            TypeParseError::UnexpectedEnd => write!(f, "type string ended unexpectedly"),
            TypeParseError::UnexpectedToken { token, position } => {
                write!(f, "unexpected '{token}' at token {position}")
            }
            TypeParseError::UnbalancedBrackets(name) => write!(f, "unclosed type parameters for '{name}'"),
        }
    }
}

impl std::error::Error for TypeParseError {}
