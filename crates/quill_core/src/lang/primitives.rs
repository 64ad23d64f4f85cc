//! Primitive type vocabulary.
//!
//! This registry covers every non-class type name the checker understands, together with the legacy spellings that
//! appear in docblocks (`integer`, `boolean`, `double`, ...). Anything not found here is treated as a class or
//! interface name.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-insensitive ASCII**.
//! - Categories drive the matcher's soft rules: scalar-vs-scalar mismatches are reported as "scalar matches", and
//!   numeric primitives satisfy a `numeric` parameter.
//!
//! ## Examples
//! ```rust
//! use quill_core::lang::primitives::{self, PrimitiveId};
//!
//! assert_eq!(primitives::from_str("integer"), Some(PrimitiveId::Int));
//! assert_eq!(primitives::from_str("Double"), Some(PrimitiveId::Float));
//! assert_eq!(primitives::as_str(PrimitiveId::Bool), "bool");
//! assert_eq!(primitives::from_str("DateTime"), None);
//! ```

/// Stable identifier for a primitive type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveId {
    Int,
    Float,
    String,
    Bool,
    False,
    True,
    Numeric,
    Array,
    Iterable,
    Callable,
    Object,
    Resource,
    Null,
    Void,
    Mixed,
    Static,
}

/// Broad classification used by compatibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveCategory {
    /// Single-valued scalar (`int`, `string`, `bool`, ...).
    Scalar,
    /// Containers and callables (`array`, `iterable`, `callable`, `object`, `resource`).
    Compound,
    /// Markers that are not values on their own (`null`, `void`, `mixed`, `static`).
    Special,
}

/// Metadata for a primitive type.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveInfo {
    pub id: PrimitiveId,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub category: PrimitiveCategory,
    /// Whether a value of this type can stand in for `numeric`.
    pub numeric: bool,
}

/// Registry of primitive types.
pub const PRIMITIVE_TYPES: &[PrimitiveInfo] = &[
    info(
        PrimitiveId::Int,
        "int",
        &["integer"],
        "Signed integer.",
        PrimitiveCategory::Scalar,
        true,
    ),
    info(
        PrimitiveId::Float,
        "float",
        &["double", "real"],
        "Floating-point number.",
        PrimitiveCategory::Scalar,
        true,
    ),
    info(
        PrimitiveId::String,
        "string",
        &[],
        "Byte string.",
        PrimitiveCategory::Scalar,
        false,
    ),
    info(
        PrimitiveId::Bool,
        "bool",
        &["boolean"],
        "Boolean.",
        PrimitiveCategory::Scalar,
        false,
    ),
    info(
        PrimitiveId::False,
        "false",
        &[],
        "The literal `false`, commonly returned on failure.",
        PrimitiveCategory::Scalar,
        false,
    ),
    info(
        PrimitiveId::True,
        "true",
        &[],
        "The literal `true`.",
        PrimitiveCategory::Scalar,
        false,
    ),
    info(
        PrimitiveId::Numeric,
        "numeric",
        &[],
        "Any number, or a string holding one.",
        PrimitiveCategory::Scalar,
        true,
    ),
    info(
        PrimitiveId::Array,
        "array",
        &[],
        "Ordered map; may carry key/value type parameters.",
        PrimitiveCategory::Compound,
        false,
    ),
    info(
        PrimitiveId::Iterable,
        "iterable",
        &[],
        "Array or Traversable.",
        PrimitiveCategory::Compound,
        false,
    ),
    info(
        PrimitiveId::Callable,
        "callable",
        &[],
        "Anything invokable: closures, callable strings, `[object, method]` arrays.",
        PrimitiveCategory::Compound,
        false,
    ),
    info(
        PrimitiveId::Object,
        "object",
        &[],
        "Any object instance.",
        PrimitiveCategory::Compound,
        false,
    ),
    info(
        PrimitiveId::Resource,
        "resource",
        &[],
        "Opaque handle to an external resource.",
        PrimitiveCategory::Compound,
        false,
    ),
    info(
        PrimitiveId::Null,
        "null",
        &[],
        "The null value.",
        PrimitiveCategory::Special,
        false,
    ),
    info(
        PrimitiveId::Void,
        "void",
        &[],
        "Absence of a return value.",
        PrimitiveCategory::Special,
        false,
    ),
    info(
        PrimitiveId::Mixed,
        "mixed",
        &[],
        "Unknown type; compatible with everything.",
        PrimitiveCategory::Special,
        false,
    ),
    info(
        PrimitiveId::Static,
        "static",
        &["$this"],
        "Late-static-bound class of the receiver.",
        PrimitiveCategory::Special,
        false,
    ),
];

/// Resolve a type name to a [`PrimitiveId`].
///
/// ## Parameters
/// - `name`: Candidate type name (canonical or alias).
///
/// ## Returns
/// - `Some(PrimitiveId)` if the spelling matches this registry.
/// - `None` otherwise (the name denotes a class or interface).
pub fn from_str(name: &str) -> Option<PrimitiveId> {
    if let Some(t) = PRIMITIVE_TYPES.iter().find(|t| t.canonical.eq_ignore_ascii_case(name)) {
        return Some(t.id);
    }
    PRIMITIVE_TYPES
        .iter()
        .find(|t| t.aliases.iter().any(|a| a.eq_ignore_ascii_case(name)))
        .map(|t| t.id)
}

/// Return the canonical spelling for a primitive type.
pub fn as_str(id: PrimitiveId) -> &'static str {
    info_for(id).canonical
}

/// Return the full metadata entry for a primitive type.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PrimitiveId) -> &'static PrimitiveInfo {
    PRIMITIVE_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("INVARIANT: every PrimitiveId has a registry entry")
}

/// Canonicalise a scalar spelling, leaving anything else untouched.
///
/// `integer` becomes `int`, `boolean` becomes `bool`, and `double`/`real` become `float`. Class names and unknown
/// spellings are returned as-is. `$this` is left alone: callers decide whether it means `static` or
/// the enclosing class.
pub fn canonical_spelling(token: &str) -> String {
    match from_str(token) {
        Some(PrimitiveId::Static) => token.to_string(),
        Some(id) => as_str(id).to_string(),
        None => token.to_string(),
    }
}

const fn info(
    id: PrimitiveId,
    canonical: &'static str,
    aliases: &'static [&'static str],
    description: &'static str,
    category: PrimitiveCategory,
    numeric: bool,
) -> PrimitiveInfo {
    PrimitiveInfo {
        id,
        canonical,
        aliases,
        description,
        category,
        numeric,
    }
}
