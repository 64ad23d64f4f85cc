//! Unions of atomic types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::lang::primitives::PrimitiveId;

use super::{Atomic, TypeParseError, parse};

/// A set of [`Atomic`] alternatives meaning "any of these".
///
/// ## Notes
/// - A union is never empty. The special `mixed` marker stands for "unknown" and is never stored next to other
///   atomics: adding anything to `mixed` keeps it `mixed`, and adding `mixed` to anything collapses to `mixed`.
/// - Atomics are keyed by [`Atomic::value`], so `array<int>` and `array<string>` occupy the same slot; combining them
///   merges their type parameters.
/// - Storage is ordered, which keeps equality, hashing, and display deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Union {
    types: BTreeMap<String, Atomic>,
}

impl Union {
    /// Build a union from its alternatives.
    ///
    /// An empty iterator produces `mixed`, as does any input containing `mixed`.
    pub fn new(atomics: impl IntoIterator<Item = Atomic>) -> Self {
        let mut union = Self { types: BTreeMap::new() };
        for atomic in atomics {
            union.add(atomic);
        }
        if union.types.is_empty() {
            return Self::mixed();
        }
        union
    }

    fn single(atomic: Atomic) -> Self {
        let mut types = BTreeMap::new();
        types.insert(atomic.value.clone(), atomic);
        Self { types }
    }

    pub fn mixed() -> Self {
        Self::single(Atomic::primitive(PrimitiveId::Mixed))
    }

    pub fn null() -> Self {
        Self::single(Atomic::primitive(PrimitiveId::Null))
    }

    pub fn void() -> Self {
        Self::single(Atomic::primitive(PrimitiveId::Void))
    }

    pub fn int() -> Self {
        Self::single(Atomic::primitive(PrimitiveId::Int))
    }

    pub fn float() -> Self {
        Self::single(Atomic::primitive(PrimitiveId::Float))
    }

    pub fn string() -> Self {
        Self::single(Atomic::primitive(PrimitiveId::String))
    }

    pub fn bool() -> Self {
        Self::single(Atomic::primitive(PrimitiveId::Bool))
    }

    pub fn array() -> Self {
        Self::single(Atomic::primitive(PrimitiveId::Array))
    }

    /// A union holding exactly one class or interface.
    pub fn named(class: impl Into<String>) -> Self {
        Self::single(Atomic::new(class))
    }

    /// Parse a type string such as `int|null`, `?Foo`, or `array<string, Bar[]>`.
    pub fn parse(source: &str) -> Result<Self, TypeParseError> {
        parse::parse_type(source)
    }

    pub fn atomics(&self) -> impl Iterator<Item = &Atomic> {
        self.types.values()
    }

    pub fn get(&self, value: &str) -> Option<&Atomic> {
        self.types.get(value)
    }

    pub fn has(&self, value: &str) -> bool {
        self.types.contains_key(value)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_mixed(&self) -> bool {
        self.has("mixed")
    }

    /// Exactly `void`.
    pub fn is_void(&self) -> bool {
        self.types.len() == 1 && self.has("void")
    }

    /// Exactly `null`.
    pub fn is_null(&self) -> bool {
        self.types.len() == 1 && self.has("null")
    }

    /// `null` is one of the alternatives.
    pub fn is_nullable(&self) -> bool {
        self.has("null")
    }

    /// Add an alternative, merging type parameters if the slot is already taken.
    pub fn add(&mut self, atomic: Atomic) {
        if self.is_mixed() {
            return;
        }
        if atomic.is_mixed() {
            *self = Self::mixed();
            return;
        }
        match self.types.get_mut(&atomic.value) {
            Some(existing) => {
                existing.type_params = merge_type_params(&existing.type_params, &atomic.type_params);
            }
            None => {
                self.types.insert(atomic.value.clone(), atomic);
            }
        }
    }

    /// Make `null` one of the alternatives. Idempotent.
    pub fn add_null(&mut self) {
        self.add(Atomic::primitive(PrimitiveId::Null));
    }

    /// Replace the alternatives of `self` through `f`, dropping any for which it returns `None`.
    ///
    /// Returns `None` if nothing survives.
    pub fn filter_map_atomics(&self, mut f: impl FnMut(&Atomic) -> Option<Atomic>) -> Option<Self> {
        let atomics: Vec<Atomic> = self.atomics().filter_map(|a| f(a)).collect();
        if atomics.is_empty() { None } else { Some(Self::new(atomics)) }
    }

    /// Structural containment: every alternative of `self` also appears in `other`.
    pub fn is_in(&self, other: &Union) -> bool {
        self.is_in_by(other, |_, _| false)
    }

    /// Containment with an extra compatibility rule.
    ///
    /// An alternative of `self` is contained when `other` has the same value, or when `compatible(mine, theirs)`
    /// holds for some alternative of `other` (typically "extends or implements").
    pub fn is_in_by(&self, other: &Union, mut compatible: impl FnMut(&Atomic, &Atomic) -> bool) -> bool {
        if other.is_mixed() {
            return true;
        }
        self.atomics()
            .all(|mine| other.has(&mine.value) || other.atomics().any(|theirs| compatible(mine, theirs)))
    }

    /// Combine two unions into one that admits both.
    ///
    /// ## Notes
    /// - `mixed` absorbs everything.
    /// - `void` next to any value-carrying alternative becomes `null`: a callable that sometimes returns nothing
    ///   returns `null` on those paths.
    pub fn combine(&self, other: &Union) -> Union {
        if self.is_mixed() || other.is_mixed() {
            return Self::mixed();
        }
        let mut combined = self.clone();
        for atomic in other.atomics() {
            combined.add(atomic.clone());
        }
        if combined.has("void") && combined.types.len() > 1 {
            combined.types.remove("void");
            combined.add_null();
        }
        combined
    }

    /// Fold [`Union::combine`] over a list. Returns `None` for an empty list.
    pub fn combine_all<'u>(unions: impl IntoIterator<Item = &'u Union>) -> Option<Union> {
        unions.into_iter().fold(None, |acc, next| match acc {
            None => Some(next.clone()),
            Some(acc) => Some(acc.combine(next)),
        })
    }
}

fn merge_type_params(existing: &[Union], incoming: &[Union]) -> Vec<Union> {
    if existing.is_empty() || incoming.is_empty() || existing.len() != incoming.len() {
        // Mismatched arity (e.g. `array<int>` vs `array<string, int>`) degrades to the bare type.
        return Vec::new();
    }
    existing.iter().zip(incoming).map(|(a, b)| a.combine(b)).collect()
}

impl From<Atomic> for Union {
    fn from(atomic: Atomic) -> Self {
        Union::new([atomic])
    }
}

impl FromStr for Union {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Union::parse(s)
    }
}

impl fmt::Display for Union {
    /// Alternatives in key order, with `null` last (`string|null`, not `null|string`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.atomics().filter(|a| !a.is_null()).map(|a| a.to_string()).collect();
        if self.is_nullable() {
            parts.push("null".to_string());
        }
        write!(f, "{}", parts.join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> Union {
        Union::parse(s).unwrap()
    }

    #[test]
    fn mixed_is_exclusive() {
        let mut union = u("int|string");
        union.add(Atomic::new("mixed"));
        assert!(union.is_mixed());
        assert_eq!(union.len(), 1);

        union.add(Atomic::new("int"));
        assert_eq!(union, Union::mixed());
    }

    #[test]
    fn empty_union_is_mixed() {
        assert!(Union::new(Vec::new()).is_mixed());
    }

    #[test]
    fn add_null_is_idempotent() {
        let mut union = u("int");
        union.add_null();
        union.add_null();
        assert_eq!(union, u("int|null"));
        assert!(union.is_nullable());
        assert!(!union.is_null());
    }

    #[test]
    fn display_puts_null_last() {
        assert_eq!(u("null|string").to_string(), "string|null");
        assert_eq!(u("?Foo").to_string(), "Foo|null");
    }

    #[test]
    fn combine_turns_void_into_null() {
        let combined = Union::void().combine(&Union::int());
        assert_eq!(combined, u("int|null"));
        assert_eq!(Union::void().combine(&Union::void()), Union::void());
    }

    #[test]
    fn combine_merges_type_params() {
        let combined = u("array<int>").combine(&u("array<string>"));
        assert_eq!(combined.to_string(), "array<int|string>");
    }

    #[test]
    fn combine_all_of_nothing_is_none() {
        assert_eq!(Union::combine_all(Vec::<&Union>::new()), None);
        let parts = [u("int"), u("string"), u("null")];
        assert_eq!(Union::combine_all(parts.iter()), Some(u("int|string|null")));
    }

    #[test]
    fn is_in_is_structural() {
        assert!(u("int").is_in(&u("int|null")));
        assert!(!u("int|null").is_in(&u("int")));
        assert!(u("string").is_in(&Union::mixed()));
        assert!(u("Child").is_in_by(&u("Base"), |a, b| a.value == "Child" && b.value == "Base"));
    }
}
