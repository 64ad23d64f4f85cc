//! Canonical vocabulary for the analysed language.
//!
//! ## Notes
//! - Registries are `const` tables so they can be iterated by guardrail tests and tooling.

pub mod primitives;
