//! A single type term.

use std::fmt;

use crate::lang::primitives::{self, PrimitiveCategory, PrimitiveId};

use super::Union;

/// One alternative of a [`Union`]: a primitive (`int`, `array`, `null`, ...) or a class/interface name.
///
/// `value` is the canonical spelling and doubles as the atomic's identity inside a union. Generic parameters
/// (`array<string, int>`, `Collection<Foo>`) are carried for display and combination, but compatibility rules only
/// look at `value`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atomic {
    pub value: String,
    pub type_params: Vec<Union>,
}

impl Atomic {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            type_params: Vec::new(),
        }
    }

    pub fn generic(value: impl Into<String>, type_params: Vec<Union>) -> Self {
        Self {
            value: value.into(),
            type_params,
        }
    }

    pub fn primitive(id: PrimitiveId) -> Self {
        Self::new(primitives::as_str(id))
    }

    /// The primitive this atomic names, if any.
    pub fn primitive_id(&self) -> Option<PrimitiveId> {
        primitives::from_str(&self.value)
    }

    fn is(&self, id: PrimitiveId) -> bool {
        self.primitive_id() == Some(id)
    }

    pub fn is_null(&self) -> bool {
        self.is(PrimitiveId::Null)
    }

    pub fn is_void(&self) -> bool {
        self.is(PrimitiveId::Void)
    }

    pub fn is_mixed(&self) -> bool {
        self.is(PrimitiveId::Mixed)
    }

    pub fn is_array(&self) -> bool {
        self.is(PrimitiveId::Array)
    }

    pub fn is_string(&self) -> bool {
        self.is(PrimitiveId::String)
    }

    /// `int`, `float`, `string`, `bool`, `false`, `true` or `numeric`.
    pub fn is_scalar_type(&self) -> bool {
        self.primitive_id()
            .is_some_and(|id| primitives::info_for(id).category == PrimitiveCategory::Scalar)
    }

    /// The generic `object` type (any instance), not a specific class.
    pub fn is_object(&self) -> bool {
        self.is(PrimitiveId::Object)
    }

    /// The `numeric` category itself.
    pub fn is_numeric(&self) -> bool {
        self.is(PrimitiveId::Numeric)
    }

    /// Any type that satisfies `numeric`: `int`, `float`, or `numeric`.
    pub fn is_numeric_type(&self) -> bool {
        self.primitive_id().is_some_and(|id| primitives::info_for(id).numeric)
    }

    pub fn is_callable(&self) -> bool {
        self.is(PrimitiveId::Callable)
    }

    /// Whether this atomic names a class or interface rather than a primitive.
    pub fn is_class_like(&self) -> bool {
        self.primitive_id().is_none() && !self.value.starts_with('$')
    }
}

impl fmt::Display for Atomic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if !self.type_params.is_empty() {
            let params: Vec<String> = self.type_params.iter().map(|p| p.to_string()).collect();
            write!(f, "<{}>", params.join(", "))?;
        }
        Ok(())
    }
}

impl From<&str> for Atomic {
    fn from(value: &str) -> Self {
        Atomic::new(value)
    }
}
