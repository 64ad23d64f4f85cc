//! Scope context: variable types along one analysis path.

use std::collections::{BTreeMap, BTreeSet};

use quill_core::Union;

/// Name of the implicit receiver variable.
pub const RECEIVER_VAR: &str = "this";

/// Prefix of bindings that describe the receiver's fields (`this->count`).
pub const FIELD_PREFIX: &str = "this->";

pub type VarTypes = BTreeMap<String, Union>;

/// Variable bindings of the path currently being analysed.
///
/// `vars_possibly_in_scope` holds every variable that some path up to here may have assigned. Both maps are ordered,
/// so a context has one canonical form and [`Context::fingerprint`] can derive equality and hashing from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub vars_in_scope: VarTypes,
    pub vars_possibly_in_scope: BTreeSet<String>,
    /// The enclosing class when analysing a method body.
    pub self_class: Option<String>,
}

/// The externally visible outcome of running a callable body: what the caller's context becomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeEffect {
    pub vars_in_scope: VarTypes,
    pub vars_possibly_in_scope: BTreeSet<String>,
}

/// Structural identity of a context's bindings, used as part of a memo key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContextFingerprint(ScopeEffect);

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_self_class(mut self, class: impl Into<String>) -> Self {
        self.self_class = Some(class.into());
        self
    }

    /// Bind `name` to `ty` and mark it possibly in scope.
    pub fn assign(&mut self, name: impl Into<String>, ty: Union) {
        let name = name.into();
        self.vars_possibly_in_scope.insert(name.clone());
        self.vars_in_scope.insert(name, ty);
    }

    pub fn var_type(&self, name: &str) -> Option<&Union> {
        self.vars_in_scope.get(name)
    }

    pub fn fingerprint(&self) -> ContextFingerprint {
        ContextFingerprint(self.snapshot())
    }

    pub fn snapshot(&self) -> ScopeEffect {
        ScopeEffect {
            vars_in_scope: self.vars_in_scope.clone(),
            vars_possibly_in_scope: self.vars_possibly_in_scope.clone(),
        }
    }

    /// Replace the bindings with a recorded effect.
    pub fn apply(&mut self, effect: &ScopeEffect) {
        self.vars_in_scope = effect.vars_in_scope.clone();
        self.vars_possibly_in_scope = effect.vars_possibly_in_scope.clone();
    }

    /// Fold a return-path snapshot into this context.
    pub fn merge_return_path(&mut self, path: &ScopeEffect) {
        self.vars_in_scope = combine_keyed_types(&self.vars_in_scope, &path.vars_in_scope);
        self.vars_possibly_in_scope
            .extend(path.vars_possibly_in_scope.iter().cloned());
    }

    /// Drop every binding that is not a field of the receiver.
    pub fn retain_instance_fields(&mut self) {
        self.vars_in_scope.retain(|name, _| name.starts_with(FIELD_PREFIX));
        self.vars_possibly_in_scope.retain(|name| name.starts_with(FIELD_PREFIX));
    }
}

impl ScopeEffect {
    /// Merge another snapshot of the same return path into this one.
    pub fn absorb(&mut self, vars_in_scope: &VarTypes, vars_possibly_in_scope: &BTreeSet<String>) {
        self.vars_in_scope = combine_keyed_types(vars_in_scope, &self.vars_in_scope);
        self.vars_possibly_in_scope.extend(vars_possibly_in_scope.iter().cloned());
    }
}

/// Pointwise union of two binding maps.
///
/// Keys present on one side only keep that side's type; keys on both sides get the combined union.
pub fn combine_keyed_types(new_types: &VarTypes, existing_types: &VarTypes) -> VarTypes {
    let mut result = existing_types.clone();
    for (name, new_type) in new_types {
        let combined = match result.get(name) {
            Some(existing) if existing == new_type => continue,
            Some(existing) => new_type.combine(existing),
            None => new_type.clone(),
        };
        result.insert(name.clone(), combined);
    }
    result
}
