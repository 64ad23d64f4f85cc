//! Callable checking.
//!
//! ## Modules
//!
//! - `callable` - Per-callable orchestration: scope setup, body walk, return verification
//! - `context` - Scope context and return-path snapshots
//! - `params` - Parameter descriptors from declarations, introspection, and docblocks
//! - `resolve` - Namespace/alias resolution of names and docblock types
//! - `matcher` - Argument/parameter and declared/inferred type compatibility
//! - `overloads` - Signature selection at call sites
//! - `effects` - Return-statement types of a body
//! - `memo` - Effect memo cache
//!
//! ## Design
//!
//! Everything a check needs from outside (class hierarchy, stored signatures, the built-in database, configuration)
//! travels in a [`CheckEnv`]. Mutable analysis state is passed explicitly: the [`Context`] by exclusive borrow, the
//! [`EffectMemo`] owned by the run coordinator, diagnostics through an
//! [`IssueSink`](quill_syntax::diagnostics::IssueSink).

pub mod callable;
pub mod context;
pub mod effects;
pub mod matcher;
pub mod memo;
pub mod overloads;
pub mod params;
pub mod resolve;


use quill_core::Union;

use crate::callmap::CallMap;
use crate::codebase::Codebase;
use crate::config::CheckerConfig;

pub use callable::{BodyWalker, CallableChecker, CallableKind, CallableState, SourceInfo};
pub use context::{Context, ScopeEffect};
pub use effects::ExprTypes;
pub use matcher::{ParamMatch, TypeMatcher};
pub use memo::{EffectMemo, MemoKey};
pub use params::ParamDescriptor;

/// Read-only collaborators shared by every check in a run.
#[derive(Clone, Copy)]
pub struct CheckEnv<'a> {
    pub config: &'a CheckerConfig,
    pub codebase: &'a dyn Codebase,
    pub call_map: &'a CallMap,
    /// The class currently analysed as the receiver. Method checks are memoised only while one is set.
    pub this_class: Option<&'a str>,
}

impl<'a> CheckEnv<'a> {
    pub fn new(config: &'a CheckerConfig, codebase: &'a dyn Codebase, call_map: &'a CallMap) -> Self {
        Self {
            config,
            codebase,
            call_map,
            this_class: None,
        }
    }

    pub fn with_this_class(mut self, class: Option<&'a str>) -> Self {
        self.this_class = class;
        self
    }

    pub fn matcher(&self) -> TypeMatcher<'a> {
        TypeMatcher::new(self.codebase.as_hierarchy(), self.config)
    }

    /// See [`overloads::params_by_id`].
    pub fn params_by_id(&self, id: &str, arg_types: &[Option<Union>], file_name: &str) -> Vec<ParamDescriptor> {
        overloads::params_by_id(self, id, arg_types, file_name)
    }
}
