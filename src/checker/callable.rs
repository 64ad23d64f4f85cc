//! Per-callable orchestration.
//!
//! A [`CallableChecker`] owns the analysis of one function, method, or closure:
//!
//! 1. [`CallableChecker::check`] seeds the scope (receiver, parameters), hands the body to a [`BodyWalker`], then
//!    reduces the resulting scope to what a caller can observe, memoising that outcome for methods.
//! 2. [`CallableChecker::check_return_types`] compares the declared return type with the types the walker recorded
//!    for the body's `return` statements.

use std::collections::BTreeMap;

use quill_core::Union;
use quill_syntax::ast::{FunctionLike, Span, Spanned, Stmt, TypeHint};
use quill_syntax::diagnostics::{Aborted, CheckResult, Issue, IssueKind, IssueSink, Severity, issues};

use super::context::{Context, RECEIVER_VAR, ScopeEffect};
use super::effects::{self, ExprTypes};
use super::memo::{EffectMemo, MemoKey};
use super::params::{self, DocblockProblem, ParamDescriptor};
use super::resolve::{TypeResolver, flesh_out_types};
use super::CheckEnv;
use crate::codebase::Aliases;
use crate::config::IssueLevel;

/// What kind of callable is being checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallableKind {
    Function,
    /// A method of `class` (fully qualified). Only methods take part in memoisation.
    Method { class: String },
    Closure,
}

/// The file a callable is declared in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInfo {
    pub file_name: String,
    pub namespace: Option<String>,
    pub aliases: Aliases,
    /// Issue names suppressed for the whole file.
    pub suppressed_issues: Vec<String>,
}

impl SourceInfo {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Register `use <target> as <alias>`.
    pub fn with_alias(mut self, alias: &str, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.to_ascii_lowercase(), target.into());
        self
    }

    pub fn with_suppressed_issue(mut self, issue: impl Into<String>) -> Self {
        self.suppressed_issues.push(issue.into());
        self
    }
}

/// State a body walk accumulates for its callable.
#[derive(Debug, Clone, Default)]
pub struct CallableState {
    return_paths: BTreeMap<String, ScopeEffect>,
    expr_types: ExprTypes,
    has_context: bool,
    check_methods: bool,
}

impl CallableState {
    /// Merge `context` into the snapshot kept for `return_type_key`.
    ///
    /// Walkers call this at every `return`, keyed by the returned type, and once with the empty key for the path that
    /// falls off the end of the body.
    pub fn add_return_types(&mut self, return_type_key: &str, context: &Context) {
        match self.return_paths.get_mut(return_type_key) {
            Some(existing) => existing.absorb(&context.vars_in_scope, &context.vars_possibly_in_scope),
            None => {
                self.return_paths.insert(return_type_key.to_string(), context.snapshot());
            }
        }
    }

    pub fn return_path(&self, return_type_key: &str) -> Option<&ScopeEffect> {
        self.return_paths.get(return_type_key)
    }

    pub fn record_expr_type(&mut self, span: Span, ty: Union) {
        self.expr_types.record(span, ty);
    }

    pub fn expr_types(&self) -> &ExprTypes {
        &self.expr_types
    }

    /// Whether the incoming scope already had bindings.
    pub fn has_context(&self) -> bool {
        self.has_context
    }

    pub fn check_methods(&self) -> bool {
        self.check_methods
    }
}

/// Statement-level analysis of a callable body.
pub trait BodyWalker {
    /// Walk `body`, updating `context` statement by statement.
    ///
    /// Implementations record expression types and return paths in `state`, and use `env` for argument checks at
    /// call sites.
    fn walk(
        &mut self,
        body: &[Spanned<Stmt>],
        context: &mut Context,
        state: &mut CallableState,
        env: &CheckEnv<'_>,
    ) -> CheckResult;
}

pub struct CallableChecker<'a> {
    decl: &'a FunctionLike,
    kind: CallableKind,
    source: &'a SourceInfo,
    env: CheckEnv<'a>,
    state: CallableState,
}

impl<'a> CallableChecker<'a> {
    pub fn new(decl: &'a FunctionLike, kind: CallableKind, source: &'a SourceInfo, env: CheckEnv<'a>) -> Self {
        Self {
            decl,
            kind,
            source,
            env,
            state: CallableState::default(),
        }
    }

    pub fn kind(&self) -> &CallableKind {
        &self.kind
    }

    pub fn state(&self) -> &CallableState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CallableState {
        &mut self.state
    }

    fn class(&self) -> Option<&str> {
        match &self.kind {
            CallableKind::Method { class } => Some(class.as_str()),
            CallableKind::Function | CallableKind::Closure => None,
        }
    }

    fn name(&self) -> &str {
        self.decl.name.as_deref().unwrap_or_default()
    }

    /// Lower-cased identity used as a lookup key: `Foo\Bar::dothing`, `helper`. Closures have none.
    pub fn method_id(&self) -> Option<String> {
        self.cased_id(&self.name().to_ascii_lowercase())
    }

    /// Identity as written, for messages: `Foo\Bar::doThing`.
    pub fn cased_method_id(&self) -> Option<String> {
        self.cased_id(self.name())
    }

    fn cased_id(&self, name: &str) -> Option<String> {
        match &self.kind {
            CallableKind::Method { class } => Some(format!("{class}::{name}")),
            CallableKind::Function => Some(name.to_string()),
            CallableKind::Closure => None,
        }
    }

    fn display_id(&self) -> String {
        self.cased_method_id().unwrap_or_else(|| "{closure}".to_string())
    }

    fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(
            self.env.codebase.as_hierarchy(),
            self.source.namespace.as_deref(),
            &self.source.aliases,
        )
        .with_self_class(self.class())
    }

    /// Hand `issue` to the sink unless configuration or suppression tags drop it.
    fn report(&self, issue: Issue, sink: &mut dyn IssueSink) -> CheckResult {
        let level = self.env.config.issue_level(issue.kind);
        if level == IssueLevel::Suppress || self.is_suppressed(issue.kind) {
            tracing::trace!(kind = %issue.kind, "issue suppressed");
            return Ok(());
        }

        let issue = match level {
            IssueLevel::Info => issue.with_severity(Severity::Info),
            IssueLevel::Error | IssueLevel::Suppress => issue,
        };
        if sink.accept(issue) && level == IssueLevel::Error {
            return Err(Aborted);
        }
        Ok(())
    }

    fn is_suppressed(&self, kind: IssueKind) -> bool {
        let from_docblock = self.decl.docblock.iter().flat_map(|d| &d.suppressed_issues);
        self.source
            .suppressed_issues
            .iter()
            .chain(from_docblock)
            .any(|name| IssueKind::from_name(name) == Some(kind))
    }

    /// Parameters resolved from the declaration and narrowed by the docblock.
    ///
    /// Docblock problems are reported; the offending tags are ignored.
    pub fn resolve_params(&self, sink: &mut dyn IssueSink) -> Result<Vec<ParamDescriptor>, Aborted> {
        let resolver = self.resolver();
        let mut signature: Vec<ParamDescriptor> =
            self.decl.params.iter().map(|p| params::resolve_param(p, &resolver)).collect();

        if let Some(docblock) = &self.decl.docblock {
            params::improve_params_from_docblock(&docblock.params, &mut signature, &resolver, |problem| {
                self.report(self.docblock_issue(problem), sink)
            })?;
        }
        Ok(signature)
    }

    fn docblock_issue(&self, problem: DocblockProblem) -> Issue {
        let (file, line) = (self.source.file_name.as_str(), self.decl.line());
        match problem {
            DocblockProblem::UnknownParam { name } => {
                let callable = self.method_id().unwrap_or_else(|| self.display_id());
                issues::unknown_docblock_param(&name, &callable, file, line)
            }
            DocblockProblem::Unparseable { name, type_string } => {
                issues::unparseable_docblock_type(&name, &type_string, file, line)
            }
            DocblockProblem::WrongType { name, found, expected } => {
                issues::docblock_param_type_mismatch(&name, &found.to_string(), &expected.to_string(), file, line)
            }
        }
    }

    /// Report class-typed parameter hints naming unknown classes. `self` and `parent` are not checked.
    fn check_param_classes(&self, sink: &mut dyn IssueSink) -> CheckResult {
        let resolver = self.resolver();
        for param in &self.decl.params {
            let Some(TypeHint::Name(name)) = &param.type_hint else {
                continue;
            };
            if name.is_special("self") || name.is_special("parent") {
                continue;
            }

            let class = if name.fully_qualified {
                name.joined()
            } else {
                resolver.absolute_class(&name.joined())
            };
            if !self.env.codebase.class_or_interface_exists(&class) {
                self.report(
                    issues::undefined_class(&class, &self.source.file_name, self.decl.line()),
                    sink,
                )?;
            }
        }
        Ok(())
    }

    /// Parameter bindings to seed the body's scope with.
    ///
    /// Methods use the stored signature when there is one, with `self`/`static` resolved against `self_class`.
    fn param_bindings(
        &self,
        self_class: Option<&str>,
        sink: &mut dyn IssueSink,
    ) -> Result<Vec<ParamDescriptor>, Aborted> {
        match &self.kind {
            CallableKind::Method { .. } => {
                let stored = self.method_id().and_then(|id| self.env.codebase.method_params(&id));
                match stored {
                    Some(mut stored) => {
                        for param in &mut stored {
                            param.ty = flesh_out_types(&param.ty, self_class).unwrap_or_else(Union::mixed);
                        }
                        Ok(stored)
                    }
                    None => self.resolve_params(sink),
                }
            }
            CallableKind::Function | CallableKind::Closure => {
                self.check_param_classes(sink)?;
                self.resolve_params(sink)
            }
        }
    }

    fn memo_key(&self, context: &Context) -> Option<MemoKey> {
        match (&self.kind, self.env.this_class) {
            (CallableKind::Method { .. }, Some(_)) => self.method_id().map(|id| MemoKey::new(id, context.fingerprint())),
            _ => None,
        }
    }

    /// Analyse the body against `context`, leaving in it only what callers can observe.
    ///
    /// ## Notes
    /// - Without statements this is a no-op.
    /// - A method checked while a receiver class is known consults `memo` first; a hit replaces `context` with the
    ///   recorded outcome and skips the walk. A completed walk records its outcome.
    /// - Every walk starts from an empty [`CallableState`]; nothing recorded by an earlier `check` carries over.
    /// - After the walk, the fall-through return path (empty key) is merged in, then every binding that is not a
    ///   receiver field is dropped.
    ///
    /// ## Returns
    /// `Err(Aborted)` if the sink asked to stop; `context` is then left as the walk left it.
    #[tracing::instrument(skip_all, fields(callable = %self.display_id()))]
    pub fn check(
        &mut self,
        context: &mut Context,
        check_methods: bool,
        walker: &mut dyn BodyWalker,
        memo: &mut EffectMemo,
        sink: &mut dyn IssueSink,
    ) -> CheckResult {
        if !self.decl.has_statements() {
            return Ok(());
        }

        let has_context = !context.vars_in_scope.is_empty();
        let memo_key = self.memo_key(context);
        if let Some(key) = &memo_key {
            if let Some(effect) = memo.get(key) {
                tracing::debug!("memo hit, skipping body");
                context.apply(effect);
                return Ok(());
            }
            tracing::debug!("memo miss");
        }

        if matches!(self.kind, CallableKind::Method { .. }) {
            if let Some(class) = &context.self_class {
                let receiver = Union::named(class.clone());
                context.vars_in_scope.insert(RECEIVER_VAR.to_string(), receiver);
            }
        }

        for param in self.param_bindings(context.self_class.as_deref(), sink)? {
            context.assign(param.name, param.ty);
        }

        self.state = CallableState {
            has_context,
            check_methods,
            ..CallableState::default()
        };
        walker.walk(self.decl.statements(), context, &mut self.state, &self.env)?;

        if let Some(path) = self.state.return_path("") {
            context.merge_return_path(path);
        }
        context.retain_instance_fields();

        if let Some(key) = memo_key {
            memo.insert(key, context.snapshot());
        }
        Ok(())
    }

    /// Compare the stored return type with the types of the body's `return` statements.
    ///
    /// ## Notes
    /// - Constructors, closures, bodiless callables, and callables without a stored return type are skipped.
    /// - No returns at all is fine for `void` and for bodies that only throw.
    /// - A `mixed` on either side is never reported, nor is `null` against `void`.
    #[tracing::instrument(skip_all, fields(callable = %self.display_id()))]
    pub fn check_return_types(&self, sink: &mut dyn IssueSink) -> CheckResult {
        if !self.decl.has_statements() || self.decl.is_constructor() {
            return Ok(());
        }
        let Some(method_id) = self.method_id() else {
            return Ok(());
        };

        let stored = match &self.kind {
            CallableKind::Method { .. } => self.env.codebase.method_return_type(&method_id),
            CallableKind::Function => self.env.codebase.function_return_type(&method_id, &self.source.file_name),
            CallableKind::Closure => None,
        };
        let Some(declared) = stored.and_then(|stored| flesh_out_types(&stored, self.class())) else {
            return Ok(());
        };

        let statements = self.decl.statements();
        let cased_id = self.display_id();
        let (file, line) = (self.source.file_name.as_str(), self.decl.line());

        let returns = effects::return_types(statements, &self.state.expr_types);
        let Some(inferred) = Union::combine_all(&returns) else {
            if declared.is_void() || effects::only_throws(statements) {
                return Ok(());
            }
            tracing::debug!(declared = %declared, "no return statements");
            return self.report(issues::missing_return(&cased_id, &declared.to_string(), file, line), sink);
        };

        if inferred.is_mixed() || declared.is_mixed() {
            return Ok(());
        }
        if inferred.is_null() && declared.is_void() {
            return Ok(());
        }

        if !self.env.matcher().has_identical_types(&declared, &inferred, self.class()) {
            let issue = issues::return_type_mismatch(&declared.to_string(), &cased_id, &inferred.to_string(), file, line);
            return self.report(issue, sink);
        }
        Ok(())
    }
}
