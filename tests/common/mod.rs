//! Shared fakes for the integration tests: a scripted body walker and codebase builders.

#![allow(dead_code)]

use quill::ast::{Expr, FunctionLike, Span, Spanned, Stmt};
use quill::checker::{BodyWalker, CallableState, CheckEnv, Context};
use quill::codebase::{ClassEntry, MemoryCodebase};
use quill::diagnostics::CheckResult;

type Script = Box<dyn FnMut(&mut Context, &mut CallableState) -> CheckResult>;

/// Body walker that runs a closure instead of analysing statements, and counts how often it ran.
pub struct ScriptedWalker {
    script: Script,
    pub calls: usize,
}

impl ScriptedWalker {
    pub fn new(script: impl FnMut(&mut Context, &mut CallableState) -> CheckResult + 'static) -> Self {
        Self {
            script: Box::new(script),
            calls: 0,
        }
    }

    pub fn idle() -> Self {
        Self::new(|_, _| Ok(()))
    }
}

impl BodyWalker for ScriptedWalker {
    fn walk(
        &mut self,
        _body: &[Spanned<Stmt>],
        context: &mut Context,
        state: &mut CallableState,
        _env: &CheckEnv<'_>,
    ) -> CheckResult {
        self.calls += 1;
        (self.script)(context, state)
    }
}

pub fn stmt(node: Stmt) -> Spanned<Stmt> {
    Spanned::new(node, Span::at_line(1))
}

/// A variable expression at byte offset `start`; its span is the key recorded expression types are stored under.
pub fn expr_at(start: usize) -> Spanned<Expr> {
    Spanned::new(Expr::Variable(format!("v{start}")), Span::new(start, start + 1, 1))
}

pub fn return_at(start: usize) -> Spanned<Stmt> {
    stmt(Stmt::Return(Some(expr_at(start))))
}

/// A named callable declared on line 3 with the given body.
pub fn callable(name: &str, body: Vec<Spanned<Stmt>>) -> FunctionLike {
    FunctionLike::function(name, Span::at_line(3)).with_body(body)
}

/// `App\Model` ← `App\User` ← `App\Admin`, with `App\User` implementing `App\Authenticatable`.
pub fn model_hierarchy() -> MemoryCodebase {
    MemoryCodebase::new()
        .with_class(ClassEntry::new("App\\Model"))
        .with_class(ClassEntry::new("App\\Authenticatable"))
        .with_class(
            ClassEntry::new("App\\User")
                .extends("App\\Model")
                .implements("App\\Authenticatable"),
        )
        .with_class(ClassEntry::new("App\\Admin").extends("App\\User"))
}
