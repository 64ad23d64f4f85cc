//! Return-statement effects of a callable body.
//!
//! Expression types are produced by the body walker, which records them per span in an [`ExprTypes`] table. This
//! module only reads that table: it finds the `return` statements of a body and collects their types.

use std::collections::HashMap;

use quill_core::Union;
use quill_syntax::ast::{Span, Spanned, Stmt};

/// Inferred expression types keyed by source span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExprTypes {
    types: HashMap<(usize, usize), Union>,
}

impl ExprTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, span: Span, ty: Union) {
        self.types.insert((span.start, span.end), ty);
    }

    pub fn get(&self, span: Span) -> Option<&Union> {
        self.types.get(&(span.start, span.end))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Types of every `return` in `stmts`, in source order.
///
/// Nested blocks are searched; closure bodies are not, since their returns belong to the closure. A bare `return;`
/// contributes `void` and a return whose expression type was never recorded contributes `mixed`.
pub fn return_types(stmts: &[Spanned<Stmt>], expr_types: &ExprTypes) -> Vec<Union> {
    let mut found = Vec::new();
    collect_returns(stmts, expr_types, &mut found);
    found
}

fn collect_returns(stmts: &[Spanned<Stmt>], expr_types: &ExprTypes, found: &mut Vec<Union>) {
    for stmt in stmts {
        match &stmt.node {
            Stmt::Return(None) => found.push(Union::void()),
            Stmt::Return(Some(expr)) => {
                found.push(expr_types.get(expr.span).cloned().unwrap_or_else(Union::mixed));
            }
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                collect_returns(then_branch, expr_types, found);
                if let Some(else_branch) = else_branch {
                    collect_returns(else_branch, expr_types, found);
                }
            }
            Stmt::While { body, .. } => collect_returns(body, expr_types, found),
            Stmt::Try { body, catches, finally } => {
                collect_returns(body, expr_types, found);
                for catch in catches {
                    collect_returns(catch, expr_types, found);
                }
                if let Some(finally) = finally {
                    collect_returns(finally, expr_types, found);
                }
            }
            Stmt::Expr(_) | Stmt::Throw(_) => {}
        }
    }
}

/// Whether every path through `stmts` ends in a `throw`.
///
/// Only the last statement matters: a `throw`, an `if`/`else` whose branches both only throw, or a `try` whose body
/// and handlers all only throw.
pub fn only_throws(stmts: &[Spanned<Stmt>]) -> bool {
    match stmts.last().map(|s| &s.node) {
        Some(Stmt::Throw(_)) => true,
        Some(Stmt::If {
            then_branch,
            else_branch: Some(else_branch),
            ..
        }) => only_throws(then_branch) && only_throws(else_branch),
        Some(Stmt::Try { body, catches, .. }) => only_throws(body) && catches.iter().all(|c| only_throws(c)),
        _ => false,
    }
}
