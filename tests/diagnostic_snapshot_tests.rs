//! Snapshot tests pinning the exact text of every diagnostic the checker emits.
//!
//! Each test drives a real check and snapshots the rendered issue, so a wording change shows up as a snapshot diff.

mod common;

use common::{ScriptedWalker, callable, expr_at, return_at, stmt};
use quill::ast::{Docblock, FunctionLike, Param, Span, Stmt, TypeHint};
use quill::callmap::CallMap;
use quill::checker::{CallableChecker, CallableKind, CheckEnv, Context, EffectMemo, SourceInfo};
use quill::codebase::MemoryCodebase;
use quill::config::CheckerConfig;
use quill::diagnostics::{Issue, IssueBuffer};
use quill::Union;

fn source() -> SourceInfo {
    SourceInfo::new("src/Billing.php")
        .with_namespace("App")
        .with_alias("Money", "Vendor\\Money\\Amount")
}

/// Run `check` on `decl` and return the one-line renderings of everything reported.
fn check_issues(decl: &FunctionLike, kind: CallableKind, codebase: &MemoryCodebase) -> Vec<String> {
    let (config, call_map, source) = (CheckerConfig::default(), CallMap::empty(), source());
    let env = CheckEnv::new(&config, codebase, &call_map);
    let mut issues = IssueBuffer::new();

    let _ = CallableChecker::new(decl, kind, &source, env).check(
        &mut Context::new(),
        true,
        &mut ScriptedWalker::idle(),
        &mut EffectMemo::new(),
        &mut issues,
    );
    issues.issues().iter().map(Issue::render).collect()
}

fn return_issue(decl: &FunctionLike, codebase: &MemoryCodebase, returned: Option<Union>) -> Issue {
    let (config, call_map, source) = (CheckerConfig::default(), CallMap::empty(), source());
    let env = CheckEnv::new(&config, codebase, &call_map);
    let mut checker = CallableChecker::new(decl, CallableKind::Function, &source, env);
    if let Some(ty) = returned {
        checker.state_mut().record_expr_type(expr_at(10).span, ty);
    }

    let mut issues = IssueBuffer::new();
    checker.check_return_types(&mut issues).unwrap();
    issues.into_issues().remove(0)
}

#[test]
fn unknown_docblock_param() {
    let decl = callable("charge", vec![return_at(10)])
        .with_param(Param::new("amount").with_type(TypeHint::keyword("int")))
        .with_docblock(Docblock::default().with_param("$ammount", "int"));

    let rendered = check_issues(&decl, CallableKind::Function, &MemoryCodebase::new());
    insta::assert_snapshot!(
        rendered.join("\n"),
        @"src/Billing.php:3: invalid-annotation: Parameter $ammount does not appear in the argument list for charge"
    );
}

#[test]
fn unknown_docblock_param_in_closure() {
    let decl = FunctionLike::closure(Span::at_line(3))
        .with_body(vec![return_at(10)])
        .with_docblock(Docblock::default().with_param("$item", "string"));

    let rendered = check_issues(&decl, CallableKind::Closure, &MemoryCodebase::new());
    insta::assert_snapshot!(
        rendered.join("\n"),
        @"src/Billing.php:3: invalid-annotation: Parameter $item does not appear in the argument list for {closure}"
    );
}

#[test]
fn docblock_type_outside_declared_type() {
    let decl = callable("charge", vec![return_at(10)])
        .with_param(Param::new("amount").with_type(TypeHint::keyword("int")))
        .with_docblock(Docblock::default().with_param("$amount", "string[]"));

    let rendered = check_issues(&decl, CallableKind::Function, &MemoryCodebase::new());
    insta::assert_snapshot!(
        rendered.join("\n"),
        @"src/Billing.php:3: invalid-annotation: Parameter $amount has wrong type 'array<string>', should be 'int'"
    );
}

#[test]
fn unparseable_docblock_type() {
    let decl = callable("charge", vec![return_at(10)])
        .with_param(Param::new("amount"))
        .with_docblock(Docblock::default().with_param("$amount", "array<int"));

    let rendered = check_issues(&decl, CallableKind::Function, &MemoryCodebase::new());
    insta::assert_snapshot!(
        rendered.join("\n"),
        @"src/Billing.php:3: invalid-annotation: Parameter $amount has unparseable type 'array<int'"
    );
}

#[test]
fn undefined_param_classes_resolve_through_namespace_and_aliases() {
    let decl = callable("refund", vec![return_at(10)])
        .with_param(Param::new("invoice").with_type(TypeHint::class("Invoice")))
        .with_param(Param::new("amount").with_type(TypeHint::class("Money")))
        .with_param(Param::new("ledger").with_type(TypeHint::class("\\Ledger")));

    let rendered = check_issues(&decl, CallableKind::Function, &MemoryCodebase::new());
    insta::assert_snapshot!(rendered.join("\n"), @r"
    src/Billing.php:3: undefined-class: Class or interface App\Invoice does not exist
    src/Billing.php:3: undefined-class: Class or interface Vendor\Money\Amount does not exist
    src/Billing.php:3: undefined-class: Class or interface Ledger does not exist
    ");
}

#[test]
fn missing_return() {
    let decl = callable("total", vec![stmt(Stmt::Expr(expr_at(10)))]);
    let codebase = MemoryCodebase::new().with_function("total", vec![], Some(Union::parse("?float").unwrap()));

    let issue = return_issue(&decl, &codebase, None);
    insta::assert_snapshot!(
        issue.render(),
        @"src/Billing.php:3: invalid-return-type: No return type was found for method total but return type 'float|null' was expected"
    );
}

#[test]
fn return_type_mismatch() {
    let decl = callable("total", vec![return_at(10)]);
    let codebase = MemoryCodebase::new().with_function("total", vec![], Some(Union::float()));

    let issue = return_issue(&decl, &codebase, Some(Union::parse("string|null").unwrap()));
    insta::assert_snapshot!(
        issue.render(),
        @"src/Billing.php:3: invalid-return-type: The given return type 'float' for total is incorrect, got 'string|null'"
    );
}

#[test]
fn issues_carry_miette_codes_and_help() {
    use miette::Diagnostic;

    let decl = callable("charge", vec![return_at(10)])
        .with_param(Param::new("amount").with_type(TypeHint::keyword("int")))
        .with_docblock(Docblock::default().with_param("$amount", "string"));
    let (config, call_map, source) = (CheckerConfig::default(), CallMap::empty(), source());
    let codebase = MemoryCodebase::new();
    let env = CheckEnv::new(&config, &codebase, &call_map);
    let mut issues = IssueBuffer::new();
    let _ = CallableChecker::new(&decl, CallableKind::Function, &source, env).check(
        &mut Context::new(),
        true,
        &mut ScriptedWalker::idle(),
        &mut EffectMemo::new(),
        &mut issues,
    );

    let issue = &issues.issues()[0];
    let code = issue.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("quill::issue::invalid-annotation"));
    insta::assert_snapshot!(
        issue.help().map(|h| h.to_string()).unwrap_or_default(),
        @"A docblock type may only narrow the declared type"
    );
}
