//! Property-based tests for the Quill checker
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

mod common;

use proptest::prelude::*;
use quill::ast::{DocblockParam, Expr, Param, TypeHint};
use quill::checker::params::{improve_params_from_docblock, resolve_param};
use quill::checker::resolve::TypeResolver;
use quill::checker::TypeMatcher;
use quill::codebase::Aliases;
use quill::config::{CheckerConfig, MatchPolicy};
use quill::Union;

// =============================================================================
// Strategies
// =============================================================================

const ALTERNATIVES: &[&str] = &["int", "string", "float", "bool", "array", "App\\User", "App\\Model", "null"];

const KEYWORD_HINTS: &[&str] = &["int", "string", "float", "bool", "array", "callable"];

/// A union of one to four distinct alternatives.
fn union_strategy() -> impl Strategy<Value = Union> {
    prop::sample::subsequence(ALTERNATIVES.to_vec(), 1..=4)
        .prop_map(|parts| Union::parse(&parts.join("|")).expect("generated unions are well-formed"))
}

fn hint_strategy() -> impl Strategy<Value = Option<TypeHint>> {
    prop_oneof![
        Just(None),
        prop::sample::select(KEYWORD_HINTS.to_vec()).prop_map(|k| Some(TypeHint::keyword(k))),
        prop::sample::select(vec!["User", "Model", "\\App\\Admin"]).prop_map(|c| Some(TypeHint::class(c))),
    ]
}

fn param_strategy() -> impl Strategy<Value = Param> {
    (hint_strategy(), any::<bool>()).prop_map(|(hint, null_default)| {
        let mut param = Param::new("value");
        param.type_hint = hint;
        if null_default {
            param = param.with_default(Expr::null());
        }
        param
    })
}

fn docblock_type_strategy() -> impl Strategy<Value = String> {
    prop::sample::subsequence(vec!["int", "string", "float", "bool", "array", "User", "integer", "Model[]"], 1..=3)
        .prop_map(|parts| parts.join("|"))
}

// =============================================================================
// Matcher properties
// =============================================================================

proptest! {
    /// Property: a `mixed` parameter accepts every argument type
    #[test]
    fn mixed_param_accepts_everything(input in union_strategy()) {
        let codebase = common::model_hierarchy();
        let config = CheckerConfig::default();
        let matcher = TypeMatcher::new(&codebase, &config);

        prop_assert!(matcher.does_param_match(&input, &Union::mixed()).matches);
    }

    /// Property: under the default policy a `mixed` argument fits every parameter type
    #[test]
    fn mixed_input_fits_everything_by_default(param in union_strategy()) {
        let codebase = common::model_hierarchy();
        let config = CheckerConfig::default();
        let matcher = TypeMatcher::new(&codebase, &config);

        prop_assert!(matcher.does_param_match(&Union::mixed(), &param).matches);
    }

    /// Property: every type fits itself, whatever the policy
    #[test]
    fn matching_is_reflexive(ty in union_strategy(), strict in any::<bool>()) {
        let codebase = common::model_hierarchy();
        let policy = if strict { MatchPolicy::strict() } else { MatchPolicy::default() };
        let config = CheckerConfig::new().with_match_policy(policy);
        let matcher = TypeMatcher::new(&codebase, &config);

        let verdict = matcher.does_param_match(&ty, &ty);
        prop_assert!(verdict.matches);
        prop_assert!(verdict.has_scalar_match);
    }
}

// =============================================================================
// Parameter resolution properties
// =============================================================================

proptest! {
    /// Property: a literal `null` default always yields an optional, nullable parameter
    #[test]
    fn null_default_implies_nullable(hint in hint_strategy()) {
        let (codebase, aliases) = (common::model_hierarchy(), Aliases::new());
        let resolver = TypeResolver::new(&codebase, Some("App"), &aliases);

        let mut param = Param::new("value").with_default(Expr::null());
        param.type_hint = hint;
        let descriptor = resolve_param(&param, &resolver);

        prop_assert!(descriptor.is_nullable);
        prop_assert!(descriptor.is_optional);
        prop_assert!(descriptor.ty.is_nullable() || descriptor.ty.is_mixed());
    }

    /// Property: applying the same docblock tags twice gives the same signature as applying them once
    #[test]
    fn docblock_override_is_idempotent(param in param_strategy(), tag_type in docblock_type_strategy()) {
        let (codebase, aliases) = (common::model_hierarchy(), Aliases::new());
        let resolver = TypeResolver::new(&codebase, Some("App"), &aliases);
        let tags = vec![DocblockParam { name: "$value".to_string(), type_string: tag_type }];

        let mut once = vec![resolve_param(&param, &resolver)];
        improve_params_from_docblock(&tags, &mut once, &resolver, |_| Ok(())).unwrap();

        let mut twice = once.clone();
        improve_params_from_docblock(&tags, &mut twice, &resolver, |_| Ok(())).unwrap();

        prop_assert_eq!(once, twice);
    }
}
