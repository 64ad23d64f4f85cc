//! Structural type compatibility.
//!
//! The matcher is permissive: it accepts whenever some reading of the types would work, rather than proving
//! soundness. The two most permissive rules are switchable through [`MatchPolicy`](crate::config::MatchPolicy).

use quill_core::{Atomic, Union};

use crate::codebase::ClassHierarchy;
use crate::config::CheckerConfig;

/// Verdict of [`TypeMatcher::does_param_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamMatch {
    pub matches: bool,
    /// Cleared only when some argument alternative found neither a full nor a scalar-to-scalar match.
    ///
    /// Callers use it to tell "wrong scalar" apart from "entirely wrong kind of value".
    pub has_scalar_match: bool,
}

impl ParamMatch {
    const MATCH: ParamMatch = ParamMatch {
        matches: true,
        has_scalar_match: true,
    };
}

/// How one argument alternative relates to one parameter alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AtomicFit {
    Full,
    Scalar,
    None,
}

pub struct TypeMatcher<'a> {
    hierarchy: &'a dyn ClassHierarchy,
    config: &'a CheckerConfig,
}

impl<'a> TypeMatcher<'a> {
    pub fn new(hierarchy: &'a dyn ClassHierarchy, config: &'a CheckerConfig) -> Self {
        Self { hierarchy, config }
    }

    fn extends(&self, child: &Atomic, parent: &Atomic) -> bool {
        child.is_class_like()
            && parent.is_class_like()
            && self.hierarchy.class_extends_or_implements(&child.value, &parent.value)
    }

    /// Whether a value of type `input` may be passed where `param` is expected.
    ///
    /// ## Notes
    /// - A `mixed` parameter accepts anything. A `mixed` argument is accepted unless
    ///   [`MatchPolicy::mixed_input_matches`](crate::config::MatchPolicy::mixed_input_matches) is off.
    /// - `null` alternatives are ignored on both sides.
    /// - Class names compare case-insensitively. `object` accepts any non-scalar argument except `mixed`.
    /// - Every remaining argument alternative needs one compatible parameter alternative; the first one without is the
    ///   verdict.
    ///
    /// ## Examples
    /// ```rust
    /// use quill::checker::matcher::TypeMatcher;
    /// use quill::codebase::MemoryCodebase;
    /// use quill::config::CheckerConfig;
    /// use quill_core::Union;
    ///
    /// let (codebase, config) = (MemoryCodebase::new(), CheckerConfig::default());
    /// let matcher = TypeMatcher::new(&codebase, &config);
    ///
    /// assert!(matcher.does_param_match(&Union::int(), &Union::float()).matches);
    ///
    /// let verdict = matcher.does_param_match(&Union::string(), &Union::int());
    /// assert!(!verdict.matches);
    /// assert!(verdict.has_scalar_match);
    /// ```
    pub fn does_param_match(&self, input: &Union, param: &Union) -> ParamMatch {
        if param.is_mixed() {
            return ParamMatch::MATCH;
        }
        if input.is_mixed() && self.config.match_policy.mixed_input_matches {
            return ParamMatch::MATCH;
        }

        for input_part in input.atomics().filter(|a| !a.is_null()) {
            let mut found = false;
            let mut scalar_found = false;

            for param_part in param.atomics().filter(|a| !a.is_null()) {
                match self.fit(input_part, param_part) {
                    AtomicFit::Full => {
                        found = true;
                        break;
                    }
                    AtomicFit::Scalar => scalar_found = true,
                    AtomicFit::None => {}
                }
            }

            if !found {
                return ParamMatch {
                    matches: false,
                    has_scalar_match: scalar_found,
                };
            }
        }

        ParamMatch::MATCH
    }

    fn fit(&self, input: &Atomic, param: &Atomic) -> AtomicFit {
        if input.value.eq_ignore_ascii_case(&param.value)
            || self.extends(input, param)
            || self.config.is_mock(&input.value)
        {
            return AtomicFit::Full;
        }

        let widened = (input.value == "false" && param.value == "bool")
            || (input.value == "int" && param.value == "float")
            || (param.is_numeric() && input.is_numeric_type())
            || (param.is_callable() && (input.is_string() || input.is_array()));
        if widened {
            return AtomicFit::Full;
        }

        if param.is_object() && !input.is_scalar_type() && !input.is_mixed() {
            return AtomicFit::Full;
        }

        // TODO: replace with a proper coercion check once argument coercion is modelled.
        if self.config.match_policy.allow_coercion && self.extends(param, input) {
            return AtomicFit::Full;
        }

        if input.is_scalar_type() && param.is_scalar_type() {
            AtomicFit::Scalar
        } else {
            AtomicFit::None
        }
    }

    /// Whether every inferred return alternative is allowed by the declared return type.
    ///
    /// ## Notes
    /// - Nullability must agree on both sides.
    /// - `self` and `static` in `declared` stand for `this_class`.
    /// - `int` and `float` are interchangeable, `true`/`false` satisfy `bool`, and `object` accepts any class.
    /// - A class alternative is accepted when it extends or implements a declared class.
    /// - Declared alternatives that are never returned are not an error.
    pub fn has_identical_types(&self, declared: &Union, inferred: &Union, this_class: Option<&str>) -> bool {
        if declared.is_mixed() || inferred.is_mixed() {
            return true;
        }
        if declared.is_nullable() != inferred.is_nullable() {
            return false;
        }

        let declared_parts: Vec<Atomic> = declared
            .atomics()
            .filter(|a| !a.is_null())
            .map(|a| match (a.value.to_ascii_lowercase().as_str(), this_class) {
                ("self" | "static", Some(class)) => Atomic::new(class),
                _ => a.clone(),
            })
            .collect();

        inferred.atomics().filter(|a| !a.is_null()).all(|inferred_part| {
            declared_parts.iter().any(|declared_part| {
                if inferred_part.value.eq_ignore_ascii_case(&declared_part.value) {
                    return true;
                }
                match (inferred_part.value.as_str(), declared_part.value.as_str()) {
                    ("int", "float") | ("float", "int") | ("false" | "true", "bool") => true,
                    _ if inferred_part.is_class_like() => {
                        declared_part.is_object() || self.extends(inferred_part, declared_part)
                    }
                    _ => false,
                }
            })
        })
    }
}
