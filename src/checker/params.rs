//! Parameter descriptors and their resolution.
//!
//! Descriptors come from three places: the declaration itself ([`resolve_param`]), an introspected built-in
//! ([`from_reflection`]), or the built-in signature database (see [`crate::callmap`]). Docblock `@param` tags may then
//! narrow a declaration-derived type ([`improve_params_from_docblock`]).
//!
//! Quill has no runtime of its own to introspect. [`from_reflection`] is the entry point for embedders that can inspect
//! built-ins of the analysed language: they implement [`ReflectedParameter`] over their introspection API and feed
//! the resulting descriptors into their [`SignatureStore`](crate::codebase::SignatureStore).

use quill_core::Union;
use quill_syntax::ast::{DocblockParam, Param, TypeHint};
use quill_syntax::diagnostics::CheckResult;
use thiserror::Error;

use super::resolve::TypeResolver;

/// One resolved parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    pub name: String,
    pub ty: Union,
    pub by_ref: bool,
    pub is_optional: bool,
    /// Set when the declaration's default is the literal `null`.
    pub is_nullable: bool,
}

impl ParamDescriptor {
    pub fn new(name: impl Into<String>, ty: Union) -> Self {
        Self {
            name: name.into(),
            ty,
            by_ref: false,
            is_optional: false,
            is_nullable: false,
        }
    }

    pub fn by_ref(mut self) -> Self {
        self.by_ref = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Mark the parameter as defaulting to `null`, adding `null` to its type.
    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self.is_optional = true;
        self.ty.add_null();
        self
    }
}

/// Resolve a declared parameter.
///
/// ## Notes
/// - No type hint gives `mixed`.
/// - `self` resolves to `self_class`; with no enclosing class the parameter degrades to `mixed`.
/// - A literal `null` default appends `|null` before the type string is parsed.
pub fn resolve_param(param: &Param, resolver: &TypeResolver<'_>) -> ParamDescriptor {
    let is_nullable = param.default.as_ref().is_some_and(|d| d.node.is_null_literal());

    let type_string = param.type_hint.as_ref().and_then(|hint| match hint {
        TypeHint::Keyword(keyword) => Some(keyword.clone()),
        TypeHint::Name(name) if name.fully_qualified => Some(name.joined()),
        TypeHint::Name(name) if name.is_special("self") => resolver.self_class().map(str::to_string),
        TypeHint::Name(name) => Some(resolver.absolute_class(&name.joined())),
    });

    let ty = match type_string {
        Some(mut type_string) => {
            if is_nullable {
                type_string.push_str("|null");
            }
            resolver.parse_or_mixed(&type_string)
        }
        None => Union::mixed(),
    };

    ParamDescriptor {
        name: param.name.clone(),
        ty,
        by_ref: param.by_ref,
        is_optional: param.default.is_some() || param.variadic,
        is_nullable,
    }
}

// ============================================================================
// Introspection
// ============================================================================

/// Failure while introspecting a built-in parameter. Always degraded, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectionError {
    #[error("class of parameter ${param} cannot be loaded: {reason}")]
    ClassUnavailable { param: String, reason: String },
    #[error("parameter ${param} has no inspectable default value")]
    NoDefaultValue { param: String },
}

/// A parameter of a built-in callable, as a runtime introspection API reports it.
pub trait ReflectedParameter {
    fn name(&self) -> &str;
    fn is_array(&self) -> bool;
    /// The class the parameter is hinted with, if any.
    fn class_name(&self) -> Result<Option<String>, IntrospectionError>;
    fn is_optional(&self) -> bool;
    fn default_is_null(&self) -> Result<bool, IntrospectionError>;
    fn is_passed_by_reference(&self) -> bool;
}

/// Build a descriptor from an introspected parameter.
///
/// Any introspection failure leaves the affected part at its most permissive value: an unknown class gives `mixed`,
/// an unreadable default gives "not nullable".
pub fn from_reflection(param: &dyn ReflectedParameter) -> ParamDescriptor {
    let mut type_string = if param.is_array() {
        Some("array".to_string())
    } else {
        param.class_name().unwrap_or_else(|err| {
            tracing::debug!(error = %err, "introspection failed, parameter degrades to mixed");
            None
        })
    };

    let is_nullable = match param.default_is_null() {
        Ok(is_null) => is_null,
        Err(err) => {
            tracing::trace!(error = %err, "default value not inspectable");
            false
        }
    };
    if is_nullable {
        if let Some(type_string) = type_string.as_mut() {
            type_string.push_str("|null");
        }
    }

    let ty = match type_string {
        Some(type_string) => Union::parse(&type_string).unwrap_or_else(|err| {
            tracing::warn!(%type_string, error = %err, "unparseable introspected type, using mixed");
            Union::mixed()
        }),
        None => Union::mixed(),
    };

    ParamDescriptor {
        name: param.name().to_string(),
        ty,
        by_ref: param.is_passed_by_reference(),
        is_optional: param.is_optional(),
        is_nullable,
    }
}

// ============================================================================
// Docblock overrides
// ============================================================================

/// Why a `@param` tag could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocblockProblem {
    UnknownParam { name: String },
    Unparseable { name: String, type_string: String },
    WrongType { name: String, found: Union, expected: Union },
}

/// Narrow `signature` with the docblock's `@param` types.
///
/// ## Notes
/// - A tag naming an undeclared parameter, an unparseable tag, and a tag whose type is not contained in a non-mixed
///   declared type are each handed to `report` and skipped.
/// - An applied override keeps the declaration's nullability: a parameter defaulting to `null` stays nullable.
/// - Applying the same tags twice gives the same signature.
///
/// ## Returns
/// `Err(Aborted)` as soon as `report` asks to stop.
pub fn improve_params_from_docblock(
    docblock_params: &[DocblockParam],
    signature: &mut [ParamDescriptor],
    resolver: &TypeResolver<'_>,
    mut report: impl FnMut(DocblockProblem) -> CheckResult,
) -> CheckResult {
    for tag in docblock_params {
        let name = tag.name.trim_start_matches('$');
        let Some(param) = signature.iter_mut().find(|p| p.name == name) else {
            report(DocblockProblem::UnknownParam { name: name.to_string() })?;
            continue;
        };

        let mut new_type = match Union::parse(&resolver.fix_up_local_type(&tag.type_string)) {
            Ok(ty) => ty,
            Err(_) => {
                report(DocblockProblem::Unparseable {
                    name: name.to_string(),
                    type_string: tag.type_string.clone(),
                })?;
                continue;
            }
        };

        if !param.ty.is_mixed() && !new_type.is_in(&param.ty) {
            report(DocblockProblem::WrongType {
                name: name.to_string(),
                found: new_type,
                expected: param.ty.clone(),
            })?;
            continue;
        }

        if param.is_nullable {
            new_type.add_null();
        }
        param.ty = new_type;
    }
    Ok(())
}
