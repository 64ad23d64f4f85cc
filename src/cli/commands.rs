//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::collections::BTreeMap;
use std::path::Path;

use quill_core::Union;

use crate::callmap::{CallMap, CallMapError};
use crate::checker::params::ParamDescriptor;
use crate::checker::CheckEnv;
use crate::codebase::{ClassEntry, MemoryCodebase};
use crate::config::{CheckerConfig, MatchPolicy};

use super::{CliError, CliResult, ExitCode};

/// Placeholder accepted by `resolve --arg` for an argument whose type is unknown.
const UNKNOWN_ARG: &str = "_";

// ============================================================================
// Shared helpers
// ============================================================================

fn parse_type(type_string: &str) -> CliResult<Union> {
    Union::parse(type_string).map_err(|e| CliError::failure(format!("Error: invalid type '{type_string}': {e}")))
}

/// Load the signature database, rendering failures through miette.
fn load_call_map(path: Option<&Path>) -> CliResult<CallMap> {
    let loaded = match path {
        Some(path) => CallMap::load(path),
        None => CallMap::builtin(),
    };
    loaded.map_err(render_call_map_error)
}

fn render_call_map_error(err: CallMapError) -> CliError {
    let report = miette::Report::new(err);
    CliError::failure(format!("{report:?}"))
}

/// Turn `CHILD:PARENT` pairs into class entries, keyed by lower-cased name.
///
/// The first parent given for a child becomes its parent class; further ones are recorded as interfaces.
fn class_entries(pairs: &[String]) -> CliResult<BTreeMap<String, ClassEntry>> {
    let mut entries: BTreeMap<String, ClassEntry> = BTreeMap::new();
    for pair in pairs {
        let Some((child, parent)) = pair.split_once(':') else {
            return Err(CliError::failure(format!(
                "Error: --extends expects CHILD:PARENT, got '{pair}'"
            )));
        };
        let (child, parent) = (child.trim(), parent.trim());
        if child.is_empty() || parent.is_empty() {
            return Err(CliError::failure(format!("Error: empty class name in '{pair}'")));
        }

        entries
            .entry(parent.to_ascii_lowercase())
            .or_insert_with(|| ClassEntry::new(parent));
        let entry = entries
            .entry(child.to_ascii_lowercase())
            .or_insert_with(|| ClassEntry::new(child));
        if entry.parent.is_none() {
            entry.parent = Some(parent.to_string());
        } else {
            entry.interfaces.push(parent.to_string());
        }
    }
    Ok(entries)
}

fn hierarchy_from_pairs(pairs: &[String]) -> CliResult<MemoryCodebase> {
    let mut codebase = MemoryCodebase::new();
    for entry in class_entries(pairs)?.into_values() {
        codebase.add_class(entry);
    }
    Ok(codebase)
}

fn format_param(param: &ParamDescriptor) -> String {
    let by_ref = if param.by_ref { "&" } else { "" };
    let optional = if param.is_optional { " = ..." } else { "" };
    format!("{} {by_ref}${}{optional}", param.ty, param.name)
}

fn format_signature(function: &str, params: &[ParamDescriptor], return_type: Option<&Union>) -> String {
    let params: Vec<String> = params.iter().map(format_param).collect();
    match return_type {
        Some(ret) => format!("{function}({}): {ret}", params.join(", ")),
        None => format!("{function}({})", params.join(", ")),
    }
}

// ============================================================================
// Commands
// ============================================================================

/// `quill match`: print the matcher verdict for one argument/parameter pair.
pub fn match_types(input: &str, param: &str, extends: &[String], policy: MatchPolicy) -> CliResult<ExitCode> {
    let input_type = parse_type(input)?;
    let param_type = parse_type(param)?;
    let codebase = hierarchy_from_pairs(extends)?;
    let config = CheckerConfig::new().with_match_policy(policy);
    let call_map = CallMap::empty();

    let env = CheckEnv::new(&config, &codebase, &call_map);
    let verdict = env.matcher().does_param_match(&input_type, &param_type);

    println!("{input_type} -> {param_type}");
    println!("  matches: {}", if verdict.matches { "yes" } else { "no" });
    println!("  scalar match: {}", if verdict.has_scalar_match { "yes" } else { "no" });

    Ok(if verdict.matches { ExitCode::SUCCESS } else { ExitCode::NEGATIVE })
}

/// `quill resolve`: print the overload the resolver selects for the given argument types.
pub fn resolve_overload(function: &str, args: &[String], callmap: Option<&Path>) -> CliResult<ExitCode> {
    let call_map = load_call_map(callmap)?;
    if !call_map.contains(function) {
        eprintln!("Unknown built-in '{function}'");
        return Ok(ExitCode::NEGATIVE);
    }

    let arg_types = args
        .iter()
        .map(|arg| match arg.as_str() {
            UNKNOWN_ARG => Ok(None),
            other => parse_type(other).map(Some),
        })
        .collect::<CliResult<Vec<Option<Union>>>>()?;

    let (config, codebase) = (CheckerConfig::default(), MemoryCodebase::new());
    let env = CheckEnv::new(&config, &codebase, &call_map);
    let chosen = env.params_by_id(function, &arg_types, "<cli>");

    let return_type = call_map
        .signatures(function)
        .and_then(|candidates| candidates.iter().find(|c| c.params == chosen))
        .map(|c| &c.return_type);
    println!("{}", format_signature(function, &chosen, return_type));
    Ok(ExitCode::SUCCESS)
}

/// `quill signatures`: list every overload of a built-in, in lookup order.
pub fn list_signatures(function: &str, callmap: Option<&Path>) -> CliResult<ExitCode> {
    let call_map = load_call_map(callmap)?;
    let Some(signatures) = call_map.signatures(function) else {
        eprintln!("Unknown built-in '{function}'");
        return Ok(ExitCode::NEGATIVE);
    };

    for signature in signatures {
        println!(
            "{}",
            format_signature(function, &signature.params, Some(&signature.return_type))
        );
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codebase::ClassHierarchy;

    #[test]
    fn hierarchy_pairs_build_parents_then_interfaces() {
        let pairs = [
            "Child:Base".to_string(),
            "Child:Countable".to_string(),
            "Base:Root".to_string(),
        ];

        let entries = class_entries(&pairs).unwrap();
        assert_eq!(entries["child"].parent.as_deref(), Some("Base"));
        assert_eq!(entries["child"].interfaces, vec!["Countable".to_string()]);
        assert!(entries.contains_key("root"));

        let codebase = hierarchy_from_pairs(&pairs).unwrap();
        assert!(codebase.class_extends_or_implements("Child", "Countable"));
        assert!(codebase.class_extends_or_implements("Child", "Root"));
        assert!(codebase.class_or_interface_exists("Root"));
    }

    #[test]
    fn malformed_pairs_are_rejected() {
        assert!(hierarchy_from_pairs(&["Child".to_string()]).is_err());
        assert!(hierarchy_from_pairs(&[":Base".to_string()]).is_err());
    }

    #[test]
    fn signatures_render_modifiers() {
        let params = vec![
            ParamDescriptor::new("subject", Union::string()),
            ParamDescriptor::new("matches", Union::array()).by_ref().optional(),
        ];
        assert_eq!(
            format_signature("preg_match", &params, Some(&Union::int())),
            "preg_match(string $subject, array &$matches = ...): int"
        );
        assert_eq!(format_signature("f", &[], None), "f()");
    }

    #[test]
    fn invalid_types_are_cli_failures() {
        let err = parse_type("array<int").unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("array<int"));
    }

    #[test]
    fn unknown_builtins_are_negative_answers() {
        assert_eq!(list_signatures("no_such_function", None).unwrap(), ExitCode::NEGATIVE);
        assert_eq!(resolve_overload("no_such_function", &[], None).unwrap(), ExitCode::NEGATIVE);
        assert_eq!(
            resolve_overload("implode", &["array".to_string()], None).unwrap(),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn missing_call_map_file_is_rendered() {
        let err = load_call_map(Some(Path::new("/nonexistent/quill-callmap.json"))).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.contains("quill::callmap::io"));
    }
}
