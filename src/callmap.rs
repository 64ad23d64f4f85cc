//! Built-in signature database.
//!
//! Signatures of built-in functions are kept in a JSON object:
//!
//! ```text
//! { "name": ["return-type", { "param": "type", ... }], "name'1": [...], ... }
//! ```
//!
//! ## Notes
//! - Parameter order is significant, so the object is parsed with order preserved.
//! - A leading `&` on a parameter name marks it by-reference, a trailing `=` marks it optional, and a leading `...`
//!   marks it variadic (and therefore optional). An empty type string means `mixed`.
//! - Additional overloads of `name` are stored under `name'1`, `name'2`, ... and are returned in that order, after the
//!   unsuffixed entry.
//! - Function names are looked up case-insensitively; a leading `\` is ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use miette::Diagnostic;
use quill_core::{TypeParseError, Union};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::checker::params::ParamDescriptor;

/// Signature database shipped with the binary.
const BUILTIN_CALLMAP: &str = include_str!("../assets/callmap.json");

#[derive(Debug, Error, Diagnostic)]
pub enum CallMapError {
    #[error("failed to read call map `{path}`")]
    #[diagnostic(code(quill::callmap::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("call map is not valid JSON")]
    #[diagnostic(code(quill::callmap::json))]
    Json(#[from] serde_json::Error),

    #[error("call map entry `{entry}` is malformed")]
    #[diagnostic(
        code(quill::callmap::shape),
        help("entries look like \"name\": [\"return-type\", {{\"param\": \"type\"}}]")
    )]
    Shape { entry: String },

    #[error("call map entry `{entry}` has an invalid type `{type_string}`")]
    #[diagnostic(code(quill::callmap::bad_type))]
    BadType {
        entry: String,
        type_string: String,
        #[source]
        source: TypeParseError,
    },
}

/// One overload of a built-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallMapSignature {
    pub return_type: Union,
    pub params: Vec<ParamDescriptor>,
}

#[derive(Debug, Clone, Default)]
pub struct CallMap {
    functions: HashMap<String, Vec<CallMapSignature>>,
}

impl CallMap {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The embedded database.
    pub fn builtin() -> Result<Self, CallMapError> {
        Self::from_json_str(BUILTIN_CALLMAP)
    }

    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, CallMapError> {
        let source = fs::read_to_string(path).map_err(|source| CallMapError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&source)
    }

    pub fn from_json_str(source: &str) -> Result<Self, CallMapError> {
        let root: Value = serde_json::from_str(source)?;
        let Value::Object(entries) = root else {
            return Err(CallMapError::Shape {
                entry: "<root>".to_string(),
            });
        };

        let mut indexed: HashMap<String, Vec<(usize, CallMapSignature)>> = HashMap::new();
        for (entry, value) in &entries {
            let (name, index) = split_overload_key(entry)?;
            let signature = parse_signature(entry, value)?;
            indexed.entry(name).or_default().push((index, signature));
        }

        let functions = indexed
            .into_iter()
            .map(|(name, mut overloads)| {
                overloads.sort_by_key(|(index, _)| *index);
                (name, overloads.into_iter().map(|(_, signature)| signature).collect())
            })
            .collect::<HashMap<_, _>>();

        tracing::debug!(functions = functions.len(), "loaded call map");
        Ok(Self { functions })
    }

    /// Every overload of `name`, or `None` if the database does not know it.
    pub fn signatures(&self, name: &str) -> Option<&[CallMapSignature]> {
        self.functions.get(&normalise_name(name)).map(Vec::as_slice)
    }

    /// Parameter lists of every overload of `name`.
    pub fn params_from_call_map(&self, name: &str) -> Option<Vec<Vec<ParamDescriptor>>> {
        self.signatures(name)
            .map(|overloads| overloads.iter().map(|s| s.params.clone()).collect())
    }

    /// Return type of the first overload of `name`.
    pub fn return_type(&self, name: &str) -> Option<Union> {
        self.signatures(name)
            .and_then(|overloads| overloads.first())
            .map(|s| s.return_type.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(&normalise_name(name))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn normalise_name(name: &str) -> String {
    name.trim_start_matches('\\').to_ascii_lowercase()
}

fn split_overload_key(entry: &str) -> Result<(String, usize), CallMapError> {
    match entry.split_once('\'') {
        None => Ok((normalise_name(entry), 0)),
        Some((name, index)) => index
            .parse::<usize>()
            .map(|index| (normalise_name(name), index))
            .map_err(|_| CallMapError::Shape {
                entry: entry.to_string(),
            }),
    }
}

fn parse_signature(entry: &str, value: &Value) -> Result<CallMapSignature, CallMapError> {
    let shape = || CallMapError::Shape {
        entry: entry.to_string(),
    };

    let [Value::String(return_type), Value::Object(params)] = value.as_array().map(Vec::as_slice).ok_or_else(shape)?
    else {
        return Err(shape());
    };

    Ok(CallMapSignature {
        return_type: parse_type(entry, return_type)?,
        params: parse_params(entry, params)?,
    })
}

fn parse_params(entry: &str, params: &Map<String, Value>) -> Result<Vec<ParamDescriptor>, CallMapError> {
    params
        .iter()
        .map(|(raw_name, type_value)| {
            let Value::String(type_string) = type_value else {
                return Err(CallMapError::Shape {
                    entry: entry.to_string(),
                });
            };

            let by_ref = raw_name.starts_with('&');
            let name = raw_name.trim_start_matches('&');
            let variadic = name.starts_with("...");
            let name = name.trim_start_matches("...");
            let optional = name.ends_with('=') || variadic;
            let name = name.trim_end_matches('=');

            let mut descriptor = ParamDescriptor::new(name, parse_type(entry, type_string)?);
            descriptor.by_ref = by_ref;
            descriptor.is_optional = optional;
            Ok(descriptor)
        })
        .collect()
}

fn parse_type(entry: &str, type_string: &str) -> Result<Union, CallMapError> {
    if type_string.trim().is_empty() {
        return Ok(Union::mixed());
    }
    Union::parse(type_string).map_err(|source| CallMapError::BadType {
        entry: entry.to_string(),
        type_string: type_string.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_database_loads() {
        let map = CallMap::builtin().unwrap();
        assert!(map.contains("strlen"));
        assert!(map.contains("\\STRLEN"));
        assert_eq!(map.return_type("strlen"), Some(Union::int()));
        assert!(!map.contains("definitely_not_builtin"));
    }

    #[test]
    fn parameter_markers_are_decoded_in_order() {
        let map = CallMap::from_json_str(r#"{"f": ["void", {"&out": "array", "b=": "", "...rest": "int"}]}"#).unwrap();
        let params = &map.params_from_call_map("f").unwrap()[0];

        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["out", "b", "rest"]);
        assert!(params[0].by_ref && !params[0].is_optional);
        assert!(params[1].ty.is_mixed() && params[1].is_optional);
        assert!(params[2].is_optional);
    }

    #[test]
    fn overloads_are_ordered_by_suffix() {
        let map = CallMap::from_json_str(
            r#"{"g'2": ["int", {"c": "bool"}], "g": ["int", {"a": "int"}], "g'1": ["int", {"b": "string"}]}"#,
        )
        .unwrap();
        let overloads = map.params_from_call_map("G").unwrap();
        let first_params: Vec<_> = overloads.iter().map(|o| o[0].name.as_str()).collect();
        assert_eq!(first_params, vec!["a", "b", "c"]);
    }

    #[test]
    fn malformed_entries_are_rejected() {
        assert!(matches!(CallMap::from_json_str("[]"), Err(CallMapError::Shape { .. })));
        assert!(matches!(CallMap::from_json_str("{"), Err(CallMapError::Json(_))));
        assert!(matches!(
            CallMap::from_json_str(r#"{"f": ["int"]}"#),
            Err(CallMapError::Shape { entry }) if entry == "f"
        ));
        assert!(matches!(
            CallMap::from_json_str(r#"{"f'x": ["int", {}]}"#),
            Err(CallMapError::Shape { .. })
        ));
        assert!(matches!(
            CallMap::from_json_str(r#"{"f": ["int", {"a": "array<int"}]}"#),
            Err(CallMapError::BadType { type_string, .. }) if type_string == "array<int"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CallMap::load(Path::new("/nonexistent/callmap.json")).unwrap_err();
        assert!(matches!(err, CallMapError::Io { .. }));
        assert_eq!(err.code().map(|c| c.to_string()), Some("quill::callmap::io".to_string()));
    }
}
