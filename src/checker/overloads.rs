//! Signature lookup for call sites, including overload selection for built-ins.

use quill_core::Union;

use super::CheckEnv;
use super::params::ParamDescriptor;

/// Parameters the callee `id` expects at a call site with the given argument types.
///
/// ## Parameters
/// - `id`: `Class::method` for methods, the function name otherwise.
/// - `arg_types`: inferred type of each argument, `None` where inference produced nothing.
/// - `file_name`: file of the call site, for file-scoped function lookup.
///
/// ## Returns
/// - Methods: their declared parameters (a single signature, no overloads).
/// - Built-ins with one signature: that signature.
/// - Built-ins with several: the first whose parameters accept every argument with a known type, checking only as
///   many arguments as the candidate has parameters. If none does, the first candidate.
/// - Anything else: the declared parameters of the free function, or an empty list if it is unknown.
#[tracing::instrument(skip_all, fields(id = %id, args = arg_types.len()))]
pub fn params_by_id(env: &CheckEnv<'_>, id: &str, arg_types: &[Option<Union>], file_name: &str) -> Vec<ParamDescriptor> {
    if id.contains("::") {
        return env.codebase.method_params(id).unwrap_or_default();
    }

    let Some(mut candidates) = env.call_map.params_from_call_map(id) else {
        return env
            .codebase
            .function_params(&id.to_ascii_lowercase(), file_name)
            .unwrap_or_default();
    };

    if candidates.len() == 1 {
        return candidates.swap_remove(0);
    }

    let matcher = env.matcher();
    let chosen = candidates.iter().position(|candidate| {
        arg_types
            .iter()
            .zip(candidate)
            .all(|(arg_type, param)| match arg_type {
                Some(arg_type) => matcher.does_param_match(arg_type, &param.ty).matches,
                None => true,
            })
    });

    match chosen {
        Some(index) => {
            tracing::trace!(index, "overload selected");
            candidates.swap_remove(index)
        }
        None => {
            tracing::debug!("no overload accepts the arguments, using the first");
            candidates.swap_remove(0)
        }
    }
}
