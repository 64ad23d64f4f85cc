//! Collaborator contracts for class and signature lookup.
//!
//! The checker never owns class or signature knowledge itself. It asks a [`Codebase`]: the union of
//! [`ClassHierarchy`] (what extends what, how names resolve) and [`SignatureStore`] (declared parameters and return
//! types of user code). [`MemoryCodebase`] is the in-process implementation used by the CLI and the tests.

use std::collections::{BTreeMap, HashMap, HashSet};

use quill_core::Union;

use crate::checker::params::ParamDescriptor;

/// Import aliases of a file, keyed by lower-cased alias (`use Foo\Bar as Baz` gives `baz` → `Foo\Bar`).
pub type Aliases = BTreeMap<String, String>;

/// Class-hierarchy lookup.
pub trait ClassHierarchy {
    /// Whether `child` is a strict descendant of `parent`, through `extends` or `implements`.
    fn class_extends_or_implements(&self, child: &str, parent: &str) -> bool;

    fn class_or_interface_exists(&self, name: &str) -> bool;

    /// Resolve a class name written in source to its fully qualified form.
    ///
    /// ## Notes
    /// - A leading `\` means the name is already absolute.
    /// - Otherwise the first segment is looked up in `aliases` (case-insensitively) and substituted.
    /// - Otherwise the name is relative to `namespace`.
    fn absolute_class_from_name(&self, name: &str, namespace: Option<&str>, aliases: &Aliases) -> String {
        if let Some(absolute) = name.strip_prefix('\\') {
            return absolute.to_string();
        }

        let (first, rest) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        if let Some(target) = aliases.get(&first.to_ascii_lowercase()) {
            return match rest {
                Some(rest) => format!("{target}\\{rest}"),
                None => target.clone(),
            };
        }

        match namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}\\{name}"),
            _ => name.to_string(),
        }
    }
}

/// Declared signatures of user code.
///
/// Method ids have the form `Class::method`; implementations compare them case-insensitively.
pub trait SignatureStore {
    fn method_params(&self, method_id: &str) -> Option<Vec<ParamDescriptor>>;

    fn method_return_type(&self, method_id: &str) -> Option<Union>;

    fn function_params(&self, name: &str, file_name: &str) -> Option<Vec<ParamDescriptor>>;

    fn function_return_type(&self, name: &str, file_name: &str) -> Option<Union>;
}

/// Everything the checker needs to know about the surrounding program.
pub trait Codebase: ClassHierarchy + SignatureStore {
    fn as_hierarchy(&self) -> &dyn ClassHierarchy;
}

impl<T: ClassHierarchy + SignatureStore> Codebase for T {
    fn as_hierarchy(&self) -> &dyn ClassHierarchy {
        self
    }
}

/// A class or interface known to a [`MemoryCodebase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub name: String,
    pub parent: Option<String>,
    pub interfaces: Vec<String>,
}

impl ClassEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            interfaces: Vec::new(),
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Signature {
    params: Vec<ParamDescriptor>,
    return_type: Option<Union>,
}

/// In-memory [`Codebase`].
///
/// Free functions are global: the file argument of [`SignatureStore`] lookups is ignored.
#[derive(Debug, Clone, Default)]
pub struct MemoryCodebase {
    classes: HashMap<String, ClassEntry>,
    methods: HashMap<String, Signature>,
    functions: HashMap<String, Signature>,
}

impl MemoryCodebase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, entry: ClassEntry) {
        self.classes.insert(entry.name.to_ascii_lowercase(), entry);
    }

    pub fn with_class(mut self, entry: ClassEntry) -> Self {
        self.add_class(entry);
        self
    }

    pub fn add_method(&mut self, method_id: &str, params: Vec<ParamDescriptor>, return_type: Option<Union>) {
        self.methods
            .insert(method_id.to_ascii_lowercase(), Signature { params, return_type });
    }

    pub fn with_method(mut self, method_id: &str, params: Vec<ParamDescriptor>, return_type: Option<Union>) -> Self {
        self.add_method(method_id, params, return_type);
        self
    }

    pub fn add_function(&mut self, name: &str, params: Vec<ParamDescriptor>, return_type: Option<Union>) {
        self.functions
            .insert(name.trim_start_matches('\\').to_ascii_lowercase(), Signature { params, return_type });
    }

    pub fn with_function(mut self, name: &str, params: Vec<ParamDescriptor>, return_type: Option<Union>) -> Self {
        self.add_function(name, params, return_type);
        self
    }

    fn class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.get(&name.trim_start_matches('\\').to_ascii_lowercase())
    }
}

impl ClassHierarchy for MemoryCodebase {
    fn class_extends_or_implements(&self, child: &str, parent: &str) -> bool {
        let target = parent.trim_start_matches('\\').to_ascii_lowercase();
        let mut seen = HashSet::new();
        let mut pending: Vec<&str> = vec![child];

        while let Some(name) = pending.pop() {
            let Some(entry) = self.class(name) else {
                continue;
            };
            if !seen.insert(entry.name.to_ascii_lowercase()) {
                continue;
            }
            for ancestor in entry.parent.iter().chain(&entry.interfaces) {
                if ancestor.trim_start_matches('\\').eq_ignore_ascii_case(&target) {
                    return true;
                }
                pending.push(ancestor);
            }
        }
        false
    }

    fn class_or_interface_exists(&self, name: &str) -> bool {
        self.class(name).is_some()
    }
}

impl SignatureStore for MemoryCodebase {
    fn method_params(&self, method_id: &str) -> Option<Vec<ParamDescriptor>> {
        self.methods.get(&method_id.to_ascii_lowercase()).map(|s| s.params.clone())
    }

    fn method_return_type(&self, method_id: &str) -> Option<Union> {
        self.methods
            .get(&method_id.to_ascii_lowercase())
            .and_then(|s| s.return_type.clone())
    }

    fn function_params(&self, name: &str, _file_name: &str) -> Option<Vec<ParamDescriptor>> {
        self.functions
            .get(&name.trim_start_matches('\\').to_ascii_lowercase())
            .map(|s| s.params.clone())
    }

    fn function_return_type(&self, name: &str, _file_name: &str) -> Option<Union> {
        self.functions
            .get(&name.trim_start_matches('\\').to_ascii_lowercase())
            .and_then(|s| s.return_type.clone())
    }
}
