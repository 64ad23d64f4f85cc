//! Name and type-string resolution relative to the file being checked.

use quill_core::lang::primitives;
use quill_core::types::parse::{convert_square_brackets, tokenize};
use quill_core::{Atomic, Union};

use crate::codebase::{Aliases, ClassHierarchy};

/// Resolves names written in a file (namespace, `use` aliases, `self`) to absolute ones.
#[derive(Clone, Copy)]
pub struct TypeResolver<'a> {
    hierarchy: &'a dyn ClassHierarchy,
    namespace: Option<&'a str>,
    aliases: &'a Aliases,
    self_class: Option<&'a str>,
}

impl<'a> TypeResolver<'a> {
    pub fn new(hierarchy: &'a dyn ClassHierarchy, namespace: Option<&'a str>, aliases: &'a Aliases) -> Self {
        Self {
            hierarchy,
            namespace,
            aliases,
            self_class: None,
        }
    }

    pub fn with_self_class(mut self, self_class: Option<&'a str>) -> Self {
        self.self_class = self_class;
        self
    }

    pub fn self_class(&self) -> Option<&'a str> {
        self.self_class
    }

    pub fn absolute_class(&self, name: &str) -> String {
        self.hierarchy.absolute_class_from_name(name, self.namespace, self.aliases)
    }

    /// Parse a resolved type string; a malformed one is logged and treated as `mixed`.
    pub fn parse_or_mixed(&self, type_string: &str) -> Union {
        Union::parse(type_string).unwrap_or_else(|err| {
            tracing::warn!(%type_string, error = %err, "unresolvable type, falling back to mixed");
            Union::mixed()
        })
    }

    /// Normalise a docblock type string.
    ///
    /// ## Notes
    /// - `T[]` becomes `array<T>`.
    /// - Legacy scalar spellings are canonicalised (`integer` → `int`).
    /// - A leading `\` marks a name as already absolute and is stripped.
    /// - Other capitalised names are made absolute through the hierarchy.
    /// - `$this` becomes `static`.
    ///
    /// ## Examples
    /// ```rust
    /// use quill::checker::resolve::TypeResolver;
    /// use quill::codebase::{Aliases, MemoryCodebase};
    ///
    /// let codebase = MemoryCodebase::new();
    /// let aliases = Aliases::new();
    /// let resolver = TypeResolver::new(&codebase, Some("App"), &aliases);
    /// assert_eq!(resolver.fix_up_local_type("Foo[]|integer"), "array<App\\Foo>|int");
    /// ```
    pub fn fix_up_local_type(&self, type_string: &str) -> String {
        let converted = convert_square_brackets(type_string);
        tokenize(&converted)
            .into_iter()
            .map(|token| self.fix_up_token(token))
            .collect()
    }

    fn fix_up_token(&self, token: String) -> String {
        if let Some(absolute) = token.strip_prefix('\\') {
            return absolute.to_string();
        }
        if token == "$this" {
            return primitives::as_str(primitives::PrimitiveId::Static).to_string();
        }
        let token = primitives::canonical_spelling(&token);
        let capitalised = token.chars().next().is_some_and(|c| c.is_ascii_uppercase());
        if capitalised && primitives::from_str(&token).is_none() {
            return self.absolute_class(&token);
        }
        token
    }
}

/// Normalise a declared return type before comparing it with inferred returns.
///
/// `self`, `static`, and `$this` become `enclosing_class`. Any other `$`-prefixed term is dropped. `None` means no
/// usable declared type is left.
pub fn flesh_out_types(declared: &Union, enclosing_class: Option<&str>) -> Option<Union> {
    declared.filter_map_atomics(|atomic| {
        let value = atomic.value.as_str();
        let late_bound = value.eq_ignore_ascii_case("self") || value.eq_ignore_ascii_case("static") || value == "$this";
        if late_bound {
            return Some(match enclosing_class {
                Some(class) => Atomic::generic(class, atomic.type_params.clone()),
                None => atomic.clone(),
            });
        }
        if value.starts_with('$') {
            return None;
        }
        Some(atomic.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codebase::MemoryCodebase;

    #[test]
    fn fix_up_resolves_aliases_and_keeps_absolute_names() {
        let codebase = MemoryCodebase::new();
        let mut aliases = Aliases::new();
        aliases.insert("collection".to_string(), "Vendor\\Collection".to_string());
        let resolver = TypeResolver::new(&codebase, Some("App"), &aliases);

        assert_eq!(resolver.fix_up_local_type("Collection<\\Other\\Item>"), "Vendor\\Collection<Other\\Item>");
        assert_eq!(resolver.fix_up_local_type("?boolean"), "?bool");
        assert_eq!(resolver.fix_up_local_type("$this"), "static");
        assert_eq!(resolver.fix_up_local_type("array<string, int>"), "array<string,int>");
    }

    #[test]
    fn flesh_out_replaces_late_bound_names() {
        let declared = Union::parse("static|null").unwrap();
        let fleshed = flesh_out_types(&declared, Some("App\\Widget")).unwrap();
        assert_eq!(fleshed.to_string(), "App\\Widget|null");
    }

    #[test]
    fn flesh_out_drops_variables_and_may_empty_out() {
        assert_eq!(flesh_out_types(&Union::parse("$foo").unwrap(), Some("A")), None);
        let kept = flesh_out_types(&Union::parse("int|$foo").unwrap(), None).unwrap();
        assert_eq!(kept, Union::int());
    }

    #[test]
    fn malformed_types_fall_back_to_mixed() {
        let codebase = MemoryCodebase::new();
        let aliases = Aliases::new();
        let resolver = TypeResolver::new(&codebase, None, &aliases);
        assert!(resolver.parse_or_mixed("array<int").is_mixed());
    }
}
