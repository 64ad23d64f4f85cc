//! Declaration-level abstract syntax tree.
//!
//! Only the shapes the callable checker inspects are modelled in detail. Everything else a body walker needs is
//! expressible with the generic [`Expr`] variants.

use std::fmt;

/// Source location: byte offsets plus the 1-based line used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    /// A zero-width span on `line`, for synthesized nodes and tests.
    pub fn at_line(line: usize) -> Self {
        Self { start: 0, end: 0, line }
    }
}

/// A node with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A possibly-qualified name: `Foo`, `Foo\Bar`, or `\Foo\Bar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
    pub fully_qualified: bool,
}

impl Name {
    /// Parse a backslash-separated name; a leading `\` marks it fully qualified.
    pub fn parse(source: &str) -> Self {
        let fully_qualified = source.starts_with('\\');
        let parts = source
            .trim_start_matches('\\')
            .split('\\')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Self { parts, fully_qualified }
    }

    /// The name without a leading `\`.
    pub fn joined(&self) -> String {
        self.parts.join("\\")
    }

    /// Whether this is the single-segment name `keyword`, compared case-insensitively (`self`, `parent`, `null`).
    pub fn is_special(&self, keyword: &str) -> bool {
        !self.fully_qualified && self.parts.len() == 1 && self.parts[0].eq_ignore_ascii_case(keyword)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fully_qualified {
            write!(f, "\\")?;
        }
        write!(f, "{}", self.joined())
    }
}

/// A parameter or return type written in the signature itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeHint {
    /// A built-in keyword type: `array`, `callable`, `int`, ...
    Keyword(String),
    /// A class or interface reference, possibly relative to the current namespace.
    Name(Name),
}

impl TypeHint {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        TypeHint::Keyword(keyword.into())
    }

    pub fn class(name: &str) -> Self {
        TypeHint::Name(Name::parse(name))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
}

/// Expressions.
///
/// `true`, `false`, and `null` are constant fetches, exactly as any other named constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    ConstFetch(Name),
    Variable(String),
    PropertyFetch {
        object: Box<Spanned<Expr>>,
        property: String,
    },
    Array(Vec<Spanned<Expr>>),
    Assign {
        target: Box<Spanned<Expr>>,
        value: Box<Spanned<Expr>>,
    },
    Call {
        callee: Name,
        args: Vec<CallArg>,
    },
    MethodCall {
        object: Box<Spanned<Expr>>,
        method: String,
        args: Vec<CallArg>,
    },
    StaticCall {
        class: Name,
        method: String,
        args: Vec<CallArg>,
    },
    New {
        class: Name,
        args: Vec<CallArg>,
    },
    Closure(Box<FunctionLike>),
}

impl Expr {
    pub fn null() -> Self {
        Expr::ConstFetch(Name::parse("null"))
    }

    /// The literal `null` (case-insensitive, as the language allows `NULL`).
    pub fn is_null_literal(&self) -> bool {
        matches!(self, Expr::ConstFetch(name) if name.is_special("null"))
    }
}

/// One argument at a call site.
#[derive(Debug, Clone, PartialEq)]
pub struct CallArg {
    pub value: Spanned<Expr>,
    pub by_ref: bool,
    pub unpack: bool,
}

impl CallArg {
    pub fn new(value: Spanned<Expr>) -> Self {
        Self {
            value,
            by_ref: false,
            unpack: false,
        }
    }
}

/// Statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Expr(Spanned<Expr>),
    Return(Option<Spanned<Expr>>),
    Throw(Spanned<Expr>),
    If {
        cond: Spanned<Expr>,
        then_branch: Vec<Spanned<Stmt>>,
        else_branch: Option<Vec<Spanned<Stmt>>>,
    },
    While {
        cond: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    Try {
        body: Vec<Spanned<Stmt>>,
        catches: Vec<Vec<Spanned<Stmt>>>,
        finally: Option<Vec<Spanned<Stmt>>>,
    },
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_hint: Option<TypeHint>,
    pub default: Option<Spanned<Expr>>,
    pub by_ref: bool,
    pub variadic: bool,
    pub span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_hint: None,
            default: None,
            by_ref: false,
            variadic: false,
            span: Span::default(),
        }
    }

    pub fn with_type(mut self, hint: TypeHint) -> Self {
        self.type_hint = Some(hint);
        self
    }

    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(Spanned::new(default, self.span));
        self
    }

    pub fn by_ref(mut self) -> Self {
        self.by_ref = true;
        self
    }
}

/// `@param <type> $<name>` from a docblock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocblockParam {
    pub name: String,
    pub type_string: String,
}

/// The structured parts of a callable's doc comment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Docblock {
    pub params: Vec<DocblockParam>,
    /// Issue names listed in suppression tags.
    pub suppressed_issues: Vec<String>,
}

impl Docblock {
    pub fn with_param(mut self, name: impl Into<String>, type_string: impl Into<String>) -> Self {
        self.params.push(DocblockParam {
            name: name.into(),
            type_string: type_string.into(),
        });
        self
    }
}

/// A function, method, or closure declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLike {
    /// `None` for closures.
    pub name: Option<String>,
    pub params: Vec<Param>,
    /// `None` for abstract and interface methods.
    pub body: Option<Vec<Spanned<Stmt>>>,
    pub docblock: Option<Docblock>,
    pub span: Span,
}

impl FunctionLike {
    pub fn function(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: Some(name.into()),
            params: Vec::new(),
            body: None,
            docblock: None,
            span,
        }
    }

    pub fn closure(span: Span) -> Self {
        Self {
            name: None,
            ..Self::function("", span)
        }
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_body(mut self, body: Vec<Spanned<Stmt>>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_docblock(mut self, docblock: Docblock) -> Self {
        self.docblock = Some(docblock);
        self
    }

    /// Whether there is at least one statement to analyse.
    pub fn has_statements(&self) -> bool {
        self.body.as_ref().is_some_and(|b| !b.is_empty())
    }

    pub fn statements(&self) -> &[Spanned<Stmt>] {
        self.body.as_deref().unwrap_or(&[])
    }

    pub fn is_constructor(&self) -> bool {
        self.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case("__construct"))
    }

    pub fn line(&self) -> usize {
        self.span.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_parse_tracks_qualification() {
        let name = Name::parse("\\Foo\\Bar");
        assert!(name.fully_qualified);
        assert_eq!(name.joined(), "Foo\\Bar");
        assert_eq!(name.to_string(), "\\Foo\\Bar");

        let relative = Name::parse("Bar");
        assert!(!relative.fully_qualified);
        assert!(Name::parse("SELF").is_special("self"));
        assert!(!Name::parse("\\self").is_special("self"));
    }

    #[test]
    fn null_literal_is_case_insensitive() {
        assert!(Expr::null().is_null_literal());
        assert!(Expr::ConstFetch(Name::parse("NULL")).is_null_literal());
        assert!(!Expr::ConstFetch(Name::parse("false")).is_null_literal());
        assert!(!Expr::Literal(Literal::Int(0)).is_null_literal());
    }

    #[test]
    fn empty_body_has_no_statements() {
        let decl = FunctionLike::function("f", Span::at_line(1)).with_body(vec![]);
        assert!(!decl.has_statements());
        assert!(FunctionLike::closure(Span::at_line(1)).name.is_none());
        assert!(FunctionLike::function("__CONSTRUCT", Span::at_line(1)).is_constructor());
    }
}
