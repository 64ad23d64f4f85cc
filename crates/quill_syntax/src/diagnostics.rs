//! Diagnostics produced while checking callables.
//!
//! An [`Issue`] is a located, categorised message. Issues flow into an [`IssueSink`], whose answer decides whether the
//! current callable check stops ([`Aborted`]) or keeps collecting.

use std::fmt;

use thiserror::Error;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueKind {
    /// A docblock annotation names a parameter that does not exist, or contradicts the declared type.
    InvalidAnnotation,
    /// Inferred return behaviour disagrees with the declared return type.
    InvalidReturnType,
    /// A parameter type hint names a class the hierarchy does not know.
    UndefinedClass,
}

impl IssueKind {
    pub const ALL: [IssueKind; 3] = [
        IssueKind::InvalidAnnotation,
        IssueKind::InvalidReturnType,
        IssueKind::UndefinedClass,
    ];

    /// Stable kebab-case code (`invalid-return-type`).
    pub fn code(self) -> &'static str {
        match self {
            IssueKind::InvalidAnnotation => "invalid-annotation",
            IssueKind::InvalidReturnType => "invalid-return-type",
            IssueKind::UndefinedClass => "undefined-class",
        }
    }

    /// Name as written in suppression tags (`InvalidReturnType`).
    pub fn name(self) -> &'static str {
        match self {
            IssueKind::InvalidAnnotation => "InvalidAnnotation",
            IssueKind::InvalidReturnType => "InvalidReturnType",
            IssueKind::UndefinedClass => "UndefinedClass",
        }
    }

    /// Resolve either spelling, case-insensitively. `InvalidDocblock` is accepted for the annotation kind.
    pub fn from_name(name: &str) -> Option<IssueKind> {
        if name.eq_ignore_ascii_case("InvalidDocblock") || name.eq_ignore_ascii_case("invalid-docblock") {
            return Some(IssueKind::InvalidAnnotation);
        }
        Self::ALL
            .into_iter()
            .find(|k| k.code().eq_ignore_ascii_case(name) || k.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// How strongly an issue is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Error,
    Info,
}

/// A located diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
    pub file_name: String,
    pub line: usize,
    pub severity: Severity,
    pub hints: Vec<String>,
}

impl Issue {
    pub fn new(kind: IssueKind, message: String, file_name: &str, line: usize) -> Self {
        Self {
            kind,
            message,
            file_name: file_name.to_string(),
            line,
            severity: Severity::Error,
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// One-line rendering: `file:line: kind: message`.
    pub fn render(&self) -> String {
        format!("{}:{}: {}: {}", self.file_name, self.line, self.kind, self.message)
    }
}

impl miette::Diagnostic for Issue {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("quill::issue::{}", self.kind.code())))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Info => miette::Severity::Advice,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.hints.is_empty() {
            None
        } else {
            Some(Box::new(self.hints.join("\n")))
        }
    }
}

/// The current callable check was stopped at the sink's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("callable check aborted by the issue sink")]
pub struct Aborted;

/// Outcome of a check step: `Err(Aborted)` stops the current callable, never the whole run.
pub type CheckResult = Result<(), Aborted>;

/// Receives diagnostics.
pub trait IssueSink {
    /// Record `issue`. Returns `true` if the current callable check should stop.
    fn accept(&mut self, issue: Issue) -> bool;
}

/// Collecting sink.
///
/// Keeps every issue in arrival order. With `stop_on_first_error` it asks the checker to stop as soon as an
/// error-severity issue arrives; info issues never stop a check.
#[derive(Debug, Default)]
pub struct IssueBuffer {
    issues: Vec<Issue>,
    stop_on_first_error: bool,
}

impl IssueBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopping_on_first_error() -> Self {
        Self {
            issues: Vec::new(),
            stop_on_first_error: true,
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Error).count()
    }

    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

impl IssueSink for IssueBuffer {
    fn accept(&mut self, issue: Issue) -> bool {
        let stop = self.stop_on_first_error && issue.severity == Severity::Error;
        self.issues.push(issue);
        stop
    }
}

// ============================================================================
// Issue catalogue
// ============================================================================

/// Constructors for every message the checker emits.
pub mod issues {
    use super::*;

    pub fn unknown_docblock_param(param: &str, callable: &str, file_name: &str, line: usize) -> Issue {
        Issue::new(
            IssueKind::InvalidAnnotation,
            format!("Parameter ${param} does not appear in the argument list for {callable}"),
            file_name,
            line,
        )
        .with_hint("Rename the @param tag to match a declared parameter, or remove it")
    }

    pub fn docblock_param_type_mismatch(
        param: &str,
        found: &str,
        expected: &str,
        file_name: &str,
        line: usize,
    ) -> Issue {
        Issue::new(
            IssueKind::InvalidAnnotation,
            format!("Parameter ${param} has wrong type '{found}', should be '{expected}'"),
            file_name,
            line,
        )
        .with_hint("A docblock type may only narrow the declared type")
    }

    pub fn unparseable_docblock_type(param: &str, type_string: &str, file_name: &str, line: usize) -> Issue {
        Issue::new(
            IssueKind::InvalidAnnotation,
            format!("Parameter ${param} has unparseable type '{type_string}'"),
            file_name,
            line,
        )
    }

    pub fn missing_return(callable: &str, declared: &str, file_name: &str, line: usize) -> Issue {
        Issue::new(
            IssueKind::InvalidReturnType,
            format!("No return type was found for method {callable} but return type '{declared}' was expected"),
            file_name,
            line,
        )
    }

    pub fn return_type_mismatch(declared: &str, callable: &str, inferred: &str, file_name: &str, line: usize) -> Issue {
        Issue::new(
            IssueKind::InvalidReturnType,
            format!("The given return type '{declared}' for {callable} is incorrect, got '{inferred}'"),
            file_name,
            line,
        )
    }

    pub fn undefined_class(class: &str, file_name: &str, line: usize) -> Issue {
        Issue::new(
            IssueKind::UndefinedClass,
            format!("Class or interface {class} does not exist"),
            file_name,
            line,
        )
        .with_hint("Check the spelling and the use statements of this file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_kind_names_round_trip() {
        for kind in IssueKind::ALL {
            assert_eq!(IssueKind::from_name(kind.code()), Some(kind));
            assert_eq!(IssueKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(IssueKind::from_name("InvalidDocblock"), Some(IssueKind::InvalidAnnotation));
        assert_eq!(IssueKind::from_name("NoSuchIssue"), None);
    }

    #[test]
    fn buffer_stops_only_on_errors_when_asked() {
        let issue = issues::undefined_class("Foo", "a.php", 3);

        let mut lenient = IssueBuffer::new();
        assert!(!lenient.accept(issue.clone()));

        let mut strict = IssueBuffer::stopping_on_first_error();
        assert!(!strict.accept(issue.clone().with_severity(Severity::Info)));
        assert!(strict.accept(issue));
        assert_eq!(strict.issues().len(), 2);
        assert_eq!(strict.error_count(), 1);
    }

    #[test]
    fn catalogue_messages() {
        insta::assert_snapshot!(
            issues::return_type_mismatch("int", "Foo::bar", "string", "src/Foo.php", 12).render(),
            @"src/Foo.php:12: invalid-return-type: The given return type 'int' for Foo::bar is incorrect, got 'string'"
        );
        insta::assert_snapshot!(
            issues::unknown_docblock_param("x", "foo", "a.php", 1).render(),
            @"a.php:1: invalid-annotation: Parameter $x does not appear in the argument list for foo"
        );
    }
}
