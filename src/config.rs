//! Checker configuration.

use std::collections::BTreeMap;

use quill_syntax::diagnostics::{IssueBuffer, IssueKind};

/// Class name PHPUnit gives its generated test doubles.
pub const DEFAULT_MOCK_CLASS: &str = "PHPUnit_Framework_MockObject_MockObject";

/// The permissive rules of the argument matcher that trade soundness for fewer false positives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    /// A `mixed` argument satisfies any parameter.
    pub mixed_input_matches: bool,
    /// A parameter whose class extends the argument's class accepts that argument.
    pub allow_coercion: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            mixed_input_matches: true,
            allow_coercion: true,
        }
    }
}

impl MatchPolicy {
    /// Both permissive rules switched off.
    pub fn strict() -> Self {
        Self {
            mixed_input_matches: false,
            allow_coercion: false,
        }
    }
}

/// What happens to an issue of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IssueLevel {
    /// Reported, and may abort the current callable.
    #[default]
    Error,
    /// Reported, never aborts.
    Info,
    /// Dropped before it reaches the sink.
    Suppress,
}

/// Settings shared by every callable check in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    pub match_policy: MatchPolicy,
    /// Classes treated as test doubles: an argument of one of these types satisfies any parameter.
    pub mock_classes: Vec<String>,
    /// Per-kind overrides; kinds not listed are [`IssueLevel::Error`].
    pub issue_levels: BTreeMap<IssueKind, IssueLevel>,
    pub stop_on_first_error: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::default(),
            mock_classes: vec![DEFAULT_MOCK_CLASS.to_string()],
            issue_levels: BTreeMap::new(),
            stop_on_first_error: false,
        }
    }
}

impl CheckerConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Replace the list of test-double classes
    pub fn with_mock_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mock_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_issue_level(mut self, kind: IssueKind, level: IssueLevel) -> Self {
        self.issue_levels.insert(kind, level);
        self
    }

    pub fn with_stop_on_first_error(mut self, stop: bool) -> Self {
        self.stop_on_first_error = stop;
        self
    }

    pub fn issue_level(&self, kind: IssueKind) -> IssueLevel {
        self.issue_levels.get(&kind).copied().unwrap_or_default()
    }

    /// A collecting sink honouring [`CheckerConfig::stop_on_first_error`].
    pub fn issue_buffer(&self) -> IssueBuffer {
        if self.stop_on_first_error {
            IssueBuffer::stopping_on_first_error()
        } else {
            IssueBuffer::new()
        }
    }

    /// Whether `class` names a test double (case-insensitive, leading `\` ignored).
    pub fn is_mock(&self, class: &str) -> bool {
        let class = class.trim_start_matches('\\');
        self.mock_classes.iter().any(|m| m.trim_start_matches('\\').eq_ignore_ascii_case(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_permissive() {
        let config = CheckerConfig::default();
        assert!(config.match_policy.mixed_input_matches);
        assert!(config.match_policy.allow_coercion);
        assert!(!config.stop_on_first_error);
    }

    #[test]
    fn issue_levels_default_to_error() {
        let config = CheckerConfig::new().with_issue_level(IssueKind::UndefinedClass, IssueLevel::Suppress);
        assert_eq!(config.issue_level(IssueKind::UndefinedClass), IssueLevel::Suppress);
        assert_eq!(config.issue_level(IssueKind::InvalidReturnType), IssueLevel::Error);
    }

    #[test]
    fn mock_lookup_ignores_case_and_leading_backslash() {
        let config = CheckerConfig::new();
        assert!(config.is_mock("\\phpunit_framework_mockobject_mockobject"));
        assert!(!config.is_mock("Foo"));

        let custom = CheckerConfig::new().with_mock_classes(["Mockery\\MockInterface"]);
        assert!(custom.is_mock("Mockery\\MockInterface"));
        assert!(!custom.is_mock(DEFAULT_MOCK_CLASS));
    }

    #[test]
    fn issue_buffer_follows_stop_flag() {
        use quill_syntax::diagnostics::{Issue, IssueSink};

        let issue = Issue::new(IssueKind::UndefinedClass, "missing".to_string(), "a.php", 1);
        assert!(!CheckerConfig::new().issue_buffer().accept(issue.clone()));
        assert!(CheckerConfig::new().with_stop_on_first_error(true).issue_buffer().accept(issue));
    }
}
