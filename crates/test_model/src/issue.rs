use crate::{Backtrace, SourceLocation};

/// How consequential an issue is for the test that recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// A free-form, human-supplied remark attached to an issue or event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comment(pub String);

impl Comment {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Comment {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Comment {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Marks an issue as expected by the test author.
///
/// The explanatory comment, when present, is folded into the issue's comment
/// list at record time; consumers reconstructing an issue only need the
/// marker itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownIssueContext {
    pub comment: Option<Comment>,
}

/// A lossy projection of an arbitrary thrown error: enough for display and
/// coarse re-classification, not for program-level recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    pub description: String,
    pub domain: String,
    pub code: i64,
}

/// A problem recorded while running a test.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub comments: Vec<Comment>,
    pub source_location: Option<SourceLocation>,
    pub backtrace: Option<Backtrace>,
    pub error: Option<CapturedError>,
    pub known_issue: Option<KnownIssueContext>,
}

impl Issue {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            comments: Vec::new(),
            source_location: None,
            backtrace: None,
            error: None,
            known_issue: None,
        }
    }

    pub fn is_known(&self) -> bool {
        self.known_issue.is_some()
    }

    /// Whether this issue causes the containing test to fail. Known issues
    /// and warnings do not.
    pub fn is_failure(&self) -> bool {
        !self.is_known() && self.severity >= Severity::Error
    }
}
