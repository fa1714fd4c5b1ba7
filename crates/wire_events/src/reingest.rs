//! Best-effort reconstruction of native values from decoded records, for
//! tools that re-inject externally observed results into a parent process.

use test_model::{Comment, Issue, KnownIssueContext};

use crate::encoded::{EncodedEvent, EncodedEventKind};

/// Rebuilds a native issue from a decoded event record.
///
/// Total by design: partial or unrecoverable data degrades to the closest
/// safe native form instead of failing, because the purpose is cross-process
/// observability, not exact fidelity. Returns `None` only for events that do
/// not carry an issue. Notably:
///
/// - severity defaults to error for records predating the severity keys;
/// - messages become comments;
/// - the backtrace is dropped (its addresses belong to another process's
///   address space and cannot be symbolicated here) while the source
///   location is kept;
/// - known issues get a marker context without re-deriving the original
///   known-issue comment, which is already folded into the comment list.
pub fn issue_from_event(event: &EncodedEvent) -> Option<Issue> {
    if event.kind != EncodedEventKind::IssueRecorded {
        return None;
    }
    let encoded = event.issue.as_ref()?;

    let comments = match &event.comments {
        Some(comments) => comments.iter().map(|text| Comment::from(text.clone())).collect(),
        None => event
            .messages
            .iter()
            .map(|message| Comment::from(message.text.clone()))
            .collect(),
    };

    Some(Issue {
        severity: encoded.effective_severity(),
        comments,
        source_location: encoded
            .source_location
            .as_ref()
            .map(|location| location.to_native()),
        backtrace: None,
        error: encoded.error.as_ref().map(|error| error.to_native()),
        known_issue: encoded.is_known.then(KnownIssueContext::default),
    })
}
