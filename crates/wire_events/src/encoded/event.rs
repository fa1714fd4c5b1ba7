use serde::{Deserialize, Serialize};
use test_model::{AttachmentError, Event, EventContext, EventKind};

use super::message::messages_for;
use super::{
    EncodeContext, EncodedAttachment, EncodedInstant, EncodedIssue, EncodedMessage,
    EncodedSourceLocation, EncodedTestCase,
};
use crate::codec::{join_path, ValidateRecord};
use crate::error::DecodeError;

/// Wire discriminator for an event record.
///
/// Unrecognized discriminators decode to [`Unknown`](Self::Unknown) so a
/// consumer built against an older schema can skip kinds it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EncodedEventKind {
    RunStarted,
    TestStarted,
    TestCaseStarted,
    IssueRecorded,
    ValueAttached,
    TestCaseEnded,
    TestCaseCancelled,
    TestEnded,
    TestSkipped,
    TestCancelled,
    RunEnded,
    #[serde(other)]
    Unknown,
}

impl EncodedEventKind {
    fn is_test_case_kind(self) -> bool {
        matches!(
            self,
            Self::TestCaseStarted | Self::TestCaseEnded | Self::TestCaseCancelled
        )
    }
}

/// Wire form of one event.
///
/// Exactly one of `issue`/`attachment` is populated, and only when the kind
/// calls for it. Underscore-prefixed fields are experimental and appear only
/// for versions that include experimental fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedEvent {
    pub kind: EncodedEventKind,
    pub instant: EncodedInstant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<EncodedIssue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<EncodedAttachment>,
    pub messages: Vec<EncodedMessage>,
    #[serde(rename = "testID", default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(rename = "_testCase", default, skip_serializing_if = "Option::is_none")]
    pub test_case: Option<EncodedTestCase>,
    #[serde(rename = "_comments", default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    #[serde(
        rename = "_sourceLocation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_location: Option<EncodedSourceLocation>,
}

impl EncodedEvent {
    /// Converts a native event for the context's version.
    ///
    /// Returns `Ok(None)` for native kinds with no wire counterpart:
    /// iteration markers, test discovery (carried by a `test` record
    /// instead), and test-case kinds when the test in scope is not
    /// parameterized.
    pub fn encode(
        event: &Event,
        context: &EventContext,
        ctx: &EncodeContext,
    ) -> Result<Option<Self>, AttachmentError> {
        let kind = match &event.kind {
            EventKind::RunStarted => EncodedEventKind::RunStarted,
            EventKind::TestStarted => EncodedEventKind::TestStarted,
            EventKind::TestCaseStarted => EncodedEventKind::TestCaseStarted,
            EventKind::IssueRecorded { .. } => EncodedEventKind::IssueRecorded,
            EventKind::ValueAttached { .. } => EncodedEventKind::ValueAttached,
            EventKind::TestCaseEnded => EncodedEventKind::TestCaseEnded,
            EventKind::TestCaseCancelled => EncodedEventKind::TestCaseCancelled,
            EventKind::TestEnded => EncodedEventKind::TestEnded,
            EventKind::TestSkipped { .. } => EncodedEventKind::TestSkipped,
            EventKind::TestCancelled { .. } => EncodedEventKind::TestCancelled,
            EventKind::RunEnded => EncodedEventKind::RunEnded,
            EventKind::IterationStarted { .. }
            | EventKind::IterationEnded { .. }
            | EventKind::TestDiscovered { .. } => return Ok(None),
        };

        if kind.is_test_case_kind() {
            let parameterized = context
                .test
                .as_ref()
                .is_some_and(|test| test.is_parameterized);
            if !parameterized {
                return Ok(None);
            }
        }

        let issue = match &event.kind {
            EventKind::IssueRecorded { issue } => Some(EncodedIssue::encode(issue, ctx)),
            _ => None,
        };
        let attachment = match &event.kind {
            EventKind::ValueAttached { attachment } => {
                Some(EncodedAttachment::encode(attachment, ctx)?)
            }
            _ => None,
        };

        let experimental = ctx.experimental();
        let comments = experimental.then(|| native_comments(&event.kind)).flatten();
        let source_location = experimental
            .then(|| native_source_location(&event.kind))
            .flatten()
            .map(|location| EncodedSourceLocation::encode(location, ctx));
        let test_case = context
            .test_case
            .as_ref()
            .filter(|_| experimental)
            .map(|case| EncodedTestCase::encode(case, ctx));

        Ok(Some(Self {
            kind,
            instant: EncodedInstant::encode(&event.instant, ctx),
            issue,
            attachment,
            messages: messages_for(event, context),
            test_id: event.test_id.as_ref().map(|id| id.to_string()),
            test_case,
            comments,
            source_location,
        }))
    }
}

fn native_comments(kind: &EventKind) -> Option<Vec<String>> {
    let comments: Vec<String> = match kind {
        EventKind::IssueRecorded { issue } => issue
            .comments
            .iter()
            .map(|comment| comment.as_str().to_string())
            .collect(),
        EventKind::TestSkipped { comment } | EventKind::TestCancelled { comment } => comment
            .iter()
            .map(|comment| comment.as_str().to_string())
            .collect(),
        _ => Vec::new(),
    };
    (!comments.is_empty()).then_some(comments)
}

fn native_source_location(kind: &EventKind) -> Option<&test_model::SourceLocation> {
    match kind {
        EventKind::IssueRecorded { issue } => issue.source_location.as_ref(),
        EventKind::ValueAttached { attachment } => attachment.source_location.as_ref(),
        _ => None,
    }
}

impl ValidateRecord for EncodedEvent {
    fn validate(&self, prefix: &str) -> Result<(), DecodeError> {
        match self.kind {
            EncodedEventKind::IssueRecorded => {
                let issue = self.issue.as_ref().ok_or_else(|| DecodeError::MissingValue {
                    path: join_path(prefix, "issue"),
                })?;
                issue.validate(&join_path(prefix, "issue"))?;
            }
            EncodedEventKind::ValueAttached => {
                let attachment =
                    self.attachment
                        .as_ref()
                        .ok_or_else(|| DecodeError::MissingValue {
                            path: join_path(prefix, "attachment"),
                        })?;
                attachment.validate(&join_path(prefix, "attachment"))?;
            }
            _ => {
                if self.issue.is_some() {
                    return Err(DecodeError::InvalidValue {
                        path: join_path(prefix, "issue"),
                        message: format!("unexpected issue payload for kind {:?}", self.kind),
                    });
                }
                if self.attachment.is_some() {
                    return Err(DecodeError::InvalidValue {
                        path: join_path(prefix, "attachment"),
                        message: format!("unexpected attachment payload for kind {:?}", self.kind),
                    });
                }
            }
        }
        if self.issue.is_some() && self.attachment.is_some() {
            return Err(DecodeError::InvalidValue {
                path: join_path(prefix, "attachment"),
                message: "record carries both an issue and an attachment".to_string(),
            });
        }
        Ok(())
    }
}
