use serde::{Deserialize, Serialize};
use test_model::{Event, EventContext, EventKind, Severity, Test};

/// Pictogram class for a human-readable message, so consumers can render a
/// marker without parsing the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageSymbol {
    Default,
    Skip,
    Pass,
    PassWithKnownIssue,
    Fail,
    Difference,
    Warning,
    Details,
    Attachment,
}

/// One human-readable line describing an event. Purely informational; the
/// structured payload is authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedMessage {
    pub symbol: MessageSymbol,
    pub text: String,
}

impl EncodedMessage {
    pub fn new(symbol: MessageSymbol, text: impl Into<String>) -> Self {
        Self {
            symbol,
            text: text.into(),
        }
    }
}

fn subject(test: Option<&Test>) -> String {
    match test {
        Some(test) => format!(
            "Test {}",
            test.display_name.as_deref().unwrap_or(&test.name)
        ),
        None => "Test".to_string(),
    }
}

/// Synthesizes the message list for an event. A coarsened rendering of what
/// a console reporter would print; kept deterministic so encoding stays a
/// pure function of its inputs.
pub(crate) fn messages_for(event: &Event, context: &EventContext) -> Vec<EncodedMessage> {
    let test = context.test.as_ref();
    match &event.kind {
        EventKind::RunStarted => {
            vec![EncodedMessage::new(MessageSymbol::Default, "Test run started.")]
        }
        EventKind::TestStarted => vec![EncodedMessage::new(
            MessageSymbol::Default,
            format!("{} started.", subject(test)),
        )],
        EventKind::TestCaseStarted => {
            let arguments = context
                .test_case
                .as_ref()
                .and_then(|case| case.display_name.clone());
            let text = match arguments {
                Some(arguments) => format!("Test case {arguments} started."),
                None => "Test case started.".to_string(),
            };
            vec![EncodedMessage::new(MessageSymbol::Default, text)]
        }
        EventKind::IssueRecorded { issue } => {
            let (symbol, noun) = if issue.is_known() {
                (MessageSymbol::PassWithKnownIssue, "a known issue")
            } else if issue.severity == Severity::Warning {
                (MessageSymbol::Warning, "a warning")
            } else {
                (MessageSymbol::Fail, "an issue")
            };
            let mut messages = vec![EncodedMessage::new(
                symbol,
                format!("{} recorded {noun}.", subject(test)),
            )];
            messages.extend(
                issue
                    .comments
                    .iter()
                    .map(|comment| EncodedMessage::new(MessageSymbol::Details, comment.as_str())),
            );
            messages
        }
        EventKind::ValueAttached { attachment } => {
            let name = attachment.preferred_name.as_deref().unwrap_or("attachment");
            vec![EncodedMessage::new(
                MessageSymbol::Attachment,
                format!("Attached '{name}'."),
            )]
        }
        EventKind::TestCaseEnded => {
            vec![EncodedMessage::new(MessageSymbol::Default, "Test case ended.")]
        }
        EventKind::TestCaseCancelled => vec![EncodedMessage::new(
            MessageSymbol::Default,
            "Test case cancelled.",
        )],
        EventKind::TestEnded => vec![EncodedMessage::new(
            MessageSymbol::Default,
            format!("{} ended.", subject(test)),
        )],
        EventKind::TestSkipped { comment } => {
            let mut messages = vec![EncodedMessage::new(
                MessageSymbol::Skip,
                format!("{} skipped.", subject(test)),
            )];
            if let Some(comment) = comment {
                messages.push(EncodedMessage::new(MessageSymbol::Details, comment.as_str()));
            }
            messages
        }
        EventKind::TestCancelled { comment } => {
            let mut messages = vec![EncodedMessage::new(
                MessageSymbol::Default,
                format!("{} cancelled.", subject(test)),
            )];
            if let Some(comment) = comment {
                messages.push(EncodedMessage::new(MessageSymbol::Details, comment.as_str()));
            }
            messages
        }
        EventKind::RunEnded => {
            vec![EncodedMessage::new(MessageSymbol::Default, "Test run ended.")]
        }
        // Internal kinds never reach the wire; the encoder filters them
        // before asking for messages.
        EventKind::IterationStarted { .. }
        | EventKind::TestDiscovered { .. }
        | EventKind::IterationEnded { .. } => Vec::new(),
    }
}
