use crate::{Attachment, Comment, Issue, Test, TestCase, TestId, TestInstant};

/// What happened during a test run.
///
/// Iteration markers are internal to the runner's repeat loop and never leave
/// the process.
#[derive(Debug, Clone)]
pub enum EventKind {
    RunStarted,
    IterationStarted { index: usize },
    TestDiscovered { test: Test },
    TestStarted,
    TestCaseStarted,
    IssueRecorded { issue: Issue },
    ValueAttached { attachment: Attachment },
    TestCaseEnded,
    TestCaseCancelled,
    TestEnded,
    TestSkipped { comment: Option<Comment> },
    TestCancelled { comment: Option<Comment> },
    IterationEnded { index: usize },
    RunEnded,
}

/// One occurrence in a test run, stamped at the moment it was produced.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub instant: TestInstant,
    pub test_id: Option<TestId>,
}

impl Event {
    pub fn new(kind: EventKind, test_id: Option<TestId>) -> Self {
        Self {
            kind,
            instant: TestInstant::now(),
            test_id,
        }
    }
}

/// The test and test case in scope when an event was produced.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    pub test: Option<Test>,
    pub test_case: Option<TestCase>,
}

impl EventContext {
    pub fn for_test(test: Test) -> Self {
        Self {
            test: Some(test),
            test_case: None,
        }
    }
}
