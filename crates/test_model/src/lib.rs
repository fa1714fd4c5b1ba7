#![forbid(unsafe_code)]
//! Native, in-process data model for a test run.
//!
//! These are the value types the versioned wire protocol (`wire_events`)
//! consumes and reconstructs. Test discovery, scheduling, and attribute
//! declaration live elsewhere; this crate only describes what they produce.

mod attachment;
mod backtrace;
mod event;
mod issue;
mod source_location;
mod time;

pub use attachment::{Attachable, Attachment, AttachmentError, AttachmentValue};
pub use backtrace::Backtrace;
pub use event::{Event, EventContext, EventKind};
pub use issue::{CapturedError, Comment, Issue, KnownIssueContext, Severity};
pub use source_location::SourceLocation;
pub use test::{Tag, Test, TestCase, TestId, TestKind};
pub use time::TestInstant;
