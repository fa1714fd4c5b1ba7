#![forbid(unsafe_code)]
//! Versioned JSON Lines wire protocol for test-run events.
//!
//! Converts native test-run events (`test_model`) into a stable,
//! externally-consumable wire format and back:
//! - A registry of frozen wire versions with an experimental opt-in.
//! - Version-aware shadow types, one per domain concept, whose field sets
//!   are gated by simple version comparisons.
//! - A JSON codec with line framing and structured decode errors.
//! - An event handler chain fanning each record out to explicitly
//!   configured sinks (file, callback, C function pointer, tokio channel
//!   behind the `tokio` feature).
//! - A best-effort reverse decoder for re-ingesting records produced by
//!   another process.

pub mod codec;
mod encoded;
mod error;
mod library;
mod reingest;
mod sink;
mod stream;
mod version;

pub use codec::{decode_lines, decode_record, encode_record, RecordLine, ValidateRecord};
pub use encoded::{
    EncodeContext, EncodedAttachment, EncodedBacktrace, EncodedError, EncodedEvent,
    EncodedEventKind, EncodedInstant, EncodedIssue, EncodedMessage, EncodedRecord,
    EncodedSeverity, EncodedSourceLocation, EncodedTest, EncodedTestCase, EncodedTestKind,
    MessageSymbol, RecordPayload,
};
pub use error::{DecodeError, EncodeError, SinkError, StreamConfigError};
pub use library::{available_libraries, LibraryDescriptor};
pub use reingest::issue_from_event;
pub use sink::{CallbackSink, FileSink, RawSink, Sink};
pub use stream::{EventStream, EventStreamConfig};
pub use version::WireVersion;

#[cfg(feature = "tokio")]
pub use sink::ChannelSink;
