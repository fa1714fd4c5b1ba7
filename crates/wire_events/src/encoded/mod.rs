//! Serializable shadow types, one per domain concept.
//!
//! Each type is built once, from a native value, by a version-aware
//! `encode` constructor and never mutated afterwards. Field population is a
//! pure function of (native value, target version, experimental flag):
//! fields introduced at version N are physically absent below N rather than
//! serialized as `null`.

mod attachment;
mod backtrace;
mod error;
mod event;
mod instant;
mod issue;
mod message;
mod record;
mod source_location;

pub use attachment::EncodedAttachment;
pub use backtrace::EncodedBacktrace;
pub use error::EncodedError;
pub use event::{EncodedEvent, EncodedEventKind};
pub use instant::EncodedInstant;
pub use issue::{EncodedIssue, EncodedSeverity};
pub use message::{EncodedMessage, MessageSymbol};
pub use record::{EncodedRecord, RecordPayload};
pub use source_location::EncodedSourceLocation;
pub use test::{EncodedTest, EncodedTestCase, EncodedTestKind};

use crate::version::WireVersion;

/// Ambient settings for one encoding pass.
///
/// Constructed once when a stream opens and carried unchanged through every
/// nested `encode` call, so the whole event tree sees the same version and
/// the same backtrace policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeContext {
    pub version: WireVersion,
    /// Whether experimental records may carry captured backtrace addresses.
    pub include_backtraces: bool,
}

impl EncodeContext {
    pub fn new(version: WireVersion) -> Self {
        Self {
            version,
            include_backtraces: true,
        }
    }

    pub(crate) fn experimental(&self) -> bool {
        self.version.includes_experimental_fields()
    }
}
