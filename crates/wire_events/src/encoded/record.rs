use serde::{Deserialize, Serialize};
use test_model::{AttachmentError, Event, EventContext, EventKind};

use super::{EncodeContext, EncodedEvent, EncodedTest};
use crate::codec::{join_path, ValidateRecord};
use crate::error::DecodeError;
use crate::version::WireVersion;

/// What one stream record carries: a discovered test or an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum RecordPayload {
    Test(EncodedTest),
    Event(EncodedEvent),
}

/// Top-level stream record: version stamp, `kind` discriminator, payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedRecord {
    pub version: WireVersion,
    #[serde(flatten)]
    pub payload: RecordPayload,
}

impl EncodedRecord {
    /// Converts a native event into a stream record, or `Ok(None)` when the
    /// event has no wire counterpart at the context's version.
    pub fn encode(
        event: &Event,
        context: &EventContext,
        ctx: &EncodeContext,
    ) -> Result<Option<Self>, AttachmentError> {
        let payload = match &event.kind {
            EventKind::TestDiscovered { test } => {
                Some(RecordPayload::Test(EncodedTest::encode(test, ctx)))
            }
            _ => EncodedEvent::encode(event, context, ctx)?.map(RecordPayload::Event),
        };
        Ok(payload.map(|payload| Self {
            version: ctx.version,
            payload,
        }))
    }
}

impl ValidateRecord for EncodedRecord {
    fn validate(&self, prefix: &str) -> Result<(), DecodeError> {
        match &self.payload {
            RecordPayload::Test(test) => test.validate(&join_path(prefix, "payload")),
            RecordPayload::Event(event) => event.validate(&join_path(prefix, "payload")),
        }
    }
}
