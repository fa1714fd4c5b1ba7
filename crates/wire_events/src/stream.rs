use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};

use test_model::{
    AttachmentError, AttachmentValue, Comment, Event, EventContext, EventKind, Issue, Severity,
};

use crate::codec;
use crate::encoded::{EncodeContext, EncodedRecord};
use crate::error::StreamConfigError;
use crate::sink::Sink;
use crate::version::WireVersion;

/// Configuration for one event stream. Everything here is checked when the
/// stream opens; only these checks may abort before tests run.
#[derive(Debug, Default)]
pub struct EventStreamConfig {
    /// Dotted numeric version string; `None` selects the current stable
    /// version.
    pub requested_version: Option<String>,
    /// Opt-in required to select a version newer than the current stable.
    pub allow_experimental: bool,
    /// When set, unpersisted attachments are written here and referenced by
    /// path instead of embedding their bytes.
    pub attachments_dir: Option<PathBuf>,
    /// Suppresses backtrace addresses even for experimental consumers.
    pub omit_backtraces: bool,
}

/// The event handler chain: native event in, one framed record out to every
/// sink, in production order.
///
/// The wire version is fixed when the stream opens and never changes while
/// the stream is active. Encoding is pure and may run on any test task;
/// delivery holds a per-stream order lock so all of this stream's sinks see
/// the same sequence, and each sink additionally serializes its own writes.
pub struct EventStream {
    context: EncodeContext,
    sinks: Vec<Box<dyn Sink>>,
    attachments_dir: Option<PathBuf>,
    attachment_counter: AtomicU64,
    delivery: Mutex<()>,
}

impl EventStream {
    /// Opens a stream, fixing its version for the stream's lifetime.
    pub fn open(
        config: EventStreamConfig,
        sinks: Vec<Box<dyn Sink>>,
    ) -> Result<Self, StreamConfigError> {
        let version = WireVersion::select(
            config.requested_version.as_deref(),
            config.allow_experimental,
        )?;
        if let Some(dir) = &config.attachments_dir {
            fs::create_dir_all(dir).map_err(|source| StreamConfigError::Destination {
                path: dir.clone(),
                source,
            })?;
        }
        let mut context = EncodeContext::new(version);
        context.include_backtraces = !config.omit_backtraces;
        debug!(version = %version, sinks = sinks.len(), "event stream opened");
        Ok(Self {
            context,
            sinks,
            attachments_dir: config.attachments_dir,
            attachment_counter: AtomicU64::new(0),
            delivery: Mutex::new(()),
        })
    }

    pub fn version(&self) -> WireVersion {
        self.context.version
    }

    /// Converts one native event and delivers it to every sink.
    ///
    /// Never fails the caller: events without a wire counterpart are dropped,
    /// attachment materialization failures degrade to an issue record, and a
    /// sink write failure is reported and skipped without affecting the
    /// other sinks.
    pub fn record(&self, event: &Event, context: &EventContext) {
        let persisted;
        let event = match self.persist_attachment(event) {
            Ok(Some(rewritten)) => {
                persisted = rewritten;
                &persisted
            }
            Ok(None) => event,
            Err(error) => {
                persisted = attachment_failure_event(event, &error);
                &persisted
            }
        };

        let fallback;
        let encoded = match EncodedRecord::encode(event, context, &self.context) {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(error) => {
                // Lazy materialization failed while encoding inline bytes.
                fallback = attachment_failure_event(event, &error);
                match EncodedRecord::encode(&fallback, context, &self.context) {
                    Ok(Some(record)) => record,
                    _ => return,
                }
            }
        };

        let bytes = match codec::encode_record(&encoded) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%error, "dropping unencodable event record");
                return;
            }
        };

        let _order = self
            .delivery
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for sink in &self.sinks {
            if let Err(error) = sink.write_record(&bytes) {
                warn!(sink = %sink.describe(), %error, "sink failed to accept record");
            }
        }
    }

    /// Closes the stream, flushing every sink.
    pub fn close(self) {
        for sink in &self.sinks {
            if let Err(error) = sink.flush() {
                warn!(sink = %sink.describe(), %error, "sink failed to flush on close");
            }
        }
        debug!(version = %self.context.version, "event stream closed");
    }

    /// Writes a not-yet-persisted attachment into the configured attachments
    /// directory and returns the event rewritten with the new path, the one
    /// permitted post-construction transition of an attachment.
    fn persist_attachment(&self, event: &Event) -> Result<Option<Event>, AttachmentError> {
        let Some(dir) = &self.attachments_dir else {
            return Ok(None);
        };
        let EventKind::ValueAttached { attachment } = &event.kind else {
            return Ok(None);
        };
        if attachment.is_persisted() {
            return Ok(None);
        }

        let bytes = match &attachment.value {
            AttachmentValue::Bytes(bytes) => bytes.clone(),
            AttachmentValue::Deferred(value) => value.materialize()?,
        };
        let sequence = self.attachment_counter.fetch_add(1, Ordering::Relaxed);
        let name = attachment
            .preferred_name
            .as_deref()
            .map(sanitize_file_name)
            .unwrap_or_else(|| "attachment".to_string());
        let path = dir.join(format!("{sequence}-{name}"));
        fs::write(&path, &bytes)?;

        let mut attachment = attachment.clone();
        attachment.file_system_path = Some(path);
        Ok(Some(Event {
            kind: EventKind::ValueAttached { attachment },
            instant: event.instant,
            test_id: event.test_id.clone(),
        }))
    }
}

fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if matches!(ch, '/' | '\\' | '\0') {
                '_'
            } else {
                ch
            }
        })
        .collect()
}

/// Degrades a failed attachment into an issue attributed to the attachment's
/// source location; the attachment itself is omitted from the stream.
fn attachment_failure_event(event: &Event, error: &AttachmentError) -> Event {
    warn!(%error, "attachment could not be materialized; recording an issue instead");
    let source_location = match &event.kind {
        EventKind::ValueAttached { attachment } => attachment.source_location.clone(),
        _ => None,
    };
    let mut issue = Issue::new(Severity::Error);
    issue.comments.push(Comment::from(format!(
        "attachment could not be materialized: {error}"
    )));
    issue.source_location = source_location;
    Event {
        kind: EventKind::IssueRecorded { issue },
        instant: event.instant,
        test_id: event.test_id.clone(),
    }
}
