use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::SourceLocation;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("attachable value produced no bytes: {reason}")]
    Unmaterializable { reason: String },
    #[error("I/O while materializing attachment bytes")]
    Io(#[from] io::Error),
}

/// A value that can lazily produce the bytes of an attachment.
///
/// `materialize` may perform blocking I/O (reading or mapping a file) and is
/// not guaranteed to complete in bounded time; callers treat it as subject to
/// the surrounding system's backpressure policy.
pub trait Attachable: Send + Sync {
    fn materialize(&self) -> Result<Vec<u8>, AttachmentError>;
}

impl Attachable for Vec<u8> {
    fn materialize(&self) -> Result<Vec<u8>, AttachmentError> {
        Ok(self.clone())
    }
}

/// The payload backing an attachment before it is encoded.
#[derive(Clone)]
pub enum AttachmentValue {
    /// Bytes already held in memory.
    Bytes(Vec<u8>),
    /// An opaque attachable retained for lazy materialization.
    Deferred(Arc<dyn Attachable>),
}

impl fmt::Debug for AttachmentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// A value attached to the test run by a test body.
///
/// `file_system_path` is set exactly once, when the surrounding harness
/// persists the attachment to storage; whether that has happened by encode
/// time is an external fact this type merely reports.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub value: AttachmentValue,
    pub file_system_path: Option<PathBuf>,
    pub preferred_name: Option<String>,
    pub source_location: Option<SourceLocation>,
}

impl Attachment {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            value: AttachmentValue::Bytes(bytes),
            file_system_path: None,
            preferred_name: None,
            source_location: None,
        }
    }

    pub fn deferred(value: Arc<dyn Attachable>) -> Self {
        Self {
            value: AttachmentValue::Deferred(value),
            file_system_path: None,
            preferred_name: None,
            source_location: None,
        }
    }

    pub fn with_preferred_name(mut self, name: impl Into<String>) -> Self {
        self.preferred_name = Some(name.into());
        self
    }

    pub fn with_source_location(mut self, location: SourceLocation) -> Self {
        self.source_location = Some(location);
        self
    }

    /// Whether the attachment has already been written to storage.
    pub fn is_persisted(&self) -> bool {
        self.file_system_path.is_some()
    }
}
