use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use test_model::{Attachable, Attachment, AttachmentError, AttachmentValue};

use super::EncodeContext;
use crate::codec::{join_path, ValidateRecord};
use crate::error::DecodeError;

/// How the bytes of one attachment should reach the wire.
///
/// Selection depends only on whether the attachment has already been written
/// to storage by encode time; a known path always wins over previously
/// embedded bytes so large payloads are never duplicated in the stream.
pub(crate) enum ByteStrategy {
    /// Reference the already-persisted file.
    Reference(PathBuf),
    /// Embed bytes already held in memory.
    Inline(Vec<u8>),
    /// Materialize the retained attachable lazily; may block on I/O.
    Materialize(Arc<dyn Attachable>),
}

impl ByteStrategy {
    pub(crate) fn choose(attachment: &Attachment) -> Self {
        if let Some(path) = &attachment.file_system_path {
            return Self::Reference(path.clone());
        }
        match &attachment.value {
            AttachmentValue::Bytes(bytes) => Self::Inline(bytes.clone()),
            AttachmentValue::Deferred(value) => Self::Materialize(Arc::clone(value)),
        }
    }
}

/// Wire form of an attachment. A valid record carries at least one of
/// `path` and `_bytes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedAttachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(
        rename = "_bytes",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "bytes_repr::serialize",
        deserialize_with = "bytes_repr::deserialize"
    )]
    pub bytes: Option<Vec<u8>>,
    #[serde(
        rename = "preferredName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub preferred_name: Option<String>,
}

impl EncodedAttachment {
    /// Materializing a deferred attachable may block and may fail; a failure
    /// means the attachment is omitted from the stream and reported as an
    /// issue by the handler chain.
    pub fn encode(attachment: &Attachment, _ctx: &EncodeContext) -> Result<Self, AttachmentError> {
        let (path, bytes) = match ByteStrategy::choose(attachment) {
            ByteStrategy::Reference(path) => (Some(path.display().to_string()), None),
            ByteStrategy::Inline(bytes) => (None, Some(bytes)),
            ByteStrategy::Materialize(value) => (None, Some(value.materialize()?)),
        };
        Ok(Self {
            path,
            bytes,
            preferred_name: attachment.preferred_name.clone(),
        })
    }
}

impl ValidateRecord for EncodedAttachment {
    fn validate(&self, prefix: &str) -> Result<(), DecodeError> {
        if self.path.is_none() && self.bytes.is_none() {
            return Err(DecodeError::MissingValue {
                path: join_path(prefix, "path"),
            });
        }
        Ok(())
    }
}

mod bytes_repr {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_str(&BASE64.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    /// Accepts the preferred base64 text form or a plain numeric array, for
    /// producers lacking a base64 codec.
    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Numbers(Vec<u8>),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Text(text)) => BASE64
                .decode(text.as_bytes())
                .map(Some)
                .map_err(|err| D::Error::custom(format!("invalid base64 bytes: {err}"))),
            Some(Repr::Numbers(numbers)) => Ok(Some(numbers)),
        }
    }
}
