//! Generic JSON encode/decode for the shadow types, with JSON Lines framing.

use std::io::{self, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DecodeError, EncodeError};

/// Structural validation applied after JSON parsing, so that shape errors
/// (a required value absent or `null`) surface with the field's logical
/// path instead of a serde message.
pub trait ValidateRecord {
    fn validate(&self, prefix: &str) -> Result<(), DecodeError>;
}

pub(crate) fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Serializes one record as compact JSON.
///
/// The returned bytes contain no line feed or carriage return, so a stream
/// of records can be framed one per line; this is verified, not assumed.
pub fn encode_record<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let bytes = serde_json::to_vec(value)?;
    if bytes.iter().any(|byte| matches!(byte, b'\n' | b'\r')) {
        return Err(EncodeError::EmbeddedNewline);
    }
    Ok(bytes)
}

/// Parses and validates one record.
pub fn decode_record<T: DeserializeOwned + ValidateRecord>(bytes: &[u8]) -> Result<T, DecodeError> {
    let value: T = serde_json::from_slice(bytes)?;
    value.validate("")?;
    Ok(value)
}

/// Writes one framed record: the bytes followed by exactly one line feed.
pub fn write_record<W: Write>(writer: &mut W, record: &[u8]) -> io::Result<()> {
    writer.write_all(record)?;
    writer.write_all(b"\n")
}

/// The decode outcome for one non-blank line of a JSON Lines stream.
#[derive(Debug)]
pub struct RecordLine<T> {
    /// 1-based line number in the underlying text.
    pub line_number: usize,
    pub outcome: Result<T, DecodeError>,
}

/// Decodes a JSON Lines stream, skipping blank lines and tolerating a
/// trailing carriage return per line. Malformed lines yield per-line errors
/// rather than aborting the stream.
pub fn decode_lines<T: DeserializeOwned + ValidateRecord>(text: &str) -> Vec<RecordLine<T>> {
    let mut records = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.chars().all(|ch| ch.is_whitespace()) {
            continue;
        }
        records.push(RecordLine {
            line_number: index + 1,
            outcome: decode_record(line.as_bytes()),
        });
    }
    records
}
