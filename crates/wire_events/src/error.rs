use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Configuration-time failures. These are the only errors allowed to abort
/// before any test runs; everything after stream open degrades in place.
#[derive(Debug, Error)]
pub enum StreamConfigError {
    #[error("unsupported event stream version {requested} (newest stable is {newest})")]
    UnsupportedVersion { requested: String, newest: String },
    #[error("invalid event stream version string {raw:?}")]
    InvalidVersion { raw: String },
    #[error("cannot open event stream destination {path}")]
    Destination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Decode-time structural failures.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A required value was absent (or `null`) at the given logical path.
    #[error("missing value at {path}")]
    MissingValue { path: String },
    #[error("invalid value at {path}: {message}")]
    InvalidValue { path: String, message: String },
    #[error("record is not valid JSON")]
    Json(#[from] serde_json::Error),
}

/// Encode-time failures. `EmbeddedNewline` is a framing violation and should
/// be unreachable for values produced by this crate.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("record could not be serialized")]
    Json(#[from] serde_json::Error),
    #[error("encoded record contains an embedded line feed")]
    EmbeddedNewline,
}

/// A failure delivering one record to one sink. Isolated per sink: the
/// handler chain reports it and keeps delivering to the remaining sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink write failed")]
    Io(#[from] io::Error),
    #[error("sink rejected record: {reason}")]
    Rejected { reason: String },
}
