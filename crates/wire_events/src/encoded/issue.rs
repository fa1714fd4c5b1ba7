use serde::{Deserialize, Serialize};
use test_model::{Issue, Severity};

use super::{EncodeContext, EncodedBacktrace, EncodedError, EncodedSourceLocation};
use crate::codec::ValidateRecord;
use crate::error::DecodeError;
use crate::version::WireVersion;

/// First version carrying the stable `severity` and `isFailure` keys. Older
/// versions omit both entirely rather than emitting a default.
const SEVERITY_INTRODUCED: WireVersion = WireVersion::V6_3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodedSeverity {
    Warning,
    Error,
}

impl EncodedSeverity {
    fn encode(severity: Severity) -> Self {
        match severity {
            Severity::Warning => Self::Warning,
            Severity::Error => Self::Error,
        }
    }

    pub fn to_native(self) -> Severity {
        match self {
            Self::Warning => Severity::Warning,
            Self::Error => Severity::Error,
        }
    }
}

/// Wire form of an issue.
///
/// `_severity` predates the stable `severity` key and is still emitted to
/// experimental consumers alongside it during the migration overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedIssue {
    #[serde(rename = "isKnown")]
    pub is_known: bool,
    #[serde(
        rename = "sourceLocation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_location: Option<EncodedSourceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<EncodedSeverity>,
    #[serde(rename = "isFailure", default, skip_serializing_if = "Option::is_none")]
    pub is_failure: Option<bool>,
    #[serde(rename = "_severity", default, skip_serializing_if = "Option::is_none")]
    pub experimental_severity: Option<EncodedSeverity>,
    #[serde(rename = "_backtrace", default, skip_serializing_if = "Option::is_none")]
    pub backtrace: Option<EncodedBacktrace>,
    #[serde(rename = "_error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EncodedError>,
}

impl EncodedIssue {
    pub fn encode(issue: &Issue, ctx: &EncodeContext) -> Self {
        let stable_severity = ctx.version >= SEVERITY_INTRODUCED;
        let experimental = ctx.experimental();
        Self {
            is_known: issue.is_known(),
            source_location: issue
                .source_location
                .as_ref()
                .map(|location| EncodedSourceLocation::encode(location, ctx)),
            severity: stable_severity.then(|| EncodedSeverity::encode(issue.severity)),
            is_failure: stable_severity.then(|| issue.is_failure()),
            experimental_severity: experimental.then(|| EncodedSeverity::encode(issue.severity)),
            backtrace: issue
                .backtrace
                .as_ref()
                .filter(|_| experimental && ctx.include_backtraces)
                .map(|backtrace| EncodedBacktrace::encode(backtrace, ctx)),
            error: issue
                .error
                .as_ref()
                .filter(|_| experimental)
                .map(|error| EncodedError::encode(error, ctx)),
        }
    }

    /// The severity a consumer should assume: the stable key when present,
    /// the experimental key otherwise, and error for pre-severity records.
    pub fn effective_severity(&self) -> Severity {
        self.severity
            .or(self.experimental_severity)
            .map(EncodedSeverity::to_native)
            .unwrap_or(Severity::Error)
    }
}

impl ValidateRecord for EncodedIssue {
    fn validate(&self, _prefix: &str) -> Result<(), DecodeError> {
        Ok(())
    }
}
