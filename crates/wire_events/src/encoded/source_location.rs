use serde::{Deserialize, Serialize};
use test_model::SourceLocation;

use super::EncodeContext;
use crate::version::WireVersion;

/// Last version that still emits the pre-rename `_filePath` key. The rename
/// to `filePath` overlaps for exactly the [`WireVersion::V0`] release; how
/// long such dual emission persists is a migration policy, not a format
/// constant, so it lives here rather than in the schema itself.
const LEGACY_FILE_PATH_RETIRED_AFTER: WireVersion = WireVersion::V0;

/// First version emitting the `filePath` key.
const FILE_PATH_KEY_INTRODUCED: WireVersion = WireVersion::V0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedSourceLocation {
    #[serde(rename = "fileID")]
    pub file_id: String,
    #[serde(
        rename = "_filePath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_file_path: Option<String>,
    #[serde(rename = "filePath", default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub line: u32,
    pub column: u32,
}

impl EncodedSourceLocation {
    pub fn encode(location: &SourceLocation, ctx: &EncodeContext) -> Self {
        let legacy = ctx.version <= LEGACY_FILE_PATH_RETIRED_AFTER;
        let renamed = ctx.version >= FILE_PATH_KEY_INTRODUCED;
        Self {
            file_id: location.file_id.clone(),
            legacy_file_path: legacy.then(|| location.file_path.clone()),
            file_path: renamed.then(|| location.file_path.clone()),
            line: location.line,
            column: location.column,
        }
    }

    /// Best-effort native form. Prefers the renamed key, falls back to the
    /// legacy one, and clamps line/column to their 1-based minimum.
    pub fn to_native(&self) -> SourceLocation {
        let file_path = self
            .file_path
            .clone()
            .or_else(|| self.legacy_file_path.clone())
            .unwrap_or_default();
        SourceLocation::new(
            self.file_id.clone(),
            file_path,
            self.line.max(1),
            self.column.max(1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> SourceLocation {
        SourceLocation::new("pkg/math.rs", "/src/pkg/math.rs", 42, 7)
    }

    #[test]
    fn dual_key_overlap_is_limited_to_the_transition_version() {
        let old = EncodedSourceLocation::encode(&location(), &EncodeContext::new(WireVersion::XCODE16));
        assert!(old.legacy_file_path.is_some());
        assert!(old.file_path.is_none());

        let overlap = EncodedSourceLocation::encode(&location(), &EncodeContext::new(WireVersion::V0));
        assert!(overlap.legacy_file_path.is_some());
        assert!(overlap.file_path.is_some());

        let new = EncodedSourceLocation::encode(&location(), &EncodeContext::new(WireVersion::V6_3));
        assert!(new.legacy_file_path.is_none());
        assert_eq!(new.file_path.as_deref(), Some("/src/pkg/math.rs"));
    }

    #[test]
    fn to_native_clamps_zero_line_and_column() {
        let encoded = EncodedSourceLocation {
            file_id: "pkg/math.rs".to_string(),
            legacy_file_path: Some("/old/path.rs".to_string()),
            file_path: None,
            line: 0,
            column: 0,
        };
        let native = encoded.to_native();
        assert_eq!((native.line, native.column), (1, 1));
        assert_eq!(native.file_path, "/old/path.rs");
    }
}
