use std::fmt;

/// A location in source code attributed to a test, issue, or attachment.
///
/// `file_id` is the stable module-qualified identifier (`module/File.rs`);
/// `file_path` is the absolute path as seen by the compiling host. Line and
/// column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file_id: String,
    pub file_path: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(
        file_id: impl Into<String>,
        file_path: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            file_id: file_id.into(),
            file_path: file_path.into(),
            line: line.max(1),
            column: column.max(1),
        }
    }

    /// The module component of `file_id`, if present.
    pub fn module_name(&self) -> Option<&str> {
        self.file_id.split_once('/').map(|(module, _)| module)
    }

    /// The file name component of `file_id`.
    pub fn file_name(&self) -> &str {
        self.file_id
            .rsplit_once('/')
            .map(|(_, name)| name)
            .unwrap_or(&self.file_id)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_name(), self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_id_components_and_display() {
        let loc = SourceLocation::new("my_pkg/lib.rs", "/src/my_pkg/lib.rs", 10, 3);
        assert_eq!(loc.module_name(), Some("my_pkg"));
        assert_eq!(loc.file_name(), "lib.rs");
        assert_eq!(loc.to_string(), "lib.rs:10:3");
    }

    #[test]
    fn line_and_column_are_clamped_to_one() {
        let loc = SourceLocation::new("m/f.rs", "/m/f.rs", 0, 0);
        assert_eq!((loc.line, loc.column), (1, 1));
    }
}
