//! Input document descriptors.
//!
//! A [`DocumentDescriptor`] records one user-selected file together with the
//! metadata derived from it when it was added. Descriptors live in a
//! [`DocumentList`], which owns their display order.

mod list;

pub use list::{DocumentList, PlanEntry};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Format of an input document, decided once from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    /// Portable Document Format (`.pdf`).
    Pdf,
    /// Office Open XML word processing document (`.docx`).
    Word,
    /// Legacy binary Word document (`.doc`).
    LegacyWord,
    /// Anything else.
    Unknown,
}

impl DocumentKind {
    /// Detect the kind from a path's extension, case-insensitively.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Word,
            Some("doc") => Self::LegacyWord,
            _ => Self::Unknown,
        }
    }

    /// True for both Word formats.
    pub fn is_word(self) -> bool {
        matches!(self, Self::Word | Self::LegacyWord)
    }

    /// True when docmerge can take this kind as input.
    pub fn is_supported(self) -> bool {
        self != Self::Unknown
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF Document",
            Self::Word | Self::LegacyWord => "Word Document",
            Self::Unknown => "Unknown",
        }
    }
}

/// One user-selected input document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    path: PathBuf,
    kind: DocumentKind,

    /// Position in the owning list, 1-based.
    pub order: usize,

    /// Advisory page count; 0 until a probe has run.
    pub page_count: u32,

    /// Last modification time, if the filesystem reported one.
    pub modified: Option<DateTime<Local>>,

    /// Creation time, if the filesystem reported one.
    pub created: Option<DateTime<Local>>,
}

impl DocumentDescriptor {
    /// Describe the file at `path`.
    ///
    /// Timestamps are read once here. A file whose metadata cannot be read
    /// still gets a descriptor, just without timestamps.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = DocumentKind::from_path(&path);

        let metadata = std::fs::metadata(&path).ok();
        let modified = metadata
            .as_ref()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Local>::from);
        let created = metadata
            .as_ref()
            .and_then(|m| m.created().ok())
            .map(DateTime::<Local>::from);

        Self {
            path,
            kind,
            order: 0,
            page_count: 0,
            modified,
            created,
        }
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Kind detected at construction.
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// File name component of the path, lossily converted.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// File name without its extension.
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("report.pdf", DocumentKind::Pdf)]
    #[case("REPORT.PDF", DocumentKind::Pdf)]
    #[case("letter.docx", DocumentKind::Word)]
    #[case("letter.DocX", DocumentKind::Word)]
    #[case("old.doc", DocumentKind::LegacyWord)]
    #[case("notes.txt", DocumentKind::Unknown)]
    #[case("no_extension", DocumentKind::Unknown)]
    fn test_kind_from_extension(#[case] name: &str, #[case] expected: DocumentKind) {
        assert_eq!(DocumentKind::from_path(Path::new(name)), expected);
    }

    #[test]
    fn test_descriptor_reads_timestamps() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let doc = DocumentDescriptor::new(&path);
        assert_eq!(doc.kind(), DocumentKind::Pdf);
        assert_eq!(doc.page_count, 0);
        assert!(doc.modified.is_some());
        assert_eq!(doc.file_name(), "a.pdf");
        assert_eq!(doc.file_stem(), "a");
    }

    #[test]
    fn test_descriptor_for_missing_file() {
        let doc = DocumentDescriptor::new("/nonexistent/thing.docx");
        assert_eq!(doc.kind(), DocumentKind::Word);
        assert!(doc.modified.is_none());
        assert!(doc.created.is_none());
    }

    #[test]
    fn test_kind_helpers() {
        assert!(DocumentKind::LegacyWord.is_word());
        assert!(!DocumentKind::Pdf.is_word());
        assert!(!DocumentKind::Unknown.is_supported());
        assert_eq!(DocumentKind::Word.label(), "Word Document");
    }
}
