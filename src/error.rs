//! Error types for docmerge.
//!
//! Errors fall into two groups. Per-file problems (a Word document that cannot
//! be parsed, a temporary PDF that vanished before assembly) are absorbed by the
//! component that meets them and never reach the caller. Everything else aborts
//! the merge run and is surfaced verbatim as the run's error message.
//!
//! # Error Categories
//!
//! - **I/O Errors**: File not found, permission denied, unwritable output
//! - **Format Errors**: Corrupt PDFs, invalid DOCX packages, unsupported formats
//! - **Configuration Errors**: Invalid arguments or option combinations

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;

/// Result type alias for docmerge operations.
pub type Result<T> = std::result::Result<T, DocMergeError>;

/// Coarse classification of a [`DocMergeError`].
///
/// Recorded next to the free-text message of a failed run so callers can
/// branch on the kind of failure without parsing the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Reading or writing the filesystem failed.
    Io,
    /// The operating system refused access.
    Permission,
    /// A document could not be parsed or has an unsupported format.
    Format,
    /// Invalid arguments or configuration.
    Config,
    /// Anything else, including worker panics.
    Internal,
}

impl ErrorKind {
    /// Process exit code for a run that failed with this kind of error.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Config => 1,
            Self::Format => 3,
            Self::Io | Self::Permission => 5,
            Self::Internal => 6,
        }
    }
}

/// Main error type for docmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum DocMergeError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file has an extension docmerge cannot handle.
    #[error("Unsupported document type: {}\n  Supported extensions: .pdf, .docx, .doc", path.display())]
    UnsupportedDocument {
        /// Path to the rejected file.
        path: PathBuf,
    },

    /// Failed to load PDF file.
    #[error("Failed to load PDF: {}\n  Reason: {reason}", path.display())]
    FailedToLoadPdf {
        /// Path to the PDF file.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// The Word package is not a readable DOCX document.
    #[error("not a valid DOCX file: {reason}")]
    InvalidDocx {
        /// What is wrong with the package.
        reason: String,
    },

    /// Legacy binary Word documents are only estimated, never converted.
    #[error("legacy binary Word format (.doc) is not supported for content conversion")]
    LegacyWordFormat,

    /// The DOCX package could not be opened as a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The DOCX main part is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Low-level PDF object error.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// No files were provided for merging.
    #[error("No input files specified for merging")]
    NoFilesToMerge,

    /// Output file already exists and overwrite is not allowed.
    #[error("Output file already exists: {}\n  Use --force to overwrite or choose a different output path", path.display())]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The per-run scratch directory could not be created.
    #[error("Failed to create temporary directory: {source}")]
    TempDir {
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Merge operation failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<anyhow::Error> for DocMergeError {
    /// Recover a crate error carried through `anyhow`, otherwise treat the
    /// message as a configuration problem.
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DocMergeError>() {
            Ok(err) => err,
            Err(err) => Self::invalid_config(err.to_string()),
        }
    }
}

impl DocMergeError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an UnsupportedDocument error.
    pub fn unsupported_document(path: PathBuf) -> Self {
        Self::UnsupportedDocument { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            path,
            reason: reason.into(),
        }
    }

    /// Create an InvalidDocx error.
    pub fn invalid_docx(reason: impl Into<String>) -> Self {
        Self::InvalidDocx {
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        let io_kind = |source: &io::Error| {
            if source.kind() == io::ErrorKind::PermissionDenied {
                ErrorKind::Permission
            } else {
                ErrorKind::Io
            }
        };

        match self {
            Self::FileNotFound { .. } | Self::NotAFile { .. } => ErrorKind::Io,
            Self::FailedToCreateOutput { source, .. }
            | Self::FailedToWrite { source, .. }
            | Self::TempDir { source }
            | Self::FailedToReadInputList { source, .. }
            | Self::Io(source) => io_kind(source),
            Self::UnsupportedDocument { .. }
            | Self::FailedToLoadPdf { .. }
            | Self::InvalidDocx { .. }
            | Self::LegacyWordFormat
            | Self::Zip(_)
            | Self::Xml(_)
            | Self::Pdf(_) => ErrorKind::Format,
            Self::NoFilesToMerge | Self::OutputExists { .. } | Self::InvalidConfig { .. } => {
                ErrorKind::Config
            }
            Self::MergeFailed { .. } | Self::Cancelled | Self::Other { .. } => {
                ErrorKind::Internal
            }
        }
    }

    /// Check if this error is absorbed per file instead of failing the run.
    ///
    /// Word parsing problems turn into a fallback page; everything else is
    /// fatal to the run that meets it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidDocx { .. } | Self::LegacyWordFormat | Self::Zip(_) | Self::Xml(_)
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::UnsupportedDocument { .. } => 3,
            Self::FailedToLoadPdf { .. } => 3,
            Self::InvalidDocx { .. } => 3,
            Self::LegacyWordFormat => 3,
            Self::Zip(_) | Self::Xml(_) | Self::Pdf(_) => 3,
            Self::NoFilesToMerge => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::TempDir { .. } => 5,
            Self::Io(_) => 5,
            Self::MergeFailed { .. } => 6,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130,
            Self::Other { .. } => 1,
        }
    }
}
