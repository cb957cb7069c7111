//! PDF reading and loading operations.
//!
//! # Examples
//!
//! ```no_run
//! use docmerge::io::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("a.pdf"))?;
//! println!("{} pages", loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{DocMergeError, Result};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// PDF reader.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Parse the PDF at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocMergeError::FileNotFound`] for a missing path and
    /// [`DocMergeError::FailedToLoadPdf`] for anything lopdf cannot parse,
    /// including encrypted documents.
    pub fn read(&self, path: &Path) -> Result<Document> {
        Self::check_path_exists(path)?;

        Document::load(path).map_err(|e| {
            let reason = e.to_string();
            if reason.contains("encrypt") || reason.contains("password") {
                DocMergeError::failed_to_load_pdf(
                    path.to_path_buf(),
                    format!("{reason} (encrypted PDFs must be decrypted first)"),
                )
            } else {
                DocMergeError::failed_to_load_pdf(path.to_path_buf(), reason)
            }
        })
    }

    /// Parse the PDF at `path` and collect load details.
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        let start = Instant::now();
        let document = self.read(path)?;
        let load_time = start.elapsed();

        let page_count = document.get_pages().len();
        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
            load_time,
            file_size,
        })
    }

    /// Ensure `path` names an existing regular file.
    pub fn check_path_exists(path: &Path) -> Result<()> {
        let exists = path.try_exists()?;
        if !exists {
            return Err(DocMergeError::file_not_found(path.to_path_buf()));
        }

        if path.is_dir() {
            return Err(DocMergeError::not_a_file(path.to_path_buf()));
        }

        Ok(())
    }
}
