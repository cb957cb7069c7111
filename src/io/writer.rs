//! PDF writing and saving operations.
//!
//! Documents are serialized through a buffered writer after the configured
//! compression pass. Missing parent directories are created.

use lopdf::Document;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::CompressionLevel;
use crate::error::{DocMergeError, Result};
use crate::utils::format_file_size;

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Compression applied before writing.
    pub compression: CompressionLevel,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: CompressionLevel::Standard,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer for the given compression level.
    pub fn with_compression(compression: CompressionLevel) -> Self {
        Self::with_options(WriteOptions {
            compression,
            ..Default::default()
        })
    }

    /// Write `doc` to `path`, returning statistics.
    ///
    /// The document is modified in place by the compression pass.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directories cannot be created
    /// - The file cannot be created or opened for writing
    /// - An I/O error occurs during serialization or flushing
    pub fn write(&self, doc: &mut Document, path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        match self.options.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => doc.compress(),
            CompressionLevel::Maximum => {
                doc.prune_objects();
                doc.compress();
            }
        }
        doc.renumber_objects();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| DocMergeError::FailedToCreateOutput {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let file = std::fs::File::create(path).map_err(|e| DocMergeError::FailedToCreateOutput {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut writer = BufWriter::with_capacity(self.options.buffer_size, file);

        doc.save_to(&mut writer)
            .map_err(|e| DocMergeError::FailedToWrite {
                path: path.to_path_buf(),
                source: std::io::Error::other(e),
            })?;

        writer.flush().map_err(|e| DocMergeError::FailedToWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(WriteStatistics {
            write_time: start.elapsed(),
            file_size,
            output_path: path.to_path_buf(),
        })
    }
}
