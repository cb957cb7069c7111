//! Word to PDF conversion.
//!
//! Conversion is a lossy text transfer: paragraphs keep their text, a bold
//! first run, a declared size and center/right justification. Tables become a
//! `[Table content]` line. Anything that goes wrong while reading the source
//! produces a placeholder PDF that names the failure instead of an error, so a
//! single bad file never stops a merge. Only failing to write the output PDF
//! is reported as an error.

pub mod docx;
pub mod render;

use lopdf::Document;
use std::path::Path;

use crate::document::DocumentKind;
use crate::error::{DocMergeError, Result};
use crate::fonts::StandardFont;
use crate::io::PdfWriter;
use docx::{Block, WordBody};
use render::{DEFAULT_FONT_SIZE, TextLayout};

/// Line emitted in place of a table.
pub const TABLE_PLACEHOLDER: &str = "[Table content]";

/// Text used when the package has no body.
pub const NO_CONTENT_MESSAGE: &str = "Unable to read Word document content.";

/// Closing line of every placeholder PDF.
pub const FALLBACK_NOTE: &str =
    "Note: This is a placeholder. The original Word document could not be fully converted.";

/// What the converter produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Content was transferred.
    Converted {
        /// Pages in the produced PDF.
        pages: usize,
    },
    /// The source could not be read; a placeholder PDF was written.
    Fallback {
        /// Message of the underlying failure.
        reason: String,
    },
}

impl ConversionOutcome {
    /// True if a placeholder was written.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Converts Word documents to standalone PDFs.
#[derive(Debug, Clone, Default)]
pub struct FormatConverter {
    writer: PdfWriter,
}

impl FormatConverter {
    /// Create a converter that writes with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter that writes through `writer`.
    pub fn with_writer(writer: PdfWriter) -> Self {
        Self { writer }
    }

    /// Convert `word_path` into a PDF at `output_pdf`.
    ///
    /// A PDF is always written on success, either with the converted content
    /// or with a placeholder describing why conversion failed.
    ///
    /// # Errors
    ///
    /// Only when the output file cannot be written.
    pub fn convert(&self, word_path: &Path, output_pdf: &Path) -> Result<ConversionOutcome> {
        let (mut document, outcome) = match Self::render(word_path) {
            Ok((document, pages)) => (document, ConversionOutcome::Converted { pages }),
            Err(err) => {
                let reason = err.to_string();
                let level = if err.is_recoverable() {
                    log::Level::Warn
                } else {
                    log::Level::Error
                };
                log::log!(
                    level,
                    "converting {} failed, writing placeholder: {reason}",
                    word_path.display()
                );
                let document = Self::fallback_document(word_path, &reason)?;
                (document, ConversionOutcome::Fallback { reason })
            }
        };

        self.writer.write(&mut document, output_pdf)?;
        log::debug!("{} -> {} ({outcome:?})", word_path.display(), output_pdf.display());

        Ok(outcome)
    }

    /// Lay out the content of the Word document at `path`.
    fn render(path: &Path) -> Result<(Document, usize)> {
        if DocumentKind::from_path(path) == DocumentKind::LegacyWord {
            return Err(DocMergeError::LegacyWordFormat);
        }

        let mut layout = TextLayout::new();
        match docx::parse(path)? {
            Some(body) => Self::layout_body(&mut layout, &body),
            None => layout.paragraph(
                NO_CONTENT_MESSAGE,
                StandardFont::Regular,
                DEFAULT_FONT_SIZE,
                docx::Alignment::Left,
            ),
        }

        let pages = layout.page_count();
        Ok((layout.into_document()?, pages))
    }

    fn layout_body(layout: &mut TextLayout, body: &WordBody) {
        for block in &body.blocks {
            match block {
                Block::Paragraph(para) if para.is_blank() => {
                    for _ in 0..para.page_breaks() {
                        layout.page_break();
                    }
                    layout.blank_line();
                }
                Block::Paragraph(para) => {
                    let font = if para.bold {
                        StandardFont::Bold
                    } else {
                        StandardFont::Regular
                    };
                    let size = para.font_size.unwrap_or(DEFAULT_FONT_SIZE);

                    for (idx, segment) in para.segments.iter().enumerate() {
                        if idx > 0 {
                            layout.page_break();
                        }
                        if !segment.trim().is_empty() {
                            layout.paragraph(segment, font, size, para.alignment);
                        }
                    }
                }
                Block::Table => layout.paragraph(
                    TABLE_PLACEHOLDER,
                    StandardFont::Regular,
                    DEFAULT_FONT_SIZE,
                    docx::Alignment::Left,
                ),
            }
        }
    }

    /// Placeholder document naming the failure and the source file.
    pub fn fallback_document(word_path: &Path, reason: &str) -> Result<Document> {
        let file_name = word_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| word_path.display().to_string());

        let lines = [
            Some(format!("Error converting Word document: {reason}")),
            None,
            Some(format!("Original file: {file_name}")),
            None,
            Some(FALLBACK_NOTE.to_string()),
        ];

        let mut layout = TextLayout::new();
        for line in &lines {
            match line {
                Some(text) => layout.paragraph(
                    text,
                    StandardFont::Regular,
                    DEFAULT_FONT_SIZE,
                    docx::Alignment::Left,
                ),
                None => layout.blank_line(),
            }
        }

        layout.into_document()
    }
}
