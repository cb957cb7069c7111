//! Page-count probing for input documents.
//!
//! Counts are advisory. They feed list previews and statistics; the assembler
//! never trusts them and discovers real page counts at merge time. For that
//! reason [`PageCounter::count`] never fails: any problem degrades to a
//! default of `0` for PDFs and `1` for Word documents.

use std::path::Path;

use crate::convert::docx;
use crate::document::DocumentKind;
use crate::error::Result;
use crate::io::PdfReader;

/// Paragraph count above which the paragraph heuristic kicks in.
const PARAGRAPH_THRESHOLD: usize = 50;

/// Paragraphs assumed to fit on one page.
const PARAGRAPHS_PER_PAGE: usize = 40;

/// Kilobytes of legacy `.doc` file assumed per page.
const KB_PER_PAGE: u64 = 50;

/// Estimates page counts per document kind.
pub struct PageCounter;

impl PageCounter {
    /// Page count of the document at `path`.
    ///
    /// PDFs are counted from their page tree. Word documents are estimated.
    /// Unsupported extensions count as `0`.
    pub fn count(path: &Path) -> u32 {
        match DocumentKind::from_path(path) {
            DocumentKind::Pdf => Self::count_pdf(path).unwrap_or_else(|err| {
                log::debug!("cannot count pages of {}: {err}", path.display());
                0
            }),
            DocumentKind::Word => Self::estimate_docx(path).unwrap_or_else(|err| {
                log::debug!("cannot estimate pages of {}: {err}", path.display());
                1
            }),
            DocumentKind::LegacyWord => Self::estimate_legacy_word(path).unwrap_or(1),
            DocumentKind::Unknown => 0,
        }
    }

    /// Exact page count of a PDF.
    pub fn count_pdf(path: &Path) -> Result<u32> {
        let doc = PdfReader::new().read(path)?;
        Ok(doc.get_pages().len() as u32)
    }

    /// Estimate from explicit page breaks and paragraph volume.
    ///
    /// `max(1, breaks + 1)`, raised to `paragraphs / 40` when the document
    /// has more than 50 paragraphs. No layout is performed.
    pub fn estimate_docx(path: &Path) -> Result<u32> {
        let Some(body) = docx::parse(path)? else {
            return Ok(1);
        };

        let mut estimate = (body.page_break_count + 1).max(1);
        if body.paragraph_count > PARAGRAPH_THRESHOLD {
            estimate = estimate.max(body.paragraph_count / PARAGRAPHS_PER_PAGE);
        }

        Ok(estimate as u32)
    }

    /// Estimate from file size alone: `max(1, KB / 50)`.
    pub fn estimate_legacy_word(path: &Path) -> Result<u32> {
        let size_kb = std::fs::metadata(path)?.len() / 1024;
        Ok((size_kb / KB_PER_PAGE).max(1) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_docx(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        write!(
            zip,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
        .unwrap();
        zip.finish().unwrap();
        path
    }

    fn paragraphs(n: usize) -> String {
        "<w:p><w:r><w:t>line</w:t></w:r></w:p>".repeat(n)
    }

    #[rstest]
    #[case(paragraphs(3), 1)]
    #[case(format!("{}<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>{}", paragraphs(1), paragraphs(1)), 2)]
    #[case(paragraphs(50), 1)]
    #[case(paragraphs(120), 3)]
    #[case(format!("{}{}", "<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>".repeat(4), paragraphs(56)), 5)]
    fn test_estimate_docx(#[case] body: String, #[case] expected: u32) {
        let dir = TempDir::new().unwrap();
        let path = write_docx(&dir, "doc.docx", &body);
        assert_eq!(PageCounter::count(&path), expected);
    }

    #[rstest]
    #[case(10 * 1024, 1)]
    #[case(120 * 1024, 2)]
    #[case(500 * 1024, 10)]
    fn test_estimate_legacy_word(#[case] size: usize, #[case] expected: u32) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.doc");
        std::fs::write(&path, vec![0u8; size]).unwrap();
        assert_eq!(PageCounter::count(&path), expected);
    }

    #[test]
    fn test_failures_degrade_to_defaults() {
        let dir = TempDir::new().unwrap();

        let pdf = dir.path().join("broken.pdf");
        std::fs::write(&pdf, b"garbage").unwrap();
        assert_eq!(PageCounter::count(&pdf), 0);

        let docx = dir.path().join("broken.docx");
        std::fs::write(&docx, b"garbage").unwrap();
        assert_eq!(PageCounter::count(&docx), 1);

        assert_eq!(PageCounter::count(&dir.path().join("missing.doc")), 1);
        assert_eq!(PageCounter::count(&dir.path().join("missing.pdf")), 0);
    }

    #[test]
    fn test_unknown_extension_counts_zero() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        assert_eq!(PageCounter::count(&path), 0);
    }

    #[test]
    fn test_docx_without_body_counts_one() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(
            br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#,
        )
        .unwrap();
        zip.finish().unwrap();

        assert_eq!(PageCounter::count(&path), 1);
    }
}
