//! Fixtures for the integration tests.
//!
//! Inputs are generated on the fly: PDFs with lopdf, Word documents as
//! minimal OOXML packages.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A working directory with an input area and a scratch root.
pub struct Workspace {
    pub dir: TempDir,
    pub scratch_root: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let scratch_root = dir.path().join("scratch");
        std::fs::create_dir(&scratch_root).expect("Failed to create scratch root");
        Self { dir, scratch_root }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a PDF whose page `i` reads `"{label} page {i}"`.
    pub fn pdf(&self, name: &str, pages: u32, label: &str) -> PathBuf {
        let path = self.path(name);
        let mut doc = build_pdf(pages, label);
        doc.save(&path).expect("Failed to save fixture PDF");
        path
    }

    /// Write a DOCX whose pages are separated by explicit page breaks.
    pub fn docx_pages(&self, name: &str, pages: &[&str]) -> PathBuf {
        let body = pages
            .iter()
            .map(|text| format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>"))
            .collect::<Vec<_>>()
            .join("<w:p><w:r><w:br w:type=\"page\"/></w:r></w:p>");
        self.docx(name, &body)
    }

    /// Write a DOCX package with `body` as the document body.
    pub fn docx(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path(name);
        let file = std::fs::File::create(&path).expect("Failed to create DOCX");
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", SimpleFileOptions::default())
            .expect("Failed to start DOCX entry");
        write!(
            zip,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
        .expect("Failed to write DOCX body");
        zip.finish().expect("Failed to finish DOCX");
        path
    }

    /// Write arbitrary bytes.
    pub fn raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).expect("Failed to write file");
        path
    }

    /// Entries left in the scratch root.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(&self.scratch_root)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

fn build_pdf(pages: u32, label: &str) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("{label} page {i}"))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("Failed to encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
            "MediaBox" => Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Load a PDF written by a test.
pub fn load(path: &Path) -> Document {
    Document::load(path).expect("Failed to load output PDF")
}

/// Extracted text of page `page` (1-based).
pub fn page_text(doc: &Document, page: u32) -> String {
    doc.extract_text(&[page]).unwrap_or_default()
}
