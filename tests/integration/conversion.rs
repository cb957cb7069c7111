//! Integration tests for Word conversion inside a merge.

use docmerge::convert::{FormatConverter, NO_CONTENT_MESSAGE};
use docmerge::document::DocumentList;
use docmerge::merge::{MergePipeline, MergeRequest, NoProgress};

use crate::common::{Workspace, load, page_text};

#[test]
fn test_corrupt_docx_still_merges() {
    let ws = Workspace::new();
    let pdf = ws.pdf("cover.pdf", 1, "Cover");
    let broken = ws.raw("broken.docx", b"this is not a zip archive");
    let output = ws.path("merged.pdf");

    let mut list = DocumentList::new();
    list.add_all([pdf, broken]).unwrap();

    let finished = MergePipeline::new()
        .with_temp_root(&ws.scratch_root)
        .run(MergeRequest::new(&list, &output), &NoProgress);
    assert!(finished.success, "merge failed: {:?}", finished.error);

    let stats = finished.statistics.unwrap();
    assert_eq!(stats.fallbacks, 1);
    assert_eq!(stats.total_pages, 2);

    let doc = load(&output);
    let placeholder = page_text(&doc, 2);
    assert!(placeholder.contains("broken.docx"));
    assert!(placeholder.contains("Page 2"));
    assert_eq!(ws.scratch_entries(), 0);
}

#[test]
fn test_legacy_word_gets_a_placeholder() {
    let ws = Workspace::new();
    let legacy = ws.raw("old.doc", &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]);
    let output = ws.path("merged.pdf");

    let mut list = DocumentList::new();
    list.add(legacy).unwrap();

    let finished = MergePipeline::new()
        .with_temp_root(&ws.scratch_root)
        .run(MergeRequest::new(&list, &output), &NoProgress);
    assert!(finished.success, "merge failed: {:?}", finished.error);
    assert_eq!(finished.statistics.unwrap().fallbacks, 1);
    assert!(page_text(&load(&output), 1).contains("old.doc"));
}

#[test]
fn test_placeholder_is_deterministic() {
    let ws = Workspace::new();
    let broken = ws.raw("broken.docx", b"garbage");
    let converter = FormatConverter::new();

    let first = ws.path("first.pdf");
    let second = ws.path("second.pdf");
    assert!(converter.convert(&broken, &first).unwrap().is_fallback());
    assert!(converter.convert(&broken, &second).unwrap().is_fallback());

    let (first, second) = (load(&first), load(&second));
    assert_eq!(first.get_pages().len(), second.get_pages().len());
    assert_eq!(page_text(&first, 1), page_text(&second, 1));
}

#[test]
fn test_docx_without_body_gets_notice() {
    let ws = Workspace::new();
    let path = ws.path("empty.docx");
    {
        use std::io::Write;
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        write!(
            zip,
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#
        )
        .unwrap();
        zip.finish().unwrap();
    }

    let output = ws.path("empty.pdf");
    let outcome = FormatConverter::new().convert(&path, &output).unwrap();
    assert!(!outcome.is_fallback());
    assert!(page_text(&load(&output), 1).contains(NO_CONTENT_MESSAGE));
}
