//! Integration tests for error handling and edge cases.

use docmerge::document::{DocumentDescriptor, DocumentList};
use docmerge::error::{DocMergeError, ErrorKind};
use docmerge::merge::{MergePhase, MergePipeline, MergeRequest, NoProgress};

use crate::common::Workspace;

#[test]
fn test_empty_request_fails() {
    let ws = Workspace::new();
    let request = MergeRequest::from_documents(Vec::new(), ws.path("out.pdf"));

    let finished = MergePipeline::new().run(request, &NoProgress);
    assert!(!finished.success);
    assert_eq!(finished.phase, MergePhase::Failed);
    assert_eq!(finished.error_kind, Some(ErrorKind::Config));
    assert!(!ws.path("out.pdf").exists());
}

#[test]
fn test_source_removed_before_merge() {
    let ws = Workspace::new();
    let pdf = ws.pdf("gone.pdf", 1, "Gone");

    let mut list = DocumentList::new();
    list.add(&pdf).unwrap();
    std::fs::remove_file(&pdf).unwrap();

    let finished = MergePipeline::new()
        .with_temp_root(&ws.scratch_root)
        .run(MergeRequest::new(&list, ws.path("out.pdf")), &NoProgress);

    assert!(!finished.success);
    assert!(finished.error.unwrap().contains("gone.pdf"));
    assert_eq!(finished.error_kind, Some(ErrorKind::Io));
    assert_eq!(ws.scratch_entries(), 0);
}

#[test]
fn test_corrupt_pdf_fails_the_run() {
    let ws = Workspace::new();
    let bad = ws.raw("bad.pdf", b"not a pdf");

    let finished = MergePipeline::new()
        .with_temp_root(&ws.scratch_root)
        .run(
            MergeRequest::from_documents(vec![DocumentDescriptor::new(bad)], ws.path("out.pdf")),
            &NoProgress,
        );

    assert!(!finished.success);
    assert_eq!(finished.error_kind, Some(ErrorKind::Format));
    assert_eq!(ws.scratch_entries(), 0);
}

#[test]
fn test_unwritable_output_fails_the_run() {
    let ws = Workspace::new();
    let pdf = ws.pdf("doc.pdf", 1, "Doc");
    let blocker = ws.raw("blocker", b"file, not a directory");

    let mut list = DocumentList::new();
    list.add(pdf).unwrap();

    let finished = MergePipeline::new()
        .with_temp_root(&ws.scratch_root)
        .run(MergeRequest::new(&list, blocker.join("out.pdf")), &NoProgress);

    assert!(!finished.success);
    assert!(finished.error.is_some());
    assert_eq!(ws.scratch_entries(), 0);
}

#[test]
fn test_unsupported_extension_is_rejected_by_list() {
    let mut list = DocumentList::new();
    let err = list.add("notes.txt").unwrap_err();
    assert!(matches!(err, DocMergeError::UnsupportedDocument { .. }));
    assert!(list.is_empty());
}

#[test]
fn test_list_edits_do_not_reach_submitted_request() {
    let ws = Workspace::new();
    let mut list = DocumentList::new();
    list.add(ws.pdf("a.pdf", 1, "A")).unwrap();

    let request = MergeRequest::new(&list, ws.path("out.pdf"));
    list.add(ws.pdf("b.pdf", 1, "B")).unwrap();
    list.clear();

    let finished = MergePipeline::new()
        .with_temp_root(&ws.scratch_root)
        .run(request, &NoProgress);
    assert!(finished.success, "merge failed: {:?}", finished.error);
    assert_eq!(finished.statistics.unwrap().total_pages, 1);
}
