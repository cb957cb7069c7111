//! Integration tests for complete merge runs.

use docmerge::document::DocumentList;
use docmerge::merge::{MergePhase, MergePipeline, MergeRequest, NoProgress};
use std::sync::{Arc, Mutex};

use crate::common::{Workspace, load, page_text};

fn pipeline(ws: &Workspace) -> MergePipeline {
    MergePipeline::new().with_temp_root(&ws.scratch_root)
}

#[test]
fn test_pdf_and_word_merge_with_page_numbers() {
    let ws = Workspace::new();
    let pdf = ws.pdf("doc1.pdf", 2, "Intro");
    let docx = ws.docx_pages("doc2.docx", &["Alpha", "Beta", "Gamma"]);
    let output = ws.path("merged.pdf");

    let mut list = DocumentList::new();
    list.add_all([pdf, docx]).unwrap();

    let finished = pipeline(&ws).run(MergeRequest::new(&list, &output), &NoProgress);
    assert!(finished.success, "merge failed: {:?}", finished.error);
    assert_eq!(finished.phase, MergePhase::Succeeded);

    let doc = load(&output);
    assert_eq!(doc.get_pages().len(), 5);

    assert!(page_text(&doc, 1).contains("Intro page 1"));
    assert!(page_text(&doc, 2).contains("Intro page 2"));
    assert!(page_text(&doc, 3).contains("Alpha"));
    assert!(page_text(&doc, 4).contains("Beta"));
    assert!(page_text(&doc, 5).contains("Gamma"));

    for page in 1..=5 {
        assert!(
            page_text(&doc, page).contains(&format!("Page {page}")),
            "page {page} is missing its label"
        );
    }

    let stats = finished.statistics.unwrap();
    assert_eq!(stats.documents, 2);
    assert_eq!(stats.copied, 1);
    assert_eq!(stats.converted, 1);
    assert_eq!(stats.fallbacks, 0);
    assert_eq!(stats.total_pages, 5);
    assert!(stats.output_size > 0);
}

#[test]
fn test_reordering_the_list_reorders_the_output() {
    let ws = Workspace::new();
    let first = ws.pdf("first.pdf", 1, "First");
    let second = ws.pdf("second.pdf", 1, "Second");
    let output = ws.path("merged.pdf");

    let mut list = DocumentList::new();
    list.add_all([first, second]).unwrap();
    assert!(list.move_up(1));

    let finished = pipeline(&ws).run(MergeRequest::new(&list, &output), &NoProgress);
    assert!(finished.success, "merge failed: {:?}", finished.error);

    let doc = load(&output);
    assert!(page_text(&doc, 1).contains("Second page 1"));
    assert!(page_text(&doc, 2).contains("First page 1"));
}

#[test]
fn test_custom_start_number() {
    let ws = Workspace::new();
    let pdf = ws.pdf("doc.pdf", 3, "Body");
    let output = ws.path("merged.pdf");

    let mut list = DocumentList::new();
    list.add(pdf).unwrap();

    let request = MergeRequest::new(&list, &output).with_start_number(10);
    let finished = pipeline(&ws).run(request, &NoProgress);
    assert!(finished.success, "merge failed: {:?}", finished.error);

    let doc = load(&output);
    assert!(page_text(&doc, 1).contains("Page 10"));
    assert!(page_text(&doc, 3).contains("Page 12"));
}

#[test]
fn test_without_page_numbers() {
    let ws = Workspace::new();
    let pdf = ws.pdf("doc.pdf", 2, "Plain");
    let output = ws.path("merged.pdf");

    let mut list = DocumentList::new();
    list.add(pdf).unwrap();

    let request = MergeRequest::new(&list, &output).with_page_numbers(false);
    let finished = pipeline(&ws).run(request, &NoProgress);
    assert!(finished.success, "merge failed: {:?}", finished.error);

    let doc = load(&output);
    assert!(!page_text(&doc, 1).contains("Page 1"));
    assert!(page_text(&doc, 1).contains("Plain page 1"));
}

#[test]
fn test_scratch_directory_is_removed() {
    let ws = Workspace::new();
    let pdf = ws.pdf("doc.pdf", 1, "Body");
    let docx = ws.docx_pages("notes.docx", &["Notes"]);

    let mut list = DocumentList::new();
    list.add_all([pdf, docx]).unwrap();

    let finished = pipeline(&ws).run(MergeRequest::new(&list, ws.path("out.pdf")), &NoProgress);
    assert!(finished.success, "merge failed: {:?}", finished.error);
    assert_eq!(ws.scratch_entries(), 0);
}

#[test]
fn test_progress_reaches_one_hundred() {
    let ws = Workspace::new();
    let mut list = DocumentList::new();
    list.add_all([
        ws.pdf("a.pdf", 2, "A"),
        ws.docx_pages("b.docx", &["B1", "B2"]),
    ])
    .unwrap();

    let seen = Mutex::new(Vec::new());
    let sink = |percent: f64| seen.lock().unwrap().push(percent);
    let finished = pipeline(&ws).run(MergeRequest::new(&list, ws.path("out.pdf")), &sink);
    assert!(finished.success, "merge failed: {:?}", finished.error);

    let seen = seen.into_inner().unwrap();
    assert!(seen.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(seen.last().copied(), Some(100.0));
    assert!(seen.iter().any(|&p| p > 0.0 && p <= 50.0));
}

#[tokio::test]
async fn test_spawned_run_streams_progress() {
    let ws = Workspace::new();
    let mut list = DocumentList::new();
    list.add(ws.pdf("a.pdf", 1, "A")).unwrap();

    let (sender, mut receiver) = tokio::sync::mpsc::unbounded_channel();
    let sink = Arc::new(docmerge::merge::ChannelProgress::new(sender));

    let finished = pipeline(&ws)
        .spawn(MergeRequest::new(&list, ws.path("out.pdf")), sink)
        .await;
    assert!(finished.success, "merge failed: {:?}", finished.error);
    assert!(finished.duration().is_some());

    let mut last = 0.0;
    while let Ok(percent) = receiver.try_recv() {
        last = percent;
    }
    assert_eq!(last, 100.0);
}

#[tokio::test]
async fn test_refreshed_counts_match_output() {
    let ws = Workspace::new();
    let mut list = DocumentList::new();
    list.add_all([
        ws.pdf("a.pdf", 2, "A"),
        ws.docx_pages("b.docx", &["B1", "B2", "B3"]),
    ])
    .unwrap();

    list.refresh_page_counts(2).await;
    assert_eq!(list.total_pages(), 5);

    let plan = list.plan();
    assert_eq!((plan[1].first_page, plan[1].last_page), (3, 5));

    let finished = pipeline(&ws).run(MergeRequest::new(&list, ws.path("out.pdf")), &NoProgress);
    assert_eq!(finished.statistics.unwrap().total_pages, 5);
}
