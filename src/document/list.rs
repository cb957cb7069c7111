//! Ordered list of input documents.
//!
//! The list is mutated only by its owner between merge runs. A merge gets a
//! [`snapshot`](DocumentList::snapshot), so later edits never reach a run in
//! flight.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::DocumentDescriptor;
use crate::count::PageCounter;
use crate::error::{DocMergeError, Result};

/// One line of a merge plan preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanEntry {
    /// 1-based position in the merge.
    pub order: usize,
    /// File name of the document.
    pub file_name: String,
    /// Advisory page count.
    pub pages: u32,
    /// First output page this document is expected to occupy.
    pub first_page: u32,
    /// Last output page this document is expected to occupy.
    ///
    /// One less than `first_page` when the document has no pages.
    pub last_page: u32,
}

/// Documents selected for merging, in merge order.
#[derive(Debug, Clone, Default)]
pub struct DocumentList {
    documents: Vec<DocumentDescriptor>,
}

impl DocumentList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`DocMergeError::UnsupportedDocument`] if the extension is not
    /// `.pdf`, `.docx` or `.doc`.
    pub fn add(&mut self, path: impl Into<PathBuf>) -> Result<usize> {
        let document = DocumentDescriptor::new(path);
        if !document.kind().is_supported() {
            return Err(DocMergeError::unsupported_document(document.path));
        }

        self.documents.push(document);
        self.update_orders();
        Ok(self.documents.len() - 1)
    }

    /// Add several documents, stopping at the first unsupported one.
    pub fn add_all<I, P>(&mut self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            self.add(path)?;
        }
        Ok(())
    }

    /// Remove the document at `index`.
    pub fn remove(&mut self, index: usize) -> Option<DocumentDescriptor> {
        if index >= self.documents.len() {
            return None;
        }

        let removed = self.documents.remove(index);
        self.update_orders();
        Some(removed)
    }

    /// Move the document at `index` one position earlier.
    ///
    /// Returns false, leaving the list untouched, when the document is
    /// already first or the index is out of range.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.documents.len() {
            return false;
        }

        self.documents.swap(index, index - 1);
        self.update_orders();
        true
    }

    /// Move the document at `index` one position later.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.documents.len() {
            return false;
        }

        self.documents.swap(index, index + 1);
        self.update_orders();
        true
    }

    /// Sort by file name.
    pub fn sort_by_name(&mut self) {
        self.documents.sort_by_key(|doc| doc.file_name());
        self.update_orders();
    }

    /// Sort by modification time, oldest first.
    ///
    /// Documents without a timestamp sort first; ties keep their order.
    pub fn sort_by_modified(&mut self) {
        self.documents.sort_by_key(|doc| doc.modified);
        self.update_orders();
    }

    /// Remove every document.
    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if the list has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Document at `index`.
    pub fn get(&self, index: usize) -> Option<&DocumentDescriptor> {
        self.documents.get(index)
    }

    /// Iterate in merge order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentDescriptor> {
        self.documents.iter()
    }

    /// Sum of the advisory page counts.
    pub fn total_pages(&self) -> u32 {
        self.documents.iter().map(|doc| doc.page_count).sum()
    }

    /// Record a page count for the document at `path`.
    ///
    /// Returns false if no such document is in the list any more, which
    /// happens when a probe finishes after the document was removed.
    pub fn set_page_count(&mut self, path: &Path, count: u32) -> bool {
        let mut applied = false;
        for doc in self.documents.iter_mut().filter(|doc| doc.path() == path) {
            doc.page_count = count;
            applied = true;
        }
        applied
    }

    /// Probe every document's page count concurrently.
    ///
    /// At most `jobs` probes run at once. Each probe runs on the blocking
    /// pool; a failed probe degrades to the counter's default.
    pub async fn refresh_page_counts(&mut self, jobs: usize) {
        let paths: Vec<PathBuf> = self.documents.iter().map(|d| d.path().to_path_buf()).collect();

        let probes = paths.into_iter().map(|path| async move {
            let probe_path = path.clone();
            let count = tokio::task::spawn_blocking(move || PageCounter::count(&probe_path))
                .await
                .unwrap_or_else(|err| {
                    log::warn!("page count probe for {} panicked: {err}", path.display());
                    0
                });
            (path, count)
        });

        let results: Vec<(PathBuf, u32)> = stream::iter(probes)
            .buffer_unordered(jobs.max(1))
            .collect()
            .await;

        for (path, count) in results {
            log::debug!("{}: {count} page(s)", path.display());
            self.set_page_count(&path, count);
        }
    }

    /// Expected layout of the merged output, from the advisory counts.
    pub fn plan(&self) -> Vec<PlanEntry> {
        let mut next_page: u32 = 1;
        self.documents
            .iter()
            .map(|doc| {
                let end = next_page.saturating_add(doc.page_count);
                let entry = PlanEntry {
                    order: doc.order,
                    file_name: doc.file_name(),
                    pages: doc.page_count,
                    first_page: next_page,
                    last_page: end.saturating_sub(1),
                };
                next_page = end;
                entry
            })
            .collect()
    }

    /// Copy of the documents to hand to a merge run.
    pub fn snapshot(&self) -> Vec<DocumentDescriptor> {
        self.documents.clone()
    }

    fn update_orders(&mut self) {
        for (idx, doc) in self.documents.iter_mut().enumerate() {
            doc.order = idx + 1;
        }
    }
}
