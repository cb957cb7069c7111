//! Page-tree concatenation of several PDFs.
//!
//! Each source is loaded, its objects renumbered above everything already in
//! the output, and its pages hung under one new page tree in source order.
//! Attributes a page inherits from its old tree are copied onto the page
//! first, so the page renders the same once the old tree is gone.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::io::{PdfReader, PdfWriter, WriteStatistics};

/// Page attributes that may be inherited from ancestor `Pages` nodes.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// A source that contributed pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSource {
    /// Path of the source PDF.
    pub path: PathBuf,
    /// Pages copied from it.
    pub pages: usize,
}

/// Result of an assembly.
#[derive(Debug)]
pub struct Assembly {
    /// The concatenated document.
    pub document: Document,
    /// Sources that were copied, in order.
    pub sources: Vec<AssembledSource>,
    /// Paths that did not exist and were skipped.
    pub skipped: Vec<PathBuf>,
}

impl Assembly {
    /// Total pages in the assembled document.
    pub fn page_count(&self) -> usize {
        self.sources.iter().map(|s| s.pages).sum()
    }
}

/// Concatenates PDFs into one document.
#[derive(Debug, Clone, Default)]
pub struct PdfAssembler {
    reader: PdfReader,
    writer: PdfWriter,
}

impl PdfAssembler {
    /// Create an assembler with default reader and writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler that saves through `writer`.
    pub fn with_writer(writer: PdfWriter) -> Self {
        Self {
            reader: PdfReader::new(),
            writer,
        }
    }

    /// Concatenate `paths` in order.
    pub fn assemble<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Assembly> {
        self.assemble_with_progress(paths, |_, _| {})
    }

    /// Concatenate `paths` into `output`.
    pub fn assemble_to<P: AsRef<Path>>(
        &self,
        paths: &[P],
        output: &Path,
    ) -> Result<(Assembly, WriteStatistics)> {
        let mut assembly = self.assemble(paths)?;
        let stats = self.writer.write(&mut assembly.document, output)?;
        Ok((assembly, stats))
    }

    /// Concatenate `paths` in order, calling `on_progress(done, total)` after
    /// each path whether it was copied or skipped.
    ///
    /// Paths that do not exist are skipped. A path that exists but cannot be
    /// parsed fails the assembly.
    pub fn assemble_with_progress<P, F>(&self, paths: &[P], mut on_progress: F) -> Result<Assembly>
    where
        P: AsRef<Path>,
        F: FnMut(usize, usize),
    {
        let total = paths.len();
        let mut merged = Document::with_version("1.5");
        let pages_id = merged.new_object_id();

        let mut kids: Vec<Object> = Vec::new();
        let mut sources = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        for (idx, path) in paths.iter().enumerate() {
            let path = path.as_ref();

            if !path.exists() {
                log::debug!("skipping missing source {}", path.display());
                skipped.push(path.to_path_buf());
                on_progress(idx + 1, total);
                continue;
            }

            let loaded = self.reader.load(path)?;
            log::debug!(
                "{}: loaded {} page(s) in {:?}",
                path.display(),
                loaded.page_count,
                loaded.load_time
            );
            let mut doc = loaded.document;

            // Avoid object id collisions with everything copied so far
            doc.renumber_objects_with(merged.max_id + 1);

            let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
            for &page_id in &page_ids {
                materialize_inherited(&mut doc, page_id)?;
            }

            merged.max_id = merged.max_id.max(doc.max_id);
            merged.objects.extend(doc.objects);

            for &page_id in &page_ids {
                merged
                    .get_object_mut(page_id)
                    .and_then(Object::as_dict_mut)?
                    .set("Parent", pages_id);
                kids.push(Object::Reference(page_id));
            }

            log::debug!("{}: {} page(s) appended", path.display(), page_ids.len());
            sources.push(AssembledSource {
                path: path.to_path_buf(),
                pages: page_ids.len(),
            });
            on_progress(idx + 1, total);
        }

        let count = kids.len() as i64;
        merged.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = merged.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        merged.trailer.set("Root", catalog_id);

        // Old catalogs and page-tree nodes are unreachable now
        merged.prune_objects();

        Ok(Assembly {
            document: merged,
            sources,
            skipped,
        })
    }
}

/// Copy inheritable attributes from the page's ancestors onto the page.
fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let inherited: Vec<(&[u8], Object)> = {
        let page = doc.get_object(page_id).and_then(Object::as_dict)?;
        INHERITABLE
            .iter()
            .filter(|key| !page.has(key))
            .filter_map(|key| inherited_value(doc, page, key).map(|value| (*key, value)))
            .collect()
    };

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
    for (key, value) in inherited {
        page.set(key, value);
    }

    Ok(())
}

fn inherited_value(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_object(parent?).and_then(Object::as_dict).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}
