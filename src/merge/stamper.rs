//! Page-number overlay.
//!
//! Every page of a finished document gets a `Page N` label, horizontally
//! centered, with the bottom of the label box 20 units above the bottom edge
//! of the page's media box. Numbering runs over the whole document, so it is
//! continuous across the sources an assembly was built from.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;

use crate::error::Result;
use crate::fonts::{HELVETICA_DESCENT, StandardFont, encode_win_ansi};
use crate::io::{PdfReader, PdfWriter};

/// Label font size in points.
pub const LABEL_FONT_SIZE: f32 = 12.0;

/// Distance between the page's bottom edge and the label box.
pub const BOTTOM_MARGIN: f32 = 20.0;

/// Used when a page declares no media box anywhere in its tree.
const US_LETTER: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

const FONT_RESOURCE_PREFIX: &str = "FPageNo";

const MAX_TREE_DEPTH: usize = 64;

/// Label text for output page `number`.
pub fn page_label(number: u32) -> String {
    format!("Page {number}")
}

/// Writes page-number labels onto documents.
#[derive(Debug, Clone)]
pub struct PageNumberStamper {
    font: StandardFont,
    font_size: f32,
    bottom_margin: f32,
}

impl Default for PageNumberStamper {
    fn default() -> Self {
        Self {
            font: StandardFont::Regular,
            font_size: LABEL_FONT_SIZE,
            bottom_margin: BOTTOM_MARGIN,
        }
    }
}

impl PageNumberStamper {
    /// Create a stamper with Helvetica 12 labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp every page, numbering from `start_number`. Returns the page count.
    pub fn stamp(&self, doc: &mut Document, start_number: u32) -> Result<usize> {
        self.stamp_with_progress(doc, start_number, |_, _| {})
    }

    /// Stamp every page, calling `on_page(done, total)` after each one.
    pub fn stamp_with_progress<F>(
        &self,
        doc: &mut Document,
        start_number: u32,
        mut on_page: F,
    ) -> Result<usize>
    where
        F: FnMut(usize, usize),
    {
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let total = pages.len();
        if total == 0 {
            return Ok(0);
        }

        let font_id = doc.add_object(self.font.dictionary());

        for (idx, page_id) in pages.into_iter().enumerate() {
            let number = start_number.saturating_add(idx as u32);
            self.stamp_page(doc, page_id, font_id, &page_label(number))?;
            on_page(idx + 1, total);
        }

        log::debug!("stamped {total} page(s) starting at {start_number}");
        Ok(total)
    }

    /// Load the PDF at `path`, stamp it, and save it back in place.
    pub fn stamp_file(&self, path: &Path, start_number: u32) -> Result<usize> {
        let mut doc = PdfReader::new().read(path)?;
        let pages = self.stamp(&mut doc, start_number)?;
        PdfWriter::new().write(&mut doc, path)?;
        Ok(pages)
    }

    fn stamp_page(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        font_id: ObjectId,
        label: &str,
    ) -> Result<()> {
        let [llx, lly, urx, _] = media_box(doc, page_id);

        let mut resources = page_resources(doc, page_id);
        let mut fonts = resources
            .get(b"Font")
            .ok()
            .and_then(|obj| resolve_dict(doc, obj))
            .unwrap_or_default();
        let font_name = unused_name(&fonts);
        fonts.set(font_name.as_bytes(), font_id);
        resources.set("Font", fonts);

        let label_width = self.font.text_width(label, self.font_size);
        let x = llx + (urx - llx) / 2.0 - label_width / 2.0;
        let y = lly + self.bottom_margin + HELVETICA_DESCENT * self.font_size;

        let label_ops = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(font_name.into_bytes()), Object::Real(self.font_size)],
                ),
                Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
                Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(label))]),
                Operation::new("ET", vec![]),
            ],
        }
        .encode()?;

        // Isolate the existing content so its graphics state cannot leak
        let mut suffix = b"\nQ\n".to_vec();
        suffix.extend(label_ops);

        let prefix_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
        let suffix_id = doc.add_object(Stream::new(dictionary! {}, suffix));

        let mut contents = vec![Object::Reference(prefix_id)];
        contents.extend(existing_contents(doc, page_id));
        contents.push(Object::Reference(suffix_id));

        let page = doc.get_object_mut(page_id).and_then(Object::as_dict_mut)?;
        page.set("Contents", contents);
        page.set("Resources", resources);

        Ok(())
    }
}

/// Content stream references of a page, flattened one level.
fn existing_contents(doc: &Document, page_id: ObjectId) -> Vec<Object> {
    let Ok(page) = doc.get_object(page_id).and_then(Object::as_dict) else {
        return Vec::new();
    };

    match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        _ => Vec::new(),
    }
}

/// The page's effective resources as an owned dictionary.
fn page_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    inherited(doc, page_id, b"Resources")
        .and_then(|obj| resolve_dict(doc, &obj))
        .unwrap_or_default()
}

/// The page's effective media box.
fn media_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    let Some(obj) = inherited(doc, page_id, b"MediaBox") else {
        return US_LETTER;
    };

    let array = match &obj {
        Object::Reference(id) => doc.get_object(*id).and_then(Object::as_array).ok(),
        other => other.as_array().ok(),
    };

    let values: Vec<f32> = array
        .map(|items| items.iter().filter_map(|o| o.as_float().ok()).collect())
        .unwrap_or_default();

    match values.as_slice() {
        &[a, b, c, d] => [a.min(c), b.min(d), a.max(c), b.max(d)],
        _ => US_LETTER,
    }
}

/// Look `key` up on the page, then on its ancestors.
fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node_id = Some(page_id);

    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_object(node_id?).and_then(Object::as_dict).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        node_id = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

fn resolve_dict(doc: &Document, obj: &Object) -> Option<Dictionary> {
    match obj {
        Object::Dictionary(dict) => Some(dict.clone()),
        Object::Reference(id) => doc.get_object(*id).and_then(Object::as_dict).ok().cloned(),
        _ => None,
    }
}

/// A font resource name not yet present in `fonts`.
fn unused_name(fonts: &Dictionary) -> String {
    let mut name = FONT_RESOURCE_PREFIX.to_string();
    let mut suffix = 1;
    while fonts.has(name.as_bytes()) {
        name = format!("{FONT_RESOURCE_PREFIX}{suffix}");
        suffix += 1;
    }
    name
}
