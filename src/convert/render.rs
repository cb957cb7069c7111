//! Flowing text onto PDF pages.
//!
//! [`TextLayout`] places lines top to bottom on A4 pages, starting a new
//! page whenever the next line would cross the bottom margin, and turns the
//! result into a standalone [`Document`].

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::convert::docx::Alignment;
use crate::error::Result;
use crate::fonts::{StandardFont, encode_win_ansi};

/// A4 width in points.
pub const PAGE_WIDTH: f32 = 595.28;

/// A4 height in points.
pub const PAGE_HEIGHT: f32 = 841.89;

/// Margin on every side.
pub const MARGIN: f32 = 36.0;

/// Size used when a paragraph declares none.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

const LINE_HEIGHT_FACTOR: f32 = 1.2;
const PARAGRAPH_SPACING: f32 = 4.0;

/// Width available to a line between the margins.
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

/// A single positioned line of text.
#[derive(Debug, Clone, PartialEq)]
struct PlacedLine {
    text: String,
    font: StandardFont,
    size: f32,
    x: f32,
    y: f32,
}

/// Accumulates lines into pages.
#[derive(Debug)]
pub struct TextLayout {
    pages: Vec<Vec<PlacedLine>>,
    cursor: f32,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayout {
    /// Start with one empty page.
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    /// Number of pages laid out so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Lay out wrapped text followed by paragraph spacing.
    pub fn paragraph(&mut self, text: &str, font: StandardFont, size: f32, alignment: Alignment) {
        for line in wrap(text, font, size, CONTENT_WIDTH) {
            self.line(line, font, size, alignment);
        }
        self.advance(PARAGRAPH_SPACING);
    }

    /// Reserve one empty line at the default size.
    pub fn blank_line(&mut self) {
        let height = DEFAULT_FONT_SIZE * LINE_HEIGHT_FACTOR;
        if !self.fits(height) {
            self.page_break();
        }
        self.advance(height);
    }

    /// Continue on a fresh page.
    pub fn page_break(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn line(&mut self, text: String, font: StandardFont, size: f32, alignment: Alignment) {
        let height = size * LINE_HEIGHT_FACTOR;
        if !self.fits(height) && !self.current_page_is_empty() {
            self.page_break();
        }

        let width = font.text_width(&text, size);
        let x = match alignment {
            Alignment::Left => MARGIN,
            Alignment::Center => MARGIN + (CONTENT_WIDTH - width) / 2.0,
            Alignment::Right => PAGE_WIDTH - MARGIN - width,
        };
        let y = self.cursor - size;

        if let Some(page) = self.pages.last_mut() {
            page.push(PlacedLine {
                text,
                font,
                size,
                x: x.max(MARGIN),
                y,
            });
        }
        self.advance(height);
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor - height >= MARGIN
    }

    fn current_page_is_empty(&self) -> bool {
        self.pages.last().is_none_or(Vec::is_empty)
    }

    fn advance(&mut self, amount: f32) {
        self.cursor = (self.cursor - amount).max(MARGIN);
    }

    /// Build a standalone PDF with one page per laid-out page.
    pub fn into_document(self) -> Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(StandardFont::Regular.dictionary());
        let bold_id = doc.add_object(StandardFont::Bold.dictionary());
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                StandardFont::Regular.resource_name() => regular_id,
                StandardFont::Bold.resource_name() => bold_id,
            },
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for lines in &self.pages {
            let page_id = add_page(&mut doc, pages_id, resources_id, lines)?;
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Ok(doc)
    }
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    lines: &[PlacedLine],
) -> Result<ObjectId> {
    let mut operations = Vec::with_capacity(lines.len() * 5);
    for line in lines {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![line.font.resource_name().into(), Object::Real(line.size)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x), Object::Real(line.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&line.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => Object::Array(vec![0.into(), 0.into(), Object::Real(PAGE_WIDTH), Object::Real(PAGE_HEIGHT)]),
        "Resources" => resources_id,
        "Contents" => content_id,
    }))
}

/// Greedy word wrap against `max_width` points.
///
/// Words wider than a whole line are broken between characters.
pub fn wrap(text: &str, font: StandardFont, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if font.text_width(&candidate, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if font.text_width(word, size) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if font.text_width(&current, size) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::replace(&mut current, c.to_string()));
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
