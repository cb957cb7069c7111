//! Reading the body of a DOCX package.
//!
//! Only what the converter and the page-count estimate need is extracted:
//! block order, paragraph text, first-run formatting, justification and
//! explicit page breaks. Styles, numbering, images and table cells are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DocMergeError, Result};

const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Largest run size Word accepts, in half-points (1638 pt).
const MAX_HALF_POINTS: u32 = 3276;

/// Horizontal alignment of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Left aligned; also used for justified text.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// A paragraph as the converter sees it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    /// Text split at explicit page breaks; always at least one segment.
    pub segments: Vec<String>,
    /// First run carries a bold flag.
    pub bold: bool,
    /// First run's declared size in points.
    pub font_size: Option<f32>,
    /// Declared justification.
    pub alignment: Alignment,
}

impl Paragraph {
    /// Full text with page breaks removed.
    pub fn text(&self) -> String {
        self.segments.concat()
    }

    /// True when the paragraph has no visible text.
    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|s| s.trim().is_empty())
    }

    /// Number of explicit page breaks.
    pub fn page_breaks(&self) -> usize {
        self.segments.len() - 1
    }
}

/// Top-level content of the document body, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A body paragraph.
    Paragraph(Paragraph),
    /// A table; its cells are not extracted.
    Table,
}

/// Parsed body of a DOCX document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WordBody {
    /// Top-level blocks in document order.
    pub blocks: Vec<Block>,
    /// Every `w:p` in the body, including those nested in tables.
    pub paragraph_count: usize,
    /// Every explicit page-break marker inside a run.
    pub page_break_count: usize,
}

/// Read `word/document.xml` out of the package at `path`.
pub fn read_document_xml(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut zip = zip::ZipArchive::new(file)?;

    let mut part = zip
        .by_name("word/document.xml")
        .map_err(|_| DocMergeError::invalid_docx("missing word/document.xml"))?;

    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Parse the document at `path`.
///
/// Returns `Ok(None)` for a well-formed package without a `w:body`.
pub fn parse(path: &Path) -> Result<Option<WordBody>> {
    let xml = read_document_xml(path)?;
    parse_xml(&xml)
}

/// Parse the main document part.
pub fn parse_xml(xml: &str) -> Result<Option<WordBody>> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    if !is_wml(root, "document") {
        return Err(DocMergeError::invalid_docx("root element is not w:document"));
    }

    let Some(body) = wml(root, "body") else {
        return Ok(None);
    };

    let paragraph_count = body.descendants().filter(|n| is_wml(*n, "p")).count();
    let page_break_count = body
        .descendants()
        .filter(|n| is_wml(*n, "r"))
        .flat_map(|run| run.children())
        .filter(|n| is_page_break(*n))
        .count();

    let blocks = body
        .children()
        .filter_map(|node| {
            if is_wml(node, "p") {
                Some(Block::Paragraph(parse_paragraph(node)))
            } else if is_wml(node, "tbl") {
                Some(Block::Table)
            } else {
                None
            }
        })
        .collect();

    Ok(Some(WordBody {
        blocks,
        paragraph_count,
        page_break_count,
    }))
}

fn parse_paragraph(node: roxmltree::Node) -> Paragraph {
    let mut segments = vec![String::new()];

    // Runs may sit inside hyperlinks, smart tags or field wrappers.
    let runs: Vec<_> = node.descendants().filter(|n| is_wml(*n, "r")).collect();

    for run in &runs {
        for child in run.children() {
            if is_wml(child, "t") {
                if let (Some(text), Some(current)) = (child.text(), segments.last_mut()) {
                    current.push_str(text);
                }
            } else if is_wml(child, "tab") {
                if let Some(current) = segments.last_mut() {
                    current.push(' ');
                }
            } else if is_page_break(child) {
                segments.push(String::new());
            }
        }
    }

    let first_rpr = runs.first().and_then(|run| wml(*run, "rPr"));

    let bold = first_rpr
        .and_then(|rpr| wml(rpr, "b"))
        .is_some_and(|b| !matches!(val(b), Some("0" | "false" | "off")));

    let font_size = first_rpr
        .and_then(|rpr| wml(rpr, "sz"))
        .and_then(val)
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|half_points| (1..=MAX_HALF_POINTS).contains(half_points))
        .map(|half_points| half_points as f32 / 2.0);

    let alignment = wml(node, "pPr")
        .and_then(|ppr| wml(ppr, "jc"))
        .and_then(val)
        .map(|jc| match jc {
            "center" => Alignment::Center,
            "right" | "end" => Alignment::Right,
            _ => Alignment::Left,
        })
        .unwrap_or_default();

    Paragraph {
        segments,
        bold,
        font_size,
        alignment,
    }
}

fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && node.tag_name().namespace() == Some(WML_NS)
}

fn wml<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children().find(|n| is_wml(*n, name))
}

fn val<'a>(node: roxmltree::Node<'a, '_>) -> Option<&'a str> {
    node.attribute((WML_NS, "val"))
}

fn is_page_break(node: roxmltree::Node) -> bool {
    is_wml(node, "br") && node.attribute((WML_NS, "type")) == Some("page")
}
