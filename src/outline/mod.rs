//! FreeMind outline (`.mm`) generation and parsing.
//!
//! The writer emits a two-level tree: the book title as root and one leaf per chapter.
//! Node text lives in the `TEXT` attribute; leaves are empty `<node ...></node>` elements.

use crate::model::BookRecord;
use scraper::{ElementRef, Html, Selector};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const MAP_VERSION: &str = "1.0.1";
const INDENT: &str = "  ";

/// Errors from writing or reading outline documents.
#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("Failed to write output: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not an outline document: {reason}")]
    Malformed { reason: String },
}

/// One node of the outline tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineNode {
    pub text: String,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(text: impl Into<String>, children: Vec<OutlineNode>) -> Self {
        Self {
            text: text.into(),
            children,
        }
    }

    pub fn leaf(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }
}

/// Root = book title, one leaf per chapter, in order.
pub fn build_outline(book: &BookRecord) -> OutlineNode {
    OutlineNode::new(
        book.title.clone(),
        book.chapters
            .iter()
            .map(|ch| OutlineNode::leaf(ch.title.clone()))
            .collect(),
    )
}

/// XML 1.0 `Char` production. Rust `char` already excludes surrogates.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

pub(crate) fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c if !is_xml_char(c) => out.push('\u{FFFD}'),
            _ => out.push(c),
        }
    }
    out
}

fn render_node<W: Write>(node: &OutlineNode, depth: usize, w: &mut W) -> std::io::Result<()> {
    let indent = INDENT.repeat(depth);
    let text = xml_escape(&node.text);
    if node.children.is_empty() {
        return writeln!(w, r#"{}<node TEXT="{}"></node>"#, indent, text);
    }
    writeln!(w, r#"{}<node TEXT="{}">"#, indent, text)?;
    for child in &node.children {
        render_node(child, depth + 1, w)?;
    }
    writeln!(w, "{}</node>", indent)
}

/// Serialize `root` as a complete `.mm` document (header, `<map>`, node tree).
pub fn render_outline<W: Write>(root: &OutlineNode, w: &mut W) -> std::io::Result<()> {
    writeln!(w, "{}", XML_HEADER)?;
    writeln!(w, r#"<map version="{}">"#, MAP_VERSION)?;
    render_node(root, 1, w)?;
    writeln!(w, "</map>")
}

/// Write `root` to `path`, creating or truncating the file.
pub fn write_outline(root: &OutlineNode, path: &Path) -> Result<(), OutlineError> {
    let io_err = |source| OutlineError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut w = BufWriter::new(file);
    render_outline(root, &mut w).map_err(io_err)?;
    w.flush().map_err(io_err)
}

/// Build the outline for `book` and write it to `path`.
pub fn write_mindmap(book: &BookRecord, path: &Path) -> Result<(), OutlineError> {
    write_outline(&build_outline(book), path)
}

fn node_from_element(el: ElementRef<'_>) -> OutlineNode {
    OutlineNode {
        text: el.value().attr("text").unwrap_or_default().to_string(),
        children: el
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|child| child.value().name() == "node")
            .map(node_from_element)
            .collect(),
    }
}

/// Parse an outline document back into a tree. Uses the HTML parser, which folds attribute
/// names to lowercase and decodes character references.
pub fn read_outline(xml: &str) -> Result<OutlineNode, OutlineError> {
    let document = Html::parse_document(xml);
    let selector = Selector::parse("map > node").map_err(|e| OutlineError::Malformed {
        reason: format!("invalid selector: {}", e),
    })?;
    document
        .select(&selector)
        .next()
        .map(node_from_element)
        .ok_or_else(|| OutlineError::Malformed {
            reason: "no <node> inside <map>".to_string(),
        })
}

pub fn read_outline_file(path: &Path) -> Result<OutlineNode, OutlineError> {
    let xml = std::fs::read_to_string(path).map_err(|source| OutlineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_outline(&xml)
}
