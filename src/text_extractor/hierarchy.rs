//! Hierarchical extraction of visible text from HTML
//!
//! The walker keeps a depth counter and an inline buffer:
//! 1. Text nodes and inline elements append to the buffer
//! 2. A block-level element flushes the buffer as one unit at the current
//!    depth, then its children are walked at depth + 1
//! 3. A list item prefixes its first emitted unit with a bullet
//!
//! Nesting deeper than [`MAX_EXTRACTION_DEPTH`] is folded into the parent's
//! inline text, which bounds recursion on hostile or broken markup.

use ego_tree::NodeRef;
use ego_tree::iter::Edge;
use scraper::{ElementRef, Html, Node};

use super::normalize::normalize_depths;
use super::unit::TextUnit;
use crate::utils::MAX_EXTRACTION_DEPTH;

/// Elements that start a new text unit
pub const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "canvas",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "tfoot",
    "ul",
    "video",
    "tr",
    "td",
    "th",
];

/// Elements whose content never renders as page text
pub const SKIPPED_TAGS: &[&str] = &["script", "style", "template", "noscript", "head"];

const BULLET: &str = "* ";

fn is_block(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

fn is_skipped(name: &str) -> bool {
    SKIPPED_TAGS.contains(&name)
}

/// Extract `(depth, text)` units from an HTML document, starting at `<body>`
#[must_use]
pub fn extract_hierarchy(html: &str) -> Vec<TextUnit> {
    extract_hierarchy_with_limit(html, MAX_EXTRACTION_DEPTH)
}

/// Same as [`extract_hierarchy`] with an explicit nesting cap
#[must_use]
pub fn extract_hierarchy_with_limit(html: &str, max_depth: usize) -> Vec<TextUnit> {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let start = root
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
        .map_or(*root, |body| *body);

    let mut walker = Walker {
        units: Vec::new(),
        max_depth,
    };
    walker.walk_children(start, 0);
    walker.units
}

/// Render an HTML document as indented plain text, one unit per line
///
/// Used by the fetcher when the caller wants plain text instead of markup.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let units = normalize_depths(extract_hierarchy(html));
    let mut out = String::with_capacity(html.len() / 4);
    for unit in &units {
        for _ in 0..unit.depth {
            out.push_str("  ");
        }
        out.push_str(&unit.text);
        out.push('\n');
    }
    out
}

struct Walker {
    units: Vec<TextUnit>,
    max_depth: usize,
}

impl Walker {
    fn walk_children(&mut self, node: NodeRef<'_, Node>, depth: usize) {
        let mut buffer = InlineBuffer::default();

        for child in node.children() {
            match child.value() {
                Node::Text(text) => buffer.push_words(text),
                Node::Element(element) => {
                    let name = element.name();
                    if is_skipped(name) {
                        continue;
                    }
                    if is_block(name) && depth < self.max_depth {
                        buffer.flush(depth, &mut self.units);
                        self.walk_block(child, depth + 1, name == "li");
                    } else {
                        buffer.push_words(&inline_text(child));
                    }
                }
                _ => {}
            }
        }

        buffer.flush(depth, &mut self.units);
    }

    fn walk_block(&mut self, node: NodeRef<'_, Node>, depth: usize, list_item: bool) {
        let first = self.units.len();
        self.walk_children(node, depth);
        if list_item && let Some(unit) = self.units.get_mut(first) {
            unit.text.insert_str(0, BULLET);
        }
    }
}

/// All visible text under `node`, whitespace-collapsed
///
/// Iterative so folded deep subtrees cannot exhaust the stack.
fn inline_text(node: NodeRef<'_, Node>) -> String {
    let mut words: Vec<&str> = Vec::new();
    let mut skipping = 0usize;

    for edge in node.traverse() {
        match edge {
            Edge::Open(n) => match n.value() {
                Node::Element(el) if is_skipped(el.name()) => skipping += 1,
                Node::Text(text) if skipping == 0 => words.extend(text.split_whitespace()),
                _ => {}
            },
            Edge::Close(n) => {
                if let Node::Element(el) = n.value()
                    && is_skipped(el.name())
                {
                    skipping = skipping.saturating_sub(1);
                }
            }
        }
    }

    words.join(" ")
}

#[derive(Default)]
struct InlineBuffer {
    text: String,
}

impl InlineBuffer {
    fn push_words(&mut self, raw: &str) {
        for word in raw.split_whitespace() {
            self.text.push_str(word);
            self.text.push(' ');
        }
    }

    fn flush(&mut self, depth: usize, units: &mut Vec<TextUnit>) {
        let trimmed = self.text.trim();
        if !trimmed.is_empty() {
            units.push(TextUnit::new(depth, trimmed));
        }
        self.text.clear();
    }
}
