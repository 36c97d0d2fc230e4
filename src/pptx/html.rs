//! Content extraction from rendered slide pages.
//!
//! The reader is lenient: void elements may be left open, attributes may be
//! unquoted and stray end tags are ignored. Only what maps onto a slide is
//! kept: headings, paragraphs, list items, quotes and images, along with
//! inline colors and the body background.

use super::color::{style_declarations, Rgb};
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Elements that never have content or an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is never shown on a slide.
const HIDDEN_ELEMENTS: &[&str] = &["head", "style", "script", "title", "noscript", "template"];

/// A run of text with uniform formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Hard line break instead of text
    pub line_break: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            line_break: false,
        }
    }

    fn line_break() -> Self {
        Self {
            text: String::new(),
            bold: false,
            italic: false,
            line_break: true,
        }
    }
}

/// Role of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    /// `h1`..`h6`
    Heading(u8),
    Paragraph,
    /// `li`; ordered items carry their number
    ListItem { number: Option<usize> },
    /// `blockquote`
    Quote,
}

/// A block of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub role: TextRole,
    pub runs: Vec<TextRun>,
    /// Inline color, if the block or an ancestor sets one
    pub color: Option<Rgb>,
}

impl TextBlock {
    /// Concatenated text, line breaks as `\n`.
    pub fn text(&self) -> String {
        self.runs
            .iter()
            .map(|r| if r.line_break { "\n" } else { r.text.as_str() })
            .collect()
    }
}

/// One piece of slide content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(TextBlock),
    Image { src: String, alt: String },
}

/// Position inside a `.columns` container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Which columns container (in document order)
    pub group: usize,
    /// Zero-based column within the container
    pub index: usize,
}

/// A content block with its column placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub content: Content,
    pub column: Option<Column>,
}

/// Everything extracted from one slide page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlSlide {
    /// Body background color
    pub background: Option<Rgb>,
    /// Body text color
    pub color: Option<Rgb>,
    /// First family of the body `font-family`
    pub font: Option<String>,
    pub blocks: Vec<Block>,
}

impl HtmlSlide {
    /// Read a slide page from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let html = std::fs::read_to_string(path).map_err(|e| Error::Html {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&html).map_err(|message| Error::Html {
            file: path.to_path_buf(),
            message,
        })
    }

    /// Extract slide content from HTML text.
    pub fn parse(html: &str) -> std::result::Result<Self, String> {
        let mut reader = Reader::from_str(html);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.check_comments = false;

        let mut extractor = Extractor::default();
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => extractor.start(&e, false),
                Ok(Event::Empty(e)) => extractor.start(&e, true),
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_lowercase();
                    extractor.end(&name);
                }
                Ok(Event::Text(t)) => extractor.text(&decode_text(&t)),
                Ok(Event::CData(t)) => {
                    extractor.text(&String::from_utf8_lossy(&t));
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(format!(
                        "{} at byte {}",
                        e,
                        reader.buffer_position()
                    ))
                }
                _ => {}
            }
        }

        Ok(extractor.finish())
    }
}

/// Unescape a text node, including the common HTML named entities.
fn decode_text(text: &BytesText) -> String {
    let raw = String::from_utf8_lossy(text);
    quick_xml::escape::unescape_with(&raw, |entity| match entity {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        "nbsp" => Some("\u{a0}"),
        "ndash" => Some("–"),
        "mdash" => Some("—"),
        "hellip" => Some("…"),
        "rarr" => Some("→"),
        "larr" => Some("←"),
        "check" => Some("✓"),
        "bull" => Some("•"),
        "copy" => Some("©"),
        "reg" => Some("®"),
        "trade" => Some("™"),
        "laquo" => Some("«"),
        "raquo" => Some("»"),
        "middot" => Some("·"),
        _ => None,
    })
    .map(|s| s.into_owned())
    .unwrap_or_else(|_| raw.into_owned())
}

fn attributes(e: &BytesStart) -> HashMap<String, String> {
    e.html_attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_lowercase();
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            (key, value)
        })
        .collect()
}

/// Collapse runs of whitespace to a single space and normalize to NFC.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.nfc() {
        // Non-breaking spaces are kept as written
        if c.is_whitespace() && c != '\u{a0}' {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

struct ColumnGroup {
    depth: usize,
    group: usize,
    next_index: usize,
    current: Option<usize>,
}

struct List {
    depth: usize,
    ordered: bool,
    count: usize,
}

struct Capture {
    depth: usize,
    block: TextBlock,
    column: Option<Column>,
}

#[derive(Default)]
struct Extractor {
    slide: HtmlSlide,
    /// Open element names
    stack: Vec<String>,
    hidden_depth: Option<usize>,
    capture: Option<Capture>,
    lists: Vec<List>,
    columns: Vec<ColumnGroup>,
    group_count: usize,
    colors: Vec<(usize, Rgb)>,
}

impl Extractor {
    fn start(&mut self, e: &BytesStart, self_closing: bool) {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).to_lowercase();
        let is_void = self_closing || VOID_ELEMENTS.contains(&name.as_str());
        let depth = self.stack.len();

        if self.hidden_depth.is_some() {
            if !is_void {
                self.stack.push(name);
            }
            return;
        }

        if HIDDEN_ELEMENTS.contains(&name.as_str()) {
            if !is_void {
                self.hidden_depth = Some(depth);
                self.stack.push(name);
            }
            return;
        }

        let attrs = attributes(e);

        if let Some(style) = attrs.get("style") {
            if name == "body" {
                self.read_body_style(style);
            } else if let Some(color) = inline_color(style) {
                if !is_void {
                    self.colors.push((depth, color));
                }
            }
        }

        // A direct child of a columns container opens the next column
        if let Some(group) = self.columns.last_mut() {
            if depth == group.depth + 1 && !is_void {
                group.current = Some(group.next_index);
                group.next_index += 1;
            }
        }

        match name.as_str() {
            "br" => {
                if let Some(capture) = self.capture.as_mut() {
                    capture.block.runs.push(TextRun::line_break());
                }
            }
            "img" => {
                if let Some(src) = attrs.get("src").filter(|s| !s.is_empty()) {
                    self.flush_capture();
                    let column = self.current_column();
                    self.slide.blocks.push(Block {
                        content: Content::Image {
                            src: src.clone(),
                            alt: attrs.get("alt").cloned().unwrap_or_default(),
                        },
                        column,
                    });
                }
            }
            "ul" | "ol" if !is_void => self.lists.push(List {
                depth,
                ordered: name == "ol",
                count: 0,
            }),
            _ => {}
        }

        if is_void {
            return;
        }

        if attrs
            .get("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == "columns"))
        {
            self.columns.push(ColumnGroup {
                depth,
                group: self.group_count,
                next_index: 0,
                current: None,
            });
            self.group_count += 1;
        }

        if let Some(role) = self.block_role(&name) {
            if let Some(capture) = self.capture.as_mut() {
                // Nested block (a <p> inside an <li>): keep it in the same block
                if !capture.block.runs.is_empty() {
                    capture.block.runs.push(TextRun::plain(" "));
                }
            } else {
                let color = self.colors.last().map(|(_, c)| *c);
                let column = self.current_column();
                self.capture = Some(Capture {
                    depth,
                    block: TextBlock {
                        role,
                        runs: Vec::new(),
                        color,
                    },
                    column,
                });
            }
        }

        self.stack.push(name);
    }

    fn end(&mut self, name: &str) {
        let Some(pos) = self.stack.iter().rposition(|n| n == name) else {
            return;
        };
        while self.stack.len() > pos {
            let depth = self.stack.len() - 1;
            let closed = self.stack.pop().unwrap_or_default();
            self.close(depth, &closed);
        }
    }

    fn close(&mut self, depth: usize, name: &str) {
        if self.hidden_depth == Some(depth) {
            self.hidden_depth = None;
            return;
        }
        if self.capture.as_ref().is_some_and(|c| c.depth == depth) {
            self.flush_capture();
        }
        if (name == "ul" || name == "ol") && self.lists.last().is_some_and(|l| l.depth == depth) {
            self.lists.pop();
        }
        if self.colors.last().is_some_and(|(d, _)| *d == depth) {
            self.colors.pop();
        }
        if let Some(group) = self.columns.last_mut() {
            if group.depth == depth {
                self.columns.pop();
            } else if group.depth + 1 == depth {
                group.current = None;
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.hidden_depth.is_some() {
            return;
        }
        let text = collapse_whitespace(text);
        if text.is_empty() {
            return;
        }

        let bold = self.inside(&["strong", "b"]);
        let italic = self.inside(&["em", "i"]);

        match self.capture.as_mut() {
            Some(capture) => capture.block.runs.push(TextRun {
                text,
                bold,
                italic,
                line_break: false,
            }),
            None if !text.trim().is_empty() => {
                // Loose text outside any block becomes its own paragraph
                let color = self.colors.last().map(|(_, c)| *c);
                let column = self.current_column();
                let block = TextBlock {
                    role: TextRole::Paragraph,
                    runs: vec![TextRun {
                        text: text.trim().to_string(),
                        bold,
                        italic,
                        line_break: false,
                    }],
                    color,
                };
                self.slide.blocks.push(Block {
                    content: Content::Text(block),
                    column,
                });
            }
            None => {}
        }
    }

    fn finish(mut self) -> HtmlSlide {
        self.flush_capture();
        self.slide
    }

    fn read_body_style(&mut self, style: &str) {
        for (prop, value) in style_declarations(style) {
            match prop.as_str() {
                "background" | "background-color" => match Rgb::find(value) {
                    Some(color) => self.slide.background = Some(color),
                    None => log::warn!("Ignoring body background \"{}\"", value),
                },
                "color" => match Rgb::parse(value) {
                    Some(color) => self.slide.color = Some(color),
                    None => log::warn!("Ignoring body color \"{}\"", value),
                },
                "font-family" => {
                    self.slide.font = value
                        .split(',')
                        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
                        .find(|f| !f.is_empty());
                }
                _ => {}
            }
        }
    }

    fn block_role(&mut self, name: &str) -> Option<TextRole> {
        match name {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                Some(TextRole::Heading(name.as_bytes()[1] - b'0'))
            }
            "p" => Some(TextRole::Paragraph),
            "blockquote" => Some(TextRole::Quote),
            "li" => {
                let number = match self.lists.last_mut() {
                    Some(list) => {
                        list.count += 1;
                        list.ordered.then_some(list.count)
                    }
                    None => None,
                };
                Some(TextRole::ListItem { number })
            }
            _ => None,
        }
    }

    fn flush_capture(&mut self) {
        let Some(mut capture) = self.capture.take() else {
            return;
        };

        trim_runs(&mut capture.block.runs);
        if capture.block.runs.iter().any(|r| !r.line_break) {
            self.slide.blocks.push(Block {
                content: Content::Text(capture.block),
                column: capture.column,
            });
        }
    }

    fn current_column(&self) -> Option<Column> {
        self.columns.iter().rev().find_map(|g| {
            g.current.map(|index| Column {
                group: g.group,
                index,
            })
        })
    }

    fn inside(&self, names: &[&str]) -> bool {
        self.stack.iter().any(|n| names.contains(&n.as_str()))
    }
}

fn inline_color(style: &str) -> Option<Rgb> {
    style_declarations(style)
        .filter(|(prop, _)| prop == "color")
        .find_map(|(_, value)| Rgb::parse(value))
}

/// Strip whitespace at the edges of a block and around line breaks, and
/// merge adjacent runs with the same formatting.
fn trim_runs(runs: &mut Vec<TextRun>) {
    let mut merged: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs.drain(..) {
        match merged.last_mut() {
            Some(last)
                if !last.line_break
                    && !run.line_break
                    && last.bold == run.bold
                    && last.italic == run.italic =>
            {
                if last.text.ends_with(' ') && run.text.starts_with(' ') {
                    last.text.push_str(&run.text[1..]);
                } else {
                    last.text.push_str(&run.text);
                }
            }
            _ => merged.push(run),
        }
    }

    for i in 0..merged.len() {
        if merged[i].line_break {
            continue;
        }
        let at_start = i == 0 || merged[i - 1].line_break;
        let at_end = i + 1 == merged.len() || merged[i + 1].line_break;
        if at_start {
            merged[i].text = merged[i].text.trim_start().to_string();
        }
        if at_end {
            merged[i].text = merged[i].text.trim_end().to_string();
        }
    }

    merged.retain(|r| r.line_break || !r.text.is_empty());
    while merged.first().is_some_and(|r| r.line_break) {
        merged.remove(0);
    }
    while merged.last().is_some_and(|r| r.line_break) {
        merged.pop();
    }
    *runs = merged;
}
