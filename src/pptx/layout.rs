//! Placement of extracted slide content.
//!
//! Content flows top to bottom inside a fixed margin. Columns from a
//! `.columns` container share a row and split the width evenly. Text
//! heights are estimated from display width since no fonts are measured.

use super::color::Rgb;
use super::html::{Block, Content, HtmlSlide, TextBlock, TextRole, TextRun};
use crate::error::Result;
use unicode_width::UnicodeWidthStr;

pub const EMU_PER_INCH: i64 = 914_400;
pub const EMU_PER_PT: i64 = 12_700;

const MARGIN: i64 = EMU_PER_INCH / 2;
const BLOCK_GAP: i64 = EMU_PER_INCH / 8;
const COLUMN_GAP: i64 = EMU_PER_INCH / 3;
const MIN_IMAGE_HEIGHT: i64 = EMU_PER_INCH;

/// Text box insets, matching the `a:bodyPr` written for every text shape.
pub const INSET_X: i64 = 91_440;
pub const INSET_Y: i64 = 45_720;

/// Left margin of bulleted paragraphs.
pub const BULLET_INDENT: i64 = 285_750;

const LINE_SPACING: f64 = 1.2;
/// Average glyph advance per display column, as a fraction of font size.
const GLYPH_WIDTH: f64 = 0.5;

const DEFAULT_FONT: &str = "Arial";

/// Position and size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

/// A paragraph of a text shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    /// Bullet character for list items
    pub bullet: Option<char>,
    /// Font size in points
    pub size: u32,
    /// Bold for the whole paragraph (headings)
    pub bold: bool,
    pub italic: bool,
    pub color: Rgb,
}

/// A shape on a slide.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Text {
        frame: Frame,
        paragraphs: Vec<Paragraph>,
    },
    Picture {
        frame: Frame,
        /// Index into the presentation's media list
        media: usize,
        description: String,
    },
}

impl Shape {
    pub fn frame(&self) -> Frame {
        match self {
            Shape::Text { frame, .. } | Shape::Picture { frame, .. } => *frame,
        }
    }
}

/// A fully placed slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlidePart {
    pub background: Option<Rgb>,
    /// Latin typeface for all text
    pub font: String,
    pub shapes: Vec<Shape>,
}

/// An image stored in the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub media: usize,
    /// Pixel size, when the header could be read
    pub size: Option<(u32, u32)>,
}

enum Row<'a> {
    Flow(Vec<&'a Block>),
    Columns(Vec<Vec<&'a Block>>),
}

/// Place the content of `slide` on a slide of `width` × `height` EMU.
///
/// `embed` stores an image referenced by `src` and reports where it went.
pub fn layout_slide<F>(slide: &HtmlSlide, width: i64, height: i64, mut embed: F) -> Result<SlidePart>
where
    F: FnMut(&str) -> Result<EmbeddedImage>,
{
    let mut placer = Placer {
        color: slide.color.unwrap_or(Rgb::BLACK),
        bottom: height - MARGIN,
        shapes: Vec::new(),
        embed: &mut embed,
    };

    let content_width = width - 2 * MARGIN;
    let mut y = MARGIN;

    for row in rows(&slide.blocks) {
        y = match row {
            Row::Flow(blocks) => placer.flow(&blocks, MARGIN, y, content_width)?,
            Row::Columns(columns) => {
                let n = columns.len() as i64;
                let column_width = (content_width - COLUMN_GAP * (n - 1)) / n;
                let mut row_bottom = y;
                for (i, blocks) in columns.iter().enumerate() {
                    let x = MARGIN + i as i64 * (column_width + COLUMN_GAP);
                    row_bottom = row_bottom.max(placer.flow(blocks, x, y, column_width)?);
                }
                row_bottom
            }
        };
    }

    Ok(SlidePart {
        background: slide.background,
        font: slide.font.clone().unwrap_or_else(|| DEFAULT_FONT.to_string()),
        shapes: placer.shapes,
    })
}

/// Split blocks into full-width runs and column groups.
fn rows(blocks: &[Block]) -> Vec<Row<'_>> {
    let mut rows: Vec<Row> = Vec::new();
    let mut current_group = None;

    for block in blocks {
        match block.column {
            Some(column) => {
                if current_group != Some(column.group) {
                    rows.push(Row::Columns(Vec::new()));
                    current_group = Some(column.group);
                }
                if let Some(Row::Columns(columns)) = rows.last_mut() {
                    if columns.len() <= column.index {
                        columns.resize_with(column.index + 1, Vec::new);
                    }
                    columns[column.index].push(block);
                }
            }
            None => {
                current_group = None;
                match rows.last_mut() {
                    Some(Row::Flow(flow)) => flow.push(block),
                    _ => rows.push(Row::Flow(vec![block])),
                }
            }
        }
    }

    // Columns that only had whitespace leave empty slots
    rows.retain(|row| match row {
        Row::Flow(blocks) => !blocks.is_empty(),
        Row::Columns(columns) => !columns.is_empty(),
    });
    rows
}

struct Placer<'e, F> {
    color: Rgb,
    bottom: i64,
    shapes: Vec<Shape>,
    embed: &'e mut F,
}

impl<F> Placer<'_, F>
where
    F: FnMut(&str) -> Result<EmbeddedImage>,
{
    /// Stack `blocks` from `y` down; returns the y below the last one.
    fn flow(&mut self, blocks: &[&Block], x: i64, mut y: i64, width: i64) -> Result<i64> {
        let mut i = 0;
        while i < blocks.len() {
            match &blocks[i].content {
                Content::Text(text) if is_list_item(text) => {
                    // Consecutive list items share one text box
                    let mut paragraphs = Vec::new();
                    while let Some(Content::Text(item)) = blocks.get(i).map(|b| &b.content) {
                        if !is_list_item(item) {
                            break;
                        }
                        paragraphs.push(self.paragraph(item));
                        i += 1;
                    }
                    y = self.text_shape(paragraphs, x, y, width);
                }
                Content::Text(text) => {
                    let paragraph = self.paragraph(text);
                    y = self.text_shape(vec![paragraph], x, y, width);
                    i += 1;
                }
                Content::Image { src, alt } => {
                    let image = (self.embed)(src)?;
                    let available = (self.bottom - y).max(MIN_IMAGE_HEIGHT);
                    let frame = fit_image(image.size, x, y, width, available);
                    log::debug!("Placed image {} at {:?}", src, frame);
                    self.shapes.push(Shape::Picture {
                        frame,
                        media: image.media,
                        description: alt.clone(),
                    });
                    y = frame.y + frame.cy + BLOCK_GAP;
                    i += 1;
                }
            }
        }
        Ok(y)
    }

    fn text_shape(&mut self, paragraphs: Vec<Paragraph>, x: i64, y: i64, width: i64) -> i64 {
        let cy = text_height(&paragraphs, width);
        self.shapes.push(Shape::Text {
            frame: Frame { x, y, cx: width, cy },
            paragraphs,
        });
        y + cy + BLOCK_GAP
    }

    fn paragraph(&self, block: &TextBlock) -> Paragraph {
        let (size, bold, italic) = match block.role {
            TextRole::Heading(1) => (32, true, false),
            TextRole::Heading(2) => (24, false, false),
            TextRole::Heading(3) => (20, true, false),
            TextRole::Heading(_) => (18, true, false),
            TextRole::Paragraph | TextRole::ListItem { .. } => (16, false, false),
            TextRole::Quote => (20, false, true),
        };

        let mut runs = block.runs.clone();
        let bullet = match block.role {
            TextRole::ListItem { number: Some(n) } => {
                runs.insert(0, TextRun::plain(format!("{}. ", n)));
                None
            }
            TextRole::ListItem { number: None } if !starts_with_mark(&runs) => Some('•'),
            _ => None,
        };

        Paragraph {
            runs,
            bullet,
            size,
            bold,
            italic,
            color: block.color.unwrap_or(self.color),
        }
    }
}

fn is_list_item(block: &TextBlock) -> bool {
    matches!(block.role, TextRole::ListItem { .. })
}

/// Items that already begin with a check mark or bullet get no extra bullet.
fn starts_with_mark(runs: &[TextRun]) -> bool {
    runs.first()
        .and_then(|r| r.text.chars().next())
        .is_some_and(|c| matches!(c, '✓' | '✔' | '•' | '☐' | '☑' | '✗'))
}

/// Estimated height of a text box holding `paragraphs`.
pub fn text_height(paragraphs: &[Paragraph], width: i64) -> i64 {
    let points: f64 = paragraphs
        .iter()
        .map(|p| {
            let indent = if p.bullet.is_some() { BULLET_INDENT } else { 0 };
            let text: String = p
                .runs
                .iter()
                .map(|r| if r.line_break { "\n" } else { r.text.as_str() })
                .collect();
            let lines = line_count(&text, p.size as f64, width - 2 * INSET_X - indent);
            lines as f64 * p.size as f64 * LINE_SPACING
        })
        .sum();
    (points * EMU_PER_PT as f64).ceil() as i64 + 2 * INSET_Y
}

/// Wrapped line count of `text` at `size` points in `width` EMU.
fn line_count(text: &str, size: f64, width: i64) -> usize {
    let width_pt = width.max(EMU_PER_PT) as f64 / EMU_PER_PT as f64;
    let per_line = (width_pt / (size * GLYPH_WIDTH)).floor().max(1.0);
    text.split('\n')
        .map(|line| {
            let columns = UnicodeWidthStr::width(line) as f64;
            (columns / per_line).ceil().max(1.0) as usize
        })
        .sum()
}

/// Fit an image into the box, keeping its aspect ratio when known.
fn fit_image(size: Option<(u32, u32)>, x: i64, y: i64, width: i64, height: i64) -> Frame {
    match size {
        Some((w, h)) => {
            let scale = (width as f64 / w as f64).min(height as f64 / h as f64);
            let cx = (w as f64 * scale).round() as i64;
            let cy = (h as f64 * scale).round() as i64;
            Frame {
                x: x + (width - cx) / 2,
                y,
                cx,
                cy,
            }
        }
        None => {
            log::warn!("Image size unknown, stretching to {}x{} EMU", width, height);
            Frame {
                x,
                y,
                cx: width,
                cy: height,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pptx::html::Column;

    const WIDTH: i64 = 9_144_000;
    const HEIGHT: i64 = 5_143_500;

    fn text(role: TextRole, s: &str, column: Option<Column>) -> Block {
        Block {
            content: Content::Text(TextBlock {
                role,
                runs: vec![TextRun::plain(s)],
                color: None,
            }),
            column,
        }
    }

    fn no_images(_: &str) -> Result<EmbeddedImage> {
        panic!("no images expected")
    }

    #[test]
    fn test_blocks_stack_downwards() {
        let slide = HtmlSlide {
            color: Some(Rgb::WHITE),
            blocks: vec![
                text(TextRole::Heading(1), "Title", None),
                text(TextRole::Paragraph, "Body text", None),
            ],
            ..Default::default()
        };
        let part = layout_slide(&slide, WIDTH, HEIGHT, no_images).unwrap();
        assert_eq!(part.shapes.len(), 2);
        assert_eq!(part.font, "Arial");

        let first = part.shapes[0].frame();
        let second = part.shapes[1].frame();
        assert_eq!(first.x, MARGIN);
        assert_eq!(first.y, MARGIN);
        assert_eq!(first.cx, WIDTH - 2 * MARGIN);
        assert!(second.y >= first.y + first.cy);

        match &part.shapes[0] {
            Shape::Text { paragraphs, .. } => {
                assert_eq!(paragraphs[0].size, 32);
                assert!(paragraphs[0].bold);
                assert_eq!(paragraphs[0].color, Rgb::WHITE);
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_list_items_share_a_shape() {
        let slide = HtmlSlide {
            blocks: vec![
                text(TextRole::ListItem { number: None }, "a", None),
                text(TextRole::ListItem { number: None }, "✓ done", None),
                text(TextRole::ListItem { number: Some(3) }, "c", None),
            ],
            ..Default::default()
        };
        let part = layout_slide(&slide, WIDTH, HEIGHT, no_images).unwrap();
        assert_eq!(part.shapes.len(), 1);
        let Shape::Text { paragraphs, .. } = &part.shapes[0] else {
            panic!("expected text");
        };
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0].bullet, Some('•'));
        assert_eq!(paragraphs[1].bullet, None);
        assert_eq!(paragraphs[2].runs[0].text, "3. ");
    }

    #[test]
    fn test_columns_split_width() {
        let slide = HtmlSlide {
            blocks: vec![
                text(TextRole::Heading(1), "Compare", None),
                text(TextRole::Paragraph, "left", Some(Column { group: 0, index: 0 })),
                text(TextRole::Paragraph, "right", Some(Column { group: 0, index: 1 })),
            ],
            ..Default::default()
        };
        let part = layout_slide(&slide, WIDTH, HEIGHT, no_images).unwrap();
        let left = part.shapes[1].frame();
        let right = part.shapes[2].frame();
        assert_eq!(left.y, right.y);
        assert_eq!(left.cx, right.cx);
        assert!(right.x > left.x + left.cx);
        assert!(right.x + right.cx <= WIDTH - MARGIN);
    }

    #[test]
    fn test_image_keeps_aspect_ratio() {
        let slide = HtmlSlide {
            blocks: vec![Block {
                content: Content::Image {
                    src: "chart.png".to_string(),
                    alt: "Chart".to_string(),
                },
                column: None,
            }],
            ..Default::default()
        };
        let part = layout_slide(&slide, WIDTH, HEIGHT, |src| {
            assert_eq!(src, "chart.png");
            Ok(EmbeddedImage {
                media: 4,
                size: Some((400, 400)),
            })
        })
        .unwrap();

        match &part.shapes[0] {
            Shape::Picture {
                frame,
                media,
                description,
            } => {
                assert_eq!(*media, 4);
                assert_eq!(description, "Chart");
                assert_eq!(frame.cx, frame.cy);
                assert_eq!(frame.cy, HEIGHT - 2 * MARGIN);
                // Centered horizontally
                assert_eq!(frame.x - MARGIN, WIDTH - MARGIN - (frame.x + frame.cx));
            }
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn test_long_text_wraps() {
        let short = Paragraph {
            runs: vec![TextRun::plain("short")],
            bullet: None,
            size: 16,
            bold: false,
            italic: false,
            color: Rgb::BLACK,
        };
        let long = Paragraph {
            runs: vec![TextRun::plain("word ".repeat(80))],
            ..short.clone()
        };
        let width = WIDTH - 2 * MARGIN;
        assert!(text_height(&[long], width) > 2 * text_height(&[short], width));
    }
}
