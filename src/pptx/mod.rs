//! HTML to PPTX exporter.
//!
//! Reads every `.html` file of a directory in natural order, converts
//! each into one slide and writes an Office Open XML presentation.
//!
//! # Example
//!
//! ```no_run
//! use deckgen::pptx::{export_pptx, ExportOptions, SlideLayout};
//!
//! let options = ExportOptions::new()
//!     .with_title("Quarterly Review")
//!     .with_layout(SlideLayout::Wide);
//! let summary = export_pptx("build/web/slides", "build/deck.pptx", &options)?;
//! println!("{} slides", summary.slides);
//! # Ok::<(), deckgen::Error>(())
//! ```

mod color;
mod html;
mod layout;
mod media;
mod package;
mod parts;
mod xml;

pub use color::Rgb;
pub use html::{Block, Column, Content, HtmlSlide, TextBlock, TextRole, TextRun};
pub use layout::{layout_slide, EmbeddedImage, Frame, Paragraph, Shape, SlidePart};
pub use media::{image_dimensions, ImageFormat};
pub use package::Presentation;

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Slide size of the exported presentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlideLayout {
    /// 10 × 5.625 in
    #[default]
    Widescreen16x9,
    /// 10 × 6.25 in
    Widescreen16x10,
    /// 10 × 7.5 in
    Standard4x3,
    /// 13.333 × 7.5 in
    Wide,
}

impl SlideLayout {
    pub const ALL: [SlideLayout; 4] = [
        SlideLayout::Widescreen16x9,
        SlideLayout::Widescreen16x10,
        SlideLayout::Standard4x3,
        SlideLayout::Wide,
    ];

    /// Slide width and height in EMU.
    pub fn size_emu(&self) -> (i64, i64) {
        match self {
            SlideLayout::Widescreen16x9 => (9_144_000, 5_143_500),
            SlideLayout::Widescreen16x10 => (9_144_000, 5_715_000),
            SlideLayout::Standard4x3 => (9_144_000, 6_858_000),
            SlideLayout::Wide => (12_192_000, 6_858_000),
        }
    }

    /// The `type` attribute of `p:sldSz`; custom sizes have none.
    pub fn size_type(&self) -> Option<&'static str> {
        match self {
            SlideLayout::Widescreen16x9 => Some("screen16x9"),
            SlideLayout::Widescreen16x10 => Some("screen16x10"),
            SlideLayout::Standard4x3 => Some("screen4x3"),
            SlideLayout::Wide => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SlideLayout::Widescreen16x9 => "16x9",
            SlideLayout::Widescreen16x10 => "16x10",
            SlideLayout::Standard4x3 => "4x3",
            SlideLayout::Wide => "wide",
        }
    }
}

impl fmt::Display for SlideLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlideLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "16x9" | "16:9" => Ok(SlideLayout::Widescreen16x9),
            "16x10" | "16:10" => Ok(SlideLayout::Widescreen16x10),
            "4x3" | "4:3" => Ok(SlideLayout::Standard4x3),
            "wide" => Ok(SlideLayout::Wide),
            other => Err(format!(
                "unknown layout '{}' (expected 16x9, 16x10, 4x3 or wide)",
                other
            )),
        }
    }
}

/// Options for exporting a presentation.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Slide size
    pub layout: SlideLayout,

    /// Document title; a default title when unset
    pub title: Option<String>,

    /// Document author; the tool name when unset
    pub author: Option<String>,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: SlideLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// What an export produced.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Written package
    pub out: PathBuf,
    /// Number of slides
    pub slides: usize,
    /// Number of distinct embedded images
    pub images: usize,
}

/// The `.html` files directly inside `dir`, in natural order.
pub fn list_slide_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_html = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("html"));
        if is_html && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| {
        let a = a.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let b = b.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        natural_cmp(&a, &b)
    });
    Ok(files)
}

/// Compare strings with runs of ASCII digits ordered by numeric value,
/// so `slide9` sorts before `slide10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let left = take_digits(&mut a);
                let right = take_digits(&mut b);
                let left_trimmed = left.trim_start_matches('0');
                let right_trimmed = right.trim_start_matches('0');
                let ord = left_trimmed
                    .len()
                    .cmp(&right_trimmed.len())
                    .then_with(|| left_trimmed.cmp(right_trimmed))
                    // Fewer leading zeros first for equal values
                    .then_with(|| left.len().cmp(&right.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.next_if(|c| c.is_ascii_digit()) {
        digits.push(c);
    }
    digits
}

/// Convert one HTML file and append it to `presentation`.
pub fn convert_file(path: &Path, presentation: &mut Presentation) -> Result<()> {
    let slide = HtmlSlide::from_file(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let (width, height) = presentation.layout().size_emu();

    let part = layout_slide(&slide, width, height, |src| {
        let image = resolve_src(base, src);
        let embedded = presentation.embed_image(&image)?;
        if embedded.size.is_none() {
            log::warn!(
                "Unknown size for {}, filling the available height",
                image.display()
            );
        }
        Ok(embedded)
    })?;

    presentation.add_slide(part);
    log::info!("Converted {}", path.display());
    Ok(())
}

/// Resolve an `img` source against the directory of its HTML file.
fn resolve_src(base: &Path, src: &str) -> PathBuf {
    let src = src.strip_prefix("file://").unwrap_or(src);
    let src = src.split(['?', '#']).next().unwrap_or(src);
    let src = src.replace("%20", " ");
    let path = Path::new(&src);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Convert every HTML file in `slides_dir` and write the presentation to
/// `out`. Fails without writing anything when the directory holds no
/// HTML files.
pub fn export_pptx(
    slides_dir: impl AsRef<Path>,
    out: impl AsRef<Path>,
    options: &ExportOptions,
) -> Result<ExportSummary> {
    let slides_dir = slides_dir.as_ref();
    let out = out.as_ref();

    let files = list_slide_files(slides_dir)?;
    if files.is_empty() {
        return Err(Error::NoSlides(slides_dir.to_path_buf()));
    }
    log::debug!(
        "Exporting {} files from {} as {}",
        files.len(),
        slides_dir.display(),
        options.layout
    );

    let mut presentation = Presentation::new(options.layout);
    if let Some(title) = &options.title {
        presentation.set_title(title.as_str());
    }
    if let Some(author) = &options.author {
        presentation.set_author(author.as_str());
    }

    for file in &files {
        convert_file(file, &mut presentation)?;
    }

    presentation.save(out)?;
    log::info!(
        "Wrote {} ({} slides)",
        out.display(),
        presentation.slide_count()
    );

    Ok(ExportSummary {
        out: out.to_path_buf(),
        slides: presentation.slide_count(),
        images: presentation.media_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_natural_cmp() {
        let mut names = vec!["slide10.html", "slide9.html", "slide100.html", "slide01.html", "intro.html"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(
            names,
            vec!["intro.html", "slide01.html", "slide9.html", "slide10.html", "slide100.html"]
        );
        assert_eq!(natural_cmp("slide2", "slide02"), Ordering::Less);
        assert_eq!(natural_cmp("a", "a"), Ordering::Equal);
    }

    #[test]
    fn test_layout_parse() {
        assert_eq!("16x9".parse::<SlideLayout>(), Ok(SlideLayout::Widescreen16x9));
        assert_eq!("WIDE".parse::<SlideLayout>(), Ok(SlideLayout::Wide));
        assert_eq!("4:3".parse::<SlideLayout>(), Ok(SlideLayout::Standard4x3));
        assert!("a4".parse::<SlideLayout>().is_err());
        for layout in SlideLayout::ALL {
            assert_eq!(layout.as_str().parse::<SlideLayout>(), Ok(layout));
        }
        assert_eq!(SlideLayout::default().size_emu(), (9_144_000, 5_143_500));
    }

    #[test]
    fn test_list_slide_files_filters_and_orders() {
        let dir = TempDir::new().unwrap();
        for name in ["slide10.html", "slide2.HTML", "notes.txt", "slide1.html"] {
            fs::write(dir.path().join(name), "<html></html>").unwrap();
        }
        fs::create_dir(dir.path().join("nested.html")).unwrap();

        let files = list_slide_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["slide1.html", "slide2.HTML", "slide10.html"]);
    }

    #[test]
    fn test_export_empty_dir_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out/deck.pptx");
        let err = export_pptx(dir.path(), &out, &ExportOptions::new()).unwrap_err();
        assert!(matches!(err, Error::NoSlides(_)));
        assert!(!out.exists());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_missing_image_names_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("slide01.html"),
            r#"<html><body><img src="../assets/missing.png"></body></html>"#,
        )
        .unwrap();
        let out = dir.path().join("deck.pptx");
        let err = export_pptx(dir.path(), &out, &ExportOptions::new()).unwrap_err();
        assert!(err.to_string().contains("missing.png"));
        assert!(!out.exists());
    }

    #[test]
    fn test_resolve_src() {
        let base = Path::new("/deck/slides");
        assert_eq!(
            resolve_src(base, "../assets/chart%20a.png?v=2"),
            PathBuf::from("/deck/slides/../assets/chart a.png")
        );
        assert_eq!(resolve_src(base, "/abs/x.png"), PathBuf::from("/abs/x.png"));
    }
}
