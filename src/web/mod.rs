//! HTML deck builder.
//!
//! Turns a [`DeckSpec`] into a directory holding one HTML page per slide,
//! an `index.html` viewer, a `deck.json` copy of the spec and the copied
//! chart images.
//!
//! # Example
//!
//! ```no_run
//! use deckgen::web::{build_deck, BuildOptions};
//!
//! let options = BuildOptions::new("deck.yml").with_out("build/web").with_force(true);
//! let summary = build_deck(&options)?;
//! println!("{} slides", summary.slides.len());
//! # Ok::<(), deckgen::Error>(())
//! ```

mod assets;
mod context;
mod output;
mod templates;

pub use assets::AssetStore;
pub use context::SlideContext;
pub use output::{prepare_output_dir, OutputDirs};
pub use templates::{render_index, render_slide, RenderedSlide};

use crate::error::{Error, Result};
use crate::spec::DeckSpec;
use crate::theme::ThemeTokens;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for building a web deck.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Spec file to read
    pub spec: PathBuf,

    /// Output directory; `output.web_dir` from the spec when unset
    pub out: Option<PathBuf>,

    /// Replace an existing output directory
    pub force: bool,

    /// Theme token file; the bundled theme when unset
    pub theme: Option<PathBuf>,
}

impl BuildOptions {
    /// Create options for a spec file.
    pub fn new(spec: impl Into<PathBuf>) -> Self {
        Self {
            spec: spec.into(),
            out: None,
            force: false,
            theme: None,
        }
    }

    /// Set the output directory.
    pub fn with_out(mut self, out: impl Into<PathBuf>) -> Self {
        self.out = Some(out.into());
        self
    }

    /// Allow replacing an existing output directory.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Use a theme token file.
    pub fn with_theme(mut self, theme: impl Into<PathBuf>) -> Self {
        self.theme = Some(theme.into());
        self
    }
}

/// What a build produced.
#[derive(Debug, Clone)]
pub struct DeckSummary {
    /// Deck root directory
    pub out_dir: PathBuf,
    /// Slide pages in order
    pub slides: Vec<RenderedSlide>,
    /// Number of copied asset files
    pub assets: usize,
}

/// Load the spec and theme named by `options` and build the deck.
pub fn build_deck(options: &BuildOptions) -> Result<DeckSummary> {
    let spec = DeckSpec::load(&options.spec)?;
    let theme = match &options.theme {
        Some(path) => ThemeTokens::load(path)?,
        None => ThemeTokens::default(),
    };
    let out_dir = spec.resolve_output_dir(options.out.as_deref())?;
    build_from_spec(&spec, &theme, &out_dir, options.force)
}

/// Build a deck from an already loaded spec.
pub fn build_from_spec(
    spec: &DeckSpec,
    theme: &ThemeTokens,
    out_dir: &Path,
    force: bool,
) -> Result<DeckSummary> {
    let base_dir = spec.base_dir();

    // Nothing is written while a referenced chart is missing
    for chart in spec.slides.iter().filter_map(|s| s.chart_image.as_ref()) {
        let source = base_dir.join(chart);
        if !source.is_file() {
            return Err(Error::AssetNotFound(source));
        }
    }

    let dirs = prepare_output_dir(out_dir, force)?;
    log::debug!("Writing deck to {}", dirs.root.display());

    let width = slide_number_width(spec.slides.len());
    let mut assets = AssetStore::new(&dirs.assets);
    let mut rendered = Vec::with_capacity(spec.slides.len());

    for (i, slide) in spec.slides.iter().enumerate() {
        let number = i + 1;

        let chart = match &slide.chart_image {
            Some(path) => Some(assets.import(&base_dir.join(path))?),
            None => None,
        };

        let ctx = SlideContext::for_slide(slide, theme, chart.as_deref());
        let html = render_slide(slide.kind, &ctx)?;

        let file = slide_file_name(number, width);
        fs::write(dirs.slides.join(&file), html)?;
        log::info!("Rendered {} ({})", file, slide.kind);

        rendered.push(RenderedSlide {
            file,
            title: slide.display_title(number),
        });
    }

    let index = render_index(&rendered, theme)?;
    fs::write(dirs.root.join("index.html"), index)?;

    let deck_json = serde_json::to_string_pretty(&spec.raw).map_err(|e| Error::SpecParse {
        path: spec.path.clone(),
        message: e.to_string(),
    })?;
    fs::write(dirs.root.join("deck.json"), deck_json)?;

    Ok(DeckSummary {
        out_dir: dirs.root,
        slides: rendered,
        assets: assets.len(),
    })
}

/// Digits used for slide numbers: at least two, more for decks past 99.
fn slide_number_width(count: usize) -> usize {
    count.to_string().len().max(2)
}

fn slide_file_name(number: usize, width: usize) -> String {
    format!("slide{:0width$}.html", number, width = width)
}
