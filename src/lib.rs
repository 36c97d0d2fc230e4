//! # deckgen
//!
//! Slide decks from a YAML or JSON description.
//!
//! The crate has two halves. The web builder renders each slide of a deck
//! spec with a themed template into a static HTML deck with a navigation
//! viewer. The PPTX exporter turns a directory of slide HTML files into a
//! PowerPoint presentation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use deckgen::{build_deck, export_pptx, BuildOptions, ExportOptions};
//!
//! // Render the HTML deck
//! let deck = build_deck(&BuildOptions::new("deck.yml").with_out("build/web"))?;
//! println!("{} slides in {}", deck.slides.len(), deck.out_dir.display());
//!
//! // Export the rendered slides
//! let options = ExportOptions::new().with_title("Quarterly Review");
//! export_pptx(deck.out_dir.join("slides"), "build/deck.pptx", &options)?;
//! # Ok::<(), deckgen::Error>(())
//! ```
//!
//! ## Spec format
//!
//! ```yaml
//! output:
//!   web_dir: build/web
//! slides:
//!   - type: cover
//!     title: Quarterly Review
//!     subtitle: Operations
//!   - type: agenda
//!     items: [Results, Outlook]
//!   - type: example
//!     title: Throughput
//!     chart_image: charts/throughput.png
//!     data_pairs: [[Line 1, 120 t/h], [Line 2, 95 t/h]]
//! ```

pub mod error;
pub mod pptx;
pub mod spec;
pub mod theme;
pub mod web;

// Re-exports
pub use error::{Error, Result};
pub use pptx::{export_pptx, ExportOptions, ExportSummary, Presentation, SlideLayout};
pub use spec::{DeckSpec, Slide, SlideKind};
pub use theme::{Palette, ThemeTokens};
pub use web::{build_deck, build_from_spec, BuildOptions, DeckSummary};
