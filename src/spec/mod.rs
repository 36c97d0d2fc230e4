//! Deck spec loading.
//!
//! A spec is a YAML or JSON document with an ordered `slides` list and an
//! optional `output.web_dir`. The raw document is kept next to the decoded
//! slides so it can be written back out unchanged as `deck.json`.

mod slide;

pub use slide::{format_data_pair, value_text, Slide, SlideKind};

use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Output section of a spec.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSpec {
    /// Destination directory for the web deck
    #[serde(default)]
    pub web_dir: Option<PathBuf>,
}

/// A loaded deck spec.
#[derive(Debug, Clone)]
pub struct DeckSpec {
    /// Path the spec was read from
    pub path: PathBuf,
    /// Validated slide descriptors, in input order
    pub slides: Vec<Slide>,
    /// Output settings
    pub output: OutputSpec,
    /// The document as parsed
    pub raw: Value,
}

impl DeckSpec {
    /// Read and validate a spec file.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::SpecParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &text)
    }

    /// Parse spec text; `path` picks the format and anchors relative assets.
    pub fn parse(path: impl AsRef<Path>, text: &str) -> Result<Self> {
        let path = path.as_ref();
        let spec_error = |message: String| Error::SpecParse {
            path: path.to_path_buf(),
            message,
        };

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let raw: Value = if is_json {
            serde_json::from_str(text).map_err(|e| spec_error(e.to_string()))?
        } else {
            serde_yaml::from_str(text).map_err(|e| spec_error(e.to_string()))?
        };

        let raw = match raw {
            // An empty YAML document has no slides at all
            Value::Null => Value::Object(Default::default()),
            Value::Object(_) => raw,
            _ => return Err(spec_error("expected a mapping at the top level".to_string())),
        };

        let output = match raw.get("output") {
            Some(value) if !value.is_null() => OutputSpec::deserialize(value)
                .map_err(|e| spec_error(format!("output: {}", e)))?,
            _ => OutputSpec::default(),
        };

        let slides = match raw.get("slides") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(values)) => values
                .iter()
                .enumerate()
                .map(|(i, value)| Slide::from_value(i + 1, value))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(spec_error("\"slides\" must be a list".to_string())),
        };

        log::debug!("Loaded {} slides from {}", slides.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            slides,
            output,
            raw,
        })
    }

    /// Directory that relative asset paths resolve against.
    pub fn base_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Pick the output directory: an explicit one wins over `output.web_dir`.
    pub fn resolve_output_dir(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        let dir = explicit
            .map(Path::to_path_buf)
            .or_else(|| self.output.web_dir.clone())
            .ok_or(Error::MissingOutputDir)?;
        absolute(&dir)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
