//! Error types for the deckgen library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deckgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or exporting a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The spec file could not be parsed.
    #[error("Invalid spec {path}: {message}")]
    SpecParse { path: PathBuf, message: String },

    /// The theme token file could not be parsed.
    #[error("Invalid theme tokens: {0}")]
    ThemeParse(String),

    /// Neither `--out` nor `output.web_dir` names a destination.
    #[error("No output directory: pass --out <dir> or set output.web_dir in the spec")]
    MissingOutputDir,

    /// The output directory exists and overwriting was not requested.
    #[error("Output directory {} already exists. Use --force to overwrite it.", .0.display())]
    OutputExists(PathBuf),

    /// A slide descriptor has no `type` field (1-based index).
    #[error("Slide {0} has no \"type\" field")]
    MissingSlideType(usize),

    /// A slide descriptor names a type outside the fixed set.
    #[error("Unsupported slide type \"{kind}\" on slide {index}")]
    UnknownSlideType { index: usize, kind: String },

    /// A slide descriptor has fields of the wrong shape.
    #[error("Invalid slide {index}: {message}")]
    InvalidSlide { index: usize, message: String },

    /// A chart image referenced by the spec does not exist.
    #[error("Asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// Error during template rendering.
    #[error("Template error: {0}")]
    Template(String),

    /// A slide HTML file could not be read.
    #[error("Cannot read slide HTML {}: {message}", .file.display())]
    Html { file: PathBuf, message: String },

    /// An image referenced by a slide HTML file does not exist.
    #[error("Image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// The slide directory holds no HTML files.
    #[error("No HTML slides found in {}", .0.display())]
    NoSlides(PathBuf),

    /// Error writing the ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error writing XML content.
    #[error("XML write error: {0}")]
    XmlWrite(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlWrite(err.to_string())
    }
}

impl From<askama::Error> for Error {
    fn from(err: askama::Error) -> Self {
        Error::Template(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingSlideType(3);
        assert_eq!(err.to_string(), "Slide 3 has no \"type\" field");

        let err = Error::UnknownSlideType {
            index: 2,
            kind: "timeline".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported slide type \"timeline\" on slide 2");

        let err = Error::OutputExists(PathBuf::from("out"));
        assert!(err.to_string().contains("--force"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
