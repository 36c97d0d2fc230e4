//! Output directory preparation.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directories of a prepared deck.
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub root: PathBuf,
    pub slides: PathBuf,
    pub assets: PathBuf,
}

/// Create a fresh output directory with `slides/` and `assets/` inside.
///
/// An existing directory is left untouched unless `force` is set, in which
/// case it is removed first.
pub fn prepare_output_dir(dir: &Path, force: bool) -> Result<OutputDirs> {
    if dir.exists() {
        if !force {
            return Err(Error::OutputExists(dir.to_path_buf()));
        }
        log::debug!("Removing existing output directory {}", dir.display());
        if dir.is_dir() {
            fs::remove_dir_all(dir)?;
        } else {
            fs::remove_file(dir)?;
        }
    }

    let dirs = OutputDirs {
        root: dir.to_path_buf(),
        slides: dir.join("slides"),
        assets: dir.join("assets"),
    };
    fs::create_dir_all(&dirs.slides)?;
    fs::create_dir_all(&dirs.assets)?;
    Ok(dirs)
}
