//! Asset copying for chart images.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Copies referenced files into a deck's `assets/` directory.
///
/// Each source is copied at most once, keyed by its canonical path, and
/// distinct sources never share a destination name.
#[derive(Debug)]
pub struct AssetStore {
    dir: PathBuf,
    by_source: HashMap<PathBuf, String>,
    names: HashSet<String>,
}

impl AssetStore {
    /// Create a store writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            by_source: HashMap::new(),
            names: HashSet::new(),
        }
    }

    /// Copy `source` unless it was copied before; returns the path a slide
    /// page uses to reference it.
    pub fn import(&mut self, source: &Path) -> Result<String> {
        let canonical =
            fs::canonicalize(source).map_err(|_| Error::AssetNotFound(source.to_path_buf()))?;

        if let Some(name) = self.by_source.get(&canonical) {
            log::debug!("Reusing asset {} for {}", name, source.display());
            return Ok(Self::reference(name));
        }

        let name = self.unique_name(&canonical);
        fs::create_dir_all(&self.dir)?;
        fs::copy(&canonical, self.dir.join(&name))?;
        log::info!("Copied asset {} -> assets/{}", canonical.display(), name);

        self.names.insert(name.clone());
        self.by_source.insert(canonical, name.clone());
        Ok(Self::reference(&name))
    }

    /// Number of files copied so far.
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    /// Whether nothing has been copied.
    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    fn reference(name: &str) -> String {
        format!("../assets/{}", name)
    }

    fn unique_name(&self, source: &Path) -> String {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "asset".to_string());
        if !self.names.contains(&file_name) {
            return file_name;
        }

        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "asset".to_string());
        let ext = source
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        (2..)
            .map(|n| format!("{}-{}{}", stem, n, ext))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or(file_name)
    }
}
