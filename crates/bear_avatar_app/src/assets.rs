// SPDX-License-Identifier: MIT OR Apache-2.0
//! Filesystem asset source.

use crate::error::{AppError, Result};
use bear_avatar_sequencer::{AssetSource, CatalogPatterns, FrameCatalog};
use std::path::{Path, PathBuf};

/// Asset source backed by a directory tree.
///
/// Identifiers are paths relative to the root with `/` separators,
/// discovered in file-name order so repeated scans agree.
#[derive(Debug, Clone)]
pub struct DirectoryAssetSource {
    root: PathBuf,
}

impl DirectoryAssetSource {
    /// Use `root` without checking it exists
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Use `root`, which must be an existing directory
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(AppError::MissingAssetDir(root));
        }
        Ok(Self::new(root))
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the directory and build a catalog
    pub fn load_catalog(&self, patterns: &CatalogPatterns) -> FrameCatalog {
        FrameCatalog::load(self, patterns)
    }

    fn identifier(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(parts.join("/"))
    }
}

impl AssetSource for DirectoryAssetSource {
    fn identifiers(&self) -> Vec<String> {
        walkdir::WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable asset entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.identifier(entry.path()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bear_avatar_sequencer::FrameRef;
    use std::fs;

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            DirectoryAssetSource::open(&missing),
            Err(AppError::MissingAssetDir(_))
        ));
        // Scanning a missing directory degrades to an empty catalog
        let catalog = DirectoryAssetSource::new(missing).load_catalog(&CatalogPatterns::default());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_scan_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let img = dir.path().join("img");
        fs::create_dir(&img).unwrap();
        for name in ["watch_bear_10.png", "watch_bear_2.png", "hide_bear_1.png", "notes.txt"] {
            fs::write(img.join(name), b"").unwrap();
        }

        let source = DirectoryAssetSource::open(dir.path()).unwrap();
        let mut ids = source.identifiers();
        ids.sort();
        assert_eq!(
            ids,
            [
                "img/hide_bear_1.png",
                "img/notes.txt",
                "img/watch_bear_10.png",
                "img/watch_bear_2.png",
            ]
        );

        let catalog = source.load_catalog(&CatalogPatterns::default());
        let watching: Vec<_> = catalog.watching.iter().map(FrameRef::as_str).collect();
        assert_eq!(watching, ["img/watch_bear_2.png", "img/watch_bear_10.png"]);
        assert_eq!(catalog.hiding.len(), 1);
        assert!(catalog.peeking.is_empty());
    }
}
