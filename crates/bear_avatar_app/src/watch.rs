// SPDX-License-Identifier: MIT OR Apache-2.0
//! Asset directory watcher.
//!
//! Reloads the frame catalog when image files under the asset directory
//! are created, modified or removed, and hands the new catalog to a
//! callback on the watcher thread.

use crate::assets::DirectoryAssetSource;
use bear_avatar_sequencer::{CatalogPatterns, FrameCatalog};
use notify_debouncer_full::{
    new_debouncer,
    notify::{self, EventKind, RecommendedWatcher, RecursiveMode},
    DebounceEventResult, Debouncer, RecommendedCache,
};
use std::path::Path;
use std::time::Duration;

/// Debounce window for bursts of file events
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Whether a path change can affect the catalog
fn is_frame_path(path: &Path, patterns: &CatalogPatterns) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    patterns.watching.matches(name) || patterns.hiding.matches(name) || patterns.peeking.matches(name)
}

/// Watches an asset directory and reports fresh catalogs
pub struct CatalogWatcher {
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
}

impl CatalogWatcher {
    /// Start watching `source`'s root recursively
    pub fn new(
        source: DirectoryAssetSource,
        patterns: CatalogPatterns,
        debounce: Duration,
        mut on_reload: impl FnMut(FrameCatalog) + Send + 'static,
    ) -> Result<Self, notify::Error> {
        let root = source.root().to_path_buf();

        let mut debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let relevant = events.iter().any(|event| {
                        matches!(
                            event.kind,
                            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                        ) && event.paths.iter().any(|p| is_frame_path(p, &patterns))
                    });
                    if relevant {
                        let catalog = source.load_catalog(&patterns);
                        tracing::info!(
                            watching = catalog.watching.len(),
                            hiding = catalog.hiding.len(),
                            peeking = catalog.peeking.len(),
                            "Frame assets changed, reloading catalog"
                        );
                        on_reload(catalog);
                    }
                }
                Err(errors) => {
                    for error in errors {
                        tracing::warn!("Asset watcher error: {error}");
                    }
                }
            }
        })?;

        debouncer.watch(&root, RecursiveMode::Recursive)?;
        tracing::info!("Watching asset directory for changes: {:?}", root);

        Ok(Self {
            _debouncer: debouncer,
        })
    }
}
