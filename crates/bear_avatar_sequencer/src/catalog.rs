// SPDX-License-Identifier: MIT OR Apache-2.0
//! Asset catalog loading.
//!
//! The catalog is three disjoint frame sequences (`watching`, `hiding`,
//! `peeking`) discovered from an [`AssetSource`] by file-name pattern and
//! sorted by the number embedded in each identifier. Loading never fails:
//! a pattern with no matches yields an empty sequence.

use crate::frame::{FrameRef, FrameSequence, SequenceKind};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// File-name glob with at most one `*` wildcard (`prefix*suffix`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FramePattern {
    glob: String,
}

impl FramePattern {
    /// Create a pattern from a glob such as `watch_bear_*.png`
    pub fn new(glob: impl Into<String>) -> Self {
        Self { glob: glob.into() }
    }

    /// The glob text
    pub fn as_str(&self) -> &str {
        &self.glob
    }

    /// Check whether the file name of `identifier` matches.
    ///
    /// Only the last `/`-separated component is considered, so
    /// `img/watch_bear_3.png` matches `watch_bear_*.png`.
    pub fn matches(&self, identifier: &str) -> bool {
        let file_name = identifier.rsplit('/').next().unwrap_or(identifier);

        match self.glob.split_once('*') {
            Some((prefix, suffix)) => {
                file_name.len() >= prefix.len() + suffix.len()
                    && file_name.starts_with(prefix)
                    && file_name.ends_with(suffix)
            }
            None => file_name == self.glob,
        }
    }
}

impl From<&str> for FramePattern {
    fn from(glob: &str) -> Self {
        Self::new(glob)
    }
}

/// The three name patterns, one per sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogPatterns {
    /// Pattern for the watching sequence
    pub watching: FramePattern,
    /// Pattern for the hiding sequence
    pub hiding: FramePattern,
    /// Pattern for the peeking sequence
    pub peeking: FramePattern,
}

impl Default for CatalogPatterns {
    fn default() -> Self {
        Self {
            watching: FramePattern::new("watch_bear_*.png"),
            hiding: FramePattern::new("hide_bear_*.png"),
            peeking: FramePattern::new("peak_bear_*.png"),
        }
    }
}

impl CatalogPatterns {
    /// Pattern for a given sequence
    pub fn pattern(&self, kind: SequenceKind) -> &FramePattern {
        match kind {
            SequenceKind::Watching => &self.watching,
            SequenceKind::Hiding => &self.hiding,
            SequenceKind::Peeking => &self.peeking,
        }
    }
}

/// A static source of image identifiers
pub trait AssetSource {
    /// All identifiers, in discovery order
    fn identifiers(&self) -> Vec<String>;
}

/// In-memory asset source that keeps insertion order and drops duplicates
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetSource {
    identifiers: IndexSet<String>,
}

impl MemoryAssetSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier; returns false if it was already present
    pub fn insert(&mut self, identifier: impl Into<String>) -> bool {
        self.identifiers.insert(identifier.into())
    }

    /// Number of identifiers
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Whether the source is empty
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for MemoryAssetSource {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            identifiers: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl AssetSource for MemoryAssetSource {
    fn identifiers(&self) -> Vec<String> {
        self.identifiers.iter().cloned().collect()
    }
}

/// The loaded frame sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCatalog {
    /// Frames played while the email field is focused
    pub watching: FrameSequence,
    /// Frames played when moving to or from the password field
    pub hiding: FrameSequence,
    /// Frames played when the password visibility toggles
    pub peeking: FrameSequence,
}

impl FrameCatalog {
    /// Build a catalog from pre-ordered sequences
    pub fn new(watching: FrameSequence, hiding: FrameSequence, peeking: FrameSequence) -> Self {
        Self {
            watching,
            hiding,
            peeking,
        }
    }

    /// Discover and sort the three sequences from `source`
    pub fn load(source: &dyn AssetSource, patterns: &CatalogPatterns) -> Self {
        let identifiers = source.identifiers();

        let collect = |kind: SequenceKind| {
            let pattern = patterns.pattern(kind);
            let frames: Vec<FrameRef> = identifiers
                .iter()
                .filter(|id| pattern.matches(id))
                .map(|id| FrameRef::new(id.as_str()))
                .collect();
            FrameSequence::sorted(frames)
        };

        let catalog = Self {
            watching: collect(SequenceKind::Watching),
            hiding: collect(SequenceKind::Hiding),
            peeking: collect(SequenceKind::Peeking),
        };

        tracing::debug!(
            watching = catalog.watching.len(),
            hiding = catalog.hiding.len(),
            peeking = catalog.peeking.len(),
            "Loaded frame catalog from {} assets",
            identifiers.len()
        );

        catalog
    }

    /// Get a sequence by kind
    pub fn sequence(&self, kind: SequenceKind) -> &FrameSequence {
        match kind {
            SequenceKind::Watching => &self.watching,
            SequenceKind::Hiding => &self.hiding,
            SequenceKind::Peeking => &self.peeking,
        }
    }

    /// Whether all three sequences are empty
    pub fn is_empty(&self) -> bool {
        self.watching.is_empty() && self.hiding.is_empty() && self.peeking.is_empty()
    }
}
