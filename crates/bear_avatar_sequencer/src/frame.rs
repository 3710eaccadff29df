// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame references and immutable frame sequences.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to a displayable image (an asset identifier or URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameRef(String);

impl FrameRef {
    /// Create a frame reference from an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sort key used by the catalog: the first run of decimal digits
    pub fn numeric_key(&self) -> u64 {
        numeric_key(&self.0)
    }
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FrameRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FrameRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Extract the first run of ASCII digits in `id` as an integer.
///
/// Identifiers without digits map to `0`. Runs too long for a `u64`
/// saturate at `u64::MAX`.
pub fn numeric_key(id: &str) -> u64 {
    let Some(start) = id.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };

    id[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .fold(0u64, |acc, c| {
            let digit = u64::from(c as u8 - b'0');
            acc.saturating_mul(10).saturating_add(digit)
        })
}

/// Which of the three catalog sequences a timeline plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceKind {
    /// Bear following the email cursor
    Watching,
    /// Bear covering its eyes
    Hiding,
    /// Bear peeking through its paws
    Peeking,
}

impl SequenceKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Watching => "watching",
            Self::Hiding => "hiding",
            Self::Peeking => "peeking",
        }
    }

    /// All kinds, in catalog order
    pub fn all() -> &'static [SequenceKind] {
        &[Self::Watching, Self::Hiding, Self::Peeking]
    }
}

impl fmt::Display for SequenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered, immutable list of frames
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameSequence {
    frames: Vec<FrameRef>,
}

impl FrameSequence {
    /// Create a sequence keeping the given order
    pub fn new(frames: Vec<FrameRef>) -> Self {
        Self { frames }
    }

    /// Create a sequence sorted by each frame's numeric key.
    ///
    /// The sort is stable, so frames with equal keys keep their input order.
    pub fn sorted(mut frames: Vec<FrameRef>) -> Self {
        frames.sort_by_key(FrameRef::numeric_key);
        Self { frames }
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the sequence has no frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`
    pub fn get(&self, index: usize) -> Option<&FrameRef> {
        self.frames.get(index)
    }

    /// First frame
    pub fn first(&self) -> Option<&FrameRef> {
        self.frames.first()
    }

    /// Last frame
    pub fn last(&self) -> Option<&FrameRef> {
        self.frames.last()
    }

    /// Iterate frames in order
    pub fn iter(&self) -> std::slice::Iter<'_, FrameRef> {
        self.frames.iter()
    }

    /// Borrow the frames as a slice
    pub fn as_slice(&self) -> &[FrameRef] {
        &self.frames
    }
}

impl<'a> IntoIterator for &'a FrameSequence {
    type Item = &'a FrameRef;
    type IntoIter = std::slice::Iter<'a, FrameRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl FromIterator<FrameRef> for FrameSequence {
    fn from_iter<I: IntoIterator<Item = FrameRef>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
