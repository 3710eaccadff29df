// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback timelines.
//!
//! A [`Timeline`] is the plan for one animation: which frames are applied
//! at which offset from the timeline start, and what runs once the last
//! frame lands. Timelines are tagged with the generation that created them
//! so a superseded plan can be recognised and dropped.

use crate::frame::{FrameRef, FrameSequence, SequenceKind};
use std::time::Duration;

/// Playback direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// First frame to last
    #[default]
    Forward,
    /// Last frame to first
    Reverse,
}

/// Work chained onto the end of a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Jump to the watching frame for the current progress
    WatchProgress,
    /// Play `peeking` forward if the password is shown at completion
    PeekIfVisible,
}

/// One scheduled frame write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Delay from the timeline start
    pub offset: Duration,
    /// Frame to apply
    pub frame: FrameRef,
}

/// Scheduled, cancelable plan of frame writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    generation: u64,
    kind: SequenceKind,
    direction: Direction,
    interval: Duration,
    steps: Vec<Step>,
    continuation: Option<Continuation>,
}

impl Timeline {
    /// Plan `sequence` in `direction`, one frame every `interval`
    pub fn plan(
        generation: u64,
        kind: SequenceKind,
        sequence: &FrameSequence,
        direction: Direction,
        interval: Duration,
        continuation: Option<Continuation>,
    ) -> Self {
        let mut ordered: Vec<FrameRef> = sequence.iter().cloned().collect();
        if direction == Direction::Reverse {
            ordered.reverse();
        }

        let steps = ordered
            .into_iter()
            .zip(0u32..)
            .map(|(frame, i)| Step {
                offset: interval * i,
                frame,
            })
            .collect();

        Self {
            generation,
            kind,
            direction,
            interval,
            steps,
            continuation,
        }
    }

    /// Generation that created this timeline
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Sequence being played
    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    /// Playback direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Per-frame interval
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Planned steps, in application order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step at `index`
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Whether `index` is the final step
    pub fn is_last(&self, index: usize) -> bool {
        index + 1 == self.steps.len()
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there is nothing to play
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Offsets of every step, for the timer queue
    pub fn offsets(&self) -> Vec<Duration> {
        self.steps.iter().map(|s| s.offset).collect()
    }

    /// Offset of the final frame
    pub fn duration(&self) -> Duration {
        self.steps.last().map(|s| s.offset).unwrap_or_default()
    }

    /// Chained work
    pub fn continuation(&self) -> Option<Continuation> {
        self.continuation
    }
}
