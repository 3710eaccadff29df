// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer state machine.
//!
//! [`SequencerState`] is a reducer: it takes inputs from the login form
//! (focus, password visibility, email progress, catalog) and timer fires,
//! updates the visible frame and the animating flag, and returns the
//! [`Effect`]s a runner must carry out (cancel or schedule timers, notify
//! observers). It never touches a clock itself.
//!
//! Transition rules, evaluated after any in-flight timeline is cancelled:
//!
//! | focus    | previous | behaviour                                          |
//! |----------|----------|----------------------------------------------------|
//! | email    | password | `hiding` reversed, then jump to the watching frame |
//! | email    | email    | jump to the watching frame immediately             |
//! | password | email    | `hiding` forward, then `peeking` if shown          |
//! | password | password | `peeking` forward or reversed on a visibility flip |

use crate::catalog::FrameCatalog;
use crate::config::SequencerConfig;
use crate::frame::{FrameRef, SequenceKind};
use crate::timeline::{Continuation, Direction, Timeline};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which login field holds focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Focus {
    /// Email field
    #[default]
    Email,
    /// Password field
    Password,
}

impl Focus {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

/// External inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Focus moved to a field
    Focus(Focus),
    /// Password shown in clear text (`true`) or masked
    Visibility(bool),
    /// Email progress, usually the number of characters typed
    Progress(u32),
    /// A freshly loaded catalog replaces the current one
    Catalog(FrameCatalog),
}

/// Work the runner must perform after a state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Drop every pending timer of this generation
    Cancel {
        /// Superseded timeline generation
        generation: u64,
    },
    /// Start timers at these offsets from now, one per step
    Schedule {
        /// Generation of the new timeline
        generation: u64,
        /// Offset of each step
        offsets: Vec<Duration>,
    },
    /// The visible frame was written
    FrameChanged(FrameRef),
    /// The animating flag flipped
    AnimatingChanged(bool),
}

/// Frame intervals and the progress cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Progress value mapped to the last watching frame
    pub progress_cap: u32,
    /// `hiding` forward
    pub hide: Duration,
    /// `hiding` reversed
    pub unhide: Duration,
    /// `peeking` in either direction
    pub peek: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self::from(&SequencerConfig::default())
    }
}

impl From<&SequencerConfig> for Timing {
    fn from(config: &SequencerConfig) -> Self {
        Self {
            progress_cap: config.progress_cap,
            hide: config.hide_interval(),
            unhide: config.unhide_interval(),
            peek: config.peek_interval(),
        }
    }
}

/// Map progress to an index into a watching sequence of length `len`.
///
/// `min(progress / cap, 1)` scaled onto `0..len`, floored. Returns `None`
/// for an empty sequence.
pub fn watching_index(progress: u32, cap: u32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let ratio = if cap == 0 {
        1.0
    } else {
        (f64::from(progress) / f64::from(cap)).min(1.0)
    };
    let last = len - 1;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let index = (ratio * last as f64).floor() as usize;
    Some(index.min(last))
}

/// Playback phase
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    /// No timeline in flight
    #[default]
    Idle,
    /// A timeline is dispatching frames
    Playing(Timeline),
}

/// Owned sequencer state
#[derive(Debug, Clone)]
pub struct SequencerState {
    timing: Timing,
    catalog: FrameCatalog,
    focus: Focus,
    visible: bool,
    progress: u32,
    current_frame: Option<FrameRef>,
    animating: bool,
    generation: u64,
    phase: Phase,
}

impl SequencerState {
    /// Create a state with an empty catalog
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            catalog: FrameCatalog::default(),
            focus: Focus::Email,
            visible: false,
            progress: 0,
            current_frame: None,
            animating: false,
            generation: 0,
            phase: Phase::Idle,
        }
    }

    /// Current focus
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Whether the password is shown
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Recorded progress
    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// Whether a timeline is dispatching frames
    pub fn animating(&self) -> bool {
        self.animating
    }

    /// Current timeline generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Playback phase
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether a timeline is in flight
    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing(_))
    }

    /// Loaded catalog
    pub fn catalog(&self) -> &FrameCatalog {
        &self.catalog
    }

    /// Timing in use
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Frame to render: the last written frame, else the first watching frame
    pub fn current_frame(&self) -> Option<&FrameRef> {
        self.current_frame
            .as_ref()
            .or_else(|| self.catalog.watching.first())
    }

    /// Apply an external input
    pub fn apply(&mut self, input: Input) -> Vec<Effect> {
        let prev_focus = self.focus;
        let prev_visible = self.visible;

        match input {
            Input::Focus(focus) => {
                if focus == self.focus {
                    return Vec::new();
                }
                self.focus = focus;
            }
            Input::Visibility(visible) => {
                if visible == self.visible {
                    return Vec::new();
                }
                self.visible = visible;
            }
            Input::Progress(progress) => {
                if progress == self.progress {
                    return Vec::new();
                }
                self.progress = progress;
                // The continuation of an in-flight timeline reads the new value.
                if self.focus != Focus::Email || self.is_playing() {
                    return Vec::new();
                }
            }
            Input::Catalog(catalog) => {
                self.catalog = catalog;
            }
        }

        let mut effects = Vec::new();
        self.cancel_active(&mut effects);
        self.react(prev_focus, prev_visible, &mut effects);
        effects
    }

    /// Apply a timer fire for step `step` of timeline `generation`
    pub fn fire(&mut self, generation: u64, step: usize) -> Vec<Effect> {
        let mut effects = Vec::new();

        let (frame, last) = match &self.phase {
            Phase::Playing(timeline) if timeline.generation() == generation => {
                let Some(s) = timeline.step(step) else {
                    return effects;
                };
                (s.frame.clone(), timeline.is_last(step))
            }
            _ => {
                tracing::trace!(generation, step, "Ignoring stale timer");
                return effects;
            }
        };

        self.set_frame(frame, &mut effects);

        if last {
            if let Phase::Playing(timeline) = std::mem::take(&mut self.phase) {
                tracing::debug!(
                    generation,
                    "Finished {} {:?}",
                    timeline.kind(),
                    timeline.direction()
                );
                self.set_animating(false, &mut effects);
                if let Some(continuation) = timeline.continuation() {
                    self.run_continuation(continuation, &mut effects);
                }
            }
        }

        effects
    }

    fn react(&mut self, prev_focus: Focus, prev_visible: bool, effects: &mut Vec<Effect>) {
        match (self.focus, prev_focus) {
            (Focus::Email, Focus::Password) => self.play(
                SequenceKind::Hiding,
                Direction::Reverse,
                self.timing.unhide,
                Some(Continuation::WatchProgress),
                effects,
            ),
            (Focus::Email, Focus::Email) => self.watch_progress(effects),
            (Focus::Password, Focus::Email) => self.play(
                SequenceKind::Hiding,
                Direction::Forward,
                self.timing.hide,
                Some(Continuation::PeekIfVisible),
                effects,
            ),
            (Focus::Password, Focus::Password) => match (self.visible, prev_visible) {
                (true, false) => self.play(
                    SequenceKind::Peeking,
                    Direction::Forward,
                    self.timing.peek,
                    None,
                    effects,
                ),
                (false, true) => self.play(
                    SequenceKind::Peeking,
                    Direction::Reverse,
                    self.timing.peek,
                    None,
                    effects,
                ),
                _ => self.settle_password(effects),
            },
        }
    }

    fn cancel_active(&mut self, effects: &mut Vec<Effect>) {
        if let Phase::Playing(timeline) = std::mem::take(&mut self.phase) {
            tracing::debug!(
                generation = timeline.generation(),
                "Cancelling {} {:?}",
                timeline.kind(),
                timeline.direction()
            );
            effects.push(Effect::Cancel {
                generation: timeline.generation(),
            });
        }
    }

    fn play(
        &mut self,
        kind: SequenceKind,
        direction: Direction,
        interval: Duration,
        continuation: Option<Continuation>,
        effects: &mut Vec<Effect>,
    ) {
        self.generation += 1;
        let timeline = Timeline::plan(
            self.generation,
            kind,
            self.catalog.sequence(kind),
            direction,
            interval,
            continuation,
        );

        if timeline.is_empty() {
            tracing::debug!("Skipping empty {} sequence", kind);
            self.set_animating(false, effects);
            if let Some(continuation) = continuation {
                self.run_continuation(continuation, effects);
            }
            return;
        }

        tracing::debug!(
            generation = self.generation,
            frames = timeline.len(),
            "Playing {} {:?} every {:?}",
            kind,
            direction,
            interval
        );
        self.set_animating(true, effects);
        effects.push(Effect::Schedule {
            generation: self.generation,
            offsets: timeline.offsets(),
        });
        self.phase = Phase::Playing(timeline);
    }

    fn run_continuation(&mut self, continuation: Continuation, effects: &mut Vec<Effect>) {
        match continuation {
            Continuation::WatchProgress => self.watch_progress(effects),
            Continuation::PeekIfVisible => {
                if self.visible {
                    self.play(
                        SequenceKind::Peeking,
                        Direction::Forward,
                        self.timing.peek,
                        None,
                        effects,
                    );
                }
            }
        }
    }

    fn watch_progress(&mut self, effects: &mut Vec<Effect>) {
        let watching = &self.catalog.watching;
        let frame = watching_index(self.progress, self.timing.progress_cap, watching.len())
            .and_then(|index| watching.get(index))
            .cloned();
        if let Some(frame) = frame {
            self.set_frame(frame, effects);
        }
        self.set_animating(false, effects);
    }

    /// Resting pose on the password field after a catalog swap
    fn settle_password(&mut self, effects: &mut Vec<Effect>) {
        let kind = if self.visible {
            SequenceKind::Peeking
        } else {
            SequenceKind::Hiding
        };
        if let Some(frame) = self.catalog.sequence(kind).last().cloned() {
            self.set_frame(frame, effects);
        }
        self.set_animating(false, effects);
    }

    fn set_frame(&mut self, frame: FrameRef, effects: &mut Vec<Effect>) {
        tracing::trace!(frame = %frame, "Frame");
        self.current_frame = Some(frame.clone());
        effects.push(Effect::FrameChanged(frame));
    }

    fn set_animating(&mut self, animating: bool, effects: &mut Vec<Effect>) {
        if self.animating != animating {
            self.animating = animating;
            effects.push(Effect::AnimatingChanged(animating));
        }
    }
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::new(Timing::default())
    }
}
