// SPDX-License-Identifier: MIT OR Apache-2.0
//! Effect runner.
//!
//! [`Sequencer`] drives a [`SequencerState`] on a virtual clock: it feeds
//! inputs to the reducer, turns `Schedule`/`Cancel` effects into timer
//! queue operations, and fires due timers as the host advances time.
//! Hosts with a real event loop sleep until [`Sequencer::next_deadline`]
//! and then call [`Sequencer::advance_to`] with the elapsed time.

use crate::catalog::FrameCatalog;
use crate::config::SequencerConfig;
use crate::frame::FrameRef;
use crate::state::{Effect, Focus, Input, SequencerState, Timing};
use crate::timer::TimerQueue;
use std::time::Duration;

/// A frame write observed by the runner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameWrite {
    /// Virtual time of the write
    pub at: Duration,
    /// Frame written
    pub frame: FrameRef,
}

/// Callback notified of every frame write
pub type FrameObserver = Box<dyn FnMut(&FrameWrite)>;

/// Timer-driven sequencer
pub struct Sequencer {
    state: SequencerState,
    timers: TimerQueue,
    now: Duration,
    observer: Option<FrameObserver>,
}

impl Sequencer {
    /// Create a sequencer with an empty catalog
    pub fn new(config: &SequencerConfig) -> Self {
        Self::with_timing(Timing::from(config))
    }

    /// Create a sequencer with explicit timing
    pub fn with_timing(timing: Timing) -> Self {
        Self {
            state: SequencerState::new(timing),
            timers: TimerQueue::new(),
            now: Duration::ZERO,
            observer: None,
        }
    }

    /// Register the frame observer, replacing any previous one
    pub fn on_frame(&mut self, observer: impl FnMut(&FrameWrite) + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Install a catalog
    pub fn load_catalog(&mut self, catalog: FrameCatalog) {
        self.handle(Input::Catalog(catalog));
    }

    /// Move focus
    pub fn set_focus(&mut self, focus: Focus) {
        self.handle(Input::Focus(focus));
    }

    /// Show or mask the password
    pub fn set_visibility(&mut self, visible: bool) {
        self.handle(Input::Visibility(visible));
    }

    /// Update email progress
    pub fn set_progress(&mut self, progress: u32) {
        self.handle(Input::Progress(progress));
    }

    /// Feed an input to the state machine at the current time
    pub fn handle(&mut self, input: Input) {
        let effects = self.state.apply(input);
        self.run(effects);
    }

    /// Advance the clock to `target`, firing every timer due on the way.
    ///
    /// Timers fire in due order and each sees the clock at its own due
    /// time, so chained timelines start where the previous one ended.
    /// Returns the number of timers fired.
    pub fn advance_to(&mut self, target: Duration) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.timers.pop_due(target) {
            self.now = self.now.max(timer.due);
            let effects = self.state.fire(timer.generation, timer.step);
            self.run(effects);
            fired += 1;
        }
        self.now = self.now.max(target);
        fired
    }

    /// Advance the clock by `delta`
    pub fn advance_by(&mut self, delta: Duration) -> usize {
        self.advance_to(self.now + delta)
    }

    /// Fire timers until none remain; returns the number fired
    pub fn drain(&mut self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.timers.next_deadline() {
            fired += self.advance_to(deadline);
        }
        fired
    }

    /// Cancel every pending timer
    pub fn shutdown(&mut self) {
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            tracing::debug!(cancelled, "Cancelled pending frame timers");
        }
    }

    /// Due time of the next timer
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending timers
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Frame to render
    pub fn current_frame(&self) -> Option<&FrameRef> {
        self.state.current_frame()
    }

    /// Whether a timeline is dispatching frames
    pub fn animating(&self) -> bool {
        self.state.animating()
    }

    /// Current focus
    pub fn focus(&self) -> Focus {
        self.state.focus()
    }

    /// Underlying state
    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Cancel { generation } => {
                    let cancelled = self.timers.cancel_generation(generation);
                    tracing::trace!(generation, cancelled, "Cancelled timeline timers");
                }
                Effect::Schedule {
                    generation,
                    offsets,
                } => {
                    for (step, offset) in offsets.into_iter().enumerate() {
                        self.timers.schedule(self.now + offset, generation, step);
                    }
                }
                Effect::FrameChanged(frame) => {
                    if let Some(observer) = self.observer.as_mut() {
                        observer(&FrameWrite {
                            at: self.now,
                            frame,
                        });
                    }
                }
                Effect::AnimatingChanged(animating) => {
                    tracing::trace!(animating, "Animating flag changed");
                }
            }
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(&SequencerConfig::default())
    }
}

impl Drop for Sequencer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Sequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequencer")
            .field("state", &self.state)
            .field("timers", &self.timers)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameSequence;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn catalog() -> FrameCatalog {
        let seq = |prefix: &str, n: usize| -> FrameSequence {
            (0..n).map(|i| FrameRef::new(format!("{prefix}{i}"))).collect()
        };
        FrameCatalog::new(seq("w", 10), seq("h", 5), seq("p", 3))
    }

    #[test]
    fn test_zero_offset_frame_waits_for_the_clock() {
        let mut sequencer = Sequencer::default();
        sequencer.load_catalog(catalog());
        sequencer.set_focus(Focus::Password);

        assert!(sequencer.animating());
        assert_eq!(sequencer.current_frame().map(FrameRef::as_str), Some("w0"));
        assert_eq!(sequencer.advance_by(Duration::ZERO), 1);
        assert_eq!(sequencer.current_frame().map(FrameRef::as_str), Some("h0"));
    }

    #[test]
    fn test_cancel_removes_timers() {
        let mut sequencer = Sequencer::default();
        sequencer.load_catalog(catalog());
        sequencer.set_focus(Focus::Password);
        assert_eq!(sequencer.pending_timers(), 5);

        sequencer.advance_to(ms(50));
        assert_eq!(sequencer.pending_timers(), 3);

        sequencer.set_focus(Focus::Email);
        assert_eq!(sequencer.pending_timers(), 5);
        assert_eq!(sequencer.next_deadline(), Some(ms(50)));
    }

    #[test]
    fn test_shutdown_clears_queue() {
        let mut sequencer = Sequencer::default();
        sequencer.load_catalog(catalog());
        sequencer.set_focus(Focus::Password);
        sequencer.shutdown();
        assert_eq!(sequencer.pending_timers(), 0);
        assert_eq!(sequencer.drain(), 0);
    }
}
