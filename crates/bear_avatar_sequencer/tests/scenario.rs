// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integration tests driving the sequencer on its virtual clock.

use bear_avatar_sequencer::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn seq(prefix: &str, n: usize) -> FrameSequence {
    (0..n).map(|i| FrameRef::new(format!("{prefix}{i}"))).collect()
}

fn catalog() -> FrameCatalog {
    FrameCatalog::new(seq("w", 10), seq("h", 5), seq("p", 3))
}

/// Sequencer loaded with `catalog`, plus a recorder of every later frame write
fn recording(catalog: FrameCatalog) -> (Sequencer, Rc<RefCell<Vec<FrameWrite>>>) {
    let writes = Rc::new(RefCell::new(Vec::new()));
    let mut sequencer = Sequencer::default();
    let sink = Rc::clone(&writes);
    sequencer.on_frame(move |write| sink.borrow_mut().push(write.clone()));
    sequencer.load_catalog(catalog);
    writes.borrow_mut().clear();
    (sequencer, writes)
}

fn take(writes: &Rc<RefCell<Vec<FrameWrite>>>) -> Vec<(u64, String)> {
    writes
        .borrow_mut()
        .drain(..)
        .map(|w| (w.at.as_millis() as u64, w.frame.as_str().to_owned()))
        .collect()
}

fn expect(pairs: &[(u64, &str)]) -> Vec<(u64, String)> {
    pairs.iter().map(|(t, f)| (*t, (*f).to_owned())).collect()
}

fn frame(sequencer: &Sequencer) -> Option<&str> {
    sequencer.current_frame().map(FrameRef::as_str)
}

#[test]
fn end_to_end_login_session() {
    let (mut sequencer, writes) = recording(catalog());
    assert_eq!(sequencer.focus(), Focus::Email);

    sequencer.set_progress(15);
    assert_eq!(frame(&sequencer), Some("w4"));
    assert!(!sequencer.animating());
    assert_eq!(take(&writes), expect(&[(0, "w4")]));

    sequencer.set_focus(Focus::Password);
    assert!(sequencer.animating());
    sequencer.advance_to(ms(200));
    assert_eq!(
        take(&writes),
        expect(&[(0, "h0"), (40, "h1"), (80, "h2"), (120, "h3"), (160, "h4")])
    );
    assert!(!sequencer.animating());

    sequencer.set_visibility(true);
    assert!(sequencer.animating());
    sequencer.advance_to(ms(400));
    assert_eq!(take(&writes), expect(&[(200, "p0"), (250, "p1"), (300, "p2")]));
    assert!(!sequencer.animating());

    sequencer.set_focus(Focus::Email);
    sequencer.advance_to(ms(1000));
    assert_eq!(
        take(&writes),
        expect(&[
            (400, "h4"),
            (460, "h3"),
            (520, "h2"),
            (580, "h1"),
            (640, "h0"),
            (640, "w4"),
        ])
    );
    assert_eq!(frame(&sequencer), Some("w4"));
    assert!(!sequencer.animating());
    assert_eq!(sequencer.pending_timers(), 0);
}

#[test]
fn superseded_timeline_never_writes() {
    let (mut sequencer, writes) = recording(catalog());

    sequencer.set_focus(Focus::Password);
    sequencer.advance_to(ms(50));
    assert_eq!(take(&writes), expect(&[(0, "h0"), (40, "h1")]));

    // Interrupt before h2 (due at 80ms)
    sequencer.set_focus(Focus::Email);
    sequencer.drain();

    let after = take(&writes);
    assert_eq!(
        after,
        expect(&[
            (50, "h4"),
            (110, "h3"),
            (170, "h2"),
            (230, "h1"),
            (290, "h0"),
            (290, "w0"),
        ])
    );
}

#[test]
fn returning_to_email_lands_on_progress_frame() {
    let (mut sequencer, _writes) = recording(catalog());
    sequencer.set_progress(30);
    sequencer.set_focus(Focus::Password);
    sequencer.drain();

    sequencer.set_focus(Focus::Email);
    sequencer.drain();

    assert_eq!(frame(&sequencer), Some("w9"));
    assert!(!sequencer.animating());
}

#[test]
fn progress_during_unhide_is_used_at_completion() {
    let (mut sequencer, writes) = recording(catalog());
    sequencer.set_focus(Focus::Password);
    sequencer.drain();
    sequencer.set_focus(Focus::Email);
    sequencer.advance_by(ms(100));

    // No restart, no immediate jump
    sequencer.set_progress(30);
    assert!(sequencer.animating());
    take(&writes);

    sequencer.drain();
    let rest = take(&writes);
    assert_eq!(rest.last().map(|(_, f)| f.as_str()), Some("w9"));
    assert!(rest.iter().all(|(_, f)| f.starts_with('h') || f == "w9"));
}

#[test]
fn shown_password_chains_into_peeking() {
    let (mut sequencer, writes) = recording(catalog());
    sequencer.set_visibility(true);
    take(&writes);

    sequencer.set_focus(Focus::Password);
    sequencer.drain();
    assert_eq!(
        take(&writes),
        expect(&[
            (0, "h0"),
            (40, "h1"),
            (80, "h2"),
            (120, "h3"),
            (160, "h4"),
            (160, "p0"),
            (210, "p1"),
            (260, "p2"),
        ])
    );
    assert!(!sequencer.animating());
}

#[test]
fn hiding_password_plays_peeking_backwards() {
    let (mut sequencer, writes) = recording(catalog());
    sequencer.set_focus(Focus::Password);
    sequencer.set_visibility(true);
    sequencer.drain();
    take(&writes);

    sequencer.set_visibility(false);
    let start = sequencer.now().as_millis() as u64;
    sequencer.drain();
    assert_eq!(
        take(&writes),
        expect(&[(start, "p2"), (start + 50, "p1"), (start + 100, "p0")])
    );
}

#[test]
fn visibility_toggle_interrupts_password_entry() {
    let (mut sequencer, writes) = recording(catalog());
    sequencer.set_focus(Focus::Password);
    sequencer.advance_to(ms(45));
    take(&writes);

    sequencer.set_visibility(true);
    sequencer.drain();
    assert_eq!(take(&writes), expect(&[(45, "p0"), (95, "p1"), (145, "p2")]));
}

#[test]
fn empty_peeking_is_safe() {
    let (mut sequencer, writes) =
        recording(FrameCatalog::new(seq("w", 4), seq("h", 2), FrameSequence::default()));
    sequencer.set_focus(Focus::Password);
    sequencer.drain();
    take(&writes);

    sequencer.set_visibility(true);
    assert!(!sequencer.animating());
    assert_eq!(sequencer.pending_timers(), 0);
    sequencer.set_visibility(false);
    assert!(!sequencer.animating());
    assert!(take(&writes).is_empty());
}

#[test]
fn empty_hiding_jumps_straight_to_watching() {
    let (mut sequencer, writes) =
        recording(FrameCatalog::new(seq("w", 10), FrameSequence::default(), seq("p", 3)));
    sequencer.set_progress(15);
    sequencer.set_focus(Focus::Password);
    assert!(!sequencer.animating());

    take(&writes);
    sequencer.set_focus(Focus::Email);
    assert_eq!(take(&writes), expect(&[(0, "w4")]));
    assert!(!sequencer.animating());
}

#[test]
fn empty_catalog_has_no_frame() {
    let mut sequencer = Sequencer::default();
    assert_eq!(frame(&sequencer), None);
    sequencer.set_focus(Focus::Password);
    sequencer.set_visibility(true);
    sequencer.set_focus(Focus::Email);
    sequencer.set_progress(10);
    assert_eq!(frame(&sequencer), None);
    assert!(!sequencer.animating());
}

#[test]
fn late_catalog_updates_email_frame() {
    let mut sequencer = Sequencer::default();
    sequencer.set_progress(15);
    assert_eq!(frame(&sequencer), None);

    sequencer.load_catalog(catalog());
    assert_eq!(frame(&sequencer), Some("w4"));
}

#[test]
fn shutdown_stops_all_writes() {
    let (mut sequencer, writes) = recording(catalog());
    sequencer.set_focus(Focus::Password);
    sequencer.advance_to(ms(10));
    take(&writes);

    sequencer.shutdown();
    assert_eq!(sequencer.advance_to(ms(1000)), 0);
    assert!(take(&writes).is_empty());
}

#[test]
fn custom_timing_from_config() {
    let config = SequencerConfig::from_ron_str("(hide_interval_ms: 10, progress_cap: 10)").unwrap();
    let mut sequencer = Sequencer::new(&config);
    sequencer.load_catalog(catalog());

    sequencer.set_progress(5);
    assert_eq!(frame(&sequencer), Some("w4"));

    sequencer.set_focus(Focus::Password);
    sequencer.drain();
    assert_eq!(sequencer.now(), ms(40));
}
