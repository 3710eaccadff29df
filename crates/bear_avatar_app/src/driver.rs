// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host event loops.
//!
//! Both loops are single-threaded over the sequencer. `replay` walks a
//! script on the virtual clock (optionally sleeping to wall-clock pace);
//! `interactive` blocks on a command channel with a timeout equal to the
//! next timer deadline, so frames land on time between keystrokes.

use crate::login::LoginForm;
use crate::script::{Action, Script};
use bear_avatar_sequencer::{
    Avatar, Focus, FrameCatalog, Input, Sequencer, DEFAULT_AVATAR_SIZE,
};
use std::io::BufRead;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// Messages delivered to the interactive loop
#[derive(Debug, Clone)]
pub enum Command {
    /// A form action
    Action(Action),
    /// A freshly scanned catalog
    Reload(FrameCatalog),
    /// Stop the loop
    Quit,
}

/// Parse one line of console input
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

    let command = match word {
        "email" => Command::Action(Action::Focus(Focus::Email)),
        "password" => Command::Action(Action::Focus(Focus::Password)),
        "show" => Command::Action(Action::ShowPassword(true)),
        "hide" => Command::Action(Action::ShowPassword(false)),
        "toggle" => Command::Action(Action::TogglePassword),
        "type" => Command::Action(Action::TypeEmail(rest.to_owned())),
        "quit" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Turn an action into a sequencer input, updating the form
pub fn apply_action(form: &mut LoginForm, action: Action) -> Input {
    match action {
        Action::Focus(focus) => form.set_focus(focus),
        Action::ShowPassword(show) => form.set_show_password(show),
        Action::TogglePassword => form.toggle_show_password(),
        Action::TypeEmail(email) => form.set_email(email),
        Action::Progress(progress) => Input::Progress(progress),
    }
}

/// Log every frame write
pub fn log_frames(sequencer: &mut Sequencer) {
    sequencer.on_frame(|write| {
        tracing::info!(at_ms = write.at.as_millis() as u64, "frame {}", write.frame);
    });
}

fn log_avatar(sequencer: &mut Sequencer, form: &LoginForm) {
    let view = Avatar::new(sequencer).view();
    tracing::info!(
        focus = form.focus().name(),
        email = form.email(),
        show_password = form.show_password(),
        animating = view.animating,
        "Avatar state"
    );
    match view.image(DEFAULT_AVATAR_SIZE) {
        Some(image) => tracing::info!("{}", image.to_html()),
        None => tracing::info!("No avatar frame available"),
    }
}

fn sleep_until(start: Instant, at: Duration) {
    let elapsed = start.elapsed();
    if at > elapsed {
        std::thread::sleep(at - elapsed);
    }
}

/// Advance to `target`, pacing each timer against the wall clock.
///
/// `base` is the virtual time that corresponds to `start`.
fn advance_paced(sequencer: &mut Sequencer, start: Instant, base: Duration, target: Duration) {
    while let Some(deadline) = sequencer.next_deadline().filter(|d| *d <= target) {
        sleep_until(start, deadline - base);
        sequencer.advance_to(deadline);
    }
    sleep_until(start, target - base);
    sequencer.advance_to(target);
}

/// Play a script against the sequencer, then let trailing timelines finish
pub fn replay(sequencer: &mut Sequencer, form: &mut LoginForm, script: &Script, realtime: bool) {
    let start = Instant::now();
    let base = sequencer.now();

    for event in &script.events {
        let target = base + event.at();
        if realtime {
            advance_paced(sequencer, start, base, target);
        } else {
            sequencer.advance_to(target);
        }
        tracing::debug!(at_ms = event.at_ms, "{:?}", event.action);
        let input = apply_action(form, event.action.clone());
        sequencer.handle(input);
    }

    if realtime {
        while let Some(deadline) = sequencer.next_deadline() {
            sleep_until(start, deadline - base);
            sequencer.advance_to(deadline);
        }
    } else {
        sequencer.drain();
    }

    log_avatar(sequencer, form);
}

/// Forward stdin lines as commands; sends `Quit` on EOF or `quit`
pub fn spawn_stdin_reader(commands: Sender<Command>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("Failed to read input: {e}");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(Command::Quit) => break,
                Some(command) => {
                    if commands.send(command).is_err() {
                        return;
                    }
                }
                None => tracing::warn!(
                    "Unknown command {:?} (email, password, show, hide, toggle, type <text>, quit)",
                    line.trim()
                ),
            }
        }
        let _ = commands.send(Command::Quit);
    })
}

/// Run until `Quit` or every sender is gone
pub fn interactive(sequencer: &mut Sequencer, form: &mut LoginForm, commands: &Receiver<Command>) {
    let start = Instant::now();
    let base = sequencer.now();
    let clock = || base + start.elapsed();

    loop {
        let received = match sequencer.next_deadline() {
            Some(deadline) => commands.recv_timeout(deadline.saturating_sub(clock())),
            None => commands.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        sequencer.advance_to(clock());

        match received {
            Ok(Command::Action(action)) => {
                let input = apply_action(form, action);
                sequencer.handle(input);
            }
            Ok(Command::Reload(catalog)) => sequencer.load_catalog(catalog),
            Ok(Command::Quit) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    sequencer.shutdown();
    log_avatar(sequencer, form);
}
