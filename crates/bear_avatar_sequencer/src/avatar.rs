// SPDX-License-Identifier: MIT OR Apache-2.0
//! Render adapter for the avatar.

use crate::frame::FrameRef;
use crate::sequencer::Sequencer;
use crate::state::Focus;

/// Default rendered size in pixels
pub const DEFAULT_AVATAR_SIZE: u32 = 130;

/// Alt text for the avatar image
pub const AVATAR_ALT_TEXT: &str = "Animated bear avatar";

/// Snapshot of what the presentational layer needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarView {
    /// Focus echoed back to the form
    pub focus: Focus,
    /// Frame to render, if any
    pub frame: Option<FrameRef>,
    /// Whether an animation is in flight
    pub animating: bool,
}

impl AvatarView {
    /// Image to render at `size`; `None` when there is no frame yet
    pub fn image(&self, size: u32) -> Option<AvatarImage> {
        self.frame.as_ref().map(|frame| AvatarImage {
            src: frame.as_str().to_owned(),
            size,
        })
    }
}

/// Presentational image model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarImage {
    /// Image source
    pub src: String,
    /// Width and height in pixels
    pub size: u32,
}

impl AvatarImage {
    /// Render as an HTML `<img>` element
    pub fn to_html(&self) -> String {
        format!(
            "<img src=\"{}\" width=\"{}\" height=\"{}\" alt=\"{}\" tabindex=\"-1\" style=\"object-fit: contain\">",
            escape_attr(&self.src),
            self.size,
            self.size,
            AVATAR_ALT_TEXT
        )
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Read projection over a [`Sequencer`] plus the focus setter
pub struct Avatar<'a> {
    sequencer: &'a mut Sequencer,
}

impl<'a> Avatar<'a> {
    /// Borrow a sequencer
    pub fn new(sequencer: &'a mut Sequencer) -> Self {
        Self { sequencer }
    }

    /// Focus currently recorded
    pub fn current_focus(&self) -> Focus {
        self.sequencer.focus()
    }

    /// Forward a focus change to the sequencer
    pub fn set_focus(&mut self, focus: Focus) {
        self.sequencer.set_focus(focus);
    }

    /// Frame to render
    pub fn current_frame(&self) -> Option<&FrameRef> {
        self.sequencer.current_frame()
    }

    /// Whether an animation is in flight
    pub fn animating(&self) -> bool {
        self.sequencer.animating()
    }

    /// Owned snapshot of the projection
    pub fn view(&self) -> AvatarView {
        AvatarView {
            focus: self.current_focus(),
            frame: self.current_frame().cloned(),
            animating: self.animating(),
        }
    }
}
