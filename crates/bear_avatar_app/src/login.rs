// SPDX-License-Identifier: MIT OR Apache-2.0
//! Login form model.
//!
//! Holds the field values the avatar reacts to. Each mutation returns the
//! sequencer input it implies, so the caller forwards exactly one event
//! per user action.

use bear_avatar_sequencer::{Focus, Input};

/// Email/password form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    email: String,
    show_password: bool,
    focus: Focus,
}

impl LoginForm {
    /// Create an empty form with the email field focused
    pub fn new() -> Self {
        Self::default()
    }

    /// Email text
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Whether the password is shown in clear text
    pub fn show_password(&self) -> bool {
        self.show_password
    }

    /// Focused field
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Move focus
    pub fn set_focus(&mut self, focus: Focus) -> Input {
        self.focus = focus;
        Input::Focus(focus)
    }

    /// Replace the email text
    pub fn set_email(&mut self, email: impl Into<String>) -> Input {
        self.email = email.into();
        Input::Progress(self.email_progress())
    }

    /// Show or mask the password
    pub fn set_show_password(&mut self, show: bool) -> Input {
        self.show_password = show;
        Input::Visibility(show)
    }

    /// Flip password visibility
    pub fn toggle_show_password(&mut self) -> Input {
        self.set_show_password(!self.show_password)
    }

    /// Number of characters typed in the email field
    pub fn email_progress(&self) -> u32 {
        u32::try_from(self.email.chars().count()).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_progress_counts_characters() {
        let mut form = LoginForm::new();
        assert_eq!(form.set_email("ours@é.com"), Input::Progress(10));
        assert_eq!(form.email(), "ours@é.com");
    }

    #[test]
    fn test_toggle_show_password() {
        let mut form = LoginForm::new();
        assert_eq!(form.toggle_show_password(), Input::Visibility(true));
        assert_eq!(form.toggle_show_password(), Input::Visibility(false));
        assert!(!form.show_password());
    }

    #[test]
    fn test_focus() {
        let mut form = LoginForm::new();
        assert_eq!(form.focus(), Focus::Email);
        assert_eq!(form.set_focus(Focus::Password), Input::Focus(Focus::Password));
        assert_eq!(form.focus(), Focus::Password);
    }
}
