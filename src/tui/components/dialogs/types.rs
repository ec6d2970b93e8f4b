//! Core dialog types
//!
//! A [`DialogRequest`] carries everything a screen hands to the alert: the text,
//! the interaction mode and the resume actions for each possible answer. The
//! resume actions are mandatory; a caller that wants nothing to happen passes an
//! explicit no-op value of its own action type.

use crate::i18n::{Language, Text};
use ratatui::layout::Rect;
use std::fmt;

/// Interaction mode of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogMode {
    /// One button; the user only acknowledges
    #[default]
    Acknowledge,
    /// Two buttons; the user affirms or declines
    Confirm,
}

/// Buttons an alert can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    Ok,
    Yes,
    No,
}

/// Raw user input on a visible alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogInput {
    Press(DialogButton),
    /// Escape / platform back gesture
    Back,
}

/// The answer the user gave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Acknowledged,
    Affirmed,
    Declined,
}

impl DialogMode {
    /// Buttons rendered for this mode, left to right
    pub fn buttons(self) -> &'static [DialogButton] {
        match self {
            DialogMode::Acknowledge => &[DialogButton::Ok],
            DialogMode::Confirm => &[DialogButton::No, DialogButton::Yes],
        }
    }

    /// Map an input to the answer it stands for in this mode.
    ///
    /// Back is the single button in acknowledge mode and "No" in confirm mode, so
    /// an accidental back gesture never affirms anything.
    pub fn choice_for(self, input: DialogInput) -> DialogChoice {
        match (self, input) {
            (DialogMode::Acknowledge, _) => DialogChoice::Acknowledged,
            (DialogMode::Confirm, DialogInput::Press(DialogButton::Yes)) => DialogChoice::Affirmed,
            (DialogMode::Confirm, _) => DialogChoice::Declined,
        }
    }
}

/// Mode plus the caller's resume actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind<A> {
    Acknowledge { on_acknowledge: A },
    Confirm { on_affirm: A, on_decline: A },
}

impl<A> DialogKind<A> {
    pub fn mode(&self) -> DialogMode {
        match self {
            DialogKind::Acknowledge { .. } => DialogMode::Acknowledge,
            DialogKind::Confirm { .. } => DialogMode::Confirm,
        }
    }

    /// Consume the kind and hand out the action matching `choice`
    pub fn into_action(self, choice: DialogChoice) -> A {
        match self {
            DialogKind::Acknowledge { on_acknowledge } => on_acknowledge,
            DialogKind::Confirm { on_affirm, on_decline } => match choice {
                DialogChoice::Affirmed => on_affirm,
                DialogChoice::Declined | DialogChoice::Acknowledged => on_decline,
            },
        }
    }
}

/// Optional button label overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogLabels {
    pub ok: Option<String>,
    pub yes: Option<String>,
    pub no: Option<String>,
}

impl DialogLabels {
    /// Label for `button`: explicit override, else the localized default
    pub fn label(&self, button: DialogButton, lang: Language) -> String {
        let (custom, default) = match button {
            DialogButton::Ok => (&self.ok, Text::Ok),
            DialogButton::Yes => (&self.yes, Text::Yes),
            DialogButton::No => (&self.no, Text::No),
        };
        custom
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default.tr(lang).to_string())
    }
}

/// Title or message of an alert.
///
/// Text built from the string tables is kept in both languages so an open alert
/// follows a language switch. Server-supplied text is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogText {
    Fixed(String),
    Localized { en: String, ta: String },
}

impl DialogText {
    /// Build the text once per language
    pub fn localized(text_for: impl Fn(Language) -> String) -> Self {
        let en = text_for(Language::English);
        let ta = text_for(Language::Tamil);
        if en == ta {
            DialogText::Fixed(en)
        } else {
            DialogText::Localized { en, ta }
        }
    }

    pub fn get(&self, lang: Language) -> &str {
        match (self, lang) {
            (DialogText::Fixed(text), _) => text,
            (DialogText::Localized { en, .. }, Language::English) => en,
            (DialogText::Localized { ta, .. }, Language::Tamil) => ta,
        }
    }
}

impl From<String> for DialogText {
    fn from(text: String) -> Self {
        DialogText::Fixed(text)
    }
}

impl From<&str> for DialogText {
    fn from(text: &str) -> Self {
        DialogText::Fixed(text.to_string())
    }
}

impl From<Text> for DialogText {
    fn from(text: Text) -> Self {
        DialogText::localized(|lang| text.tr(lang).to_string())
    }
}

impl fmt::Display for DialogText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.get(Language::English))
    }
}

/// Everything needed to show one alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogRequest<A> {
    pub title: DialogText,
    pub message: DialogText,
    pub kind: DialogKind<A>,
    pub labels: DialogLabels,
}

impl<A> DialogRequest<A> {
    pub fn acknowledge(title: impl Into<DialogText>, message: impl Into<DialogText>, on_acknowledge: A) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: DialogKind::Acknowledge { on_acknowledge },
            labels: DialogLabels::default(),
        }
    }

    pub fn confirm(
        title: impl Into<DialogText>,
        message: impl Into<DialogText>,
        on_affirm: A,
        on_decline: A,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: DialogKind::Confirm { on_affirm, on_decline },
            labels: DialogLabels::default(),
        }
    }

    pub fn with_ok_text(mut self, text: impl Into<String>) -> Self {
        self.labels.ok = Some(text.into());
        self
    }

    pub fn with_yes_text(mut self, text: impl Into<String>) -> Self {
        self.labels.yes = Some(text.into());
        self
    }

    pub fn with_no_text(mut self, text: impl Into<String>) -> Self {
        self.labels.no = Some(text.into());
        self
    }

    pub fn mode(&self) -> DialogMode {
        self.kind.mode()
    }
}

/// Lifecycle of the alert slot owned by a screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    /// Nothing shown
    #[default]
    Idle,
    /// Shown, waiting for the user
    Awaiting,
    /// A button was pressed; the slot is closing
    Resolved(DialogChoice),
}

/// Minimum size of an alert, border excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogConfig {
    pub min_width: u16,
    pub min_height: u16,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            min_width: 30,
            min_height: 5,
        }
    }
}

/// Helper struct for dialog layout calculations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLayout {
    /// Dialog area (including border)
    pub dialog_area: Rect,
    /// Content area (excluding border)
    pub content_area: Rect,
}

impl DialogLayout {
    /// Center a bordered dialog fitting `content_size` inside `available_area`
    pub fn calculate(config: &DialogConfig, available_area: Rect, content_size: (u16, u16)) -> Self {
        let (content_w, content_h) = content_size;
        let width = content_w
            .max(config.min_width)
            .saturating_add(2)
            .min(available_area.width);
        let height = content_h
            .max(config.min_height)
            .saturating_add(2)
            .min(available_area.height);

        let x = available_area.x + (available_area.width.saturating_sub(width)) / 2;
        let y = available_area.y + (available_area.height.saturating_sub(height)) / 2;
        let dialog_area = Rect {
            x,
            y,
            width,
            height,
        };

        let content_area = Rect {
            x: dialog_area.x + 1,
            y: dialog_area.y + 1,
            width: dialog_area.width.saturating_sub(2),
            height: dialog_area.height.saturating_sub(2),
        };

        Self {
            dialog_area,
            content_area,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_maps_to_decline_in_confirm_mode() {
        assert_eq!(
            DialogMode::Confirm.choice_for(DialogInput::Back),
            DialogChoice::Declined
        );
        assert_eq!(
            DialogMode::Confirm.choice_for(DialogInput::Press(DialogButton::Yes)),
            DialogChoice::Affirmed
        );
        assert_eq!(
            DialogMode::Acknowledge.choice_for(DialogInput::Back),
            DialogChoice::Acknowledged
        );
    }

    #[test]
    fn test_button_sets() {
        assert_eq!(DialogMode::Acknowledge.buttons(), &[DialogButton::Ok]);
        assert_eq!(DialogMode::Confirm.buttons(), &[DialogButton::No, DialogButton::Yes]);
        assert_eq!(DialogMode::default(), DialogMode::Acknowledge);
    }

    #[test]
    fn test_label_precedence() {
        let labels = DialogLabels {
            ok: Some("Got it".to_string()),
            yes: Some("   ".to_string()),
            no: None,
        };

        assert_eq!(labels.label(DialogButton::Ok, Language::Tamil), "Got it");
        assert_eq!(labels.label(DialogButton::Yes, Language::English), "Yes");
        assert_eq!(labels.label(DialogButton::No, Language::Tamil), "இல்லை");
    }

    #[test]
    fn test_kind_hands_out_matching_action() {
        let kind = DialogKind::Confirm { on_affirm: "leave", on_decline: "stay" };
        assert_eq!(kind.clone().into_action(DialogChoice::Affirmed), "leave");
        assert_eq!(kind.into_action(DialogChoice::Declined), "stay");
    }

    #[test]
    fn test_dialog_text_follows_language() {
        let text = DialogText::from(Text::Cancel);
        assert_eq!(text.get(Language::English), "Cancel");
        assert_ne!(text.get(Language::Tamil), "Cancel");

        let fixed = DialogText::from("Database unavailable");
        assert_eq!(fixed.get(Language::Tamil), "Database unavailable");
        assert_eq!(DialogText::localized(|_| "P001".to_string()), DialogText::Fixed("P001".to_string()));
    }

    #[test]
    fn test_layout_is_centered_and_clamped() {
        let config = DialogConfig::default();
        let layout = DialogLayout::calculate(&config, Rect::new(0, 0, 100, 30), (38, 5));
        assert_eq!(layout.dialog_area, Rect::new(30, 11, 40, 7));
        assert_eq!(layout.content_area, Rect::new(31, 12, 38, 5));

        // Small content still gets the minimum size
        let layout = DialogLayout::calculate(&config, Rect::new(0, 0, 100, 30), (4, 1));
        assert_eq!(layout.dialog_area.width, 32);
        assert_eq!(layout.dialog_area.height, 7);

        let layout = DialogLayout::calculate(&config, Rect::new(0, 0, 20, 5), (u16::MAX, u16::MAX));
        assert_eq!(layout.dialog_area, Rect::new(0, 0, 20, 5));
    }
}
