//! Alert dialog
//!
//! Renders a centered modal with a title, a message and one ("OK") or two
//! ("No"/"Yes") buttons, and turns key presses into [`DialogInput`]s. It holds
//! no business logic: the owning [`DialogController`](super::DialogController)
//! decides what an input means.

use super::types::{DialogButton, DialogConfig, DialogInput, DialogLayout, DialogMode, DialogRequest};
use crate::i18n::Language;
use crate::tui::{
    components::{Component, ComponentState},
    styles::Theme,
    Frame,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

const MAX_TEXT_WIDTH: u16 = 56;
const BUTTON_ROW_HEIGHT: u16 = 3;

/// Presentation of one alert request
#[derive(Debug, Clone)]
pub struct AlertDialog {
    /// Component state
    state: ComponentState,

    /// Dialog configuration
    config: DialogConfig,

    title: String,
    message: String,
    mode: DialogMode,

    /// Resolved labels, parallel to `mode.buttons()`
    labels: Vec<String>,

    /// Button that Enter/Space presses
    focused: DialogButton,
}

impl AlertDialog {
    /// Build the view for `request` with labels resolved for `lang`
    pub fn from_request<A>(request: &DialogRequest<A>, lang: Language) -> Self {
        let mode = request.mode();
        let labels = mode
            .buttons()
            .iter()
            .map(|button| request.labels.label(*button, lang))
            .collect();

        let focused = match mode {
            DialogMode::Acknowledge => DialogButton::Ok,
            // Default to "No" for safety
            DialogMode::Confirm => DialogButton::No,
        };

        Self {
            state: ComponentState::new(),
            config: DialogConfig::default(),
            title: request.title.get(lang).to_string(),
            message: request.message.get(lang).to_string(),
            mode,
            labels,
            focused,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn mode(&self) -> DialogMode {
        self.mode
    }

    pub fn focused(&self) -> DialogButton {
        self.focused
    }

    /// Buttons with their labels, left to right
    pub fn buttons(&self) -> impl Iterator<Item = (DialogButton, &str)> + '_ {
        self.mode
            .buttons()
            .iter()
            .copied()
            .zip(self.labels.iter().map(String::as_str))
    }

    /// Keep focus when the view is rebuilt, e.g. after a language switch
    pub fn restore_focus(&mut self, button: DialogButton) {
        if self.mode.buttons().contains(&button) {
            self.focused = button;
        }
    }

    fn toggle_focus(&mut self) {
        if self.mode == DialogMode::Confirm {
            self.focused = match self.focused {
                DialogButton::Yes => DialogButton::No,
                _ => DialogButton::Yes,
            };
        }
    }

    /// Translate a key press into an input; focus moves are absorbed
    pub fn interpret_key(&mut self, event: KeyEvent) -> Option<DialogInput> {
        if !self.is_visible() {
            return None;
        }

        match (event.code, event.modifiers) {
            (KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab, _) => {
                self.toggle_focus();
                None
            }

            (KeyCode::Enter | KeyCode::Char(' '), _) => Some(DialogInput::Press(self.focused)),

            (KeyCode::Char('y') | KeyCode::Char('Y'), m) if !m.contains(KeyModifiers::CONTROL) => {
                (self.mode == DialogMode::Confirm).then_some(DialogInput::Press(DialogButton::Yes))
            }

            (KeyCode::Char('n') | KeyCode::Char('N'), m) if !m.contains(KeyModifiers::CONTROL) => {
                (self.mode == DialogMode::Confirm).then_some(DialogInput::Press(DialogButton::No))
            }

            (KeyCode::Esc, _) => Some(DialogInput::Back),

            _ => None,
        }
    }

    /// Width and height of the content area, before the border
    fn content_size(&self, available: Rect) -> (u16, u16) {
        let max_width = usize::from(MAX_TEXT_WIDTH.min(available.width.saturating_sub(4)).max(1));
        let widest_line = self
            .message
            .lines()
            .map(|line| line.width())
            .max()
            .unwrap_or(0)
            .max(self.title.width() + 2);
        let buttons_width: usize = self.labels.iter().map(|label| label.width() + 6).sum();

        // Bounded by MAX_TEXT_WIDTH, so it fits in u16
        let width = widest_line.max(buttons_width).min(max_width).max(1);
        let message_lines = self
            .message
            .lines()
            .map(|line| line.width().div_ceil(width).max(1))
            .fold(0usize, usize::saturating_add)
            .max(1);

        // Border, spacer and buttons take the rest; the message is cut to what is left
        let max_lines = usize::from(
            available
                .height
                .saturating_sub(3 + BUTTON_ROW_HEIGHT)
                .max(1),
        );
        let message_lines = message_lines.min(max_lines) as u16;

        (width as u16, message_lines.saturating_add(1 + BUTTON_ROW_HEIGHT))
    }

    /// Layout of the alert inside `area`
    pub fn layout(&self, area: Rect) -> DialogLayout {
        DialogLayout::calculate(&self.config, area, self.content_size(area))
    }

    /// Render the dialog buttons
    fn render_buttons(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let count = self.labels.len().max(1) as u32;
        let constraints: Vec<Constraint> = (0..count).map(|_| Constraint::Ratio(1, count)).collect();
        let button_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (slot, (button, label)) in button_layout.iter().zip(self.buttons()) {
            let style = if button == self.focused {
                Style::default()
                    .bg(theme.primary)
                    .fg(theme.text_bright)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(theme.background_alt).fg(theme.text)
            };

            let widget = Paragraph::new(format!(" {} ", label))
                .style(style)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));

            frame.render_widget(widget, *slot);
        }
    }
}

impl Component for AlertDialog {
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.is_visible() {
            return;
        }

        let layout = self.layout(area);
        self.state.size = layout.dialog_area;

        // Block out whatever the screen drew below the alert
        frame.render_widget(Clear, layout.dialog_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.focused_border_style())
            .title(format!(" {} ", self.title))
            .title_alignment(Alignment::Center)
            .style(theme.base_style());
        frame.render_widget(block, layout.dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),                     // Message area
                Constraint::Length(BUTTON_ROW_HEIGHT), // Button area
            ])
            .split(layout.content_area);

        let message = Paragraph::new(self.message.clone())
            .style(theme.text_style())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, chunks[0]);

        self.render_buttons(frame, chunks[1], theme);
    }

    fn size(&self) -> Rect {
        self.state.size
    }

    fn set_size(&mut self, size: Rect) {
        self.state.size = size;
    }

    fn has_focus(&self) -> bool {
        self.state.has_focus
    }

    fn set_focus(&mut self, focus: bool) {
        self.state.has_focus = focus;
    }

    fn is_visible(&self) -> bool {
        self.state.is_visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.state.is_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_acknowledge_has_single_ok_button() {
        let request = DialogRequest::acknowledge("Error", "Failed to fetch patient IDs.", ());
        let dialog = AlertDialog::from_request(&request, Language::English);

        let buttons: Vec<_> = dialog.buttons().collect();
        assert_eq!(buttons, vec![(DialogButton::Ok, "OK")]);
        assert_eq!(dialog.focused(), DialogButton::Ok);
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        let request = DialogRequest::confirm("Cancel", "Are you sure you want to cancel?", 1, 0);
        let dialog = AlertDialog::from_request(&request, Language::English);

        let labels: Vec<_> = dialog.buttons().map(|(_, label)| label).collect();
        assert_eq!(labels, vec!["No", "Yes"]);
        assert_eq!(dialog.focused(), DialogButton::No);
    }

    #[test]
    fn test_key_mapping_in_confirm_mode() {
        let request = DialogRequest::confirm("Cancel", "Sure?", 1, 0);
        let mut dialog = AlertDialog::from_request(&request, Language::English);

        assert_eq!(dialog.interpret_key(key(KeyCode::Right)), None);
        assert_eq!(dialog.focused(), DialogButton::Yes);
        assert_eq!(
            dialog.interpret_key(key(KeyCode::Enter)),
            Some(DialogInput::Press(DialogButton::Yes))
        );
        assert_eq!(
            dialog.interpret_key(key(KeyCode::Char('n'))),
            Some(DialogInput::Press(DialogButton::No))
        );
        assert_eq!(dialog.interpret_key(key(KeyCode::Esc)), Some(DialogInput::Back));
    }

    #[test]
    fn test_shortcuts_ignored_in_acknowledge_mode() {
        let request = DialogRequest::acknowledge("Success", "Saved", ());
        let mut dialog = AlertDialog::from_request(&request, Language::English);

        assert_eq!(dialog.interpret_key(key(KeyCode::Char('y'))), None);
        assert_eq!(dialog.interpret_key(key(KeyCode::Tab)), None);
        assert_eq!(dialog.focused(), DialogButton::Ok);
        assert_eq!(
            dialog.interpret_key(key(KeyCode::Char(' '))),
            Some(DialogInput::Press(DialogButton::Ok))
        );
    }

    #[test]
    fn test_hidden_dialog_ignores_keys_and_renders_nothing() {
        let request = DialogRequest::acknowledge("Error", "Hidden", ());
        let mut dialog = AlertDialog::from_request(&request, Language::English);
        dialog.set_visible(false);

        assert_eq!(dialog.interpret_key(key(KeyCode::Enter)), None);

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|frame| dialog.render(frame, frame.size(), &Theme::default()))
            .unwrap();
        assert!(screen_text(&terminal).trim().is_empty());
    }

    #[test]
    fn test_render_shows_title_message_and_button() {
        let request = DialogRequest::acknowledge("Error", "Failed to fetch patient IDs.", ());
        let mut dialog = AlertDialog::from_request(&request, Language::English);

        let mut terminal = Terminal::new(TestBackend::new(70, 16)).unwrap();
        terminal
            .draw(|frame| dialog.render(frame, frame.size(), &Theme::default()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Error"));
        assert!(text.contains("Failed to fetch patient IDs."));
        assert!(text.contains(" OK "));
        assert!(!text.contains("Yes"));
    }

    #[test]
    fn test_tamil_labels() {
        let request = DialogRequest::confirm("ரத்து", "?", (), ()).with_yes_text("சரி, வெளியேறு");
        let dialog = AlertDialog::from_request(&request, Language::Tamil);

        let labels: Vec<_> = dialog.buttons().map(|(_, label)| label.to_string()).collect();
        assert_eq!(labels, vec!["இல்லை".to_string(), "சரி, வெளியேறு".to_string()]);
    }

    #[test]
    fn test_oversized_message_stays_inside_the_screen() {
        let line = "x".repeat(2000);
        let message = vec![line.as_str(); 2000].join("\n");
        let request = DialogRequest::acknowledge("Error", message, ());
        let dialog = AlertDialog::from_request(&request, Language::English);

        let area = Rect::new(0, 0, 80, 24);
        let layout = dialog.layout(area);
        assert!(layout.dialog_area.width <= area.width);
        assert!(layout.dialog_area.height <= area.height);

        let line = "y".repeat(400);
        let message = vec![line.as_str(); 200].join("\n");
        let mut dialog = AlertDialog::from_request(&DialogRequest::acknowledge("Error", message, ()), Language::English);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| dialog.render(frame, frame.size(), &Theme::default()))
            .unwrap();
        assert!(screen_text(&terminal).contains(" OK "));
    }
}
