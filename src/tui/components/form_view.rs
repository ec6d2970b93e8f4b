//! Editable view over a [`FormState`]
//!
//! One row per field: label, value (or hint) and, for choice and patient id
//! fields, the arrows that cycle through the options.

use crate::i18n::Language;
use crate::screens::{FieldKind, FieldSpec, FormState, ScreenSpec};
use crate::tui::{
    components::{Component, ComponentState},
    styles::Theme,
    Frame,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

pub struct FormView {
    state: ComponentState,
    form: FormState,
    language: Language,
}

impl FormView {
    pub fn new(spec: &'static ScreenSpec, language: Language) -> Self {
        Self {
            state: ComponentState::new().with_focus(true),
            form: FormState::new(spec),
            language,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Lock editing while a submission is in flight
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.is_enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled
    }

    fn label_width(&self) -> usize {
        self.form
            .fields()
            .map(|(field, _)| field.label.get(self.language).width() + 2)
            .max()
            .unwrap_or(0)
    }

    fn field_line(&self, index: usize, field: &FieldSpec, value: &str, width: usize, theme: &Theme) -> Line<'static> {
        let focused = index == self.form.focused_index() && self.state.has_focus;
        let label = field.label.get(self.language);
        let marker = if field.required { "*" } else { " " };
        let padding = " ".repeat(width.saturating_sub(label.width() + 1));

        let label_style = if focused {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            theme.text_style()
        };

        let mut spans = vec![
            Span::styled(if focused { "▶ " } else { "  " }, label_style),
            Span::styled(format!("{}{}{}", label, marker, padding), label_style),
        ];

        let cycles = matches!(field.kind, FieldKind::Choice(_))
            || (field.kind == FieldKind::PatientId && !self.form.patient_ids().is_empty());

        let shown = match field.kind {
            FieldKind::Choice(options) => options
                .iter()
                .find(|option| option.value == value)
                .map(|option| option.label.get(self.language).to_string())
                .unwrap_or_else(|| value.to_string()),
            _ => value.to_string(),
        };

        if shown.is_empty() {
            let placeholder = field.hint.unwrap_or(if cycles { "←/→" } else { "" });
            spans.push(Span::styled(placeholder.to_string(), theme.placeholder_style()));
        } else if cycles {
            spans.push(Span::styled(format!("◀ {} ▶", shown), theme.text_style()));
        } else {
            spans.push(Span::styled(shown, theme.text_style()));
        }

        if focused && !cycles && self.state.is_enabled {
            spans.push(Span::styled("█", Style::default().fg(theme.cursor)));
        }

        Line::from(spans)
    }
}

#[async_trait]
impl Component for FormView {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        if !self.state.is_enabled {
            return Ok(());
        }

        match (event.code, event.modifiers) {
            (KeyCode::Tab | KeyCode::Down, _) => self.form.focus_next(),
            (KeyCode::BackTab | KeyCode::Up, _) => self.form.focus_previous(),
            (KeyCode::Left, _) => self.form.cycle_option(-1),
            (KeyCode::Right, _) => self.form.cycle_option(1),
            (KeyCode::Backspace, _) => self.form.delete_previous_char(),
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => self.form.insert_char(c),
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.state.size = area;

        let width = self.label_width();
        let lines: Vec<Line> = self
            .form
            .fields()
            .enumerate()
            .flat_map(|(index, (field, value))| {
                [self.field_line(index, field, value, width, theme), Line::from("")]
            })
            .collect();

        let border_style = if self.state.has_focus {
            theme.focused_border_style()
        } else {
            theme.border_style()
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" {} ", self.form.spec().title.get(self.language))),
        );
        frame.render_widget(paragraph, area);
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
}
