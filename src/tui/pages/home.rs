use super::{Page, PageContext, PageId, HOME_PAGE};
use crate::i18n::{Language, Text};
use crate::screens::ScreenKind;
use crate::tui::{styles::Theme, utils::layout, Frame};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

/// Menu of the data entry screens
pub struct HomePage {
    id: PageId,
    ctx: PageContext,
    language: Language,
    list_state: ListState,
}

impl HomePage {
    pub fn new(ctx: PageContext) -> Self {
        let language = ctx.config.language;
        Self {
            id: HOME_PAGE.to_string(),
            ctx,
            language,
            list_state: ListState::default().with_selected(Some(0)),
        }
    }

    pub fn selected(&self) -> ScreenKind {
        ScreenKind::ALL[self.list_state.selected().unwrap_or(0)]
    }

    fn select(&mut self, delta: isize) {
        let len = ScreenKind::ALL.len() as isize;
        let current = self.list_state.selected().unwrap_or(0) as isize;
        self.list_state
            .select(Some((current + delta).rem_euclid(len) as usize));
    }
}

#[async_trait]
impl Page for HomePage {
    fn id(&self) -> &PageId {
        &self.id
    }

    fn title(&self, lang: Language) -> &str {
        Text::HomeTitle.tr(lang)
    }

    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        match event.code {
            KeyCode::Up | KeyCode::Char('k') => self.select(-1),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.select(1),
            KeyCode::Enter => self.ctx.navigate(self.selected().name()),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let index = c.to_digit(10).unwrap_or(0) as usize;
                if (1..=ScreenKind::ALL.len()).contains(&index) {
                    self.list_state.select(Some(index - 1));
                    self.ctx.navigate(self.selected().name());
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (body, footer) = layout::with_footer(area);

        let items: Vec<ListItem> = ScreenKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| ListItem::new(format!("{}. {}", i + 1, kind.spec().title.get(self.language))))
            .collect();

        let title = format!(
            " {} • {} ",
            Text::AppTitle.tr(self.language),
            Text::HomeTitle.tr(self.language)
        );

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.focused_border_style())
                    .title(title),
            )
            .style(theme.text_style())
            .highlight_style(theme.selection_style())
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, body, &mut self.list_state);

        frame.render_widget(
            Paragraph::new(Text::HomeHelp.tr(self.language)).style(theme.dim_style()),
            footer,
        );
    }

    fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    fn help_text(&self, lang: Language) -> &str {
        Text::HomeHelp.tr(lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockHealthApi;
    use crate::tui::pages::test_support;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_enter_opens_selected_screen() {
        let (ctx, _, mut rx) = test_support::context(MockHealthApi::new());
        let mut page = HomePage::new(ctx);

        page.handle_key_event(key(KeyCode::Down)).await.unwrap();
        page.handle_key_event(key(KeyCode::Enter)).await.unwrap();

        assert_eq!(test_support::page_changes(&mut rx), vec!["clinical-profile".to_string()]);
    }

    #[tokio::test]
    async fn test_selection_wraps_and_digits_jump() {
        let (ctx, _, mut rx) = test_support::context(MockHealthApi::new());
        let mut page = HomePage::new(ctx);

        page.handle_key_event(key(KeyCode::Up)).await.unwrap();
        assert_eq!(page.selected(), ScreenKind::Medication);

        page.handle_key_event(key(KeyCode::Char('6'))).await.unwrap();
        page.handle_key_event(key(KeyCode::Char('9'))).await.unwrap();
        assert_eq!(test_support::page_changes(&mut rx), vec!["water-intake".to_string()]);
    }
}
