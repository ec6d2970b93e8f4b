use crate::api::HealthApi;
use crate::config::Config;
use crate::i18n::{Language, Text};
use crate::screens::ScreenKind;
use crate::tui::{
    components::dialogs::{DialogController, DialogRequest},
    events::{Event, EventSender},
    keys::KeyMap,
    pages::{form::FormPage, home::HomePage, login::LoginPage, Page, PageContext, PageManager, HOME_PAGE, LOGIN_PAGE},
    styles::Theme,
    utils::layout::centered_rect_percent,
    Frame,
};
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::sync::Arc;
use tracing::{debug, info};

/// Resume actions of the app-level quit confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    Stay,
}

/// Main application state and controller
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Current application dimensions
    pub size: Rect,

    /// Key mappings for the application
    pub key_map: KeyMap,

    /// Page manager for handling different screens
    pub page_manager: PageManager,

    /// Current theme for styling
    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<String>,

    /// Current display language
    pub language: Language,

    /// Show help overlay
    pub show_help: bool,

    /// Enable mouse support
    pub mouse_enabled: bool,

    /// Quit confirmation owned by the shell
    quit_dialog: DialogController<AppAction>,

    /// Phone number of the logged in user
    user: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config, api: Arc<dyn HealthApi>, events: EventSender) -> Self {
        let language = config.language;
        let mouse_enabled = config.mouse_enabled;
        let ctx = PageContext::new(api, events, config);

        let mut page_manager = PageManager::new();
        page_manager.register_page(Box::new(LoginPage::new(ctx.clone())));
        page_manager.register_page(Box::new(HomePage::new(ctx.clone())));
        for kind in ScreenKind::ALL {
            page_manager.register_page(Box::new(FormPage::new(kind, ctx.clone())));
        }

        Self {
            should_quit: false,
            size: Rect::default(),
            key_map: KeyMap::default(),
            page_manager,
            theme: Theme::default(),
            status_message: None,
            language,
            show_help: false,
            mouse_enabled,
            quit_dialog: DialogController::new(language),
            user: None,
        }
    }

    /// Show the first page
    pub async fn start(&mut self) -> Result<()> {
        self.page_manager.navigate_to(LOGIN_PAGE.to_string()).await
    }

    /// Handle incoming events
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if self.quit_dialog.is_visible() {
                    if let Some(resolution) = self.quit_dialog.handle_key(key_event) {
                        self.should_quit = resolution.action == AppAction::Quit;
                    }
                    return Ok(self.should_quit);
                }

                if self.key_map.should_quit(&key_event) {
                    self.quit_dialog.open(DialogRequest::confirm(
                        Text::Quit,
                        Text::ConfirmQuit,
                        AppAction::Quit,
                        AppAction::Stay,
                    ));
                    return Ok(false);
                }

                if self.key_map.should_show_help(&key_event) {
                    self.show_help = !self.show_help;
                    return Ok(false);
                }

                if self.key_map.should_toggle_language(&key_event) {
                    self.set_language(self.language.toggled());
                    return Ok(false);
                }

                if self.show_help {
                    self.show_help = false;
                    return Ok(false);
                }

                // Forward key events to current page
                if let Some(current_page) = self.page_manager.current_page_mut() {
                    current_page.handle_key_event(key_event).await?;
                }
            }

            Event::Mouse(mouse_event) => {
                if self.mouse_enabled {
                    if let Some(current_page) = self.page_manager.current_page_mut() {
                        current_page.handle_mouse_event(mouse_event).await?;
                    }
                }
            }

            Event::Resize(width, height) => {
                self.size = Rect::new(0, 0, width, height);
            }

            Event::Tick => {
                if let Some(current_page) = self.page_manager.current_page_mut() {
                    current_page.tick().await?;
                }
            }

            Event::PageChange(page_id) => {
                self.page_manager.navigate_to(page_id).await?;
            }

            Event::Api(api_event) => {
                self.page_manager
                    .dispatch_api_event(&api_event.page, api_event.generation, api_event.outcome)
                    .await?;
            }

            Event::LoggedIn(phone) => {
                info!("User logged in");
                self.status_message = Some(Text::LoggedInAs.fill(self.language, "phone", &phone));
                self.user = Some(phone);
            }
        }

        Ok(self.should_quit)
    }

    /// Switch the language of every page and the shell
    pub fn set_language(&mut self, language: Language) {
        debug!("Switching language to {}", language);
        self.language = language;
        self.page_manager.set_language(language);
        self.quit_dialog.set_language(language);
        if let Some(phone) = &self.user {
            self.status_message = Some(Text::LoggedInAs.fill(language, "phone", phone));
        }
    }

    pub fn quit_dialog(&self) -> &DialogController<AppAction> {
        &self.quit_dialog
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        self.size = frame.size();

        // Create main layout
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Main content
                Constraint::Length(1), // Status bar
            ])
            .split(frame.size());

        // Render current page
        if let Some(current_page) = self.page_manager.current_page_mut() {
            current_page.render(frame, chunks[0], &self.theme);
        } else {
            // Render empty state
            let empty_block = Block::default()
                .borders(Borders::ALL)
                .title(Text::AppTitle.tr(self.language))
                .style(self.theme.base_style());

            frame.render_widget(empty_block, chunks[0]);
        }

        // Render status bar
        self.render_status_bar(frame, chunks[1]);

        // Render help overlay if enabled
        if self.show_help {
            self.render_help_overlay(frame);
        }

        self.quit_dialog.render(frame, frame.size(), &self.theme);
    }

    /// Render the status bar
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let page_title = self
            .page_manager
            .current_page()
            .map(|page| page.title(self.language).to_string())
            .unwrap_or_default();

        let status_text = match &self.status_message {
            Some(message) => format!(" {} | {} | {}", page_title, message, Text::StatusHint.tr(self.language)),
            None => format!(" {} | {}", page_title, Text::StatusHint.tr(self.language)),
        };

        let busy = self
            .page_manager
            .current_page()
            .map(|page| page.is_busy())
            .unwrap_or(false);
        let style = if busy {
            self.theme.busy_style()
        } else {
            self.theme.status_bar_style()
        };

        frame.render_widget(Paragraph::new(status_text).style(style), area);
    }

    /// Render help overlay
    fn render_help_overlay(&self, frame: &mut Frame) {
        let help_area = centered_rect_percent(60, 50, frame.size());

        let mut help_text = self.key_map.help_text(self.language);
        if let Some(page) = self.page_manager.current_page() {
            help_text.push_str("\n\n");
            help_text.push_str(page.help_text(self.language));
        }

        let help_block = Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(self.theme.help_style());

        let help_paragraph = Paragraph::new(help_text)
            .block(help_block)
            .style(self.theme.text_style());

        frame.render_widget(Clear, help_area);
        frame.render_widget(help_paragraph, help_area);
    }

    /// Whether the current page is the home menu
    pub fn is_home(&self) -> bool {
        self.page_manager.current_page_id().map(String::as_str) == Some(HOME_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockHealthApi;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    async fn started_app() -> (App, mpsc::UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut app = App::new(Config::default(), Arc::new(MockHealthApi::new()), sender);
        app.start().await.unwrap();
        (app, receiver)
    }

    #[tokio::test]
    async fn test_quit_asks_first() {
        let (mut app, _rx) = started_app().await;

        assert!(!app.handle_event(ctrl('c')).await.unwrap());
        assert!(app.quit_dialog().is_visible());

        // Declining keeps the app running
        assert!(!app.handle_event(key(KeyCode::Char('n'))).await.unwrap());
        assert!(!app.quit_dialog().is_visible());

        app.handle_event(ctrl('c')).await.unwrap();
        assert!(app.handle_event(key(KeyCode::Char('y'))).await.unwrap());
    }

    #[tokio::test]
    async fn test_language_toggle_reaches_status_bar() {
        let (mut app, _rx) = started_app().await;
        app.handle_event(ctrl('l')).await.unwrap();
        assert_eq!(app.language, Language::Tamil);

        let page = app.page_manager.current_page().unwrap();
        assert_eq!(page.title(app.language), "உள்நுழைவு");

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
    }

    #[tokio::test]
    async fn test_page_change_and_login_status() {
        let (mut app, _rx) = started_app().await;

        app.handle_event(Event::LoggedIn("9876543210".to_string())).await.unwrap();
        app.handle_event(Event::PageChange(HOME_PAGE.to_string())).await.unwrap();

        assert!(app.is_home());
        assert_eq!(app.user.as_deref(), Some("9876543210"));
        assert_eq!(app.status_message.as_deref(), Some("Logged in as 9876543210"));
    }

    #[tokio::test]
    async fn test_help_overlay_toggles() {
        let (mut app, _rx) = started_app().await;
        app.handle_event(ctrl('g')).await.unwrap();
        assert!(app.show_help);
        app.handle_event(key(KeyCode::Esc)).await.unwrap();
        assert!(!app.show_help);
    }
}
