pub mod form;
pub mod home;
pub mod login;

use crate::api::HealthApi;
use crate::config::Config;
use crate::i18n::Language;
use crate::tui::{
    events::{ApiOutcome, Event, EventSender},
    styles::Theme,
    Frame,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::layout::Rect;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Page identifier type
pub type PageId = String;

pub const LOGIN_PAGE: &str = "login";
pub const HOME_PAGE: &str = "home";

/// What every page needs to reach the backend and the event loop
#[derive(Clone)]
pub struct PageContext {
    pub api: Arc<dyn HealthApi>,
    pub events: EventSender,
    pub config: Arc<Config>,
}

impl PageContext {
    pub fn new(api: Arc<dyn HealthApi>, events: EventSender, config: Config) -> Self {
        Self {
            api,
            events,
            config: Arc::new(config),
        }
    }

    /// Queue an event for the app; a closed loop means the app is shutting down
    pub fn emit(&self, event: Event) {
        if self.events.send(event).is_err() {
            debug!("Event loop closed, dropping event");
        }
    }

    pub fn navigate(&self, page: impl Into<PageId>) {
        self.emit(Event::PageChange(page.into()));
    }
}

/// Base trait for all pages
#[async_trait]
pub trait Page: Send + Sync {
    /// Get the page ID
    fn id(&self) -> &PageId;

    /// Get the page title
    fn title(&self, lang: Language) -> &str;

    /// Handle keyboard input
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()>;

    /// Handle mouse input
    async fn handle_mouse_event(&mut self, _event: MouseEvent) -> Result<()> {
        Ok(())
    }

    /// Handle periodic updates
    async fn tick(&mut self) -> Result<()> {
        Ok(())
    }

    /// A backend call started by this page finished
    async fn handle_api_event(&mut self, generation: u64, outcome: ApiOutcome) -> Result<()> {
        let _ = (generation, outcome);
        Ok(())
    }

    /// Render the page
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);

    /// Called when the page becomes active
    async fn on_enter(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the page becomes inactive
    async fn on_exit(&mut self) -> Result<()> {
        Ok(())
    }

    /// Switch the display language
    fn set_language(&mut self, language: Language);

    /// Whether the page is showing an alert
    fn has_dialog(&self) -> bool {
        false
    }

    /// Whether a backend call is in flight
    fn is_busy(&self) -> bool {
        false
    }

    /// Get page-specific key hints for the footer
    fn help_text(&self, lang: Language) -> &str;
}

/// Page manager for handling navigation between pages
pub struct PageManager {
    /// All registered pages
    pages: HashMap<PageId, Box<dyn Page>>,

    /// Current active page
    current_page: Option<PageId>,

    /// Page history for navigation
    history: Vec<PageId>,

    /// Maximum history size
    max_history: usize,
}

impl PageManager {
    /// Create a new page manager
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            current_page: None,
            history: Vec::new(),
            max_history: 10,
        }
    }

    /// Register a page
    pub fn register_page(&mut self, page: Box<dyn Page>) {
        let id = page.id().clone();
        self.pages.insert(id, page);
    }

    /// Navigate to a page, running the exit/enter hooks
    pub async fn navigate_to(&mut self, page_id: PageId) -> Result<()> {
        if !self.pages.contains_key(&page_id) {
            return Err(anyhow::anyhow!("Page '{}' not found", page_id));
        }

        if let Some(current_id) = self.current_page.clone() {
            if let Some(page) = self.pages.get_mut(&current_id) {
                page.on_exit().await?;
            }
            self.add_to_history(current_id);
        }

        debug!("Navigating to '{}'", page_id);
        self.current_page = Some(page_id.clone());
        if let Some(page) = self.pages.get_mut(&page_id) {
            page.on_enter().await?;
        }

        Ok(())
    }

    /// Get the current page
    pub fn current_page(&self) -> Option<&dyn Page> {
        let current_id = self.current_page.as_ref()?;
        self.pages.get(current_id).map(|p| p.as_ref())
    }

    /// Get the current page mutably
    pub fn current_page_mut(&mut self) -> Option<&mut (dyn Page + 'static)> {
        let current_id = self.current_page.as_ref()?;
        self.pages.get_mut(current_id).map(|p| p.as_mut())
    }

    /// Get the current page ID
    pub fn current_page_id(&self) -> Option<&PageId> {
        self.current_page.as_ref()
    }

    /// Deliver a backend result to the page that asked for it
    pub async fn dispatch_api_event(&mut self, page_id: &str, generation: u64, outcome: ApiOutcome) -> Result<()> {
        match self.pages.get_mut(page_id) {
            Some(page) => page.handle_api_event(generation, outcome).await,
            None => {
                warn!("Dropping backend result for unknown page '{}'", page_id);
                Ok(())
            }
        }
    }

    /// Propagate a language switch to every page
    pub fn set_language(&mut self, language: Language) {
        for page in self.pages.values_mut() {
            page.set_language(language);
        }
    }

    /// Pages visited before the current one, oldest first
    pub fn history(&self) -> &[PageId] {
        &self.history
    }

    /// Add page to history
    fn add_to_history(&mut self, page_id: PageId) {
        // Don't add duplicate consecutive entries
        if self.history.last() != Some(&page_id) {
            self.history.push(page_id);

            // Limit history size
            if self.history.len() > self.max_history {
                self.history.remove(0);
            }
        }
    }
}

impl Default for PageManager {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockHealthApi;
    use crate::tui::pages::home::HomePage;
    use crate::tui::pages::login::LoginPage;

    #[tokio::test]
    async fn test_navigation_records_history() {
        let (ctx, _, _rx) = test_support::context(MockHealthApi::new());
        let mut manager = PageManager::new();
        manager.register_page(Box::new(LoginPage::new(ctx.clone())));
        manager.register_page(Box::new(HomePage::new(ctx)));

        manager.navigate_to(LOGIN_PAGE.to_string()).await.unwrap();
        manager.navigate_to(HOME_PAGE.to_string()).await.unwrap();

        assert_eq!(manager.current_page_id().map(String::as_str), Some(HOME_PAGE));
        assert_eq!(manager.history(), &[LOGIN_PAGE.to_string()]);
        assert!(manager.navigate_to("billing".to_string()).await.is_err());
    }
}
