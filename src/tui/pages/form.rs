//! Generic data entry page
//!
//! Every screen in [`ScreenKind`] is rendered by this page. It owns the form
//! state and the screen's single alert slot, and runs the shared submission
//! flow: validation and backend results each end in exactly one alert, and the
//! alert's resume action decides what happens next.

use super::{Page, PageContext, PageId, HOME_PAGE};
use crate::app::submission::{self, PreparedSubmission};
use crate::i18n::{Language, Text};
use crate::screens::{AfterSave, ScreenKind};
use crate::tui::{
    components::{
        dialogs::{DialogButton, DialogController, DialogInput, DialogRequest, DialogText},
        form_view::FormView,
        Component,
    },
    events::{ApiEvent, ApiOutcome, Event},
    keys::KeyMap,
    styles::Theme,
    utils::layout,
    Frame,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, widgets::Paragraph};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// What the form page does once its alert is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    /// Close the alert and stay
    Nothing,
    /// Reset after a successful save and move on
    Saved(AfterSave),
    /// Throw away the edits and go home
    Discard,
}

pub struct FormPage {
    id: PageId,
    kind: ScreenKind,
    ctx: PageContext,
    language: Language,
    keys: KeyMap,
    view: FormView,
    dialog: DialogController<FormAction>,

    /// Bumped on enter/exit; results from older generations are ignored
    generation: u64,
    submitting: bool,

    auto_dismiss_after: Option<Duration>,
    auto_dismiss_at: Option<Instant>,
}

impl FormPage {
    pub fn new(kind: ScreenKind, ctx: PageContext) -> Self {
        let language = ctx.config.language;
        let auto_dismiss_after = ctx.config.auto_dismiss_secs.map(Duration::from_secs);
        Self {
            id: kind.name().to_string(),
            kind,
            language,
            keys: KeyMap::default(),
            view: FormView::new(kind.spec(), language),
            dialog: DialogController::new(language),
            generation: 0,
            submitting: false,
            auto_dismiss_after,
            auto_dismiss_at: None,
            ctx,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    pub fn dialog(&self) -> &DialogController<FormAction> {
        &self.dialog
    }

    fn notify(&mut self, title: impl Into<DialogText>, message: impl Into<DialogText>, action: FormAction) {
        self.auto_dismiss_at = None;
        self.dialog.open(DialogRequest::acknowledge(title, message, action));
    }

    /// Validate and start the submission
    fn save(&mut self) {
        if self.submitting {
            debug!("Submission already in flight on '{}'", self.id);
            return;
        }

        match submission::prepare(self.view.form()) {
            Ok(prepared) => self.start_submission(prepared),
            Err(err) => {
                debug!("Validation failed on '{}': {}", self.id, err);
                let message = DialogText::localized(|lang| err.message(lang));
                self.notify(Text::Validation, message, FormAction::Nothing);
            }
        }
    }

    fn start_submission(&mut self, prepared: PreparedSubmission) {
        info!("Submitting '{}' to {}", self.id, prepared.endpoint);
        self.submitting = true;
        self.view.set_enabled(false);

        let ctx = self.ctx.clone();
        let page = self.id.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let outcome = submission::send(ctx.api.as_ref(), &prepared).await;
            ctx.emit(Event::Api(ApiEvent {
                page,
                generation,
                outcome: ApiOutcome::Submitted(outcome),
            }));
        });
    }

    fn load_patient_ids(&self) {
        let ctx = self.ctx.clone();
        let page = self.id.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let ids = ctx.api.fetch_patient_ids().await.map_err(|e| e.to_string());
            ctx.emit(Event::Api(ApiEvent {
                page,
                generation,
                outcome: ApiOutcome::PatientIds(ids),
            }));
        });
    }

    /// Leave the page, asking first when there are unsaved edits
    fn cancel(&mut self) {
        if !self.view.form().is_dirty() {
            self.ctx.navigate(HOME_PAGE);
            return;
        }

        self.dialog.open(
            DialogRequest::confirm(
                Text::Cancel,
                Text::ConfirmCancel,
                FormAction::Discard,
                FormAction::Nothing,
            ),
        );
    }

    fn run_action(&mut self, action: FormAction) {
        match action {
            FormAction::Nothing => {}
            FormAction::Saved(after) => {
                self.view.form_mut().clear();
                match after {
                    AfterSave::Home => self.ctx.navigate(HOME_PAGE),
                    AfterSave::Screen(next) => self.ctx.navigate(next.name()),
                }
            }
            FormAction::Discard => {
                self.view.form_mut().clear();
                self.ctx.navigate(HOME_PAGE);
            }
        }
    }

    fn reset_session(&mut self) {
        self.generation += 1;
        self.submitting = false;
        self.auto_dismiss_at = None;
        self.view.set_enabled(true);
        self.dialog.clear();
    }
}

#[async_trait]
impl Page for FormPage {
    fn id(&self) -> &PageId {
        &self.id
    }

    fn title(&self, lang: Language) -> &str {
        self.kind.spec().title.get(lang)
    }

    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        if self.dialog.is_visible() {
            if let Some(resolution) = self.dialog.handle_key(event) {
                self.auto_dismiss_at = None;
                self.run_action(resolution.action);
            }
            return Ok(());
        }

        if self.keys.save.matches(&event) {
            self.save();
        } else if self.submitting {
            // Editing and leaving wait for the backend
        } else if self.keys.clear.matches(&event) {
            self.view.form_mut().clear();
        } else if self.keys.back.matches(&event) {
            self.cancel();
        } else {
            self.view.handle_key_event(event).await?;
        }
        Ok(())
    }

    async fn tick(&mut self) -> Result<()> {
        let due = self
            .auto_dismiss_at
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false);

        if due {
            self.auto_dismiss_at = None;
            debug!("Auto-dismissing success alert on '{}'", self.id);
            if let Some(resolution) = self.dialog.press(DialogInput::Press(DialogButton::Ok)) {
                self.run_action(resolution.action);
            }
        }
        Ok(())
    }

    async fn handle_api_event(&mut self, generation: u64, outcome: ApiOutcome) -> Result<()> {
        if generation != self.generation {
            debug!("Discarding stale result on '{}'", self.id);
            return Ok(());
        }

        match outcome {
            ApiOutcome::PatientIds(Ok(ids)) => {
                debug!("Loaded {} patient ids", ids.len());
                self.view.form_mut().set_patient_ids(ids);
            }
            ApiOutcome::PatientIds(Err(err)) => {
                debug!("Fetching patient ids failed: {}", err);
                self.notify(Text::Error, Text::FetchPatientIdsFailed, FormAction::Nothing);
            }
            ApiOutcome::Submitted(outcome) => {
                self.submitting = false;
                self.view.set_enabled(true);

                let title = DialogText::localized(|lang| outcome.notice(lang, Text::SavedSuccessfully).title);
                let message =
                    DialogText::localized(|lang| outcome.notice(lang, Text::SavedSuccessfully).message);
                let action = if outcome.is_success() {
                    FormAction::Saved(self.kind.spec().after_save)
                } else {
                    FormAction::Nothing
                };
                self.notify(title, message, action);

                if outcome.is_success() {
                    self.auto_dismiss_at = self.auto_dismiss_after.map(|after| Instant::now() + after);
                }
            }
            ApiOutcome::OtpRequested(_) | ApiOutcome::OtpVerified(_) => {}
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (body, footer) = layout::with_footer(area);

        self.view.set_focus(!self.dialog.is_visible());
        self.view.render(frame, body, theme);

        let hint = if self.submitting {
            Paragraph::new(Text::Submitting.tr(self.language)).style(theme.busy_style())
        } else {
            Paragraph::new(Text::FormHelp.tr(self.language)).style(theme.dim_style())
        };
        frame.render_widget(hint, footer);

        self.dialog.render(frame, area, theme);
    }

    async fn on_enter(&mut self) -> Result<()> {
        self.reset_session();
        if self.kind.spec().needs_patient_ids() {
            self.load_patient_ids();
        }
        Ok(())
    }

    async fn on_exit(&mut self) -> Result<()> {
        self.reset_session();
        Ok(())
    }

    fn set_language(&mut self, language: Language) {
        self.language = language;
        self.view.set_language(language);
        self.dialog.set_language(language);
    }

    fn has_dialog(&self) -> bool {
        self.dialog.is_visible()
    }

    fn is_busy(&self) -> bool {
        self.submitting
    }

    fn help_text(&self, lang: Language) -> &str {
        Text::FormHelp.tr(lang)
    }
}
