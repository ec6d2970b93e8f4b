//! OTP login
//!
//! Two steps: the mobile number, then the one-time password sent to it. Both
//! backend calls end in a single alert; acknowledging a success alert is what
//! moves the user on.

use super::{Page, PageContext, PageId, HOME_PAGE, LOGIN_PAGE};
use crate::app::SubmissionOutcome;
use crate::i18n::{Language, Text};
use crate::tui::{
    components::dialogs::{DialogController, DialogRequest, DialogText},
    events::{ApiEvent, ApiOutcome, Event},
    styles::Theme,
    utils::layout,
    Frame,
};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, error, info};

const PHONE_PATTERN: &str = r"^\d{10}$";
const OTP_PATTERN: &str = r"^\d{4,6}$";

static PHONE_REGEX: OnceLock<Option<Regex>> = OnceLock::new();
static OTP_REGEX: OnceLock<Option<Regex>> = OnceLock::new();

fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .map_err(|e| error!("Invalid input pattern '{}': {}", pattern, e))
        .ok()
}

fn is_match(cell: &'static OnceLock<Option<Regex>>, pattern: &str, input: &str) -> bool {
    cell.get_or_init(|| compile(pattern))
        .as_ref()
        .map(|re| re.is_match(input))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    Phone,
    Otp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    Nothing,
    /// The OTP was sent; ask for it
    AskForOtp,
    /// Verified; enter the app as this user
    Enter(String),
}

pub struct LoginPage {
    id: PageId,
    ctx: PageContext,
    language: Language,
    step: LoginStep,
    phone: String,
    otp: String,
    dialog: DialogController<LoginAction>,
    generation: u64,
    pending: bool,
}

impl LoginPage {
    pub fn new(ctx: PageContext) -> Self {
        let language = ctx.config.language;
        Self {
            id: LOGIN_PAGE.to_string(),
            ctx,
            language,
            step: LoginStep::Phone,
            phone: String::new(),
            otp: String::new(),
            dialog: DialogController::new(language),
            generation: 0,
            pending: false,
        }
    }

    pub fn step(&self) -> LoginStep {
        self.step
    }

    pub fn dialog(&self) -> &DialogController<LoginAction> {
        &self.dialog
    }

    fn notify(&mut self, title: impl Into<DialogText>, message: impl Into<DialogText>, action: LoginAction) {
        self.dialog.open(DialogRequest::acknowledge(title, message, action));
    }

    fn input_mut(&mut self) -> &mut String {
        match self.step {
            LoginStep::Phone => &mut self.phone,
            LoginStep::Otp => &mut self.otp,
        }
    }

    fn submit(&mut self) {
        if self.pending {
            return;
        }

        match self.step {
            LoginStep::Phone => {
                if !is_match(&PHONE_REGEX, PHONE_PATTERN, &self.phone) {
                    self.notify(Text::Error, Text::PhoneInvalid, LoginAction::Nothing);
                    return;
                }
                info!("Requesting OTP");
                self.spawn_request(|ctx, phone, _| async move {
                    let outcome = SubmissionOutcome::from_reply(ctx.api.send_otp(&phone).await);
                    ApiOutcome::OtpRequested(outcome)
                });
            }
            LoginStep::Otp => {
                if !is_match(&OTP_REGEX, OTP_PATTERN, &self.otp) {
                    self.notify(Text::Error, Text::OtpFormatInvalid, LoginAction::Nothing);
                    return;
                }
                info!("Verifying OTP");
                self.spawn_request(|ctx, phone, otp| async move {
                    let result = ctx
                        .api
                        .verify_otp(&phone, &otp)
                        .await
                        .map_err(|e| SubmissionOutcome::from_reply(Err(e)));
                    ApiOutcome::OtpVerified(result)
                });
            }
        }
    }

    fn spawn_request<F, Fut>(&mut self, request: F)
    where
        F: FnOnce(PageContext, String, String) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ApiOutcome> + Send + 'static,
    {
        self.pending = true;
        let ctx = self.ctx.clone();
        let page = self.id.clone();
        let generation = self.generation;
        let (phone, otp) = (self.phone.clone(), self.otp.clone());
        tokio::spawn(async move {
            let outcome = request(ctx.clone(), phone, otp).await;
            ctx.emit(Event::Api(ApiEvent {
                page,
                generation,
                outcome,
            }));
        });
    }

    fn run_action(&mut self, action: LoginAction) {
        match action {
            LoginAction::Nothing => {}
            LoginAction::AskForOtp => {
                self.otp.clear();
                self.step = LoginStep::Otp;
            }
            LoginAction::Enter(phone) => {
                self.otp.clear();
                self.step = LoginStep::Phone;
                self.ctx.emit(Event::LoggedIn(phone));
                self.ctx.navigate(HOME_PAGE);
            }
        }
    }

    fn input_line(&self, label: Text, value: &str, active: bool, theme: &Theme) -> Line<'static> {
        let style = if active { theme.focused_border_style() } else { theme.dim_style() };
        let mut spans = vec![
            Span::styled(format!("{}: ", label.tr(self.language)), style),
            Span::styled(value.to_string(), theme.text_style()),
        ];
        if active && !self.pending {
            spans.push(Span::styled("█", theme.text_style()));
        }
        Line::from(spans)
    }
}

#[async_trait]
impl Page for LoginPage {
    fn id(&self) -> &PageId {
        &self.id
    }

    fn title(&self, lang: Language) -> &str {
        Text::LoginTitle.tr(lang)
    }

    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        if self.dialog.is_visible() {
            if let Some(resolution) = self.dialog.handle_key(event) {
                self.run_action(resolution.action);
            }
            return Ok(());
        }

        if self.pending {
            return Ok(());
        }

        match (event.code, event.modifiers) {
            (KeyCode::Enter, _) => self.submit(),
            (KeyCode::Esc, _) if self.step == LoginStep::Otp => {
                self.otp.clear();
                self.step = LoginStep::Phone;
            }
            (KeyCode::Backspace, _) => {
                self.input_mut().pop();
            }
            (KeyCode::Char(c), m) if c.is_ascii_digit() && !m.contains(KeyModifiers::CONTROL) => {
                let max = if self.step == LoginStep::Phone { 10 } else { 6 };
                let input = self.input_mut();
                if input.len() < max {
                    input.push(c);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_api_event(&mut self, generation: u64, outcome: ApiOutcome) -> Result<()> {
        if generation != self.generation {
            debug!("Discarding stale login result");
            return Ok(());
        }
        self.pending = false;

        match outcome {
            ApiOutcome::OtpRequested(outcome) if outcome.is_success() => {
                self.notify(Text::Success, Text::OtpSent, LoginAction::AskForOtp);
            }
            ApiOutcome::OtpRequested(outcome) => {
                let title = DialogText::localized(|lang| outcome.notice(lang, Text::OtpSent).title);
                let message = DialogText::localized(|lang| outcome.notice(lang, Text::OtpSent).message);
                self.notify(title, message, LoginAction::Nothing);
            }
            ApiOutcome::OtpVerified(Ok(reply)) => {
                if reply.token.is_some() {
                    debug!("Backend issued a session token");
                }
                let phone = self.phone.clone();
                self.notify(Text::Success, Text::OtpVerified, LoginAction::Enter(phone));
            }
            ApiOutcome::OtpVerified(Err(outcome)) => {
                let message = DialogText::localized(|lang| match &outcome {
                    SubmissionOutcome::Failed { message: None } => Text::OtpInvalid.tr(lang).to_string(),
                    other => other.notice(lang, Text::OtpVerified).message,
                });
                self.notify(Text::Error, message, LoginAction::Nothing);
            }
            ApiOutcome::PatientIds(_) | ApiOutcome::Submitted(_) => {}
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let (body, footer) = layout::with_footer(area);
        let panel = layout::centered_rect_percent(60, 50, body);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.focused_border_style())
            .title(format!(
                " {} • {} ",
                Text::AppTitle.tr(self.language),
                Text::LoginTitle.tr(self.language)
            ));
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        let phone_active = self.step == LoginStep::Phone;
        frame.render_widget(
            Paragraph::new(self.input_line(Text::PhoneLabel, &self.phone, phone_active, theme)),
            rows[0],
        );
        if self.step == LoginStep::Otp {
            frame.render_widget(
                Paragraph::new(self.input_line(Text::OtpLabel, &self.otp, true, theme)),
                rows[1],
            );
        }

        let action = match self.step {
            LoginStep::Phone => Text::SendOtp,
            LoginStep::Otp => Text::VerifyOtp,
        };
        let hint = if self.pending { Text::Submitting } else { action };
        frame.render_widget(
            Paragraph::new(format!("[ Enter: {} ]", hint.tr(self.language))).style(theme.dim_style()),
            rows[2],
        );

        frame.render_widget(
            Paragraph::new(Text::LoginHelp.tr(self.language)).style(theme.dim_style()),
            footer,
        );

        self.dialog.render(frame, area, theme);
    }

    async fn on_enter(&mut self) -> Result<()> {
        self.generation += 1;
        self.pending = false;
        self.dialog.clear();
        Ok(())
    }

    async fn on_exit(&mut self) -> Result<()> {
        self.generation += 1;
        self.pending = false;
        self.dialog.clear();
        Ok(())
    }

    fn set_language(&mut self, language: Language) {
        self.language = language;
        self.dialog.set_language(language);
    }

    fn has_dialog(&self) -> bool {
        self.dialog.is_visible()
    }

    fn is_busy(&self) -> bool {
        self.pending
    }

    fn help_text(&self, lang: Language) -> &str {
        Text::LoginHelp.tr(lang)
    }
}
