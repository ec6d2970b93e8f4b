//! Alert slot owned by a screen
//!
//! The controller is the resume protocol between a screen and its alert:
//!
//! - a screen holds at most one visible request (`Idle → Awaiting`);
//! - a press resolves the request, hands back exactly one resume action and
//!   closes the slot in the same call (`Awaiting → Resolved → Idle`);
//! - the slot is already closed when the caller runs the action, so a follow-up
//!   alert opened by that action never overlaps the previous one;
//! - nothing here runs on a timer.
//!
//! A request opened while another is visible replaces it by default. The
//! replaced request resolves nothing and its [`DialogTicket`] reports
//! cancellation. [`SlotPolicy::Queue`] keeps requests in FIFO order instead.

use super::alert::AlertDialog;
use super::types::{
    DialogButton, DialogChoice, DialogInput, DialogMode, DialogRequest, DialogState, DialogText,
};
use crate::i18n::Language;
use crate::tui::{components::Component, styles::Theme, Frame};
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use std::collections::VecDeque;
use tokio::sync::oneshot;
use tracing::debug;

/// What happens when a request arrives while another one is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPolicy {
    /// The new request takes the slot; the old one is cancelled
    #[default]
    Replace,
    /// The new request waits until the visible one is closed
    Queue,
}

/// The answer and the caller's action for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<A> {
    pub choice: DialogChoice,
    pub action: A,
}

/// Handle for awaiting the answer to a request from async code
#[derive(Debug)]
pub struct DialogTicket {
    receiver: oneshot::Receiver<DialogChoice>,
}

impl DialogTicket {
    /// The user's answer, or `None` if the request was replaced or torn down
    pub async fn outcome(self) -> Option<DialogChoice> {
        self.receiver.await.ok()
    }

    /// `true` only when the user affirmed a confirm request
    pub async fn confirmed(self) -> bool {
        self.outcome().await == Some(DialogChoice::Affirmed)
    }
}

struct ActiveDialog<A> {
    request: DialogRequest<A>,
    view: AlertDialog,
    reply: oneshot::Sender<DialogChoice>,
}

type DismissObserver = Box<dyn FnMut() + Send + Sync>;

/// Single alert slot plus its resume protocol
pub struct DialogController<A> {
    active: Option<ActiveDialog<A>>,
    queue: VecDeque<(DialogRequest<A>, oneshot::Sender<DialogChoice>)>,
    state: DialogState,
    policy: SlotPolicy,
    language: Language,
    on_dismiss: Option<DismissObserver>,
    dismissals: u64,
}

impl<A> DialogController<A> {
    pub fn new(language: Language) -> Self {
        Self {
            active: None,
            queue: VecDeque::new(),
            state: DialogState::Idle,
            policy: SlotPolicy::default(),
            language,
            on_dismiss: None,
            dismissals: 0,
        }
    }

    pub fn with_policy(mut self, policy: SlotPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run `observer` every time the slot closes after being visible
    pub fn set_dismiss_observer(&mut self, observer: impl FnMut() + Send + Sync + 'static) {
        self.on_dismiss = Some(Box::new(observer));
    }

    /// Show `request`, subject to the slot policy
    pub fn open(&mut self, request: DialogRequest<A>) -> DialogTicket {
        let (reply, receiver) = oneshot::channel();

        if self.active.is_some() {
            match self.policy {
                SlotPolicy::Replace => {
                    debug!("Replacing visible alert with '{}'", request.title);
                    // Dropping the old sender cancels its ticket
                    self.active = None;
                }
                SlotPolicy::Queue => {
                    debug!("Queueing alert '{}'", request.title);
                    self.queue.push_back((request, reply));
                    return DialogTicket { receiver };
                }
            }
        }

        self.activate(request, reply);
        DialogTicket { receiver }
    }

    /// Show a one-button alert
    pub fn notify(
        &mut self,
        title: impl Into<DialogText>,
        message: impl Into<DialogText>,
        on_acknowledge: A,
    ) -> DialogTicket {
        self.open(DialogRequest::acknowledge(title, message, on_acknowledge))
    }

    /// Show a Yes/No alert
    pub fn confirm(
        &mut self,
        title: impl Into<DialogText>,
        message: impl Into<DialogText>,
        on_affirm: A,
        on_decline: A,
    ) -> DialogTicket {
        self.open(DialogRequest::confirm(title, message, on_affirm, on_decline))
    }

    fn activate(&mut self, request: DialogRequest<A>, reply: oneshot::Sender<DialogChoice>) {
        debug!("Showing alert '{}' ({:?})", request.title, request.mode());
        let view = AlertDialog::from_request(&request, self.language);
        self.active = Some(ActiveDialog { request, view, reply });
        self.state = DialogState::Awaiting;
    }

    pub fn is_visible(&self) -> bool {
        self.active.is_some()
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn mode(&self) -> Option<DialogMode> {
        self.active.as_ref().map(|active| active.request.mode())
    }

    /// The visible request
    pub fn request(&self) -> Option<&DialogRequest<A>> {
        self.active.as_ref().map(|active| &active.request)
    }

    /// The visible alert's view
    pub fn view(&self) -> Option<&AlertDialog> {
        self.active.as_ref().map(|active| &active.view)
    }

    /// Requests waiting behind the visible one
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// How many times a visible alert has been closed
    pub fn dismissals(&self) -> u64 {
        self.dismissals
    }

    /// Feed a key to the visible alert
    pub fn handle_key(&mut self, event: KeyEvent) -> Option<Resolution<A>> {
        let input = self.active.as_mut()?.view.interpret_key(event)?;
        self.press(input)
    }

    /// Resolve the visible alert with `input` and close it.
    ///
    /// Returns the resume action for the caller to run; `None` when nothing is
    /// visible, so repeated presses resolve nothing.
    pub fn press(&mut self, input: DialogInput) -> Option<Resolution<A>> {
        let ActiveDialog { request, reply, .. } = self.active.take()?;

        let choice = request.mode().choice_for(input);
        self.state = DialogState::Resolved(choice);
        debug!("Alert '{}' resolved: {:?}", request.title, choice);

        let action = request.kind.into_action(choice);
        let _ = reply.send(choice);
        self.close();

        Some(Resolution { choice, action })
    }

    /// Close the visible alert without resolving it; no-op when idle
    pub fn dismiss(&mut self) {
        if self.active.take().is_some() {
            self.close();
        }
    }

    /// Drop the visible alert and everything queued without running anything
    pub fn clear(&mut self) {
        self.active = None;
        self.queue.clear();
        self.state = DialogState::Idle;
    }

    fn close(&mut self) {
        self.state = DialogState::Idle;
        self.dismissals += 1;
        if let Some(observer) = self.on_dismiss.as_mut() {
            observer();
        }

        if let Some((request, reply)) = self.queue.pop_front() {
            self.activate(request, reply);
        }
    }

    /// Switch the language used for default button labels
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        if let Some(active) = self.active.as_mut() {
            let focused: DialogButton = active.view.focused();
            active.view = AlertDialog::from_request(&active.request, language);
            active.view.restore_focus(focused);
        }
    }

    /// Render the visible alert over `area`
    pub fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if let Some(active) = self.active.as_mut() {
            active.view.render(frame, area, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Text;
    use crate::tui::components::dialogs::types::DialogButton;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Action {
        Nothing,
        Navigate(&'static str),
        ClearAndLeave,
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn counting_controller() -> (DialogController<Action>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let mut controller = DialogController::new(Language::English);
        let observed = count.clone();
        controller.set_dismiss_observer(move || {
            observed.fetch_add(1, Ordering::SeqCst);
        });
        (controller, count)
    }

    #[test]
    fn test_idle_controller_is_inert() {
        let (mut controller, dismissed) = counting_controller();

        assert!(!controller.is_visible());
        assert_eq!(controller.state(), DialogState::Idle);
        assert!(controller.handle_key(key(KeyCode::Enter)).is_none());
        assert!(controller.press(DialogInput::Back).is_none());

        controller.dismiss();
        controller.dismiss();
        assert_eq!(dismissed.load(Ordering::SeqCst), 0);
        assert_eq!(controller.state(), DialogState::Idle);
    }

    #[test]
    fn test_error_notice_closes_without_navigation() {
        let (mut controller, dismissed) = counting_controller();
        controller.notify("Error", "Failed to fetch patient IDs.", Action::Nothing);

        let view = controller.view().unwrap();
        assert_eq!(view.buttons().collect::<Vec<_>>(), vec![(DialogButton::Ok, "OK")]);
        assert_eq!(controller.state(), DialogState::Awaiting);

        let resolution = controller.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(resolution.choice, DialogChoice::Acknowledged);
        assert_eq!(resolution.action, Action::Nothing);
        assert!(!controller.is_visible());
        assert_eq!(dismissed.load(Ordering::SeqCst), 1);

        // A second press has nothing to resolve
        assert!(controller.handle_key(key(KeyCode::Enter)).is_none());
        assert_eq!(dismissed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_acknowledge_fires_once_then_closes() {
        let (mut controller, dismissed) = counting_controller();
        controller.notify("Success", "Data saved successfully.", Action::Navigate("home"));

        let first = controller.press(DialogInput::Press(DialogButton::Ok));
        let second = controller.press(DialogInput::Press(DialogButton::Ok));

        assert_eq!(first.map(|r| r.action), Some(Action::Navigate("home")));
        assert!(second.is_none());
        assert_eq!(dismissed.load(Ordering::SeqCst), 1);
        assert_eq!(controller.dismissals(), 1);
    }

    #[test]
    fn test_cancel_confirmation_yes_no_and_back() {
        let cases = [
            (key(KeyCode::Char('y')), DialogChoice::Affirmed, Action::ClearAndLeave),
            (key(KeyCode::Char('n')), DialogChoice::Declined, Action::Nothing),
            (key(KeyCode::Esc), DialogChoice::Declined, Action::Nothing),
            // Focus starts on "No"
            (key(KeyCode::Enter), DialogChoice::Declined, Action::Nothing),
        ];

        for (input, expected_choice, expected_action) in cases {
            let (mut controller, dismissed) = counting_controller();
            controller.open(
                DialogRequest::confirm(
                    "Cancel",
                    "Are you sure you want to cancel?",
                    Action::ClearAndLeave,
                    Action::Nothing,
                )
                .with_yes_text("Yes")
                .with_no_text("No"),
            );

            let resolution = controller.handle_key(input).unwrap();
            assert_eq!(resolution.choice, expected_choice);
            assert_eq!(resolution.action, expected_action);
            assert!(!controller.is_visible());
            assert_eq!(dismissed.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_focus_moves_do_not_resolve() {
        let (mut controller, _) = counting_controller();
        controller.confirm("Cancel", "Sure?", Action::ClearAndLeave, Action::Nothing);

        assert!(controller.handle_key(key(KeyCode::Tab)).is_none());
        assert!(controller.is_visible());

        let resolution = controller.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(resolution.action, Action::ClearAndLeave);
    }

    #[tokio::test]
    async fn test_replace_cancels_previous_ticket() {
        let (mut controller, dismissed) = counting_controller();
        let first = controller.notify("Error", "first", Action::Nothing);
        let second = controller.confirm("Cancel", "second", Action::ClearAndLeave, Action::Nothing);

        assert_eq!(controller.view().unwrap().message(), "second");
        assert_eq!(controller.queued(), 0);
        // Replacing is not a dismissal
        assert_eq!(dismissed.load(Ordering::SeqCst), 0);

        controller.press(DialogInput::Press(DialogButton::Yes));
        assert_eq!(first.outcome().await, None);
        assert!(second.confirmed().await);
    }

    #[tokio::test]
    async fn test_queue_policy_shows_requests_in_order() {
        let mut controller = DialogController::new(Language::English).with_policy(SlotPolicy::Queue);
        let first = controller.notify("One", "first", Action::Nothing);
        let second = controller.notify("Two", "second", Action::Navigate("home"));
        assert_eq!(controller.queued(), 1);

        let resolution = controller.press(DialogInput::Press(DialogButton::Ok)).unwrap();
        assert_eq!(resolution.action, Action::Nothing);
        assert_eq!(controller.view().unwrap().title(), "Two");
        assert_eq!(controller.state(), DialogState::Awaiting);

        let resolution = controller.press(DialogInput::Back).unwrap();
        assert_eq!(resolution.action, Action::Navigate("home"));
        assert_eq!(first.outcome().await, Some(DialogChoice::Acknowledged));
        assert_eq!(second.outcome().await, Some(DialogChoice::Acknowledged));
    }

    #[tokio::test]
    async fn test_dismiss_and_clear_run_no_action() {
        let (mut controller, dismissed) = counting_controller();
        let ticket = controller.confirm("Cancel", "Sure?", Action::ClearAndLeave, Action::Nothing);

        controller.dismiss();
        assert!(!controller.is_visible());
        assert_eq!(dismissed.load(Ordering::SeqCst), 1);
        assert!(!ticket.confirmed().await);

        let ticket = controller.notify("Error", "torn down", Action::Nothing);
        controller.clear();
        assert_eq!(ticket.outcome().await, None);
        assert_eq!(dismissed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_language_switch_keeps_focus() {
        let mut controller: DialogController<Action> = DialogController::new(Language::English);
        controller.confirm("Cancel", "Sure?", Action::ClearAndLeave, Action::Nothing);
        controller.handle_key(key(KeyCode::Right));

        controller.set_language(Language::Tamil);
        let view = controller.view().unwrap();
        assert_eq!(view.focused(), DialogButton::Yes);
        let labels: Vec<_> = view.buttons().map(|(_, label)| label).collect();
        assert_eq!(labels, vec!["இல்லை", "ஆம்"]);
    }

    #[test]
    fn test_language_switch_translates_table_text_only() {
        let mut controller: DialogController<Action> = DialogController::new(Language::English);
        controller.confirm(Text::Cancel, Text::ConfirmCancel, Action::ClearAndLeave, Action::Nothing);
        assert_eq!(controller.view().unwrap().title(), "Cancel");

        controller.set_language(Language::Tamil);
        let view = controller.view().unwrap();
        assert_eq!(view.title(), "ரத்து");
        assert_eq!(view.message(), "நிச்சயமாக ரத்து செய்ய விரும்புகிறீர்களா?");

        // Server text has no translation and stays as sent
        controller.notify(Text::Error, "Database unavailable", Action::Nothing);
        assert_eq!(controller.view().unwrap().message(), "Database unavailable");
    }
}
