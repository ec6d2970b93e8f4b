use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::ServerReply;
use crate::app::SubmissionOutcome;
use crate::tui::pages::PageId;

/// Result of a backend call made on behalf of a page
#[derive(Debug, Clone)]
pub enum ApiOutcome {
    /// Patient ids for the id picker, or the error text
    PatientIds(Result<Vec<String>, String>),

    /// A form submission finished
    Submitted(SubmissionOutcome),

    /// `send-otp` finished
    OtpRequested(SubmissionOutcome),

    /// `verify-otp` finished; the reply carries the session token
    OtpVerified(Result<ServerReply, SubmissionOutcome>),
}

/// A backend result addressed to the page that started the call
#[derive(Debug, Clone)]
pub struct ApiEvent {
    pub page: PageId,
    /// Page generation the call was started in; stale generations are dropped
    pub generation: u64,
    pub outcome: ApiOutcome,
}

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Page navigation event
    PageChange(PageId),

    /// A backend call finished
    Api(ApiEvent),

    /// OTP login succeeded for this phone number
    LoggedIn(String),
}

/// Sender half handed to pages and background tasks
pub type EventSender = mpsc::UnboundedSender<Event>;

/// Event handler for managing input events
pub struct EventHandler {
    /// Event receiver channel
    receiver: mpsc::UnboundedReceiver<Event>,

    /// Event sender channel
    sender: EventSender,
}

impl EventHandler {
    /// Start reading terminal input; a tick is emitted after each idle `tick_rate`
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let input_sender = sender.clone();
        tokio::task::spawn_blocking(move || {
            loop {
                let event = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(event) => match Self::convert_crossterm_event(event) {
                            Some(event) => event,
                            None => continue,
                        },
                        Err(e) => {
                            debug!("Terminal read failed: {}", e);
                            break;
                        }
                    },
                    Ok(false) => Event::Tick,
                    Err(e) => {
                        debug!("Terminal poll failed: {}", e);
                        break;
                    }
                };

                // The app is gone once the receiver is dropped
                if input_sender.send(event).is_err() {
                    break;
                }
            }
        });

        Self { receiver, sender }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                Some(Event::Key(key_event))
            }
            CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            _ => None,
        }
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }
}
