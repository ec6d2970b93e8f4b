//! Alert and confirmation dialogs
//!
//! Every screen owns one [`DialogController`] and uses it as its only
//! notification surface. The controller is generic over the screen's own resume
//! action type, so each screen decides what "OK", "Yes" and "No" lead to.

pub mod alert;
pub mod controller;
pub mod types;

pub use alert::AlertDialog;
pub use controller::{DialogController, DialogTicket, Resolution, SlotPolicy};
pub use types::*;
