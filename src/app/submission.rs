//! Shared submission flow
//!
//! validate → call the backend → branch into exactly one notice. Every data
//! entry screen and the `submit` command go through here, so the branching
//! (validation, success, conflict, failure with server message or fallback) is
//! written once.

use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiError, ApiResult, HealthApi, ServerReply};
use crate::i18n::{Language, Text};
use crate::screens::{FormState, ValidationError};

/// Title and message of the single alert a flow ends in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Rejected locally; nothing was sent
    Invalid(ValidationError),
    Saved { message: Option<String> },
    /// The backend already holds a record with the same unique key
    Conflict { message: String },
    Failed { message: Option<String> },
}

impl SubmissionOutcome {
    /// Classify a backend reply
    pub fn from_reply(result: ApiResult<ServerReply>) -> Self {
        match result {
            Ok(reply) => SubmissionOutcome::Saved {
                message: reply.message,
            },
            Err(ApiError::Conflict(message)) => {
                debug!("Backend reported a duplicate: {}", message);
                SubmissionOutcome::Conflict { message }
            }
            Err(err) => {
                warn!("Submission failed: {}", err);
                SubmissionOutcome::Failed {
                    message: err.server_message().map(str::to_string),
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Saved { .. })
    }

    /// The alert for this outcome; `success` is the localized success message
    pub fn notice(&self, lang: Language, success: Text) -> Notice {
        match self {
            SubmissionOutcome::Invalid(err) => Notice::new(Text::Validation.tr(lang), err.message(lang)),
            SubmissionOutcome::Saved { .. } => Notice::new(Text::Success.tr(lang), success.tr(lang)),
            SubmissionOutcome::Conflict { .. } => {
                Notice::new(Text::Conflict.tr(lang), Text::DuplicateRecord.tr(lang))
            }
            SubmissionOutcome::Failed { message } => Notice::new(
                Text::Error.tr(lang),
                message
                    .clone()
                    .unwrap_or_else(|| Text::GenericFailure.tr(lang).to_string()),
            ),
        }
    }
}

/// A validated request ready to be sent
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSubmission {
    pub endpoint: &'static str,
    pub payload: Value,
}

/// Validate `form` and build its request body
pub fn prepare(form: &FormState) -> Result<PreparedSubmission, ValidationError> {
    form.validate()?;
    Ok(PreparedSubmission {
        endpoint: form.spec().endpoint,
        payload: form.to_payload(),
    })
}

/// Send a prepared submission
pub async fn send(api: &dyn HealthApi, submission: &PreparedSubmission) -> SubmissionOutcome {
    debug!("Submitting to {}", submission.endpoint);
    SubmissionOutcome::from_reply(api.submit(submission.endpoint, &submission.payload).await)
}

/// Validate and, when valid, send `form`
pub async fn submit_form(api: &dyn HealthApi, form: &FormState) -> SubmissionOutcome {
    match prepare(form) {
        Ok(submission) => send(api, &submission).await,
        Err(err) => {
            debug!("Validation failed on '{}'", err.field_name());
            SubmissionOutcome::Invalid(err)
        }
    }
}
