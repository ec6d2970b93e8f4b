//! Core application logic and orchestration
//!
//! Owns the configuration and the backend client, and runs either the TUI or a
//! single non-interactive submission.

pub mod submission;

pub use submission::{Notice, SubmissionOutcome};

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    api::{HealthApi, HttpHealthApi},
    config::Config,
    i18n::Text,
    screens::{FormState, ScreenKind},
    tui,
};

/// Main application structure
pub struct App {
    config: Config,
    api: Arc<dyn HealthApi>,
}

impl App {
    /// Create a new application instance talking to the configured backend
    pub fn new(config: Config) -> Result<Self> {
        debug!("Creating new App instance for {}", config.api_base());
        let api = HttpHealthApi::new(&config)?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    pub fn with_api(config: Config, api: Arc<dyn HealthApi>) -> Self {
        Self { config, api }
    }

    /// Run the application in interactive mode (TUI)
    pub async fn run_interactive(&self) -> Result<()> {
        info!("Starting interactive mode");
        tui::run(self.config.clone(), self.api.clone()).await
    }

    /// Validate and submit one screen's values without the TUI.
    ///
    /// Returns the notice the screen would have shown and whether it reports
    /// success.
    pub async fn run_non_interactive(
        &self,
        screen: ScreenKind,
        values: &Map<String, Value>,
    ) -> Result<(Notice, bool)> {
        info!("Submitting '{}' non-interactively", screen);

        let outcome = match FormState::from_json(screen.spec(), values) {
            Ok(form) => submission::submit_form(self.api.as_ref(), &form).await,
            Err(err) => SubmissionOutcome::Invalid(err),
        };

        let notice = outcome.notice(self.config.language, Text::SavedSuccessfully);
        Ok((notice, outcome.is_success()))
    }

    /// Parse the JSON document given to the `submit` command
    pub fn parse_values(input: &str) -> Result<Map<String, Value>> {
        match serde_json::from_str::<Value>(input)? {
            Value::Object(map) => Ok(map),
            other => Err(anyhow!("expected a JSON object of field values, got {}", kind_of(&other))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockHealthApi, MockReply};
    use crate::i18n::Language;

    fn app_with(api: MockHealthApi) -> (App, Arc<MockHealthApi>) {
        let api = Arc::new(api);
        (App::with_api(Config::default(), api.clone()), api)
    }

    #[tokio::test]
    async fn test_non_interactive_success() {
        let (app, api) = app_with(MockHealthApi::new());
        let values = App::parse_values(r#"{"patientID": "P002", "glasses": 5}"#).unwrap();

        let (notice, ok) = app.run_non_interactive(ScreenKind::WaterIntake, &values).await.unwrap();

        assert!(ok);
        assert_eq!(notice.title, "Success");
        assert_eq!(api.calls(), vec!["submit:water-intake".to_string()]);
    }

    #[tokio::test]
    async fn test_non_interactive_unknown_field_is_invalid() {
        let (app, api) = app_with(MockHealthApi::new());
        let values = App::parse_values(r#"{"patientID": "P002", "cups": 5}"#).unwrap();

        let (notice, ok) = app.run_non_interactive(ScreenKind::WaterIntake, &values).await.unwrap();

        assert!(!ok);
        assert_eq!(notice.title, "Missing information");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_non_interactive_uses_configured_language() {
        let api = Arc::new(MockHealthApi::new().with_submit_reply(MockReply::Server(500, String::new())));
        let config = Config {
            language: Language::Tamil,
            ..Config::default()
        };
        let app = App::with_api(config, api);
        let values = App::parse_values(r#"{"patientID": "P002", "glasses": 5}"#).unwrap();

        let (notice, ok) = app.run_non_interactive(ScreenKind::WaterIntake, &values).await.unwrap();

        assert!(!ok);
        assert_eq!(notice.title, "பிழை");
    }

    #[test]
    fn test_parse_values_requires_object() {
        assert!(App::parse_values("[1, 2]").is_err());
        assert!(App::parse_values("not json").is_err());
        assert_eq!(App::parse_values("{}").unwrap().len(), 0);
    }
}
