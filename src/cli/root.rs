use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::app::App;
use crate::config::Config;
use crate::i18n::Language;
use super::screens::ScreensCommand;
use super::submit::SubmitCommand;

/// CareLog - patient health records from your terminal
#[derive(Parser)]
#[command(
    name = "carelog",
    version,
    about = "Patient health records from your terminal",
    long_about = r#"CareLog records patient registrations, clinical and metabolic profiles,
sleep, diet, water intake, exercise and medication against a health backend.

Examples:
  carelog                                     # Start the interactive app
  carelog --lang ta                           # Start in Tamil
  carelog submit water-intake entry.json      # Submit one form from a file
  echo '{"patientID":"P001","glasses":8}' | carelog submit water-intake
  carelog screens                             # List screens and their fields"#
)]
pub struct Cli {
    /// Base URL of the health backend
    #[arg(short = 'u', long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Display language (en, ta)
    #[arg(short = 'l', long = "lang", global = true)]
    pub lang: Option<Language>,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate and submit one screen's values non-interactively
    Submit(SubmitCommand),

    /// List the data entry screens and their fields
    Screens(ScreensCommand),
}

impl Cli {
    /// Apply command line overrides on top of file and environment settings
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(lang) = self.lang {
            config.language = lang;
        }
    }

    pub async fn execute(self, config: Config) -> Result<()> {
        if self.debug {
            debug!("Debug logging enabled");
        }

        match self.command {
            Some(Commands::Submit(submit_cmd)) => submit_cmd.execute(&config).await,
            Some(Commands::Screens(screens_cmd)) => screens_cmd.execute(&config),
            None => Self::start_interactive_mode(config).await,
        }
    }

    async fn start_interactive_mode(config: Config) -> Result<()> {
        info!("Starting interactive mode against {}", config.api_base());

        // Validate the configuration
        config.validate()?;

        let app = App::new(config)?;
        app.run_interactive().await?;

        info!("Application finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_override_config() {
        let cli = Cli::try_parse_from([
            "carelog",
            "--base-url",
            "https://health.example.org/api",
            "--lang",
            "ta",
            "screens",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.base_url, "https://health.example.org/api");
        assert_eq!(config.language, Language::Tamil);
        assert!(matches!(cli.command, Some(Commands::Screens(_))));
    }

    #[test]
    fn test_submit_arguments() {
        let cli = Cli::try_parse_from(["carelog", "submit", "water_intake", "entry.json", "-d"]).unwrap();
        assert!(cli.debug);
        match cli.command {
            Some(Commands::Submit(cmd)) => {
                assert_eq!(cmd.screen, crate::screens::ScreenKind::WaterIntake);
                assert_eq!(cmd.file.as_deref(), Some(std::path::Path::new("entry.json")));
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        assert!(Cli::try_parse_from(["carelog", "--lang", "fr"]).is_err());
    }
}
