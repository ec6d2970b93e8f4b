use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::app::App;
use crate::config::Config;
use crate::screens::ScreenKind;

/// Submit one screen's values non-interactively
#[derive(Args)]
pub struct SubmitCommand {
    /// Screen to submit, e.g. water-intake
    pub screen: ScreenKind,

    /// JSON file with the field values. If not provided, will read from stdin
    pub file: Option<PathBuf>,
}

impl SubmitCommand {
    pub async fn execute(&self, config: &Config) -> Result<()> {
        debug!("Executing submit command for '{}'", self.screen);

        let input = self.read_input()?;
        if input.trim().is_empty() {
            return Err(anyhow!("No field values provided. Pass a JSON file or pipe JSON via stdin."));
        }

        let values = App::parse_values(&input)?;

        // Validate the configuration
        config.validate()?;

        let app = App::new(config.clone())?;
        let (notice, ok) = app.run_non_interactive(self.screen, &values).await?;

        // The same title and message the screen's alert would show
        println!("{}: {}", notice.title, notice.message);

        if ok {
            info!("Submitted '{}'", self.screen);
            Ok(())
        } else {
            Err(anyhow!("{} was not saved", self.screen))
        }
    }

    fn read_input(&self) -> Result<String> {
        match &self.file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            None => {
                debug!("Reading field values from stdin");
                let mut buffer = String::new();
                io::stdin()
                    .read_to_string(&mut buffer)
                    .map_err(|e| anyhow!("Failed to read from stdin: {}", e))?;
                Ok(buffer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reads_values_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("entry.json");
        std::fs::write(&path, r#"{"patientID": "P001", "glasses": 8}"#).unwrap();

        let cmd = SubmitCommand {
            screen: ScreenKind::WaterIntake,
            file: Some(path),
        };
        let values = App::parse_values(&cmd.read_input().unwrap()).unwrap();
        assert_eq!(values["glasses"], 8);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let cmd = SubmitCommand {
            screen: ScreenKind::WaterIntake,
            file: Some(PathBuf::from("/nonexistent/entry.json")),
        };
        let err = cmd.read_input().unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
