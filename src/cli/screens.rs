//! Screens command: list the data entry screens and their fields

use anyhow::Result;
use clap::Args;
use serde_json::{json, Value};

use crate::config::Config;
use crate::screens::{FieldKind, FieldSpec, ScreenKind};

/// List the data entry screens
#[derive(Debug, Args)]
pub struct ScreensCommand {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: ScreensFormat,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ScreensFormat {
    Text,
    Json,
}

impl ScreensCommand {
    pub fn execute(&self, config: &Config) -> Result<()> {
        let output = match self.format {
            ScreensFormat::Text => render_text(config),
            ScreensFormat::Json => serde_json::to_string_pretty(&render_json())?,
        };
        println!("{}", output);
        Ok(())
    }
}

fn kind_name(field: &FieldSpec) -> String {
    match field.kind {
        FieldKind::Text => "text".to_string(),
        FieldKind::Number => "number".to_string(),
        FieldKind::PatientId => "patient id".to_string(),
        FieldKind::Choice(options) => {
            let values: Vec<&str> = options.iter().map(|o| o.value).collect();
            format!("one of: {}", values.join(" | "))
        }
    }
}

fn render_text(config: &Config) -> String {
    let mut out = String::new();
    for kind in ScreenKind::ALL {
        let spec = kind.spec();
        out.push_str(&format!(
            "{} ({}) -> POST {}/{}\n",
            kind,
            spec.title.get(config.language),
            config.api_base(),
            spec.endpoint
        ));
        for field in spec.fields {
            out.push_str(&format!(
                "  {:<16} {:<9} {}\n",
                field.name,
                if field.required { "required" } else { "optional" },
                kind_name(field)
            ));
        }
    }
    out.trim_end().to_string()
}

fn render_json() -> Value {
    let screens: Vec<Value> = ScreenKind::ALL
        .iter()
        .map(|kind| {
            let spec = kind.spec();
            let fields: Vec<Value> = spec
                .fields
                .iter()
                .map(|field| {
                    json!({
                        "name": field.name,
                        "label": field.label.en,
                        "required": field.required,
                        "kind": kind_name(field),
                    })
                })
                .collect();
            json!({
                "name": kind.name(),
                "title": spec.title.en,
                "endpoint": spec.endpoint,
                "fields": fields,
            })
        })
        .collect();
    Value::Array(screens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lists_every_screen() {
        let text = render_text(&Config::default());
        for kind in ScreenKind::ALL {
            assert!(text.contains(kind.name()));
        }
        assert!(text.contains("POST http://localhost:5000/api/water-intake"));
        assert!(text.contains("one of: Low | Moderate | High"));
    }

    #[test]
    fn test_json_shape() {
        let json = render_json();
        let screens = json.as_array().unwrap();
        assert_eq!(screens.len(), ScreenKind::ALL.len());
        assert_eq!(screens[0]["name"], "registration");
        assert_eq!(screens[0]["endpoint"], "patients");
        assert_eq!(screens[0]["fields"][0]["name"], "patientID");
    }
}
