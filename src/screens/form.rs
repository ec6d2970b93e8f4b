//! Form state owned by a data entry screen
//!
//! A flat mapping of field name to string value plus the focused field. Values
//! are never persisted; they are cleared on "Clear" and after a successful save.

use chrono::Local;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::{FieldKind, FieldSpec, ScreenSpec};
use crate::i18n::{Language, Text};

/// Key added to every payload with the local submission time
pub const SUBMITTED_AT_FIELD: &str = "submittedAt";

/// First failing field of a form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field '{}'", .0.name)]
    Missing(&'static FieldSpec),

    #[error("field '{}' is not a number", .0.name)]
    NotNumber(&'static FieldSpec),

    #[error("field '{}' has an invalid option", .0.name)]
    InvalidChoice(&'static FieldSpec),

    #[error("unknown field '{0}'")]
    UnknownField(String),
}

impl ValidationError {
    /// Field-specific message for the validation dialog
    pub fn message(&self, lang: Language) -> String {
        match self {
            ValidationError::Missing(field) => {
                Text::FieldRequired.fill(lang, "field", field.label.get(lang))
            }
            ValidationError::NotNumber(field) => {
                Text::FieldNotNumber.fill(lang, "field", field.label.get(lang))
            }
            ValidationError::InvalidChoice(field) => {
                Text::FieldInvalidChoice.fill(lang, "field", field.label.get(lang))
            }
            ValidationError::UnknownField(name) => Text::FieldUnknown.fill(lang, "field", name),
        }
    }

    pub fn field_name(&self) -> &str {
        match self {
            ValidationError::Missing(field)
            | ValidationError::NotNumber(field)
            | ValidationError::InvalidChoice(field) => field.name,
            ValidationError::UnknownField(name) => name,
        }
    }
}

/// Editable values of one screen
#[derive(Debug, Clone)]
pub struct FormState {
    spec: &'static ScreenSpec,
    values: Vec<String>,
    focused: usize,
    patient_ids: Vec<String>,
}

impl FormState {
    pub fn new(spec: &'static ScreenSpec) -> Self {
        Self {
            spec,
            values: vec![String::new(); spec.fields.len()],
            focused: 0,
            patient_ids: Vec::new(),
        }
    }

    /// Build a form from a JSON object of field values
    pub fn from_json(spec: &'static ScreenSpec, values: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut form = Self::new(spec);
        for (name, value) in values {
            let index = spec
                .fields
                .iter()
                .position(|f| f.name == name)
                .ok_or_else(|| ValidationError::UnknownField(name.clone()))?;
            form.values[index] = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
        }
        Ok(form)
    }

    pub fn spec(&self) -> &'static ScreenSpec {
        self.spec
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> + '_ {
        self.spec.fields.iter().zip(self.values.iter().map(String::as_str))
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.index_of(name).map(|i| self.values[i].as_str())
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.index_of(name) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.spec.fields.iter().position(|f| f.name == name)
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn focused_field(&self) -> &'static FieldSpec {
        &self.spec.fields[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.values.len();
    }

    pub fn focus_previous(&mut self) {
        self.focused = if self.focused == 0 {
            self.values.len() - 1
        } else {
            self.focused - 1
        };
    }

    /// Type a character into the focused field; choice fields ignore typing
    pub fn insert_char(&mut self, c: char) {
        match self.focused_field().kind {
            FieldKind::Choice(_) => {}
            FieldKind::Number => {
                if c.is_ascii_digit() || c == '.' || c == '-' {
                    self.values[self.focused].push(c);
                }
            }
            FieldKind::Text | FieldKind::PatientId => self.values[self.focused].push(c),
        }
    }

    pub fn delete_previous_char(&mut self) {
        match self.focused_field().kind {
            FieldKind::Choice(_) => self.values[self.focused].clear(),
            _ => {
                self.values[self.focused].pop();
            }
        }
    }

    /// Move the focused choice (or patient id) by `delta` options
    pub fn cycle_option(&mut self, delta: isize) {
        let options: Vec<&str> = match self.focused_field().kind {
            FieldKind::Choice(options) => options.iter().map(|o| o.value).collect(),
            FieldKind::PatientId => self.patient_ids.iter().map(String::as_str).collect(),
            _ => return,
        };
        if options.is_empty() {
            return;
        }

        let current = &self.values[self.focused];
        let len = options.len() as isize;
        let next = match options.iter().position(|o| o == current) {
            Some(i) => (i as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        self.values[self.focused] = options[next as usize].to_string();
    }

    /// Ids offered when cycling a patient id field
    pub fn set_patient_ids(&mut self, ids: Vec<String>) {
        self.patient_ids = ids;
    }

    pub fn patient_ids(&self) -> &[String] {
        &self.patient_ids
    }

    /// Whether any field holds user input
    pub fn is_dirty(&self) -> bool {
        self.values.iter().any(|v| !v.trim().is_empty())
    }

    /// Reset every value and move focus to the first field
    pub fn clear(&mut self) {
        for value in &mut self.values {
            value.clear();
        }
        self.focused = 0;
    }

    /// Check presence of required fields, numbers and choices, in field order
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in self.fields() {
            let value = value.trim();
            if value.is_empty() {
                if field.required {
                    return Err(ValidationError::Missing(field));
                }
                continue;
            }

            match field.kind {
                FieldKind::Number if value.parse::<f64>().map(|n| !n.is_finite()).unwrap_or(true) => {
                    return Err(ValidationError::NotNumber(field));
                }
                FieldKind::Choice(options) if !options.iter().any(|o| o.value == value) => {
                    return Err(ValidationError::InvalidChoice(field));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// JSON body for the screen's endpoint; call after [`validate`](Self::validate)
    pub fn to_payload(&self) -> Value {
        let mut body = Map::new();
        for (field, value) in self.fields() {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let json = match field.kind {
                FieldKind::Number => number_value(value),
                _ => Value::String(value.to_string()),
            };
            body.insert(field.name.to_string(), json);
        }

        if self.spec.field("date").is_some() && !body.contains_key("date") {
            body.insert(
                "date".to_string(),
                Value::String(Local::now().format("%Y-%m-%d").to_string()),
            );
        }
        body.insert(
            SUBMITTED_AT_FIELD.to_string(),
            Value::String(Local::now().to_rfc3339()),
        );

        Value::Object(body)
    }
}

fn number_value(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::Number(int.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(raw.to_string()))
}
