use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::i18n::{Language, Localized};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub description: Localized,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, description: Localized) -> Self {
        Self {
            key,
            modifiers,
            description,
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.code && self.modifiers == event.modifiers
    }

    /// Human readable chord, e.g. `Ctrl+S`
    pub fn chord(&self) -> String {
        let key = match self.key {
            KeyCode::Char(c) => c.to_ascii_uppercase().to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            other => format!("{:?}", other),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", key)
        } else {
            key
        }
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Quit application (asks first)
    pub quit: KeyBinding,

    /// Show help
    pub help: KeyBinding,

    /// Switch between English and Tamil
    pub language: KeyBinding,

    /// Submit the current form
    pub save: KeyBinding,

    /// Clear the current form
    pub clear: KeyBinding,

    /// Leave the current screen
    pub back: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            quit: KeyBinding::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL,
                Localized::new("Quit application", "பயன்பாட்டை விட்டு வெளியேறு"),
            ),
            help: KeyBinding::new(
                KeyCode::Char('g'),
                KeyModifiers::CONTROL,
                Localized::new("Show/hide help", "உதவியைக் காட்டு/மறை"),
            ),
            language: KeyBinding::new(
                KeyCode::Char('l'),
                KeyModifiers::CONTROL,
                Localized::new("Switch language", "மொழியை மாற்று"),
            ),
            save: KeyBinding::new(
                KeyCode::Char('s'),
                KeyModifiers::CONTROL,
                Localized::new("Save form", "படிவத்தைச் சேமி"),
            ),
            clear: KeyBinding::new(
                KeyCode::Char('r'),
                KeyModifiers::CONTROL,
                Localized::new("Clear form", "படிவத்தை அழி"),
            ),
            back: KeyBinding::new(
                KeyCode::Esc,
                KeyModifiers::NONE,
                Localized::new("Cancel / go back", "ரத்து / பின்செல்"),
            ),
        }
    }
}

impl KeyMap {
    /// Check if the event should quit the application
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.quit.matches(event)
    }

    /// Check if the event should show help
    pub fn should_show_help(&self, event: &KeyEvent) -> bool {
        self.help.matches(event)
    }

    pub fn should_toggle_language(&self, event: &KeyEvent) -> bool {
        self.language.matches(event)
    }

    /// Get help text for all key bindings
    pub fn help_text(&self, lang: Language) -> String {
        [&self.quit, &self.help, &self.language, &self.save, &self.clear, &self.back]
            .iter()
            .map(|binding| format!("{:<8} {}", binding.chord(), binding.description.get(lang)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
