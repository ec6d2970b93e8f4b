//! English/Tamil string tables
//!
//! Every user-visible string goes through [`Text::tr`] so the dialog core and the
//! screens stay agnostic of the language in use. Field labels live next to the
//! screen definitions as [`Localized`] pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported display languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ta")]
    Tamil,
}

impl Language {
    /// The other language; used by the language toggle key
    pub fn toggled(self) -> Self {
        match self {
            Language::English => Language::Tamil,
            Language::Tamil => Language::English,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Tamil => "ta",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Tamil => "தமிழ்",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "ta" | "tamil" => Ok(Language::Tamil),
            other => Err(format!("unsupported language '{}', expected 'en' or 'ta'", other)),
        }
    }
}

/// A string carried in both languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized {
    pub en: &'static str,
    pub ta: &'static str,
}

impl Localized {
    pub const fn new(en: &'static str, ta: &'static str) -> Self {
        Self { en, ta }
    }

    pub fn get(&self, lang: Language) -> &'static str {
        match lang {
            Language::English => self.en,
            Language::Tamil => self.ta,
        }
    }
}

/// Keys of the shared dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    // Dialog buttons
    Ok,
    Yes,
    No,

    // Dialog titles
    Error,
    Success,
    Cancel,
    Quit,
    Validation,
    Conflict,

    // Dialog messages
    ConfirmCancel,
    ConfirmQuit,
    FetchPatientIdsFailed,
    FieldRequired,
    FieldNotNumber,
    FieldInvalidChoice,
    FieldUnknown,
    SavedSuccessfully,
    GenericFailure,
    DuplicateRecord,
    OtpSent,
    OtpInvalid,
    OtpVerified,
    PhoneInvalid,
    OtpFormatInvalid,

    // Chrome
    AppTitle,
    LoginTitle,
    HomeTitle,
    PhoneLabel,
    OtpLabel,
    SendOtp,
    VerifyOtp,
    Submitting,
    FormHelp,
    HomeHelp,
    LoginHelp,
    StatusHint,
    LoggedInAs,
}

impl Text {
    /// Translate into the given language
    pub fn tr(self, lang: Language) -> &'static str {
        let pair = match self {
            Text::Ok => Localized::new("OK", "சரி"),
            Text::Yes => Localized::new("Yes", "ஆம்"),
            Text::No => Localized::new("No", "இல்லை"),

            Text::Error => Localized::new("Error", "பிழை"),
            Text::Success => Localized::new("Success", "வெற்றி"),
            Text::Cancel => Localized::new("Cancel", "ரத்து"),
            Text::Quit => Localized::new("Quit", "வெளியேறு"),
            Text::Validation => Localized::new("Missing information", "தகவல் இல்லை"),
            Text::Conflict => Localized::new("Already exists", "ஏற்கனவே உள்ளது"),

            Text::ConfirmCancel => Localized::new(
                "Are you sure you want to cancel?",
                "நிச்சயமாக ரத்து செய்ய விரும்புகிறீர்களா?",
            ),
            Text::ConfirmQuit => Localized::new(
                "Are you sure you want to quit?",
                "நிச்சயமாக வெளியேற விரும்புகிறீர்களா?",
            ),
            Text::FetchPatientIdsFailed => Localized::new(
                "Failed to fetch patient IDs.",
                "நோயாளர் அடையாள எண்களைப் பெற முடியவில்லை.",
            ),
            Text::FieldRequired => Localized::new("Please enter {field}.", "{field} ஐ உள்ளிடவும்."),
            Text::FieldNotNumber => Localized::new(
                "{field} must be a number.",
                "{field} ஒரு எண்ணாக இருக்க வேண்டும்.",
            ),
            Text::FieldInvalidChoice => Localized::new(
                "{field} has an invalid option.",
                "{field} க்கு தவறான தேர்வு.",
            ),
            Text::FieldUnknown => Localized::new(
                "{field} is not a field of this form.",
                "{field} இந்தப் படிவத்தின் புலம் அல்ல.",
            ),
            Text::SavedSuccessfully => Localized::new(
                "Data saved successfully.",
                "தரவு வெற்றிகரமாக சேமிக்கப்பட்டது.",
            ),
            Text::GenericFailure => Localized::new(
                "Something went wrong. Please try again.",
                "ஏதோ தவறு நடந்துவிட்டது. மீண்டும் முயற்சிக்கவும்.",
            ),
            Text::DuplicateRecord => Localized::new(
                "A record with this ID already exists.",
                "இந்த அடையாள எண்ணுடன் ஒரு பதிவு ஏற்கனவே உள்ளது.",
            ),
            Text::OtpSent => Localized::new(
                "OTP sent to your mobile number.",
                "உங்கள் கைபேசி எண்ணுக்கு OTP அனுப்பப்பட்டது.",
            ),
            Text::OtpInvalid => Localized::new("Invalid OTP.", "தவறான OTP."),
            Text::OtpVerified => Localized::new("Login successful.", "உள்நுழைவு வெற்றிகரமாக முடிந்தது."),
            Text::PhoneInvalid => Localized::new(
                "Enter a valid 10-digit mobile number.",
                "சரியான 10 இலக்க கைபேசி எண்ணை உள்ளிடவும்.",
            ),
            Text::OtpFormatInvalid => Localized::new(
                "Enter the 4 to 6 digit OTP.",
                "4 முதல் 6 இலக்க OTP ஐ உள்ளிடவும்.",
            ),

            Text::AppTitle => Localized::new("CareLog", "கேர்லாக்"),
            Text::LoginTitle => Localized::new("Login", "உள்நுழைவு"),
            Text::HomeTitle => Localized::new("Home", "முகப்பு"),
            Text::PhoneLabel => Localized::new("Mobile number", "கைபேசி எண்"),
            Text::OtpLabel => Localized::new("OTP", "OTP"),
            Text::SendOtp => Localized::new("Send OTP", "OTP அனுப்பு"),
            Text::VerifyOtp => Localized::new("Verify", "சரிபார்"),
            Text::Submitting => Localized::new("Submitting...", "சமர்ப்பிக்கப்படுகிறது..."),
            Text::FormHelp => Localized::new(
                "Tab/↑/↓: Field • ←/→: Option • Ctrl+S: Save • Ctrl+R: Clear • Esc: Cancel",
                "Tab/↑/↓: புலம் • ←/→: தேர்வு • Ctrl+S: சேமி • Ctrl+R: அழி • Esc: ரத்து",
            ),
            Text::HomeHelp => Localized::new(
                "↑/↓: Select • Enter: Open • Ctrl+L: Language • Ctrl+C: Quit",
                "↑/↓: தேர்ந்தெடு • Enter: திற • Ctrl+L: மொழி • Ctrl+C: வெளியேறு",
            ),
            Text::LoginHelp => Localized::new(
                "Enter: Continue • Esc: Change number • Ctrl+L: Language",
                "Enter: தொடர் • Esc: எண்ணை மாற்று • Ctrl+L: மொழி",
            ),
            Text::StatusHint => Localized::new(
                "Ctrl+G: Help • Ctrl+L: Language • Ctrl+C: Quit",
                "Ctrl+G: உதவி • Ctrl+L: மொழி • Ctrl+C: வெளியேறு",
            ),
            Text::LoggedInAs => Localized::new("Logged in as {phone}", "{phone} ஆக உள்நுழைந்துள்ளீர்கள்"),
        };
        pair.get(lang)
    }

    /// Translate and substitute a single `{name}` placeholder
    pub fn fill(self, lang: Language, name: &str, value: &str) -> String {
        self.tr(lang).replace(&format!("{{{}}}", name), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("Tamil".parse::<Language>().unwrap(), Language::Tamil);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(Language::English.toggled(), Language::Tamil);
        assert_eq!(Language::Tamil.toggled().toggled(), Language::Tamil);
    }

    #[test]
    fn test_button_defaults() {
        assert_eq!(Text::Ok.tr(Language::English), "OK");
        assert_eq!(Text::Ok.tr(Language::Tamil), "சரி");
        assert_eq!(Text::Yes.tr(Language::English), "Yes");
        assert_eq!(Text::No.tr(Language::English), "No");
    }

    #[test]
    fn test_fill_placeholder() {
        let msg = Text::FieldRequired.fill(Language::English, "field", "Patient ID");
        assert_eq!(msg, "Please enter Patient ID.");

        let msg = Text::FieldRequired.fill(Language::Tamil, "field", "எடை");
        assert!(msg.starts_with("எடை"));
    }

    #[test]
    fn test_serde_codes() {
        let json = serde_json::to_string(&Language::Tamil).unwrap();
        assert_eq!(json, "\"ta\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::English);
    }
}
