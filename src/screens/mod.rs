//! Declarative descriptions of the data entry screens
//!
//! Each screen is a list of fields, the endpoint its payload is POSTed to and
//! where the user goes after a successful save. The TUI renders every screen
//! with the same form page and the same submission flow.

pub mod form;

pub use form::{FormState, ValidationError};

use crate::api::endpoints;
use crate::i18n::Localized;
use std::fmt;
use std::str::FromStr;

/// Field name shared by every screen that records data for a patient
pub const PATIENT_ID_FIELD: &str = "patientID";

/// One selectable option of a choice field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    /// Value sent to the backend
    pub value: &'static str,
    pub label: Localized,
}

impl ChoiceOption {
    pub const fn new(value: &'static str, label: Localized) -> Self {
        Self { value, label }
    }
}

/// How a field is edited and validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Must parse as a number; sent as a JSON number
    Number,
    /// Cycles through a fixed list of options
    Choice(&'static [ChoiceOption]),
    /// Free text, completed from the ids loaded from the backend
    PatientId,
}

/// A single form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// JSON key in the submitted payload
    pub name: &'static str,
    pub label: Localized,
    pub kind: FieldKind,
    pub required: bool,
    pub hint: Option<&'static str>,
}

impl FieldSpec {
    const fn text(name: &'static str, label: Localized) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: true,
            hint: None,
        }
    }

    const fn number(name: &'static str, label: Localized) -> Self {
        Self {
            kind: FieldKind::Number,
            ..Self::text(name, label)
        }
    }

    const fn choice(name: &'static str, label: Localized, options: &'static [ChoiceOption]) -> Self {
        Self {
            kind: FieldKind::Choice(options),
            ..Self::text(name, label)
        }
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    const fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }
}

/// Where the user lands after acknowledging a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterSave {
    Home,
    Screen(ScreenKind),
}

/// Static description of a data entry screen
#[derive(Debug)]
pub struct ScreenSpec {
    pub kind: ScreenKind,
    pub title: Localized,
    pub endpoint: &'static str,
    pub fields: &'static [FieldSpec],
    pub after_save: AfterSave,
}

impl ScreenSpec {
    /// Whether the screen loads the patient id list on entry
    pub fn needs_patient_ids(&self) -> bool {
        self.fields.iter().any(|f| f.kind == FieldKind::PatientId)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The data entry screens of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Registration,
    ClinicalProfile,
    MetabolicProfile,
    SleepRitual,
    DietLog,
    WaterIntake,
    Exercise,
    Medication,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 8] = [
        ScreenKind::Registration,
        ScreenKind::ClinicalProfile,
        ScreenKind::MetabolicProfile,
        ScreenKind::SleepRitual,
        ScreenKind::DietLog,
        ScreenKind::WaterIntake,
        ScreenKind::Exercise,
        ScreenKind::Medication,
    ];

    /// Stable name used for page ids and on the command line
    pub fn name(self) -> &'static str {
        match self {
            ScreenKind::Registration => "registration",
            ScreenKind::ClinicalProfile => "clinical-profile",
            ScreenKind::MetabolicProfile => "metabolic-profile",
            ScreenKind::SleepRitual => "sleep-ritual",
            ScreenKind::DietLog => "diet-log",
            ScreenKind::WaterIntake => "water-intake",
            ScreenKind::Exercise => "exercise",
            ScreenKind::Medication => "medication",
        }
    }

    pub fn spec(self) -> &'static ScreenSpec {
        match self {
            ScreenKind::Registration => &REGISTRATION,
            ScreenKind::ClinicalProfile => &CLINICAL_PROFILE,
            ScreenKind::MetabolicProfile => &METABOLIC_PROFILE,
            ScreenKind::SleepRitual => &SLEEP_RITUAL,
            ScreenKind::DietLog => &DIET_LOG,
            ScreenKind::WaterIntake => &WATER_INTAKE,
            ScreenKind::Exercise => &EXERCISE,
            ScreenKind::Medication => &MEDICATION,
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|k| k.name()).collect();
                format!("unknown screen '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

const PATIENT_ID: FieldSpec = FieldSpec {
    name: PATIENT_ID_FIELD,
    label: Localized::new("Patient ID", "நோயாளர் அடையாள எண்"),
    kind: FieldKind::PatientId,
    required: true,
    hint: None,
};

const GENDERS: &[ChoiceOption] = &[
    ChoiceOption::new("Male", Localized::new("Male", "ஆண்")),
    ChoiceOption::new("Female", Localized::new("Female", "பெண்")),
    ChoiceOption::new("Other", Localized::new("Other", "மற்றவை")),
];

const QUALITY: &[ChoiceOption] = &[
    ChoiceOption::new("Good", Localized::new("Good", "நன்று")),
    ChoiceOption::new("Fair", Localized::new("Fair", "சுமார்")),
    ChoiceOption::new("Poor", Localized::new("Poor", "மோசம்")),
];

const MEALS: &[ChoiceOption] = &[
    ChoiceOption::new("Breakfast", Localized::new("Breakfast", "காலை உணவு")),
    ChoiceOption::new("Lunch", Localized::new("Lunch", "மதிய உணவு")),
    ChoiceOption::new("Dinner", Localized::new("Dinner", "இரவு உணவு")),
    ChoiceOption::new("Snack", Localized::new("Snack", "சிற்றுண்டி")),
];

const INTENSITY: &[ChoiceOption] = &[
    ChoiceOption::new("Low", Localized::new("Low", "குறைவு")),
    ChoiceOption::new("Moderate", Localized::new("Moderate", "மிதம்")),
    ChoiceOption::new("High", Localized::new("High", "அதிகம்")),
];

const FREQUENCY: &[ChoiceOption] = &[
    ChoiceOption::new("Once daily", Localized::new("Once daily", "தினமும் ஒருமுறை")),
    ChoiceOption::new("Twice daily", Localized::new("Twice daily", "தினமும் இருமுறை")),
    ChoiceOption::new("Thrice daily", Localized::new("Thrice daily", "தினமும் மூன்றுமுறை")),
    ChoiceOption::new("As needed", Localized::new("As needed", "தேவைப்படும்போது")),
];

static REGISTRATION: ScreenSpec = ScreenSpec {
    kind: ScreenKind::Registration,
    title: Localized::new("Patient Registration", "நோயாளர் பதிவு"),
    endpoint: endpoints::PATIENTS,
    fields: &[
        FieldSpec::text(PATIENT_ID_FIELD, Localized::new("Patient ID", "நோயாளர் அடையாள எண்")),
        FieldSpec::text("name", Localized::new("Full name", "முழு பெயர்")),
        FieldSpec::number("age", Localized::new("Age", "வயது")),
        FieldSpec::choice("gender", Localized::new("Gender", "பாலினம்"), GENDERS),
        FieldSpec::text("phone", Localized::new("Mobile number", "கைபேசி எண்")),
        FieldSpec::text("address", Localized::new("Address", "முகவரி")).optional(),
    ],
    after_save: AfterSave::Screen(ScreenKind::ClinicalProfile),
};

static CLINICAL_PROFILE: ScreenSpec = ScreenSpec {
    kind: ScreenKind::ClinicalProfile,
    title: Localized::new("Clinical Profile", "மருத்துவ விவரம்"),
    endpoint: endpoints::CLINICAL_PROFILE,
    fields: &[
        PATIENT_ID,
        FieldSpec::text("diagnosis", Localized::new("Diagnosis", "நோயறிதல்")),
        FieldSpec::text("bloodPressure", Localized::new("Blood pressure", "இரத்த அழுத்தம்"))
            .with_hint("120/80"),
        FieldSpec::number("heartRate", Localized::new("Heart rate (bpm)", "இதயத் துடிப்பு (bpm)")),
        FieldSpec::text("allergies", Localized::new("Allergies", "ஒவ்வாமைகள்")).optional(),
    ],
    after_save: AfterSave::Screen(ScreenKind::MetabolicProfile),
};

static METABOLIC_PROFILE: ScreenSpec = ScreenSpec {
    kind: ScreenKind::MetabolicProfile,
    title: Localized::new("Metabolic Profile", "வளர்சிதை விவரம்"),
    endpoint: endpoints::METABOLIC_PROFILE,
    fields: &[
        PATIENT_ID,
        FieldSpec::number("height", Localized::new("Height (cm)", "உயரம் (செ.மீ)")),
        FieldSpec::number("weight", Localized::new("Weight (kg)", "எடை (கி.கி)")),
        FieldSpec::number("bloodSugar", Localized::new("Blood sugar (mg/dL)", "இரத்த சர்க்கரை (mg/dL)")),
        FieldSpec::number("hba1c", Localized::new("HbA1c (%)", "HbA1c (%)")).optional(),
        FieldSpec::number("cholesterol", Localized::new("Cholesterol (mg/dL)", "கொழுப்பு (mg/dL)"))
            .optional(),
    ],
    after_save: AfterSave::Home,
};

static SLEEP_RITUAL: ScreenSpec = ScreenSpec {
    kind: ScreenKind::SleepRitual,
    title: Localized::new("Sleep Rituals", "உறக்கப் பழக்கம்"),
    endpoint: endpoints::SLEEP_RITUAL,
    fields: &[
        PATIENT_ID,
        FieldSpec::text("bedtime", Localized::new("Bedtime", "உறங்கும் நேரம்")).with_hint("22:30"),
        FieldSpec::text("wakeTime", Localized::new("Wake-up time", "எழும் நேரம்")).with_hint("06:00"),
        FieldSpec::choice("quality", Localized::new("Sleep quality", "உறக்கத் தரம்"), QUALITY),
        FieldSpec::text("notes", Localized::new("Notes", "குறிப்புகள்")).optional(),
    ],
    after_save: AfterSave::Home,
};

static DIET_LOG: ScreenSpec = ScreenSpec {
    kind: ScreenKind::DietLog,
    title: Localized::new("Diet Log", "உணவுப் பதிவு"),
    endpoint: endpoints::DIET_LOG,
    fields: &[
        PATIENT_ID,
        FieldSpec::choice("meal", Localized::new("Meal", "உணவு வேளை"), MEALS),
        FieldSpec::text("items", Localized::new("Food items", "உணவு வகைகள்")),
        FieldSpec::number("calories", Localized::new("Calories (kcal)", "கலோரிகள் (kcal)")).optional(),
    ],
    after_save: AfterSave::Home,
};

static WATER_INTAKE: ScreenSpec = ScreenSpec {
    kind: ScreenKind::WaterIntake,
    title: Localized::new("Water Intake", "நீர் அருந்துதல்"),
    endpoint: endpoints::WATER_INTAKE,
    fields: &[
        PATIENT_ID,
        FieldSpec::number("glasses", Localized::new("Glasses of water", "நீர் கோப்பைகள்")),
        FieldSpec::text("date", Localized::new("Date", "தேதி"))
            .optional()
            .with_hint("YYYY-MM-DD, defaults to today"),
    ],
    after_save: AfterSave::Home,
};

static EXERCISE: ScreenSpec = ScreenSpec {
    kind: ScreenKind::Exercise,
    title: Localized::new("Exercise", "உடற்பயிற்சி"),
    endpoint: endpoints::EXERCISE,
    fields: &[
        PATIENT_ID,
        FieldSpec::text("activity", Localized::new("Activity", "செயல்பாடு")).with_hint("Walking"),
        FieldSpec::number("durationMinutes", Localized::new("Duration (minutes)", "நேரம் (நிமிடங்கள்)")),
        FieldSpec::choice("intensity", Localized::new("Intensity", "தீவிரம்"), INTENSITY),
    ],
    after_save: AfterSave::Home,
};

static MEDICATION: ScreenSpec = ScreenSpec {
    kind: ScreenKind::Medication,
    title: Localized::new("Medication", "மருந்துகள்"),
    endpoint: endpoints::MEDICATION,
    fields: &[
        PATIENT_ID,
        FieldSpec::text("medicineName", Localized::new("Medicine name", "மருந்தின் பெயர்")),
        FieldSpec::text("dosage", Localized::new("Dosage", "அளவு")).with_hint("500 mg"),
        FieldSpec::choice("frequency", Localized::new("Frequency", "எத்தனை முறை"), FREQUENCY),
        FieldSpec::text("instructions", Localized::new("Instructions", "அறிவுறுத்தல்கள்")).optional(),
    ],
    after_save: AfterSave::Home,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ScreenKind::ALL {
            assert_eq!(kind.name().parse::<ScreenKind>().unwrap(), kind);
            assert_eq!(kind.spec().kind, kind);
        }
        assert_eq!("water_intake".parse::<ScreenKind>().unwrap(), ScreenKind::WaterIntake);
        assert!("billing".parse::<ScreenKind>().is_err());
    }

    #[test]
    fn test_every_screen_has_required_patient_id() {
        for kind in ScreenKind::ALL {
            let field = kind.spec().field(PATIENT_ID_FIELD).unwrap();
            assert!(field.required, "{} must require a patient id", kind);
        }
    }

    #[test]
    fn test_patient_id_loading() {
        assert!(!ScreenKind::Registration.spec().needs_patient_ids());
        assert!(ScreenKind::ClinicalProfile.spec().needs_patient_ids());
        assert!(ScreenKind::WaterIntake.spec().needs_patient_ids());
    }

    #[test]
    fn test_field_names_are_unique() {
        for kind in ScreenKind::ALL {
            let fields = kind.spec().fields;
            for (i, a) in fields.iter().enumerate() {
                assert!(fields[i + 1..].iter().all(|b| b.name != a.name));
            }
        }
    }
}
