//! Field specifications for the heart disease feature vector.
//!
//! `FIELD_SPECS` is the single source of truth for input domains and for the
//! order in which values are handed to the classifier. The order is part of
//! the contract with the trained artifact: changing it requires retraining.

use serde::Serialize;

/// Number of features consumed by the classifier.
pub const FEATURE_COUNT: usize = 13;

/// One selectable option of a categorical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    /// Label exactly as presented to the user
    pub label: &'static str,
    /// Canonical code fed to the classifier
    pub ordinal: u8,
}

const fn opt(label: &'static str, ordinal: u8) -> CategoryOption {
    CategoryOption { label, ordinal }
}

/// Declared domain of a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Whole number within `[min, max]` inclusive.
    IntegerRange { min: i64, max: i64 },
    /// Real number within `[min, max]` inclusive, on a grid of `step`.
    RealRange { min: f64, max: f64, step: f64 },
    /// One of a fixed set of labels, each with an explicit ordinal.
    Categorical {
        options: &'static [CategoryOption],
    },
}

/// Static description of one clinical input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Machine name used as the key in raw input
    pub name: &'static str,
    /// Human readable label for form rendering
    pub label: &'static str,
    /// Index of this field in the feature vector
    pub position: usize,
    /// Declared domain
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Declared options, empty for numeric fields.
    #[must_use]
    pub fn options(&self) -> &'static [CategoryOption] {
        match self.kind {
            FieldKind::Categorical { options } => options,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_categorical(&self) -> bool {
        matches!(self.kind, FieldKind::Categorical { .. })
    }
}

const SEX: &[CategoryOption] = &[opt("Male", 1), opt("Female", 0)];

const CHEST_PAIN_TYPE: &[CategoryOption] = &[
    opt("0: Typical Angina", 0),
    opt("1: Atypical Angina", 1),
    opt("2: Non-Anginal Pain", 2),
    opt("3: Asymptomatic", 3),
];

const NO_YES: &[CategoryOption] = &[opt("0: No", 0), opt("1: Yes", 1)];

const RESTING_ECG: &[CategoryOption] = &[
    opt("0: Normal", 0),
    opt("1: Having ST-T wave abnormality", 1),
    opt(
        "2: Showing probable or definite left ventricular hypertrophy by Estes' criteria",
        2,
    ),
];

const ST_SLOPE: &[CategoryOption] = &[
    opt("0: Upsloping", 0),
    opt("1: Flat", 1),
    opt("2: Downsloping", 2),
];

const VESSELS_COLORED: &[CategoryOption] =
    &[opt("0", 0), opt("1", 1), opt("2", 2), opt("3", 3)];

const THALASSEMIA: &[CategoryOption] = &[
    opt("0: Normal", 0),
    opt("1: Fixed Defect", 1),
    opt("2: Reversible Defect", 2),
];

/// All fields, in feature vector order.
pub static FIELD_SPECS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        name: "age",
        label: "Age (years)",
        position: 0,
        kind: FieldKind::IntegerRange { min: 0, max: 120 },
    },
    FieldSpec {
        name: "sex",
        label: "Sex",
        position: 1,
        kind: FieldKind::Categorical { options: SEX },
    },
    FieldSpec {
        name: "chest_pain_type",
        label: "Chest Pain Type",
        position: 2,
        kind: FieldKind::Categorical {
            options: CHEST_PAIN_TYPE,
        },
    },
    FieldSpec {
        name: "resting_bp",
        label: "Resting Blood Pressure (mm Hg)",
        position: 3,
        kind: FieldKind::IntegerRange { min: 0, max: 300 },
    },
    FieldSpec {
        name: "cholesterol",
        label: "Serum Cholesterol (mg/dl)",
        position: 4,
        kind: FieldKind::IntegerRange { min: 0, max: 600 },
    },
    FieldSpec {
        name: "fasting_blood_sugar",
        label: "Fasting Blood Sugar > 120 mg/dl",
        position: 5,
        kind: FieldKind::Categorical { options: NO_YES },
    },
    FieldSpec {
        name: "resting_ecg",
        label: "Resting Electrocardiographic Results",
        position: 6,
        kind: FieldKind::Categorical {
            options: RESTING_ECG,
        },
    },
    FieldSpec {
        name: "max_heart_rate",
        label: "Maximum Heart Rate Achieved (bpm)",
        position: 7,
        kind: FieldKind::IntegerRange { min: 0, max: 220 },
    },
    FieldSpec {
        name: "exercise_angina",
        label: "Exercise Induced Angina",
        position: 8,
        kind: FieldKind::Categorical { options: NO_YES },
    },
    FieldSpec {
        name: "st_depression",
        label: "ST Depression Induced by Exercise Relative to Rest",
        position: 9,
        kind: FieldKind::RealRange {
            min: 0.0,
            max: 10.0,
            step: 0.1,
        },
    },
    FieldSpec {
        name: "st_slope",
        label: "Slope of the Peak Exercise ST Segment",
        position: 10,
        kind: FieldKind::Categorical { options: ST_SLOPE },
    },
    FieldSpec {
        name: "vessels_colored",
        label: "Number of Major Vessels Colored by Fluoroscopy",
        position: 11,
        kind: FieldKind::Categorical {
            options: VESSELS_COLORED,
        },
    },
    FieldSpec {
        name: "thalassemia",
        label: "Thalassemia",
        position: 12,
        kind: FieldKind::Categorical {
            options: THALASSEMIA,
        },
    },
];

/// Feature names in vector order. Trained artifacts must declare exactly this list.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "sex",
    "chest_pain_type",
    "resting_bp",
    "cholesterol",
    "fasting_blood_sugar",
    "resting_ecg",
    "max_heart_rate",
    "exercise_angina",
    "st_depression",
    "st_slope",
    "vessels_colored",
    "thalassemia",
];

/// Look up a field by machine name.
#[must_use]
pub fn field_spec(name: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|spec| spec.name == name)
}
