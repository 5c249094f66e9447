//! Feature vector builder: validation and encoding of raw form input.
//!
//! `build` is all-or-nothing. Either every field passes its declared domain
//! and a complete vector is returned, or the first failing field (in vector
//! order) is reported and nothing else is produced.

use std::fmt;

use super::field::{field_spec, CategoryOption, FieldKind, FieldSpec, FEATURE_COUNT, FIELD_SPECS};
use super::raw::{RawValue, RawValues};
use super::vector::FeatureVector;

/// Tolerance when checking that a real value lies on its declared step grid.
const STEP_TOLERANCE: f64 = 1e-9;

/// Why a field value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    OutOfRange,
    UnrecognizedOption,
    NotAnInteger,
    NotANumber,
    OffStep,
}

impl ValidationReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfRange => "out of range",
            Self::UnrecognizedOption => "unrecognized option",
            Self::NotAnInteger => "expected an integer",
            Self::NotANumber => "expected a number",
            Self::OffStep => "not a multiple of the declared step",
        }
    }
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-correctable problem with one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// Failure to build a feature vector.
///
/// `MissingField` and `UnknownField` mean the caller broke the input contract;
/// `Invalid` means the user supplied a bad value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("undeclared field `{0}`")]
    UnknownField(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl BuildError {
    /// Whether this is a caller-contract violation rather than bad user input.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingField(_) | Self::UnknownField(_))
    }
}

/// Validates raw values against `FIELD_SPECS` and assembles the feature vector.
#[derive(Debug, Clone, Copy)]
pub struct FeatureVectorBuilder {
    specs: &'static [FieldSpec; FEATURE_COUNT],
}

impl Default for FeatureVectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureVectorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            specs: &FIELD_SPECS,
        }
    }

    /// All field specs in vector order.
    #[must_use]
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.specs
    }

    /// Declared constraints of one field.
    ///
    /// # Errors
    /// Returns `BuildError::UnknownField` if no field has this name.
    pub fn describe(&self, name: &str) -> Result<&'static FieldSpec, BuildError> {
        field_spec(name).ok_or_else(|| BuildError::UnknownField(name.to_string()))
    }

    /// Validate `raw` and encode it into a feature vector.
    ///
    /// # Errors
    /// Returns `MissingField`/`UnknownField` if the key set differs from the
    /// declared fields, otherwise `Invalid` for the first field (in vector
    /// order) whose value violates its domain.
    pub fn build(&self, raw: &RawValues) -> Result<FeatureVector, BuildError> {
        self.check_names(raw)?;

        let mut values = [0.0; FEATURE_COUNT];
        for spec in self.specs.iter() {
            let value = raw
                .get(spec.name)
                .ok_or(BuildError::MissingField(spec.name))?;
            values[spec.position] = encode(spec, value)?;
        }

        Ok(FeatureVector::from_array(values))
    }

    fn check_names(&self, raw: &RawValues) -> Result<(), BuildError> {
        if let Some(missing) = self.specs.iter().find(|s| raw.get(s.name).is_none()) {
            return Err(BuildError::MissingField(missing.name));
        }
        if let Some(unknown) = raw.names().find(|n| field_spec(n).is_none()) {
            return Err(BuildError::UnknownField(unknown.to_string()));
        }
        Ok(())
    }
}

fn encode(spec: &FieldSpec, raw: &RawValue) -> Result<f64, ValidationError> {
    let reject = |reason: ValidationReason| ValidationError::new(spec.name, reason);

    match spec.kind {
        FieldKind::IntegerRange { min, max } => {
            let v = as_integer(raw).map_err(reject)?;
            if !(min..=max).contains(&v) {
                return Err(reject(ValidationReason::OutOfRange));
            }
            Ok(v as f64)
        }
        FieldKind::RealRange { min, max, step } => {
            let v = as_number(raw).map_err(reject)?;
            if !(min..=max).contains(&v) {
                return Err(reject(ValidationReason::OutOfRange));
            }
            if !on_step_grid(v, min, step) {
                return Err(reject(ValidationReason::OffStep));
            }
            Ok(v)
        }
        FieldKind::Categorical { options } => match_option(options, raw)
            .map(|o| f64::from(o.ordinal))
            .ok_or_else(|| reject(ValidationReason::UnrecognizedOption)),
    }
}

fn as_number(raw: &RawValue) -> Result<f64, ValidationReason> {
    let v = match raw {
        RawValue::Integer(i) => *i as f64,
        RawValue::Real(r) => *r,
        RawValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationReason::NotANumber)?,
        RawValue::Other(_) => return Err(ValidationReason::NotANumber),
    };
    // "NaN" and "inf" parse as f64 but are not measurements.
    if !v.is_finite() {
        return Err(ValidationReason::NotANumber);
    }
    Ok(v)
}

fn as_integer(raw: &RawValue) -> Result<i64, ValidationReason> {
    match raw {
        RawValue::Integer(i) => Ok(*i),
        RawValue::Text(s) => match s.trim().parse::<i64>() {
            Ok(i) => Ok(i),
            Err(_) => real_to_integer(as_number(raw)?),
        },
        RawValue::Real(_) | RawValue::Other(_) => real_to_integer(as_number(raw)?),
    }
}

/// Accepts integral reals without rounding.
fn real_to_integer(v: f64) -> Result<i64, ValidationReason> {
    if v.fract() != 0.0 {
        return Err(ValidationReason::NotAnInteger);
    }
    if v < i64::MIN as f64 || v >= i64::MAX as f64 {
        return Err(ValidationReason::OutOfRange);
    }
    Ok(v as i64)
}

fn on_step_grid(v: f64, min: f64, step: f64) -> bool {
    let steps = (v - min) / step;
    (steps - steps.round()).abs() <= STEP_TOLERANCE
}

fn match_option(options: &'static [CategoryOption], raw: &RawValue) -> Option<&'static CategoryOption> {
    match raw {
        RawValue::Text(s) => {
            let label = s.trim();
            options.iter().find(|o| o.label == label)
        }
        // Only plain-number labels (e.g. vessel counts) match a numeric input.
        RawValue::Integer(i) => {
            let label = i.to_string();
            options.iter().find(|o| o.label == label)
        }
        RawValue::Real(_) | RawValue::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::field::FEATURE_NAMES;

    fn sample_raw() -> RawValues {
        RawValues::new()
            .with("age", 63)
            .with("sex", "Male")
            .with("chest_pain_type", "3: Asymptomatic")
            .with("resting_bp", 145)
            .with("cholesterol", 233)
            .with("fasting_blood_sugar", "1: Yes")
            .with("resting_ecg", "0: Normal")
            .with("max_heart_rate", 150)
            .with("exercise_angina", "0: No")
            .with("st_depression", 2.3)
            .with("st_slope", "0: Upsloping")
            .with("vessels_colored", 0)
            .with("thalassemia", "1: Fixed Defect")
    }

    fn build(raw: &RawValues) -> Result<FeatureVector, BuildError> {
        FeatureVectorBuilder::new().build(raw)
    }

    fn invalid(field: &'static str, reason: ValidationReason) -> BuildError {
        BuildError::Invalid(ValidationError::new(field, reason))
    }

    #[test]
    fn test_build_reference_patient() {
        let vector = build(&sample_raw()).expect("Should build");
        assert_eq!(
            vector.into_array(),
            [63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_out_of_range_resting_bp() {
        let raw = sample_raw().with("resting_bp", 350);
        let err = build(&raw).expect_err("Should reject");
        assert_eq!(err, invalid("resting_bp", ValidationReason::OutOfRange));
        assert_eq!(err.to_string(), "resting_bp: out of range");
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_age_boundaries() {
        assert!(build(&sample_raw().with("age", 0)).is_ok());
        assert!(build(&sample_raw().with("age", 120)).is_ok());
        assert_eq!(
            build(&sample_raw().with("age", -1)),
            Err(invalid("age", ValidationReason::OutOfRange))
        );
        assert_eq!(
            build(&sample_raw().with("age", 121)),
            Err(invalid("age", ValidationReason::OutOfRange))
        );
    }

    #[test]
    fn test_integer_field_boundaries() {
        for (field, max) in [("resting_bp", 300), ("cholesterol", 600), ("max_heart_rate", 220)] {
            assert!(build(&sample_raw().with(field, 0)).is_ok(), "{field} = 0");
            assert!(build(&sample_raw().with(field, max)).is_ok(), "{field} = {max}");
            assert_eq!(
                build(&sample_raw().with(field, -1)),
                Err(invalid(field, ValidationReason::OutOfRange)),
                "{field} = -1"
            );
            assert_eq!(
                build(&sample_raw().with(field, max + 1)),
                Err(invalid(field, ValidationReason::OutOfRange)),
                "{field} = {}",
                max + 1
            );
        }
    }

    #[test]
    fn test_st_depression_boundaries() {
        let at_zero = build(&sample_raw().with("st_depression", 0.0)).expect("0.0 accepted");
        assert_eq!(at_zero.get("st_depression"), Some(0.0));
        let at_max = build(&sample_raw().with("st_depression", 10.0)).expect("10.0 accepted");
        assert_eq!(at_max.get("st_depression"), Some(10.0));

        assert_eq!(
            build(&sample_raw().with("st_depression", -0.1)),
            Err(invalid("st_depression", ValidationReason::OutOfRange))
        );
        assert_eq!(
            build(&sample_raw().with("st_depression", 10.1)),
            Err(invalid("st_depression", ValidationReason::OutOfRange))
        );
    }

    #[test]
    fn test_st_depression_resolution() {
        assert_eq!(
            build(&sample_raw().with("st_depression", 2.35)),
            Err(invalid("st_depression", ValidationReason::OffStep))
        );
        // Integer input on the grid is fine and passed through as-is.
        let vector = build(&sample_raw().with("st_depression", 3)).expect("Should build");
        assert_eq!(vector.get("st_depression"), Some(3.0));
    }

    #[test]
    fn test_st_depression_rejects_off_grid_noise() {
        assert_eq!(
            build(&sample_raw().with("st_depression", 2.300_000_01)),
            Err(invalid("st_depression", ValidationReason::OffStep))
        );
        // Float artifacts of decimal arithmetic stay on the grid.
        let vector = build(&sample_raw().with("st_depression", 0.1 + 0.2)).expect("Should build");
        assert_eq!(vector.get("st_depression"), Some(0.1 + 0.2));
        for tenths in 0..=100 {
            let v = f64::from(tenths) / 10.0;
            assert!(build(&sample_raw().with("st_depression", v)).is_ok(), "{v}");
        }
    }

    fn from_json_with(field: &str, value: serde_json::Value) -> RawValues {
        let mut doc = serde_json::to_value(sample_raw()).expect("serialize");
        doc[field] = value;
        serde_json::from_value(doc).expect("Should parse")
    }

    #[test]
    fn test_wrong_typed_json_values_name_the_field() {
        for value in [serde_json::Value::Null, serde_json::json!(true), serde_json::json!([63])] {
            assert_eq!(
                build(&from_json_with("age", value.clone())),
                Err(invalid("age", ValidationReason::NotANumber)),
                "age = {value}"
            );
            assert_eq!(
                build(&from_json_with("st_depression", value.clone())),
                Err(invalid("st_depression", ValidationReason::NotANumber)),
                "st_depression = {value}"
            );
            assert_eq!(
                build(&from_json_with("sex", value.clone())),
                Err(invalid("sex", ValidationReason::UnrecognizedOption)),
                "sex = {value}"
            );
        }
    }

    #[test]
    fn test_integer_field_rejects_fraction_without_rounding() {
        assert_eq!(
            build(&sample_raw().with("age", 63.5)),
            Err(invalid("age", ValidationReason::NotAnInteger))
        );
        let vector = build(&sample_raw().with("age", 63.0)).expect("integral real accepted");
        assert_eq!(vector.get("age"), Some(63.0));
    }

    #[test]
    fn test_numeric_text_input() {
        let raw = sample_raw()
            .with("age", " 63 ")
            .with("st_depression", "2.3")
            .with("cholesterol", "233.0");
        let vector = build(&raw).expect("Should build");
        assert_eq!(vector, build(&sample_raw()).expect("Should build"));
    }

    #[test]
    fn test_non_numeric_input() {
        assert_eq!(
            build(&sample_raw().with("age", "sixty")),
            Err(invalid("age", ValidationReason::NotANumber))
        );
        assert_eq!(
            build(&sample_raw().with("st_depression", "NaN")),
            Err(invalid("st_depression", ValidationReason::NotANumber))
        );
        assert_eq!(
            build(&sample_raw().with("st_depression", f64::INFINITY)),
            Err(invalid("st_depression", ValidationReason::NotANumber))
        );
    }

    #[test]
    fn test_unrecognized_option() {
        assert_eq!(
            build(&sample_raw().with("sex", "male")),
            Err(invalid("sex", ValidationReason::UnrecognizedOption))
        );
        // Legacy plain-integer encodings are not accepted for descriptive labels.
        assert_eq!(
            build(&sample_raw().with("chest_pain_type", 2)),
            Err(invalid("chest_pain_type", ValidationReason::UnrecognizedOption))
        );
        assert_eq!(
            build(&sample_raw().with("vessels_colored", 4)),
            Err(invalid("vessels_colored", ValidationReason::UnrecognizedOption))
        );
        assert_eq!(
            build(&sample_raw().with("vessels_colored", 1.0)),
            Err(invalid("vessels_colored", ValidationReason::UnrecognizedOption))
        );
    }

    #[test]
    fn test_vessels_colored_accepts_label_or_number() {
        let from_text = build(&sample_raw().with("vessels_colored", "2")).expect("Should build");
        let from_int = build(&sample_raw().with("vessels_colored", 2)).expect("Should build");
        assert_eq!(from_text.get("vessels_colored"), Some(2.0));
        assert_eq!(from_text, from_int);
    }

    #[test]
    fn test_every_declared_option_encodes_to_its_ordinal() {
        let builder = FeatureVectorBuilder::new();
        for spec in builder.fields().iter().filter(|s| s.is_categorical()) {
            for option in spec.options() {
                let vector = builder
                    .build(&sample_raw().with(spec.name, option.label))
                    .expect("declared option accepted");
                assert_eq!(vector.get(spec.name), Some(f64::from(option.ordinal)));
            }
        }
    }

    #[test]
    fn test_sex_encoding() {
        let female = build(&sample_raw().with("sex", "Female")).expect("Should build");
        assert_eq!(female.get("sex"), Some(0.0));
        let male = build(&sample_raw()).expect("Should build");
        assert_eq!(male.get("sex"), Some(1.0));
    }

    #[test]
    fn test_first_invalid_field_in_vector_order_is_reported() {
        let raw = sample_raw()
            .with("thalassemia", "9: Unknown")
            .with("cholesterol", 900)
            .with("age", 200);
        assert_eq!(build(&raw), Err(invalid("age", ValidationReason::OutOfRange)));
    }

    #[test]
    fn test_missing_field_is_configuration_error() {
        let mut raw = sample_raw();
        raw.remove("max_heart_rate");
        let err = build(&raw).expect_err("Should reject");
        assert_eq!(err, BuildError::MissingField("max_heart_rate"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_unknown_field_is_configuration_error() {
        let raw = sample_raw().with("oldpeak", 2.3);
        let err = build(&raw).expect_err("Should reject");
        assert_eq!(err, BuildError::UnknownField("oldpeak".into()));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_contract_errors_win_over_value_errors() {
        let mut raw = sample_raw().with("age", 500);
        raw.remove("thalassemia");
        assert_eq!(build(&raw), Err(BuildError::MissingField("thalassemia")));
    }

    #[test]
    fn test_build_is_deterministic() {
        let raw = sample_raw();
        let first = build(&raw).expect("Should build");
        for _ in 0..10 {
            let again = build(&raw).expect("Should build");
            let a: Vec<u64> = first.as_slice().iter().map(|v| v.to_bits()).collect();
            let b: Vec<u64> = again.as_slice().iter().map(|v| v.to_bits()).collect();
            assert_eq!(a, b);
        }

        let bad = sample_raw().with("resting_bp", 350);
        assert_eq!(build(&bad), build(&bad));
    }

    #[test]
    fn test_describe() {
        let builder = FeatureVectorBuilder::new();
        let spec = builder.describe("max_heart_rate").expect("declared");
        assert_eq!(spec.kind, FieldKind::IntegerRange { min: 0, max: 220 });
        assert_eq!(spec.position, 7);

        assert_eq!(
            builder.describe("thalach"),
            Err(BuildError::UnknownField("thalach".into()))
        );
    }

    #[test]
    fn test_fields_follow_vector_order() {
        let names: Vec<_> = FeatureVectorBuilder::new().fields().iter().map(|s| s.name).collect();
        assert_eq!(names, FEATURE_NAMES.to_vec());
    }
}
