//! Raw patient attributes as collected from the form, plus the range checks
//! that turn suspicious values into non-fatal warnings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest tolerated difference between an entered BMI and weight / height².
pub const BMI_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Binary code used by the one-hot pipeline (Female = 0, Male = 1)
    pub fn code(self) -> f64 {
        match self {
            Gender::Female => 0.0,
            Gender::Male => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

/// An inclusive numeric interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for FieldRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Ranges observed in the training data. Values outside are accepted but flagged.
pub mod training_range {
    use super::FieldRange;

    pub const AGE: FieldRange = FieldRange::new(14.0, 61.0);
    pub const HEIGHT: FieldRange = FieldRange::new(1.45, 1.98);
    pub const WEIGHT: FieldRange = FieldRange::new(39.0, 173.0);
    pub const CH2O: FieldRange = FieldRange::new(1.0, 3.0);
    pub const FAF: FieldRange = FieldRange::new(0.0, 3.0);
    pub const TUE: FieldRange = FieldRange::new(0.0, 2.0);
}

/// A non-fatal problem noticed while preparing a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InputWarning {
    OutOfTrainingRange {
        field: &'static str,
        value: f64,
        range: (f64, f64),
    },
    BmiMismatch {
        entered: f64,
        computed: f64,
    },
    UnknownCategory {
        field: &'static str,
        value: String,
        substitute: String,
    },
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputWarning::OutOfTrainingRange { field, value, range } => write!(
                f,
                "{} = {} is outside the training range {} - {}; the prediction may be inaccurate",
                field, value, range.0, range.1
            ),
            InputWarning::BmiMismatch { entered, computed } => write!(
                f,
                "entered BMI {:.2} does not match weight / height^2 = {:.2}; the computed value is used",
                entered, computed
            ),
            InputWarning::UnknownCategory { field, value, substitute } => write!(
                f,
                "{} value '{}' was not seen during training; using '{}' instead",
                field, value, substitute
            ),
        }
    }
}

/// The raw user input for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientAttributes {
    pub age: f64,
    pub gender: Gender,
    /// Metres
    pub height: f64,
    /// Kilograms
    pub weight: f64,
    /// BMI typed in by the user, if any. Only compared against the computed value.
    #[serde(default)]
    pub bmi: Option<f64>,
    /// Frequent consumption of high caloric food
    pub favc: bool,
    /// Frequency of vegetable consumption (1 - 3)
    pub fcvc: f64,
    /// Number of main meals (1 - 4)
    pub ncp: f64,
    /// Calories consumption monitoring
    pub scc: bool,
    pub smoke: bool,
    /// Daily water intake in litres
    pub ch2o: f64,
    pub family_history: bool,
    /// Physical activity frequency
    pub faf: f64,
    /// Time using technology devices
    pub tue: f64,
    /// Eating between meals
    pub caec: String,
    /// Alcohol consumption
    pub calc: String,
    /// Usual transportation
    pub mtrans: String,
}

impl PatientAttributes {
    /// Body mass index from weight and height
    pub fn computed_bmi(&self) -> f64 {
        self.weight / (self.height * self.height)
    }

    /// Collects every warning that depends only on the raw values:
    /// training-range violations and a mismatching entered BMI.
    pub fn range_warnings(&self) -> Vec<InputWarning> {
        let checks = [
            ("Age", self.age, training_range::AGE),
            ("Height", self.height, training_range::HEIGHT),
            ("Weight", self.weight, training_range::WEIGHT),
            ("CH2O", self.ch2o, training_range::CH2O),
            ("FAF", self.faf, training_range::FAF),
            ("TUE", self.tue, training_range::TUE),
        ];

        let mut warnings: Vec<InputWarning> = checks
            .iter()
            .filter(|(_, value, range)| !range.contains(*value))
            .map(|&(field, value, range)| InputWarning::OutOfTrainingRange {
                field,
                value,
                range: (range.min, range.max),
            })
            .collect();

        if let Some(entered) = self.bmi {
            let computed = self.computed_bmi();
            if (entered - computed).abs() > BMI_TOLERANCE {
                warnings.push(InputWarning::BmiMismatch { entered, computed });
            }
        }

        warnings
    }
}
