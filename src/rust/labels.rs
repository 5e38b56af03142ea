use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ClassifierError;

/// The closed set of obesity categories the classifier was trained on.
///
/// The discriminants are the class indices emitted by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObesityLevel {
    #[serde(rename = "Insufficient_Weight")]
    InsufficientWeight = 0,
    #[serde(rename = "Normal_Weight")]
    NormalWeight = 1,
    #[serde(rename = "Overweight_Level_I")]
    OverweightLevelI = 2,
    #[serde(rename = "Overweight_Level_II")]
    OverweightLevelII = 3,
    #[serde(rename = "Obesity_Type_I")]
    ObesityTypeI = 4,
    #[serde(rename = "Obesity_Type_II")]
    ObesityTypeII = 5,
    #[serde(rename = "Obesity_Type_III")]
    ObesityTypeIII = 6,
}

impl ObesityLevel {
    pub const ALL: [ObesityLevel; 7] = [
        ObesityLevel::InsufficientWeight,
        ObesityLevel::NormalWeight,
        ObesityLevel::OverweightLevelI,
        ObesityLevel::OverweightLevelII,
        ObesityLevel::ObesityTypeI,
        ObesityLevel::ObesityTypeII,
        ObesityLevel::ObesityTypeIII,
    ];

    /// Maps a model class index to a label
    pub fn from_index(index: i64) -> Result<Self, ClassifierError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(ClassifierError::UnknownLabel(index))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The label name as it appears in the training data
    pub fn name(self) -> &'static str {
        match self {
            Self::InsufficientWeight => "Insufficient_Weight",
            Self::NormalWeight => "Normal_Weight",
            Self::OverweightLevelI => "Overweight_Level_I",
            Self::OverweightLevelII => "Overweight_Level_II",
            Self::ObesityTypeI => "Obesity_Type_I",
            Self::ObesityTypeII => "Obesity_Type_II",
            Self::ObesityTypeIII => "Obesity_Type_III",
        }
    }

    /// Human readable form, underscores replaced with spaces
    pub fn display_name(self) -> String {
        self.name().replace('_', " ")
    }
}

impl fmt::Display for ObesityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
