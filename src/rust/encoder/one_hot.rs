use log::debug;

use super::categorical::CategoricalField;
use super::standardization::StandardizationConstants;
use super::{Encoded, FeatureVector};
use crate::attributes::{InputWarning, PatientAttributes};
use crate::ClassifierError;

pub const ONE_HOT_LEN: usize = 26;

/// Model input columns of the one-hot pipeline, in order.
pub const ONE_HOT_COLUMNS: [&str; ONE_HOT_LEN] = [
    "Gender",
    "Age",
    "Height",
    "Weight",
    "FAVC",
    "FCVC",
    "NCP",
    "SCC",
    "SMOKE",
    "CH2O",
    "family_history_with_overweight",
    "FAF",
    "TUE",
    "CAEC_no",
    "CAEC_Frequently",
    "CAEC_Always",
    "CALC_no",
    "CALC_Frequently",
    "CALC_Always",
    "MTRANS_Public_Transportation",
    "MTRANS_Walking",
    "MTRANS_Automobile",
    "MTRANS_Motorbike",
    "MTRANS_Bike",
    "BMI",
    "Placeholder",
];

// "Sometimes" has no indicator column in this pipeline.
pub(crate) const CAEC: CategoricalField = CategoricalField {
    name: "CAEC",
    variants: &["no", "Frequently", "Always"],
    default: 0,
};

pub(crate) const CALC: CategoricalField = CategoricalField {
    name: "CALC",
    variants: &["no", "Frequently", "Always"],
    default: 0,
};

pub(crate) const MTRANS: CategoricalField = CategoricalField {
    name: "MTRANS",
    variants: &["Public_Transportation", "Walking", "Automobile", "Motorbike", "Bike"],
    default: 0,
};

/// The one-hot pipeline's features by name. `to_vector` fixes their order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneHotFeatures {
    pub gender: f64,
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub favc: f64,
    pub fcvc: f64,
    pub ncp: f64,
    pub scc: f64,
    pub smoke: f64,
    pub ch2o: f64,
    pub family_history: f64,
    pub faf: f64,
    pub tue: f64,
    /// no, Frequently, Always
    pub caec: [f64; 3],
    /// no, Frequently, Always
    pub calc: [f64; 3],
    /// Public_Transportation, Walking, Automobile, Motorbike, Bike
    pub mtrans: [f64; 5],
    pub bmi: f64,
    pub placeholder: f64,
}

impl OneHotFeatures {
    pub fn to_vector(&self) -> FeatureVector<ONE_HOT_LEN> {
        let [caec_no, caec_frequently, caec_always] = self.caec;
        let [calc_no, calc_frequently, calc_always] = self.calc;
        let [public, walking, automobile, motorbike, bike] = self.mtrans;
        FeatureVector::new([
            self.gender,
            self.age,
            self.height,
            self.weight,
            self.favc,
            self.fcvc,
            self.ncp,
            self.scc,
            self.smoke,
            self.ch2o,
            self.family_history,
            self.faf,
            self.tue,
            caec_no,
            caec_frequently,
            caec_always,
            calc_no,
            calc_frequently,
            calc_always,
            public,
            walking,
            automobile,
            motorbike,
            bike,
            self.bmi,
            self.placeholder,
        ])
    }
}

/// Encoder for the 26-feature one-hot model.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    constants: StandardizationConstants,
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new(StandardizationConstants::training_defaults())
    }
}

impl OneHotEncoder {
    pub fn new(constants: StandardizationConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &StandardizationConstants {
        &self.constants
    }

    /// Builds the named features. BMI is always recomputed from weight and height.
    pub fn features(&self, attributes: &PatientAttributes) -> Result<(OneHotFeatures, Vec<InputWarning>), ClassifierError> {
        let c = &self.constants;
        let mut warnings = Vec::new();

        let features = OneHotFeatures {
            gender: attributes.gender.code(),
            age: c.standardize("Age", attributes.age)?,
            height: c.standardize("Height", attributes.height)?,
            weight: c.standardize("Weight", attributes.weight)?,
            favc: flag(attributes.favc),
            fcvc: c.standardize("FCVC", attributes.fcvc)?,
            ncp: c.standardize("NCP", attributes.ncp)?,
            scc: flag(attributes.scc),
            smoke: flag(attributes.smoke),
            ch2o: c.standardize("CH2O", attributes.ch2o)?,
            family_history: flag(attributes.family_history),
            faf: c.standardize("FAF", attributes.faf)?,
            tue: c.standardize("TUE", attributes.tue)?,
            caec: CAEC.one_hot(&attributes.caec, &mut warnings),
            calc: CALC.one_hot(&attributes.calc, &mut warnings),
            mtrans: MTRANS.one_hot(&attributes.mtrans, &mut warnings),
            bmi: c.standardize("BMI", attributes.computed_bmi())?,
            placeholder: 0.0,
        };

        Ok((features, warnings))
    }

    pub fn encode(&self, attributes: &PatientAttributes) -> Result<Encoded<ONE_HOT_LEN>, ClassifierError> {
        let (features, warnings) = self.features(attributes)?;
        let features = features.to_vector();
        debug!("One-hot feature vector: {:?}", &*features);
        Ok(Encoded { features, warnings })
    }
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
