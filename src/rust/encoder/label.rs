use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use super::categorical::resolve_code;
use super::standardization::standardize;
use super::{Encoded, FeatureVector};
use crate::attributes::{InputWarning, PatientAttributes};
use crate::ClassifierError;

pub const LABEL_ENCODED_LEN: usize = 17;

/// Model input columns of the label-encoding pipeline, in order.
pub const LABEL_ENCODED_COLUMNS: [&str; LABEL_ENCODED_LEN] = [
    "Gender",
    "Age",
    "Height",
    "Weight",
    "family_history_with_overweight",
    "FAVC",
    "FCVC",
    "NCP",
    "CAEC",
    "SMOKE",
    "CH2O",
    "SCC",
    "FAF",
    "TUE",
    "CALC",
    "MTRANS",
    "BMI",
];

/// Columns that go through a label encoder before scaling.
pub(crate) const CATEGORICAL_COLUMNS: [&str; 8] = [
    "Gender",
    "family_history_with_overweight",
    "FAVC",
    "CAEC",
    "SMOKE",
    "SCC",
    "CALC",
    "MTRANS",
];

/// StandardScaler parameters, one entry per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// The scaler and label encoders fitted alongside the label-encoded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingBundle {
    pub feature_names: Vec<String>,
    pub scaler: ScalerParams,
    /// Column name to sorted class list; a value's code is its index
    pub label_encoders: BTreeMap<String, Vec<String>>,
}

impl PreprocessingBundle {
    /// Checks the bundle against the compiled column order
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.feature_names.len() != LABEL_ENCODED_LEN
            || self.feature_names.iter().zip(LABEL_ENCODED_COLUMNS).any(|(a, b)| a != b)
        {
            return Err(ClassifierError::ValidationError(format!(
                "Bundle feature order {:?} does not match expected {:?}",
                self.feature_names, LABEL_ENCODED_COLUMNS
            )));
        }
        if self.scaler.mean.len() != LABEL_ENCODED_LEN || self.scaler.scale.len() != LABEL_ENCODED_LEN {
            return Err(ClassifierError::ValidationError(format!(
                "Scaler must have {} means and scales, found {} and {}",
                LABEL_ENCODED_LEN,
                self.scaler.mean.len(),
                self.scaler.scale.len()
            )));
        }
        if let Some(pos) = self.scaler.scale.iter().position(|s| !s.is_finite() || *s == 0.0) {
            return Err(ClassifierError::ValidationError(format!(
                "Scaler scale for '{}' must be finite and non-zero",
                LABEL_ENCODED_COLUMNS[pos]
            )));
        }
        if let Some(pos) = self.scaler.mean.iter().position(|m| !m.is_finite()) {
            return Err(ClassifierError::ValidationError(format!(
                "Scaler mean for '{}' must be finite",
                LABEL_ENCODED_COLUMNS[pos]
            )));
        }
        for column in CATEGORICAL_COLUMNS {
            match self.label_encoders.get(column) {
                Some(classes) if !classes.is_empty() => {}
                _ => {
                    return Err(ClassifierError::ValidationError(format!(
                        "Missing label encoder for column '{}'",
                        column
                    )))
                }
            }
        }
        Ok(())
    }
}

/// The label-encoded pipeline's features by name, before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelEncodedFeatures {
    pub gender: f64,
    pub age: f64,
    pub height: f64,
    pub weight: f64,
    pub family_history: f64,
    pub favc: f64,
    pub fcvc: f64,
    pub ncp: f64,
    pub caec: f64,
    pub smoke: f64,
    pub ch2o: f64,
    pub scc: f64,
    pub faf: f64,
    pub tue: f64,
    pub calc: f64,
    pub mtrans: f64,
    pub bmi: f64,
}

impl LabelEncodedFeatures {
    pub fn to_vector(&self) -> FeatureVector<LABEL_ENCODED_LEN> {
        FeatureVector::new([
            self.gender,
            self.age,
            self.height,
            self.weight,
            self.family_history,
            self.favc,
            self.fcvc,
            self.ncp,
            self.caec,
            self.smoke,
            self.ch2o,
            self.scc,
            self.faf,
            self.tue,
            self.calc,
            self.mtrans,
            self.bmi,
        ])
    }
}

/// Encoder for the 17-feature label-encoded model.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: BTreeMap<String, Vec<String>>,
    mean: [f64; LABEL_ENCODED_LEN],
    scale: [f64; LABEL_ENCODED_LEN],
}

impl LabelEncoder {
    pub fn new(bundle: PreprocessingBundle) -> Result<Self, ClassifierError> {
        bundle.validate()?;
        let mut mean = [0.0; LABEL_ENCODED_LEN];
        let mut scale = [0.0; LABEL_ENCODED_LEN];
        mean.copy_from_slice(&bundle.scaler.mean);
        scale.copy_from_slice(&bundle.scaler.scale);
        Ok(Self {
            classes: bundle.label_encoders,
            mean,
            scale,
        })
    }

    /// Sorted classes of a label-encoded column; a value's code is its index
    pub fn classes(&self, column: &str) -> &[String] {
        self.classes.get(column).map(Vec::as_slice).unwrap_or_default()
    }

    fn code(&self, column: &'static str, value: &str, warnings: &mut Vec<InputWarning>) -> f64 {
        resolve_code(column, self.classes(column), value, warnings) as f64
    }

    /// Label-encodes the categorical columns; numeric columns are passed through raw
    pub fn features(&self, attributes: &PatientAttributes) -> (LabelEncodedFeatures, Vec<InputWarning>) {
        let mut warnings = Vec::new();
        let w = &mut warnings;

        let features = LabelEncodedFeatures {
            gender: self.code("Gender", attributes.gender.as_str(), w),
            age: attributes.age,
            height: attributes.height,
            weight: attributes.weight,
            family_history: self.code("family_history_with_overweight", yes_no(attributes.family_history), w),
            favc: self.code("FAVC", yes_no(attributes.favc), w),
            fcvc: attributes.fcvc,
            ncp: attributes.ncp,
            caec: self.code("CAEC", &attributes.caec, w),
            smoke: self.code("SMOKE", yes_no(attributes.smoke), w),
            ch2o: attributes.ch2o,
            scc: self.code("SCC", yes_no(attributes.scc), w),
            faf: attributes.faf,
            tue: attributes.tue,
            calc: self.code("CALC", &attributes.calc, w),
            mtrans: self.code("MTRANS", &attributes.mtrans, w),
            bmi: attributes.computed_bmi(),
        };

        (features, warnings)
    }

    pub fn encode(&self, attributes: &PatientAttributes) -> Result<Encoded<LABEL_ENCODED_LEN>, ClassifierError> {
        let (features, warnings) = self.features(attributes);
        let raw = features.to_vector().into_inner();
        let scaled: [f64; LABEL_ENCODED_LEN] =
            std::array::from_fn(|i| standardize(raw[i], self.mean[i], self.scale[i]));
        debug!("Label-encoded feature vector: {:?}", scaled);
        Ok(Encoded {
            features: FeatureVector::new(scaled),
            warnings,
        })
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::attributes::tests::sample_attributes;

    pub(crate) fn sample_bundle() -> PreprocessingBundle {
        let classes = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        let mut label_encoders = BTreeMap::new();
        label_encoders.insert("Gender".to_string(), classes(&["Female", "Male"]));
        for column in ["family_history_with_overweight", "FAVC", "SMOKE", "SCC"] {
            label_encoders.insert(column.to_string(), classes(&["no", "yes"]));
        }
        label_encoders.insert("CAEC".to_string(), classes(&["Always", "Frequently", "Sometimes", "no"]));
        label_encoders.insert("CALC".to_string(), classes(&["Always", "Frequently", "Sometimes", "no"]));
        label_encoders.insert(
            "MTRANS".to_string(),
            classes(&["Automobile", "Bike", "Motorbike", "Public_Transportation", "Walking"]),
        );

        PreprocessingBundle {
            feature_names: LABEL_ENCODED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            scaler: ScalerParams {
                mean: vec![
                    0.5, 24.3, 1.70, 86.6, 0.8, 0.9, 2.4, 2.7, 2.0, 0.02, 2.0, 0.05, 1.0, 0.66, 2.3, 2.4, 29.7,
                ],
                scale: vec![
                    0.5, 6.3, 0.09, 26.2, 0.4, 0.3, 0.5, 0.8, 0.5, 0.14, 0.6, 0.2, 0.85, 0.6, 0.5, 1.3, 8.0,
                ],
            },
            label_encoders,
        }
    }

    fn column(name: &str) -> usize {
        LABEL_ENCODED_COLUMNS.iter().position(|c| *c == name).unwrap()
    }

    #[test]
    fn test_codes_before_scaling() {
        let encoder = LabelEncoder::new(sample_bundle()).unwrap();
        let (features, warnings) = encoder.features(&sample_attributes());
        assert!(warnings.is_empty());
        assert_eq!(features.gender, 1.0);
        assert_eq!(features.family_history, 1.0);
        assert_eq!(features.favc, 1.0);
        assert_eq!(features.smoke, 0.0);
        assert_eq!(features.caec, 1.0); // Frequently
        assert_eq!(features.calc, 3.0); // no
        assert_eq!(features.mtrans, 4.0); // Walking
        assert_eq!(features.age, 23.0);
    }

    #[test]
    fn test_every_column_is_scaled() {
        let bundle = sample_bundle();
        let encoder = LabelEncoder::new(bundle.clone()).unwrap();
        let attrs = sample_attributes();
        let (raw, _) = encoder.features(&attrs);
        let raw = raw.to_vector();
        let encoded = encoder.encode(&attrs).unwrap().features;

        for i in 0..LABEL_ENCODED_LEN {
            let expected = (raw[i] - bundle.scaler.mean[i]) / bundle.scaler.scale[i];
            assert!((encoded[i] - expected).abs() < 1e-9, "column {}", LABEL_ENCODED_COLUMNS[i]);
        }
        let bmi = (attrs.computed_bmi() - 29.7) / 8.0;
        assert!((encoded[column("BMI")] - bmi).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_value_falls_back_to_code_zero() {
        let encoder = LabelEncoder::new(sample_bundle()).unwrap();
        let mut attrs = sample_attributes();
        attrs.mtrans = "Scooter".to_string();
        let (features, warnings) = encoder.features(&attrs);
        assert_eq!(features.mtrans, 0.0);
        assert!(matches!(
            warnings.as_slice(),
            [InputWarning::UnknownCategory { field: "MTRANS", substitute, .. }] if substitute == "Automobile"
        ));
    }

    #[test]
    fn test_rejects_reordered_features() {
        let mut bundle = sample_bundle();
        bundle.feature_names.swap(0, 1);
        assert!(matches!(LabelEncoder::new(bundle), Err(ClassifierError::ValidationError(_))));
    }

    #[test]
    fn test_rejects_bad_scaler() {
        let mut bundle = sample_bundle();
        bundle.scaler.scale[3] = 0.0;
        assert!(LabelEncoder::new(bundle).is_err());

        let mut bundle = sample_bundle();
        bundle.scaler.mean.pop();
        assert!(LabelEncoder::new(bundle).is_err());
    }

    #[test]
    fn test_rejects_missing_encoder() {
        let mut bundle = sample_bundle();
        bundle.label_encoders.remove("CALC");
        assert!(LabelEncoder::new(bundle).is_err());
    }

    #[test]
    fn test_deterministic() {
        let encoder = LabelEncoder::new(sample_bundle()).unwrap();
        let attrs = sample_attributes();
        assert_eq!(encoder.encode(&attrs).unwrap(), encoder.encode(&attrs).unwrap());
    }
}
