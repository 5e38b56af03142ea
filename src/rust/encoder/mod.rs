//! Turns [`PatientAttributes`] into the fixed-order numeric vector a model was trained on.
//!
//! Two pipelines exist and they are not interchangeable:
//!
//! * [`OneHotEncoder`]: 26 features, embedded standardization constants,
//!   one-hot indicator columns for CAEC, CALC and MTRANS.
//! * [`LabelEncoder`]: 17 features, per-column label encoders and a scaler
//!   loaded from a preprocessing bundle.
//!
//! Each pipeline writes its features through a named-field struct, and the
//! column name table has the same const length as the vector, so column order
//! and count are fixed at compile time.

mod categorical;
pub(crate) mod label;
mod one_hot;
mod standardization;

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::attributes::{InputWarning, PatientAttributes};
use crate::ClassifierError;

pub use categorical::CategoricalField;
pub use label::{
    LabelEncodedFeatures, LabelEncoder, PreprocessingBundle, ScalerParams, LABEL_ENCODED_COLUMNS,
    LABEL_ENCODED_LEN,
};
pub use one_hot::{OneHotEncoder, OneHotFeatures, ONE_HOT_COLUMNS, ONE_HOT_LEN};
pub use standardization::{standardize, ColumnStats, StandardizationConstants};

/// Selects which preprocessing pipeline (and therefore which model artifact) is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PipelineVariant {
    #[default]
    OneHot,
    LabelEncoded,
}

impl PipelineVariant {
    /// Directory name of this variant's artifacts inside the models directory
    pub fn dir_name(self) -> &'static str {
        match self {
            PipelineVariant::OneHot => "one_hot",
            PipelineVariant::LabelEncoded => "label_encoded",
        }
    }

    /// Column names in model input order
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            PipelineVariant::OneHot => &ONE_HOT_COLUMNS,
            PipelineVariant::LabelEncoded => &LABEL_ENCODED_COLUMNS,
        }
    }

    pub fn feature_count(self) -> usize {
        self.columns().len()
    }
}

impl fmt::Display for PipelineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A feature vector of exactly `N` values in model input order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector<const N: usize>([f64; N]);

impl<const N: usize> FeatureVector<N> {
    pub fn new(values: [f64; N]) -> Self {
        Self(values)
    }

    pub fn into_inner(self) -> [f64; N] {
        self.0
    }

    /// Casts to the single precision the ONNX graph expects
    pub fn to_f32(&self) -> [f32; N] {
        self.0.map(|v| v as f32)
    }
}

impl<const N: usize> Deref for FeatureVector<N> {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// The outcome of encoding one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded<const N: usize> {
    pub features: FeatureVector<N>,
    /// Unknown categorical values that were replaced by a default
    pub warnings: Vec<InputWarning>,
}

/// Object-safe view over both pipelines, used where the variant is chosen at runtime.
pub trait FeatureEncoder: Send + Sync + fmt::Debug {
    fn variant(&self) -> PipelineVariant;

    fn columns(&self) -> &'static [&'static str] {
        self.variant().columns()
    }

    /// Values of a categorical column the model was trained on, in training order.
    /// Empty for numeric or unknown columns.
    fn trained_categories(&self, column: &str) -> Vec<String>;

    /// Encodes into a vector whose length equals `columns().len()`
    fn encode_features(
        &self,
        attributes: &PatientAttributes,
    ) -> Result<(Vec<f64>, Vec<InputWarning>), ClassifierError>;
}

impl FeatureEncoder for OneHotEncoder {
    fn variant(&self) -> PipelineVariant {
        PipelineVariant::OneHot
    }

    fn trained_categories(&self, column: &str) -> Vec<String> {
        let variants: &[&str] = match column {
            "CAEC" => one_hot::CAEC.variants,
            "CALC" => one_hot::CALC.variants,
            "MTRANS" => one_hot::MTRANS.variants,
            _ => &[],
        };
        variants.iter().map(|v| v.to_string()).collect()
    }

    fn encode_features(
        &self,
        attributes: &PatientAttributes,
    ) -> Result<(Vec<f64>, Vec<InputWarning>), ClassifierError> {
        let encoded = self.encode(attributes)?;
        Ok((encoded.features.to_vec(), encoded.warnings))
    }
}

impl FeatureEncoder for LabelEncoder {
    fn variant(&self) -> PipelineVariant {
        PipelineVariant::LabelEncoded
    }

    fn trained_categories(&self, column: &str) -> Vec<String> {
        self.classes(column).to_vec()
    }

    fn encode_features(
        &self,
        attributes: &PatientAttributes,
    ) -> Result<(Vec<f64>, Vec<InputWarning>), ClassifierError> {
        let encoded = self.encode(attributes)?;
        Ok((encoded.features.to_vec(), encoded.warnings))
    }
}
