//! Obesity category prediction from patient attributes.
//!
//! A pretrained classifier (exported to ONNX) is fed a fixed-order feature
//! vector built from raw patient attributes: numeric fields are standardized
//! with training-set statistics, categorical fields are one-hot or label
//! encoded. The predicted category is mapped to a canned description and
//! recommendation.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use obesity_classifier::{presenter, Classifier, Gender, PatientAttributes, PipelineVariant};
//!
//! let classifier = Classifier::builder()
//!     .with_models_dir("models")
//!     .with_variant(PipelineVariant::OneHot)
//!     .build()?;
//!
//! let patient = PatientAttributes {
//!     age: 23.0,
//!     gender: Gender::Male,
//!     height: 1.80,
//!     weight: 85.0,
//!     bmi: None,
//!     favc: true,
//!     fcvc: 2.0,
//!     ncp: 3.0,
//!     scc: false,
//!     smoke: false,
//!     ch2o: 2.0,
//!     family_history: true,
//!     faf: 1.0,
//!     tue: 1.0,
//!     caec: "Frequently".into(),
//!     calc: "no".into(),
//!     mtrans: "Public_Transportation".into(),
//! };
//!
//! let prediction = classifier.predict(&patient)?;
//! print!("{}", presenter::render_prediction(&prediction, false));
//! # Ok(())
//! # }
//! ```
//!
//! # Encoding Only
//!
//! The encoders work without any model artifact:
//!
//! ```
//! use obesity_classifier::encoder::{OneHotEncoder, ONE_HOT_COLUMNS};
//! # use obesity_classifier::{Gender, PatientAttributes};
//! # let patient = PatientAttributes {
//! #     age: 23.0, gender: Gender::Male, height: 1.80, weight: 85.0, bmi: None,
//! #     favc: true, fcvc: 2.0, ncp: 3.0, scc: false, smoke: false, ch2o: 2.0,
//! #     family_history: true, faf: 1.0, tue: 1.0,
//! #     caec: "no".into(), calc: "no".into(), mtrans: "Walking".into(),
//! # };
//!
//! let encoded = OneHotEncoder::default().encode(&patient).unwrap();
//! assert_eq!(encoded.features.len(), ONE_HOT_COLUMNS.len());
//! ```

pub mod attributes;
pub mod classifier;
pub mod encoder;
pub mod form;
pub mod labels;
pub mod model_manager;
pub mod presenter;
pub mod session;
mod runtime;

pub use attributes::{Gender, InputWarning, PatientAttributes};
pub use classifier::{
    Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, OnnxScorer, Prediction, Scorer,
};
pub use encoder::{FeatureEncoder, PipelineVariant};
pub use labels::ObesityLevel;
pub use model_manager::{ModelError, ModelManager, PipelineManifest};
pub use runtime::{create_session_builder, OptimizationLevel, RuntimeConfig};

/// Initialises `env_logger`, defaulting to warnings when `RUST_LOG` is unset
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}
