mod builder;
mod classifier;
mod error;
mod scorer;

use serde::Serialize;

use crate::encoder::PipelineVariant;

pub use builder::ClassifierBuilder;
pub use classifier::{Classifier, Prediction};
pub use error::ClassifierError;
pub use scorer::{OnnxScorer, Scorer};

/// Summary of a loaded classifier, for display and logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierInfo {
    pub variant: PipelineVariant,
    /// Model input columns in order
    pub feature_names: Vec<String>,
    pub model_path: Option<String>,
    pub model_sha256: Option<String>,
}
