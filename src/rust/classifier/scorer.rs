use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use log::{error, info};
use ndarray::Array2;
use ort::session::Session;
use ort::value::{Tensor, ValueType};

use super::error::ClassifierError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// The opaque scoring function: a feature vector in, a class index out.
///
/// Implementations are loaded once and shared read-only, hence `Send + Sync`.
pub trait Scorer: Send + Sync + fmt::Debug {
    /// Number of features the scorer was trained on
    fn input_len(&self) -> usize;

    /// Returns the raw class index predicted for `features`
    fn score(&self, features: &[f64]) -> Result<i64, ClassifierError>;
}

/// A classifier exported to ONNX (e.g. a scikit-learn SVC through skl2onnx).
///
/// The graph must take a single float tensor of shape `[batch, n_features]`
/// and emit the predicted class index as its first output.
#[derive(Debug)]
pub struct OnnxScorer {
    session: Session,
    input_name: String,
    input_len: usize,
}

impl OnnxScorer {
    /// Loads and validates the model at `path`.
    ///
    /// # Errors
    /// - `ArtifactError` if the file is missing or ONNX Runtime rejects it
    /// - `ValidationError` if the model's input width differs from `input_len`
    pub fn load(path: &Path, input_len: usize, config: &RuntimeConfig) -> Result<Self, ClassifierError> {
        if !path.exists() {
            return Err(ClassifierError::ArtifactError(format!("Model file not found: {}", path.display())));
        }

        let session = create_session_builder(config)?
            .commit_from_file(path)
            .map_err(|e| {
                error!("Failed to load model {}: {}", path.display(), e);
                ClassifierError::ArtifactError(format!("Failed to load model {}: {}", path.display(), e))
            })?;

        let input_name = Self::validate_model(&session, input_len)?;
        info!("Model {} validated: input '{}' with {} features", path.display(), input_name, input_len);

        Ok(Self {
            session,
            input_name,
            input_len,
        })
    }

    /// Checks the model has one float input of the expected width and at least one output.
    /// Returns the input name.
    fn validate_model(session: &Session, input_len: usize) -> Result<String, ClassifierError> {
        let input = session.inputs.first().ok_or_else(|| {
            ClassifierError::ValidationError("Model must have an input for the feature vector".to_string())
        })?;

        if session.outputs.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Model must have at least 1 output for the predicted label".to_string(),
            ));
        }

        if let ValueType::Tensor { dimensions, .. } = &input.input_type {
            // Negative dimensions are symbolic and accept any width
            if let Some(&width) = dimensions.last() {
                if width >= 0 && width as usize != input_len {
                    return Err(ClassifierError::ValidationError(format!(
                        "Model expects {} features but the encoder produces {}",
                        width, input_len
                    )));
                }
            }
        } else {
            return Err(ClassifierError::ValidationError(format!(
                "Model input '{}' is not a tensor",
                input.name
            )));
        }

        Ok(input.name.clone())
    }
}

impl Scorer for OnnxScorer {
    fn input_len(&self) -> usize {
        self.input_len
    }

    fn score(&self, features: &[f64]) -> Result<i64, ClassifierError> {
        if features.len() != self.input_len {
            return Err(ClassifierError::ValidationError(format!(
                "Expected {} features, got {}",
                self.input_len,
                features.len()
            )));
        }

        let input_array = Array2::from_shape_vec(
            (1, features.len()),
            features.iter().map(|&x| x as f32).collect(),
        )
        .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;
        let input_dyn = input_array.into_dyn();
        let input = input_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(&input)
                .map_err(|e| ClassifierError::ModelError(format!("Failed to create input tensor: {}", e)))?,
        );

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let labels = outputs[0]
            .try_extract_tensor::<i64>()
            .map_err(|e| ClassifierError::ModelError(format!("Failed to extract label tensor: {}", e)))?;

        labels
            .iter()
            .next()
            .copied()
            .ok_or_else(|| ClassifierError::ModelError("Model returned an empty label tensor".to_string()))
    }
}
