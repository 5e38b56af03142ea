use ort::Error as OrtError;
use std::fmt;

use crate::model_manager::ModelError;

/// Represents the different types of errors that can occur while predicting an obesity category.
#[derive(Debug)]
pub enum ClassifierError {
    /// A model artifact or preprocessing bundle could not be loaded
    ArtifactError(String),
    /// A submitted value could not be parsed
    InputError(String),
    /// The form could not read from or write to the terminal
    IoError(String),
    /// Error occurred while running the ONNX model
    ModelError(String),
    /// A shape or configuration contract was violated
    ValidationError(String),
    /// The model produced a class index outside the known label set
    UnknownLabel(i64),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArtifactError(msg) => write!(f, "Artifact error: {}", msg),
            Self::InputError(msg) => write!(f, "Input error: {}", msg),
            Self::IoError(msg) => write!(f, "IO error: {}", msg),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::UnknownLabel(index) => write!(f, "Unknown predicted label: {}", index),
        }
    }
}

impl std::error::Error for ClassifierError {}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::ArtifactError(err.to_string())
    }
}

impl From<ModelError> for ClassifierError {
    fn from(err: ModelError) -> Self {
        ClassifierError::ArtifactError(err.to_string())
    }
}
