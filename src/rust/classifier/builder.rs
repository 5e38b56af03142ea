use std::path::Path;

use log::info;

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::scorer::{OnnxScorer, Scorer};
use crate::encoder::{
    FeatureEncoder, LabelEncoder, OneHotEncoder, PipelineVariant, PreprocessingBundle,
    StandardizationConstants,
};
use crate::runtime::RuntimeConfig;
use crate::ModelManager;

/// A builder for constructing a Classifier with a fluent interface.
#[derive(Default, Debug)]
pub struct ClassifierBuilder {
    variant: PipelineVariant,
    manager: Option<ModelManager>,
    runtime_config: RuntimeConfig,
    constants: Option<StandardizationConstants>,
    bundle: Option<PreprocessingBundle>,
    scorer: Option<Box<dyn Scorer>>,
}

impl ClassifierBuilder {
    /// Creates a builder for the default one-hot pipeline
    ///
    /// # Example
    /// ```
    /// use obesity_classifier::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the preprocessing pipeline and the model artifact that goes with it
    pub fn with_variant(mut self, variant: PipelineVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Loads artifacts from `dir` instead of the default models directory
    pub fn with_models_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.manager = Some(ModelManager::new(dir));
        self
    }

    /// Sets the runtime configuration for ONNX model execution
    ///
    /// # Example
    /// ```
    /// use obesity_classifier::{ClassifierBuilder, RuntimeConfig};
    ///
    /// let config = RuntimeConfig::default();
    /// let builder = ClassifierBuilder::new()
    ///     .with_runtime_config(config);
    /// ```
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Overrides the standardization constants of the one-hot pipeline
    pub fn with_constants(mut self, constants: StandardizationConstants) -> Self {
        self.constants = Some(constants);
        self
    }

    /// Supplies the label-encoding bundle directly instead of reading it from disk
    ///
    /// # Errors
    /// `ValidationError` if the bundle does not match the label-encoded column layout
    pub fn with_bundle(mut self, bundle: PreprocessingBundle) -> Result<Self, ClassifierError> {
        bundle.validate()?;
        self.bundle = Some(bundle);
        Ok(self)
    }

    /// Uses `scorer` instead of loading an ONNX model
    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Some(Box::new(scorer));
        self
    }

    /// Builds and returns the final Classifier instance
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - A required artifact is missing, unreadable or fails manifest verification
    ///   - The preprocessing bundle is invalid
    ///   - The model's input width differs from the encoder's feature count
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        let variant = self.variant;
        let manager = self.manager.unwrap_or_else(ModelManager::new_default);
        info!("Building {} classifier from {:?}", variant, manager.models_dir());

        let encoder: Box<dyn FeatureEncoder> = match variant {
            PipelineVariant::OneHot => {
                if self.bundle.is_some() {
                    return Err(ClassifierError::ValidationError(
                        "A preprocessing bundle only applies to the label-encoded pipeline".to_string(),
                    ));
                }
                Box::new(OneHotEncoder::new(
                    self.constants.unwrap_or_else(StandardizationConstants::training_defaults),
                ))
            }
            PipelineVariant::LabelEncoded => {
                if self.constants.is_some() {
                    return Err(ClassifierError::ValidationError(
                        "Standardization constants only apply to the one-hot pipeline; use a bundle".to_string(),
                    ));
                }
                let bundle = match self.bundle {
                    Some(bundle) => bundle,
                    None => manager.load_bundle(variant)?,
                };
                Box::new(LabelEncoder::new(bundle)?)
            }
        };

        let (scorer, model_path, model_sha256): (Box<dyn Scorer>, _, _) = match self.scorer {
            Some(scorer) => (scorer, None, None),
            None => {
                let sha256 = manager.verify_model(variant)?;
                let path = manager.get_model_path(variant);
                let scorer = OnnxScorer::load(&path, variant.feature_count(), &self.runtime_config)?;
                (Box::new(scorer) as Box<dyn Scorer>, Some(path.display().to_string()), Some(sha256))
            }
        };

        let expected = encoder.columns().len();
        if scorer.input_len() != expected {
            return Err(ClassifierError::ValidationError(format!(
                "Scorer takes {} features but the {} encoder produces {}",
                scorer.input_len(),
                variant,
                expected
            )));
        }

        Ok(Classifier {
            variant,
            encoder,
            scorer,
            model_path,
            model_sha256,
        })
    }
}
