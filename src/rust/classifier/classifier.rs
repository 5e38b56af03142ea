use log::{debug, info, warn};
use serde::Serialize;

use super::error::ClassifierError;
use super::scorer::Scorer;
use crate::attributes::{InputWarning, PatientAttributes};
use crate::encoder::{FeatureEncoder, PipelineVariant};
use crate::labels::ObesityLevel;

/// The outcome of one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: ObesityLevel,
    /// BMI computed from weight and height, the value fed to the model
    pub bmi: f64,
    /// Non-fatal problems noticed on the way, in the order they were found
    pub warnings: Vec<InputWarning>,
    pub variant: PipelineVariant,
}

/// Runs the encode → score flow for one pipeline variant.
///
/// Built once at startup and never mutated afterwards; shared by reference.
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use obesity_classifier::{Classifier, PipelineVariant};
///
/// let classifier = Classifier::builder()
///     .with_models_dir("models")
///     .with_variant(PipelineVariant::OneHot)
///     .build()?;
/// println!("{:?}", classifier.info());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Classifier {
    pub(super) variant: PipelineVariant,
    pub(super) encoder: Box<dyn FeatureEncoder>,
    pub(super) scorer: Box<dyn Scorer>,
    pub(super) model_path: Option<String>,
    pub(super) model_sha256: Option<String>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the loaded pipeline
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            variant: self.variant,
            feature_names: self.encoder.columns().iter().map(|c| c.to_string()).collect(),
            model_path: self.model_path.clone(),
            model_sha256: self.model_sha256.clone(),
        }
    }

    /// The encoder feeding this classifier's model
    pub fn encoder(&self) -> &dyn FeatureEncoder {
        self.encoder.as_ref()
    }

    /// Encodes the features this classifier would feed to its model
    pub fn encode(&self, attributes: &PatientAttributes) -> Result<(Vec<f64>, Vec<InputWarning>), ClassifierError> {
        self.encoder.encode_features(attributes)
    }

    /// Predicts the obesity category for `attributes`.
    ///
    /// Out-of-range values and unknown categories only add warnings.
    ///
    /// # Errors
    /// - `InputError` if a feature is not a finite number (e.g. zero height)
    /// - `ModelError` if inference fails
    /// - `UnknownLabel` if the model returns a class index outside the label set
    pub fn predict(&self, attributes: &PatientAttributes) -> Result<Prediction, ClassifierError> {
        let mut warnings = attributes.range_warnings();
        for warning in &warnings {
            warn!("{}", warning);
        }

        let (features, encoder_warnings) = self.encoder.encode_features(attributes)?;
        warnings.extend(encoder_warnings);

        if let Some(pos) = features.iter().position(|f| !f.is_finite()) {
            return Err(ClassifierError::InputError(format!(
                "Feature '{}' is not a finite number; check height and weight",
                self.encoder.columns()[pos]
            )));
        }
        debug!("Scoring {} features with the {} pipeline", features.len(), self.variant);

        let index = self.scorer.score(&features)?;
        let label = ObesityLevel::from_index(index)?;
        info!("Predicted {} (class {})", label, index);

        Ok(Prediction {
            label,
            bmi: attributes.computed_bmi(),
            warnings,
            variant: self.variant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::tests::sample_attributes;
    use crate::encoder::OneHotEncoder;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct FixedScorer {
        index: i64,
        calls: Arc<AtomicUsize>,
    }

    impl Scorer for FixedScorer {
        fn input_len(&self) -> usize {
            26
        }

        fn score(&self, features: &[f64]) -> Result<i64, ClassifierError> {
            assert_eq!(features.len(), 26);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.index)
        }
    }

    fn classifier(index: i64) -> (Classifier, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = Classifier {
            variant: PipelineVariant::OneHot,
            encoder: Box::new(OneHotEncoder::default()),
            scorer: Box::new(FixedScorer {
                index,
                calls: Arc::clone(&calls),
            }),
            model_path: None,
            model_sha256: None,
        };
        (classifier, calls)
    }

    #[test]
    fn test_predict_maps_label() {
        let (classifier, calls) = classifier(2);
        let prediction = classifier.predict(&sample_attributes()).unwrap();
        assert_eq!(prediction.label, ObesityLevel::OverweightLevelI);
        assert!((prediction.bmi - 26.23).abs() < 0.01);
        assert!(prediction.warnings.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_warnings_are_collected_in_order() {
        let (classifier, _) = classifier(0);
        let mut attrs = sample_attributes();
        attrs.age = 62.0;
        attrs.mtrans = "Scooter".to_string();
        let prediction = classifier.predict(&attrs).unwrap();
        assert_eq!(prediction.warnings.len(), 2);
        assert!(matches!(prediction.warnings[0], InputWarning::OutOfTrainingRange { field: "Age", .. }));
        assert!(matches!(prediction.warnings[1], InputWarning::UnknownCategory { field: "MTRANS", .. }));
    }

    #[test]
    fn test_unknown_label_index() {
        let (classifier, _) = classifier(9);
        assert!(matches!(
            classifier.predict(&sample_attributes()),
            Err(ClassifierError::UnknownLabel(9))
        ));
    }

    #[test]
    fn test_zero_height_is_rejected_before_scoring() {
        let (classifier, calls) = classifier(1);
        let mut attrs = sample_attributes();
        attrs.height = 0.0;
        assert!(matches!(classifier.predict(&attrs), Err(ClassifierError::InputError(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_info() {
        let (classifier, _) = classifier(1);
        let info = classifier.info();
        assert_eq!(info.variant, PipelineVariant::OneHot);
        assert_eq!(info.feature_names.len(), 26);
        assert_eq!(info.feature_names[25], "Placeholder");
    }
}
