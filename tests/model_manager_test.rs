use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use obesity_classifier::encoder::{PreprocessingBundle, ScalerParams, LABEL_ENCODED_COLUMNS};
use obesity_classifier::{
    Classifier, ClassifierError, ModelError, ModelManager, PipelineManifest, PipelineVariant, Scorer,
};

#[derive(Debug)]
struct ConstantScorer(usize);

impl Scorer for ConstantScorer {
    fn input_len(&self) -> usize {
        self.0
    }

    fn score(&self, _features: &[f64]) -> Result<i64, ClassifierError> {
        Ok(1)
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn bundle() -> PreprocessingBundle {
    let classes = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();
    let mut label_encoders = BTreeMap::new();
    label_encoders.insert("Gender".to_string(), classes(&["Female", "Male"]));
    for column in ["family_history_with_overweight", "FAVC", "SMOKE", "SCC"] {
        label_encoders.insert(column.to_string(), classes(&["no", "yes"]));
    }
    for column in ["CAEC", "CALC"] {
        label_encoders.insert(column.to_string(), classes(&["Always", "Frequently", "Sometimes", "no"]));
    }
    label_encoders.insert(
        "MTRANS".to_string(),
        classes(&["Automobile", "Bike", "Motorbike", "Public_Transportation", "Walking"]),
    );

    PreprocessingBundle {
        feature_names: LABEL_ENCODED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        scaler: ScalerParams {
            mean: vec![0.0; 17],
            scale: vec![1.0; 17],
        },
        label_encoders,
    }
}

fn manifest(variant: PipelineVariant, sha256: &str) -> PipelineManifest {
    PipelineManifest {
        variant,
        feature_names: variant.columns().iter().map(|c| c.to_string()).collect(),
        model_sha256: sha256.to_string(),
    }
}

#[test]
fn test_artifact_layout() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());

    assert_eq!(
        manager.get_model_path(PipelineVariant::OneHot),
        dir.path().join("one_hot").join("model.onnx")
    );
    assert_eq!(
        manager.get_bundle_path(PipelineVariant::LabelEncoded),
        dir.path().join("label_encoded").join("preprocessing.json")
    );
    assert_eq!(
        manager.get_manifest_path(PipelineVariant::LabelEncoded),
        dir.path().join("label_encoded").join("manifest.json")
    );
}

#[test]
fn test_model_availability() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    assert!(!manager.is_model_available(PipelineVariant::OneHot));

    let model_path = manager.get_model_path(PipelineVariant::LabelEncoded);
    fs::create_dir_all(model_path.parent().unwrap()).unwrap();
    fs::write(&model_path, b"onnx").unwrap();
    assert!(!manager.is_model_available(PipelineVariant::LabelEncoded));

    write_json(&manager.get_bundle_path(PipelineVariant::LabelEncoded), &bundle());
    assert!(manager.is_model_available(PipelineVariant::LabelEncoded));
}

#[test]
fn test_model_verification() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let manager = ModelManager::new(dir.path());
    let variant = PipelineVariant::OneHot;

    assert!(matches!(manager.verify_model(variant), Err(ModelError::NotFound(_))));

    let model_path = manager.get_model_path(variant);
    fs::create_dir_all(model_path.parent().unwrap())?;
    fs::write(&model_path, b"model bytes")?;
    let sha256 = ModelManager::file_sha256(&model_path)?;
    assert_eq!(sha256.len(), 64);

    // No manifest: nothing to pin against
    assert_eq!(manager.verify_model(variant)?, sha256);

    write_json(&manager.get_manifest_path(variant), &manifest(variant, &sha256.to_uppercase()));
    assert_eq!(manager.verify_model(variant)?, sha256);

    fs::write(&model_path, b"tampered model bytes")?;
    assert!(matches!(manager.verify_model(variant), Err(ModelError::HashMismatch { .. })));
    Ok(())
}

#[test]
fn test_manifest_mismatches() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    let variant = PipelineVariant::OneHot;

    let model_path = manager.get_model_path(variant);
    fs::create_dir_all(model_path.parent().unwrap()).unwrap();
    fs::write(&model_path, b"model bytes").unwrap();
    let sha256 = ModelManager::file_sha256(&model_path).unwrap();

    write_json(
        &manager.get_manifest_path(variant),
        &manifest(PipelineVariant::LabelEncoded, &sha256),
    );
    assert!(matches!(manager.verify_model(variant), Err(ModelError::VariantMismatch { .. })));

    let mut reordered = manifest(variant, &sha256);
    reordered.feature_names.swap(1, 2);
    write_json(&manager.get_manifest_path(variant), &reordered);
    assert!(matches!(manager.verify_model(variant), Err(ModelError::FeatureMismatch { .. })));

    fs::write(manager.get_manifest_path(variant), "{ not json").unwrap();
    assert!(matches!(manager.verify_model(variant), Err(ModelError::InvalidJson { .. })));
}

#[test]
fn test_bundle_loading() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    let variant = PipelineVariant::LabelEncoded;

    assert!(matches!(manager.load_bundle(variant), Err(ModelError::NotFound(_))));

    write_json(&manager.get_bundle_path(variant), &bundle());
    assert_eq!(manager.load_bundle(variant).unwrap(), bundle());
}

#[test]
fn test_classifier_reads_bundle_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    write_json(&manager.get_bundle_path(PipelineVariant::LabelEncoded), &bundle());

    let classifier = Classifier::builder()
        .with_models_dir(dir.path())
        .with_variant(PipelineVariant::LabelEncoded)
        .with_scorer(ConstantScorer(17))
        .build()
        .unwrap();
    assert_eq!(classifier.info().feature_names, LABEL_ENCODED_COLUMNS.to_vec());
}

#[test]
fn test_invalid_bundle_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    let mut broken = bundle();
    broken.scaler.scale.pop();
    write_json(&manager.get_bundle_path(PipelineVariant::LabelEncoded), &broken);

    let result = Classifier::builder()
        .with_models_dir(dir.path())
        .with_variant(PipelineVariant::LabelEncoded)
        .with_scorer(ConstantScorer(17))
        .build();
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_corrupted_model_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let manager = ModelManager::new(dir.path());
    let model_path = manager.get_model_path(PipelineVariant::OneHot);
    fs::create_dir_all(model_path.parent().unwrap()).unwrap();
    fs::write(&model_path, b"this is not an onnx graph").unwrap();

    let result = Classifier::builder().with_models_dir(dir.path()).build();
    assert!(matches!(result, Err(ClassifierError::ArtifactError(_))));
}
