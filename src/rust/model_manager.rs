use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::encoder::{PipelineVariant, PreprocessingBundle};

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Model artifact not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid JSON in {path}: {source}")]
    InvalidJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Manifest is for variant {found}, expected {expected}")]
    VariantMismatch {
        expected: PipelineVariant,
        found: PipelineVariant,
    },
    #[error("Feature order in manifest does not match the {variant} encoder: expected {expected:?}, got {actual:?}")]
    FeatureMismatch {
        variant: PipelineVariant,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("Hash mismatch: expected {expected}, got {actual} for {file}")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },
}

/// Sidecar pinning a model artifact to the feature layout it was trained with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineManifest {
    pub variant: PipelineVariant,
    pub feature_names: Vec<String>,
    /// Lowercase hex SHA-256 of `model.onnx`
    pub model_sha256: String,
}

/// Locates and validates model artifacts on disk.
///
/// ```text
/// <models_dir>/one_hot/model.onnx
/// <models_dir>/one_hot/manifest.json             (optional)
/// <models_dir>/label_encoded/model.onnx
/// <models_dir>/label_encoded/preprocessing.json
/// <models_dir>/label_encoded/manifest.json       (optional)
/// ```
#[derive(Debug, Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
}

impl ModelManager {
    /// Creates a new ModelManager with the default models directory
    pub fn new_default() -> Self {
        Self::new(Self::get_default_models_dir())
    }

    /// Returns the default models directory path
    pub fn get_default_models_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var("OBESITY_CLASSIFIER_MODELS") {
            return PathBuf::from(path);
        }

        // 2. Use platform-specific data directory
        if let Some(data_dir) = dirs::data_dir() {
            return data_dir.join("obesity-classifier").join("models");
        }

        // 3. Fallback to user's home directory
        if let Some(home_dir) = dirs::home_dir() {
            return home_dir.join(".local").join("share").join("obesity-classifier").join("models");
        }

        // 4. If all else fails, use system temp directory
        env::temp_dir().join("obesity-classifier").join("models")
    }

    pub fn new<P: AsRef<Path>>(models_dir: P) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self, variant: PipelineVariant) -> PathBuf {
        self.models_dir.join(variant.dir_name()).join("model.onnx")
    }

    pub fn get_bundle_path(&self, variant: PipelineVariant) -> PathBuf {
        self.models_dir.join(variant.dir_name()).join("preprocessing.json")
    }

    pub fn get_manifest_path(&self, variant: PipelineVariant) -> PathBuf {
        self.models_dir.join(variant.dir_name()).join("manifest.json")
    }

    /// True if every artifact the variant requires is present
    pub fn is_model_available(&self, variant: PipelineVariant) -> bool {
        let model_path = self.get_model_path(variant);
        log::info!("Checking model artifacts for {}:", variant);
        log::info!("  Model path: {:?} (exists: {})", model_path, model_path.exists());

        match variant {
            PipelineVariant::OneHot => model_path.exists(),
            PipelineVariant::LabelEncoded => {
                let bundle_path = self.get_bundle_path(variant);
                log::info!("  Bundle path: {:?} (exists: {})", bundle_path, bundle_path.exists());
                model_path.exists() && bundle_path.exists()
            }
        }
    }

    /// Reads the preprocessing bundle. Structural validation is left to the encoder.
    pub fn load_bundle(&self, variant: PipelineVariant) -> Result<PreprocessingBundle, ModelError> {
        let path = self.get_bundle_path(variant);
        if !path.exists() {
            return Err(ModelError::NotFound(path.display().to_string()));
        }
        read_json(&path)
    }

    /// Reads the manifest if one exists
    pub fn load_manifest(&self, variant: PipelineVariant) -> Result<Option<PipelineManifest>, ModelError> {
        let path = self.get_manifest_path(variant);
        if !path.exists() {
            log::info!("No manifest at {:?}, skipping artifact pinning", path);
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    pub fn file_sha256(path: &Path) -> Result<String, ModelError> {
        log::info!("Hashing file: {:?}", path);
        let bytes = fs::read(path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let hash = format!("{:x}", hasher.finalize());
        log::info!("Read {} bytes, sha256 {}", bytes.len(), hash);
        Ok(hash)
    }

    /// Checks the model file exists and, if a manifest is present, that the
    /// manifest matches both the variant's feature order and the model's hash.
    ///
    /// Returns the model's SHA-256.
    pub fn verify_model(&self, variant: PipelineVariant) -> Result<String, ModelError> {
        let model_path = self.get_model_path(variant);
        log::info!("Verifying model files for {}:", variant);
        log::info!("  Model path: {:?}", model_path);

        if !model_path.exists() {
            return Err(ModelError::NotFound(model_path.display().to_string()));
        }
        let actual = Self::file_sha256(&model_path)?;

        if let Some(manifest) = self.load_manifest(variant)? {
            if manifest.variant != variant {
                return Err(ModelError::VariantMismatch {
                    expected: variant,
                    found: manifest.variant,
                });
            }

            let expected_columns = variant.columns();
            if manifest.feature_names.len() != expected_columns.len()
                || manifest.feature_names.iter().zip(expected_columns).any(|(a, b)| a != b)
            {
                return Err(ModelError::FeatureMismatch {
                    variant,
                    expected: expected_columns.iter().map(|c| c.to_string()).collect(),
                    actual: manifest.feature_names,
                });
            }

            if !manifest.model_sha256.eq_ignore_ascii_case(&actual) {
                log::error!("Model hash mismatch: expected {}, got {}", manifest.model_sha256, actual);
                return Err(ModelError::HashMismatch {
                    file: model_path.display().to_string(),
                    expected: manifest.model_sha256,
                    actual,
                });
            }
            log::info!("Manifest verified successfully");
        }

        Ok(actual)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| ModelError::InvalidJson {
        path: path.display().to_string(),
        source,
    })
}
