use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};

use obesity_classifier::presenter::{render_prediction, render_unknown};
use obesity_classifier::session::run_session;
use obesity_classifier::{
    Classifier, ClassifierError, ModelManager, PatientAttributes, PipelineVariant, RuntimeConfig,
};

#[derive(Parser)]
#[command(author, version, about = "Predicts an obesity category from patient attributes", long_about = None)]
struct Args {
    /// Directory holding the model artifacts (defaults to $OBESITY_CLASSIFIER_MODELS or the user data dir)
    #[arg(short, long)]
    models_dir: Option<PathBuf>,

    /// Preprocessing pipeline the model was trained with
    #[arg(short, long, value_enum, default_value_t = PipelineVariant::OneHot)]
    variant: PipelineVariant,

    /// Read one patient from a JSON file instead of asking interactively
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// ONNX Runtime intra-op threads (0 lets the runtime decide)
    #[arg(long, default_value_t = 0)]
    intra_threads: usize,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    obesity_classifier::init_logger();
    let args = Args::parse();
    let color = !args.no_color && std::env::var_os("NO_COLOR").is_none();

    let models_dir = args.models_dir.unwrap_or_else(ModelManager::get_default_models_dir);
    info!("Loading {} pipeline from {:?}", args.variant, models_dir);

    let classifier = Classifier::builder()
        .with_models_dir(&models_dir)
        .with_variant(args.variant)
        .with_runtime_config(RuntimeConfig {
            intra_threads: args.intra_threads,
            ..RuntimeConfig::default()
        })
        .build()
        .map_err(|e| {
            error!("Failed to load model artifacts: {}", e);
            e
        })
        .with_context(|| format!("could not load the {} model from {}", args.variant, models_dir.display()))?;
    info!("Classifier ready: {:?}", classifier.info());

    match args.input {
        Some(path) => predict_file(&classifier, &path, color),
        None => {
            run_session(&classifier, io::stdin().lock(), io::stdout(), color)?;
            Ok(())
        }
    }
}

fn predict_file(classifier: &Classifier, path: &Path, color: bool) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("could not read {}", path.display()))?;
    let attributes: PatientAttributes =
        serde_json::from_str(&text).with_context(|| format!("invalid patient attributes in {}", path.display()))?;

    match classifier.predict(&attributes) {
        Ok(prediction) => print!("{}", render_prediction(&prediction, color)),
        Err(ClassifierError::UnknownLabel(index)) => {
            warn!("Model returned unknown class index {}", index);
            println!("{}", render_unknown());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
