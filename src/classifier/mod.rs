// Classifier loading — picks the backend from config and deserializes the
// artifact exactly once. Any failure here is fatal for the server.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::{ClassifierBackend, Config};

pub mod onnx;
pub mod traits;
pub mod tree;

pub use traits::{is_fraud_label, Classifier};

/// Load the configured classifier artifact into a shared handle.
pub fn load(config: &Config) -> Result<Arc<dyn Classifier>> {
    config.require_model()?;

    let classifier: Arc<dyn Classifier> = match config.classifier_backend {
        ClassifierBackend::Onnx => Arc::new(onnx::OnnxClassifier::load(
            &config.model_path,
            &config.onnx_input_name,
            &config.onnx_label_output,
        )?),
        ClassifierBackend::Tree => Arc::new(tree::TreeClassifier::load(&config.model_path)?),
    };

    info!(
        backend = ?config.classifier_backend,
        classifier = %classifier.describe(),
        "Classifier loaded"
    );

    Ok(classifier)
}
