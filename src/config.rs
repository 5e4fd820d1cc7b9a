use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "fraud_detection_model.onnx";

/// Default ONNX input tensor name (skl2onnx convention for float inputs).
pub const DEFAULT_ONNX_INPUT: &str = "float_input";

/// Default ONNX output carrying the predicted class label.
pub const DEFAULT_ONNX_LABEL_OUTPUT: &str = "output_label";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;

/// Which classifier backend to load the artifact with.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierBackend {
    /// ONNX export of a trained classifier, run with ONNX Runtime (default)
    Onnx,
    /// Decision tree serialized as JSON, evaluated natively
    Tree,
}

impl ClassifierBackend {
    /// Guess the backend from the artifact's file extension.
    /// `.json` means a tree; everything else is treated as ONNX.
    pub fn infer_from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ClassifierBackend::Tree,
            _ => ClassifierBackend::Onnx,
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy, so every
/// setting can live there instead of the shell environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the serialized classifier (FRAUD_MODEL_PATH)
    pub model_path: PathBuf,
    /// Backend used to deserialize `model_path` (FRAUD_CLASSIFIER)
    pub classifier_backend: ClassifierBackend,
    /// ONNX input tensor name (FRAUD_ONNX_INPUT)
    pub onnx_input_name: String,
    /// ONNX output holding the class label (FRAUD_ONNX_LABEL_OUTPUT)
    pub onnx_label_output: String,
    /// Address the HTTP server binds to (FRAUD_BIND)
    pub bind: String,
    /// Port the HTTP server listens on (FRAUD_PORT)
    pub port: u16,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Empty values count as unset, matching how a blank line in .env
    /// (`FRAUD_PORT=`) is usually meant.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model_path = get("FRAUD_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let classifier_backend = match get("FRAUD_CLASSIFIER").as_deref() {
            Some("onnx") => ClassifierBackend::Onnx,
            Some("tree") => ClassifierBackend::Tree,
            Some(other) => anyhow::bail!(
                "Unknown FRAUD_CLASSIFIER value '{other}'. Expected 'onnx' or 'tree'."
            ),
            None => ClassifierBackend::infer_from_path(&model_path),
        };

        let port = match get("FRAUD_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("FRAUD_PORT must be a port number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            model_path,
            classifier_backend,
            onnx_input_name: get("FRAUD_ONNX_INPUT")
                .unwrap_or_else(|| DEFAULT_ONNX_INPUT.to_string()),
            onnx_label_output: get("FRAUD_ONNX_LABEL_OUTPUT")
                .unwrap_or_else(|| DEFAULT_ONNX_LABEL_OUTPUT.to_string()),
            bind: get("FRAUD_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port,
        })
    }

    /// Check that the model artifact exists before trying to deserialize it.
    pub fn require_model(&self) -> Result<()> {
        if !self.model_path.is_file() {
            anyhow::bail!(
                "Model artifact not found: {}\n\
                 Set FRAUD_MODEL_PATH in your .env file to point at the trained classifier.",
                self.model_path.display()
            );
        }
        Ok(())
    }
}
