// Local ONNX classifier — a trained model exported with skl2onnx (or any
// exporter producing the same shapes), run on the CPU with ONNX Runtime.
//
// Input:  float tensor [1, n_features]
// Output: int64 label tensor [1] (skl2onnx "output_label"), or a float
//         score tensor [1, n_classes] for exporters that only emit scores.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use super::traits::Classifier;

/// Score above which a single-column output is read as the positive class.
const SINGLE_SCORE_THRESHOLD: f32 = 0.5;

pub struct OnnxClassifier {
    // ort::Session::run takes &mut self, and spawn_blocking needs 'static,
    // hence Arc<Mutex<_>>. Requests serialize on the lock during inference.
    session: Arc<Mutex<Session>>,
    input_name: Arc<str>,
    label_output: Arc<str>,
    model_path: PathBuf,
}

impl OnnxClassifier {
    /// Load an ONNX model from `model_path`.
    ///
    /// `input_name` is the float input tensor; `label_output` names the
    /// output read for the class label.
    pub fn load(model_path: &Path, input_name: &str, label_output: &str) -> Result<Self> {
        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        debug!(
            path = %model_path.display(),
            input = input_name,
            output = label_output,
            "Loaded ONNX classifier"
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name: Arc::from(input_name),
            label_output: Arc::from(label_output),
            model_path: model_path.to_path_buf(),
        })
    }
}

#[async_trait]
impl Classifier for OnnxClassifier {
    async fn predict(&self, features: &[f32]) -> Result<i64> {
        if features.is_empty() {
            anyhow::bail!("Cannot run ONNX inference on an empty feature vector");
        }

        let session = Arc::clone(&self.session);
        let input_name = Arc::clone(&self.input_name);
        let label_output = Arc::clone(&self.label_output);
        let features = features.to_vec();

        tokio::task::spawn_blocking(move || {
            let shape = [1_i64, features.len() as i64];
            let input = Tensor::from_array((shape, features))
                .context("Failed to create input tensor")?;

            let mut session = session
                .lock()
                .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

            let outputs = session
                .run(ort::inputs![&*input_name => input])
                .context("ONNX inference failed")?;

            let output = outputs.get(&*label_output).with_context(|| {
                format!("Model has no output named '{label_output}'")
            })?;

            // Label output first; fall back to reading class scores.
            if let Ok((_shape, labels)) = output.try_extract_tensor::<i64>() {
                return first_label(labels);
            }

            let (shape, scores) = output
                .try_extract_tensor::<f32>()
                .with_context(|| format!("Output '{label_output}' is neither int64 nor float"))?;
            let dims: Vec<i64> = shape.iter().copied().collect();
            label_from_scores(&dims, scores)
        })
        .await
        .context("spawn_blocking panicked")?
    }

    fn describe(&self) -> String {
        format!("onnx:{}", self.model_path.display())
    }
}

/// Label of the first (only) sample in an int64 label tensor.
fn first_label(labels: &[i64]) -> Result<i64> {
    labels
        .first()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("Model returned an empty label tensor"))
}

/// Derive a class label from the first row of a float score tensor.
///
/// `[batch, n_classes]` with two or more classes → argmax of the row.
/// `[batch, 1]` or `[batch]` → positive class when the score reaches 0.5.
fn label_from_scores(dims: &[i64], scores: &[f32]) -> Result<i64> {
    let n_classes = match dims {
        [_, classes] => *classes as usize,
        _ => 1,
    };

    if n_classes >= 2 {
        let row = scores
            .get(..n_classes)
            .ok_or_else(|| anyhow::anyhow!("Score tensor shorter than its shape {dims:?}"))?;
        let (best, _) = row
            .iter()
            .enumerate()
            .fold((0usize, f32::NEG_INFINITY), |(bi, bs), (i, &s)| {
                if s > bs {
                    (i, s)
                } else {
                    (bi, bs)
                }
            });
        return Ok(best as i64);
    }

    let score = scores
        .first()
        .ok_or_else(|| anyhow::anyhow!("Model returned an empty score tensor"))?;
    Ok(i64::from(*score >= SINGLE_SCORE_THRESHOLD))
}
