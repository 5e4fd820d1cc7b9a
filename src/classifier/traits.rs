// Classifier trait — the seam between the HTTP layer and the loaded model.
//
// The web handler only ever sees `Arc<dyn Classifier>`. The default backend
// runs an ONNX export through ONNX Runtime; a JSON decision tree backend
// exists for artifacts that don't need a native runtime.

use anyhow::Result;
use async_trait::async_trait;

/// Class label the model emits for a fraudulent transaction.
pub const FRAUD_LABEL: i64 = 1;

/// Interpret a predicted class label. Only `FRAUD_LABEL` counts as fraud;
/// any other label (0, or something unexpected) is treated as legitimate.
pub fn is_fraud_label(label: i64) -> bool {
    label == FRAUD_LABEL
}

/// A pre-trained binary classifier, loaded once and shared read-only for
/// the lifetime of the process.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Predict the class label for a single sample.
    async fn predict(&self, features: &[f32]) -> Result<i64>;

    /// Short human-readable description of what was loaded.
    fn describe(&self) -> String;
}
