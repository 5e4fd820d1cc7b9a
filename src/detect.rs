// Fraud detection request handling, independent of the HTTP framework.
//
// Flow for one request:
//   raw body bytes → JSON object → `amount` → [amount] → classifier → verdict
//
// Every failure becomes a `DetectError`. Only a missing amount is the
// caller's fault; everything else is reported as a server-side failure with
// the underlying message, which the web layer passes straight through.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::classifier::{is_fraud_label, Classifier};

/// Successful response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FraudVerdict {
    pub is_fraud: bool,
}

#[derive(Debug, Error)]
pub enum DetectError {
    /// `amount` is absent or null
    #[error("Amount is required")]
    MissingAmount,

    /// Body is not parseable JSON
    #[error("{0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Body parsed, but isn't a JSON object
    #[error("Request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// `amount` is present but can't be used as a numeric feature
    #[error("Amount must be a number, got {0}")]
    InvalidAmount(&'static str),

    /// `amount` is a number too large to use as an f32 feature
    #[error("Amount {0} is outside the supported range")]
    AmountOutOfRange(f64),

    /// The classifier failed to produce a label
    #[error("{0:#}")]
    Classifier(anyhow::Error),
}

impl DetectError {
    /// True for errors the caller can fix by resubmitting a corrected request.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DetectError::MissingAmount)
    }
}

/// Name of a JSON value's type, for error messages.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Pull the `amount` feature out of a raw request body.
///
/// Only JSON numbers are accepted. Numeric strings and booleans are not
/// coerced, and numbers that don't fit a finite `f32` are rejected rather
/// than silently becoming infinity.
pub fn parse_amount(body: &[u8]) -> Result<f32, DetectError> {
    let payload: Value = serde_json::from_slice(body)?;

    let fields = match payload {
        Value::Object(fields) => fields,
        other => return Err(DetectError::NotAnObject(json_type(&other))),
    };

    let amount = match fields.get("amount") {
        None | Some(Value::Null) => return Err(DetectError::MissingAmount),
        Some(value) => value,
    };

    let Some(number) = amount.as_f64() else {
        return Err(DetectError::InvalidAmount(json_type(amount)));
    };

    let feature = number as f32;
    if !feature.is_finite() {
        return Err(DetectError::AmountOutOfRange(number));
    }

    Ok(feature)
}

/// Score one amount against the classifier.
pub async fn score_amount(
    classifier: &dyn Classifier,
    amount: f32,
) -> Result<FraudVerdict, DetectError> {
    let label = classifier
        .predict(&[amount])
        .await
        .map_err(DetectError::Classifier)?;

    let verdict = FraudVerdict {
        is_fraud: is_fraud_label(label),
    };
    debug!(amount, label, is_fraud = verdict.is_fraud, "Scored transaction");
    Ok(verdict)
}

/// Parse a raw request body and score it.
pub async fn detect(classifier: &dyn Classifier, body: &[u8]) -> Result<FraudVerdict, DetectError> {
    let amount = parse_amount(body)?;
    score_amount(classifier, amount).await
}
