//! Trained-model submissions and their evaluation metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The four evaluation metrics a client reports alongside a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SubmissionMetrics {
    /// Classification accuracy on the client's held-out split
    pub accuracy: f64,

    /// Precision
    pub precision: f64,

    /// Recall
    pub recall: f64,

    /// F1 score
    pub f1_score: f64,
}

/// A client's submitted contribution for one iteration version, as listed
/// on the authority side (latest per client).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Submission {
    /// Submitting client email
    pub client_email: String,

    /// Submitting client hospital
    #[serde(default)]
    pub client_hospital: Option<String>,

    /// Reported accuracy
    #[serde(default)]
    pub accuracy: Option<f64>,

    /// Reported precision
    #[serde(default)]
    pub precision: Option<f64>,

    /// Reported recall
    #[serde(default)]
    pub recall: Option<f64>,

    /// Reported F1 score
    #[serde(default)]
    pub f1_score: Option<f64>,

    /// Iteration version the submission was trained against
    pub version: i32,

    /// Artifact reference for the uploaded model file
    #[serde(default)]
    pub model_file: Option<String>,

    /// When the submission was received
    pub submitted_at: DateTime<Utc>,
}
