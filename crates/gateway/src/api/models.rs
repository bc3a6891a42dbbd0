//! Request and response types for the coordination backend.

use std::path::PathBuf;

use fed_structs::{Assignment, Role, SessionUser, SubmissionMetrics};
use serde::{Deserialize, Serialize};

/// Response from POST /login/.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Backend user ID
    pub id: i64,

    /// Account email
    pub email: String,

    /// Account role
    pub role: Role,

    /// Hospital the account belongs to
    #[serde(default)]
    pub hospital: Option<String>,

    /// Human-readable status line
    #[serde(default)]
    pub message: Option<String>,
}

impl LoginResponse {
    /// Converts the login payload into the session record to persist.
    #[must_use]
    pub fn into_session_user(self) -> SessionUser {
        SessionUser {
            id: self.id,
            email: self.email,
            role: self.role,
            hospital: self.hospital,
        }
    }
}

/// Request body for POST /signup/.
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,

    /// Hospital the account belongs to
    pub hospital: String,

    /// Requested role
    pub role: Role,
}

/// A `{message}` acknowledgement body.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    /// Human-readable status line
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body the backend attaches to non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    /// Backend error text
    #[serde(default)]
    pub error: Option<String>,
}

/// The assignment listing arrives either as a bare array or wrapped in an
/// `{"assignments": [...]}` object. This is the single deserialization
/// boundary that folds both wire shapes into one canonical list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum AssignmentsWire {
    /// Bare array shape
    Bare(Vec<Assignment>),

    /// Wrapped object shape
    Wrapped {
        /// The wrapped list
        assignments: Vec<Assignment>,
    },
}

impl AssignmentsWire {
    /// Collapses either wire shape into the canonical list.
    pub(crate) fn into_assignments(self) -> Vec<Assignment> {
        match self {
            Self::Bare(assignments) | Self::Wrapped { assignments } => assignments,
        }
    }
}

/// Multipart form for POST /central-models/start/.
#[derive(Debug, Clone)]
pub struct StartIterationForm {
    /// Owning central authority user ID
    pub central_auth: i64,

    /// Iteration name, unique per authority
    pub iteration_name: String,

    /// Model architecture name
    pub model_name: String,

    /// Dataset domain the round trains on
    pub dataset_domain: String,

    /// Initial running version
    pub version: u32,

    /// Model artifact to upload
    pub model_file: PathBuf,
}

/// Multipart form for PATCH /central-models/{id}/.
///
/// All text fields are sent on every update; the artifact is optional and
/// the backend keeps the existing file when it is omitted.
#[derive(Debug, Clone)]
pub struct UpdateIterationForm {
    /// Owning central authority user ID
    pub central_auth: i64,

    /// Iteration name
    pub iteration_name: String,

    /// Model architecture name
    pub model_name: String,

    /// Dataset domain
    pub dataset_domain: String,

    /// New version; 0 finalizes the iteration
    pub version: u32,

    /// Replacement artifact, if any
    pub model_file: Option<PathBuf>,
}

/// Request body for POST /assign_client/.
#[derive(Debug, Clone, Serialize)]
pub struct AssignClientRequest {
    /// Assigning central authority user ID
    pub central_auth_id: i64,

    /// Client user ID to assign
    pub client_id: i64,

    /// Name of the iteration the client joins
    pub iteration_name: String,

    /// Data domain carried over from the iteration
    pub data_domain: String,

    /// Model name carried over from the iteration
    pub model_name: String,
}

/// Acknowledgement of an assignment request.
///
/// The backend answers with the created assignment row; a `message` field
/// is only present on some deployments, so it stays optional and callers
/// fall back to their own wording.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignReceipt {
    /// Human-readable status line, when the backend provides one
    #[serde(default)]
    pub message: Option<String>,

    /// Row ID of the created assignment, when echoed back
    #[serde(default)]
    pub id: Option<i64>,
}

/// Multipart form for POST /client/submit-model/.
#[derive(Debug, Clone)]
pub struct SubmitModelForm {
    /// Assignment row the submission belongs to
    pub assignment: i64,

    /// Reported evaluation metrics
    pub metrics: SubmissionMetrics,

    /// Iteration version the model was trained against
    pub version: u32,

    /// Trained model artifact to upload
    pub model_file: PathBuf,
}

/// Response from GET /client-dashboard-data/{email}/.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientDashboard {
    /// Client email
    #[serde(default)]
    pub client_email: Option<String>,

    /// Client hospital
    #[serde(default)]
    pub hospital: Option<String>,

    /// Iterations the client has participated in (completed + current)
    pub total_rounds: u64,

    /// Assigned iterations still running
    pub current_running_rounds: u64,

    /// Finalized models the client contributed to
    pub total_finalized_models: u64,
}

/// Form fields for POST /heartdisease/.
#[derive(Debug, Clone, Serialize)]
pub struct HeartDiseaseInput {
    /// Age in years
    pub age: i32,

    /// Gender code as the model was trained on
    pub gender: i32,

    /// Height in centimeters
    pub height: f64,

    /// Weight in kilograms
    pub weight: f64,

    /// Cholesterol level code
    pub cholesterol: i32,

    /// Glucose level code
    pub glucose: i32,

    /// Alcohol intake flag
    pub alcohol: i32,

    /// Systolic blood pressure
    #[serde(rename = "systolicBP")]
    pub systolic_bp: i32,

    /// Diastolic blood pressure
    #[serde(rename = "diastolicBP")]
    pub diastolic_bp: i32,

    /// Smoking flag
    pub smoke: i32,

    /// Physical activity flag
    pub active: i32,
}

/// Response from POST /heartdisease/.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HeartDiseaseResponse {
    /// Outcome level wire value
    pub heartdisease: i64,
}

/// Form fields for POST /diabetes/.
#[derive(Debug, Clone, Serialize)]
pub struct DiabetesInput {
    /// General health rating
    #[serde(rename = "genHlth")]
    pub gen_hlth: i32,

    /// High blood pressure flag
    #[serde(rename = "highBP")]
    pub high_bp: i32,

    /// High cholesterol flag
    #[serde(rename = "highChol")]
    pub high_chol: i32,

    /// Age bucket as the model was trained on
    pub age: i32,

    /// Cholesterol check flag
    #[serde(rename = "cholCheck")]
    pub chol_check: i32,

    /// Heavy alcohol consumption flag
    #[serde(rename = "hvyAlcoholConsump")]
    pub hvy_alcohol_consump: i32,

    /// Sex code as the model was trained on
    pub sex: i32,

    /// Income bucket
    pub income: i32,

    /// Prior heart disease outcome value
    #[serde(rename = "heartDiseaseValue")]
    pub heart_disease_value: i32,

    /// Body mass index
    pub bmi: f64,

    /// Days of poor physical health in the last month
    #[serde(rename = "physHlth")]
    pub phys_hlth: i32,
}

/// Decoded response from POST /diabetes/.
#[derive(Debug, Clone, Deserialize)]
pub struct DiabetesPrediction {
    /// Outcome level wire value
    pub diabetes: i64,

    /// Probability of the positive class, when the model reports one
    #[serde(default)]
    pub probability: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = r#"{
        "id": 3,
        "client_email": "node@cityhosp.org",
        "client_hospital": "City Hospital",
        "iteration_name": "Iter_01",
        "model_name": "ResNet50",
        "data_domain": "chest-xray",
        "assigned_at": "2025-11-02T10:30:00Z"
    }"#;

    #[test]
    fn test_assignments_bare_and_wrapped_normalize_identically() {
        let bare: AssignmentsWire = serde_json::from_str(&format!("[{ROW}]")).unwrap();
        let wrapped: AssignmentsWire =
            serde_json::from_str(&format!("{{\"assignments\": [{ROW}]}}")).unwrap();

        let bare = bare.into_assignments();
        let wrapped = wrapped.into_assignments();

        assert_eq!(bare.len(), 1);
        assert_eq!(bare[0].id, wrapped[0].id);
        assert_eq!(bare[0].iteration_name, wrapped[0].iteration_name);
        assert_eq!(bare[0].client_email, wrapped[0].client_email);
    }

    #[test]
    fn test_assign_receipt_decodes_plain_row() {
        // Some deployments echo the created row without a message field
        let receipt: AssignReceipt = serde_json::from_str(ROW).unwrap();
        assert_eq!(receipt.id, Some(3));
        assert!(receipt.message.is_none());
    }

    #[test]
    fn test_prediction_form_field_names() {
        let input = HeartDiseaseInput {
            age: 52,
            gender: 1,
            height: 172.0,
            weight: 81.5,
            cholesterol: 2,
            glucose: 1,
            alcohol: 0,
            systolic_bp: 138,
            diastolic_bp: 88,
            smoke: 0,
            active: 1,
        };

        let encoded = serde_json::to_value(&input).unwrap();
        assert!(encoded.get("systolicBP").is_some());
        assert!(encoded.get("diastolicBP").is_some());
        assert!(encoded.get("systolic_bp").is_none());
    }
}
