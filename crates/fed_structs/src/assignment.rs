//! Assignment records joining clients to iterations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The relation granting one client participation in one iteration.
///
/// Rows come from the authority-side assignment listing; the backend fills
/// the email/hospital fields from the joined client record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Assignment {
    /// Backend row ID
    pub id: i64,

    /// Assigning central authority user ID
    #[serde(default)]
    pub central_auth_id: Option<i64>,

    /// Assigned client user ID
    #[serde(default)]
    pub client_id: Option<i64>,

    /// Assigned client email
    #[serde(default)]
    pub client_email: Option<String>,

    /// Assigned client hospital
    #[serde(default)]
    pub client_hospital: Option<String>,

    /// Assigning central authority email
    #[serde(default)]
    pub central_auth_email: Option<String>,

    /// Name of the iteration the client participates in
    pub iteration_name: String,

    /// Model name carried over from the iteration
    pub model_name: String,

    /// Data domain carried over from the iteration
    pub data_domain: String,

    /// When the assignment was created
    pub assigned_at: DateTime<Utc>,
}

/// A client row as seen from an iteration's assigned-clients listing.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssignedClient {
    /// Client email
    pub client_email: String,

    /// Client hospital
    #[serde(default)]
    pub client_hospital: Option<String>,

    /// Data domain of the assignment
    pub data_domain: String,

    /// When the assignment was created
    pub assigned_at: DateTime<Utc>,
}

/// An open slot from the client's side: an assignment joined with the
/// current version of its still-running iteration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AssignedIteration {
    /// Assignment row ID; submissions are keyed by it
    pub assignment_id: i64,

    /// Name of the running iteration
    pub iteration_name: String,

    /// Model name of the running iteration
    pub model_name: String,

    /// Data domain of the assignment
    #[serde(default)]
    pub data_domain: Option<String>,

    /// Email of the owning central authority
    #[serde(default)]
    pub central_auth_email: Option<String>,

    /// Current version of the iteration; the version a submission reports
    pub version: i32,
}
