//! Typed HTTP gateway for the federated coordination backend.
//!
//! One method per REST operation; request shaping (JSON and multipart) and
//! response normalization live here so the workflow layer only ever sees
//! canonical types.

pub mod api;
mod error;

pub use api::client::GatewayClient;
pub use api::models::{
    AssignClientRequest, AssignReceipt, ClientDashboard, DiabetesInput, DiabetesPrediction,
    HeartDiseaseInput, LoginResponse, MessageResponse, SignupRequest, StartIterationForm,
    SubmitModelForm, UpdateIterationForm,
};
pub use error::GatewayError;
