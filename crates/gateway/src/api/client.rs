//! HTTP client for the federated coordination backend.

use core::time::Duration;
use std::path::Path;

use bytes::Bytes;
use config::CONFIG;
use fed_structs::{
    AssignedClient, AssignedIteration, Assignment, Client, Iteration, RiskLevel, Submission,
};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::models::{
    AssignClientRequest, AssignReceipt, AssignmentsWire, ClientDashboard, DiabetesInput,
    DiabetesPrediction, ErrorBody, HeartDiseaseInput, HeartDiseaseResponse, LoginResponse,
    MessageResponse, SignupRequest, StartIterationForm, SubmitModelForm, UpdateIterationForm,
};
use crate::GatewayError;

/// Request timeout for every backend call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the coordination backend REST API.
///
/// Holds no state beyond the connection pool; the backend is the single
/// source of truth and every view refetches through these methods.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    /// Creates a client against the configured backend URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self, GatewayError> {
        Self::with_base_url(CONFIG.backend_url.clone())
    }

    /// Creates a client against an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(GatewayError::Build)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Authenticates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are
    /// rejected; the backend's message is surfaced verbatim.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, GatewayError> {
        info!(email, "Logging in");

        let request = self
            .http
            .post(format!("{}/login/", self.base_url))
            .json(&serde_json::json!({ "email": email, "password": password }));

        send_json(request, "login").await
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; field errors from the
    /// backend arrive as the rejection message.
    pub async fn signup(&self, request: &SignupRequest) -> Result<MessageResponse, GatewayError> {
        info!(email = request.email, role = %request.role, "Signing up");

        let request = self
            .http
            .post(format!("{}/signup/", self.base_url))
            .json(request);

        send_json(request, "signup").await
    }

    /// Lists every iteration owned by a central authority.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_iterations(&self, user_id: i64) -> Result<Vec<Iteration>, GatewayError> {
        let request = self
            .http
            .get(format!("{}/central-models/", self.base_url))
            .query(&[("user_id", user_id)]);

        let iterations: Vec<Iteration> = send_json(request, "list-iterations").await?;
        debug!(count = iterations.len(), "Fetched iterations");

        Ok(iterations)
    }

    /// Starts a new iteration with its model artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be read or the request
    /// fails.
    pub async fn start_iteration(
        &self,
        form: &StartIterationForm,
    ) -> Result<Iteration, GatewayError> {
        info!(
            iteration_name = form.iteration_name,
            model_name = form.model_name,
            version = form.version,
            "Starting iteration"
        );

        let multipart = multipart::Form::new()
            .text("central_auth", form.central_auth.to_string())
            .text("iteration_name", form.iteration_name.clone())
            .text("model_name", form.model_name.clone())
            .text("dataset_domain", form.dataset_domain.clone())
            .text("version", form.version.to_string())
            .part("model_file", artifact_part(&form.model_file).await?);

        let request = self
            .http
            .post(format!("{}/central-models/start/", self.base_url))
            .multipart(multipart);

        send_json(request, "start-iteration").await
    }

    /// Updates an iteration; a version of 0 finalizes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the replacement artifact cannot be read or the
    /// request fails.
    pub async fn update_iteration(
        &self,
        id: i64,
        form: &UpdateIterationForm,
    ) -> Result<Iteration, GatewayError> {
        info!(id, version = form.version, "Updating iteration");

        let mut multipart = multipart::Form::new()
            .text("central_auth", form.central_auth.to_string())
            .text("iteration_name", form.iteration_name.clone())
            .text("model_name", form.model_name.clone())
            .text("dataset_domain", form.dataset_domain.clone())
            .text("version", form.version.to_string());

        // Omitting the part keeps the existing artifact on the backend
        if let Some(path) = &form.model_file {
            multipart = multipart.part("model_file", artifact_part(path).await?);
        }

        let request = self
            .http
            .patch(format!("{}/central-models/{id}/", self.base_url))
            .multipart(multipart);

        send_json(request, "update-iteration").await
    }

    /// Lists the clients assigned to an iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn iteration_clients(&self, id: i64) -> Result<Vec<AssignedClient>, GatewayError> {
        let request = self
            .http
            .get(format!("{}/central-models/{id}/clients/", self.base_url));

        send_json(request, "iteration-clients").await
    }

    /// Lists the latest submission per client for an iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn iteration_submissions(&self, id: i64) -> Result<Vec<Submission>, GatewayError> {
        let request = self
            .http
            .get(format!("{}/central-models/{id}/submissions/", self.base_url));

        send_json(request, "iteration-submissions").await
    }

    /// Searches client accounts by email or hospital substring.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn search_clients(&self, query: &str) -> Result<Vec<Client>, GatewayError> {
        let request = self
            .http
            .get(format!("{}/filter_client", self.base_url))
            .query(&[("search", query)]);

        let clients: Vec<Client> = send_json(request, "search-clients").await?;
        debug!(query, count = clients.len(), "Searched clients");

        Ok(clients)
    }

    /// Lists the assignments created by a central authority.
    ///
    /// Accepts both wire shapes the backend produces (bare array and
    /// wrapped object) and always returns the canonical list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn fetch_assignments(&self, email: &str) -> Result<Vec<Assignment>, GatewayError> {
        let request = self
            .http
            .get(format!("{}/fetch_assign/{email}/", self.base_url));

        let wire: AssignmentsWire = send_json(request, "fetch-assignments").await?;
        Ok(wire.into_assignments())
    }

    /// Assigns a client to a running iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; backend rejections such as a
    /// duplicate assignment are surfaced verbatim.
    pub async fn assign_client(
        &self,
        request: &AssignClientRequest,
    ) -> Result<AssignReceipt, GatewayError> {
        info!(
            client_id = request.client_id,
            iteration_name = request.iteration_name,
            "Assigning client"
        );

        let request = self
            .http
            .post(format!("{}/assign_client/", self.base_url))
            .json(request);

        send_json(request, "assign-client").await
    }

    /// Lists every iteration linked to a client through its assignments.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn client_iterations(&self, user_id: i64) -> Result<Vec<Iteration>, GatewayError> {
        let request = self
            .http
            .get(format!("{}/client-models/", self.base_url))
            .query(&[("user_id", user_id)]);

        send_json(request, "client-iterations").await
    }

    /// Fetches the summarized dashboard counts for a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn client_dashboard(&self, email: &str) -> Result<ClientDashboard, GatewayError> {
        let request = self
            .http
            .get(format!("{}/client-dashboard-data/{email}/", self.base_url));

        send_json(request, "client-dashboard").await
    }

    /// Lists the still-running iterations assigned to a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn current_client_iterations(
        &self,
        email: &str,
    ) -> Result<Vec<AssignedIteration>, GatewayError> {
        let request = self
            .http
            .get(format!("{}/client/current-iterations/{email}/", self.base_url));

        send_json(request, "current-client-iterations").await
    }

    /// Uploads a trained model with its metrics for an assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be read or the request
    /// fails.
    pub async fn submit_model(
        &self,
        form: &SubmitModelForm,
    ) -> Result<MessageResponse, GatewayError> {
        info!(
            assignment = form.assignment,
            version = form.version,
            "Submitting trained model"
        );

        let multipart = multipart::Form::new()
            .text("assignment", form.assignment.to_string())
            .text("accuracy", form.metrics.accuracy.to_string())
            .text("precision", form.metrics.precision.to_string())
            .text("recall", form.metrics.recall.to_string())
            .text("f1_score", form.metrics.f1_score.to_string())
            .text("version", form.version.to_string())
            .part("model_file", artifact_part(&form.model_file).await?);

        let request = self
            .http
            .post(format!("{}/client/submit-model/", self.base_url))
            .multipart(multipart);

        send_json(request, "submit-model").await
    }

    /// Runs the heart-disease prediction service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the outcome value is
    /// outside the 0..=2 contract.
    pub async fn predict_heart_disease(
        &self,
        input: &HeartDiseaseInput,
    ) -> Result<RiskLevel, GatewayError> {
        let request = self
            .http
            .post(format!("{}/heartdisease/", self.base_url))
            .form(input);

        let response: HeartDiseaseResponse = send_json(request, "heart-disease").await?;

        RiskLevel::from_wire(response.heartdisease).ok_or_else(|| GatewayError::Payload {
            endpoint: "heart-disease",
            message: format!("outcome {} is outside 0..=2", response.heartdisease),
        })
    }

    /// Runs the diabetes prediction service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the outcome value is
    /// outside the 0..=2 contract.
    pub async fn predict_diabetes(
        &self,
        input: &DiabetesInput,
    ) -> Result<(RiskLevel, Option<f64>), GatewayError> {
        let request = self
            .http
            .post(format!("{}/diabetes/", self.base_url))
            .form(input);

        let response: DiabetesPrediction = send_json(request, "diabetes").await?;

        let level = RiskLevel::from_wire(response.diabetes).ok_or_else(|| GatewayError::Payload {
            endpoint: "diabetes",
            message: format!("outcome {} is outside 0..=2", response.diabetes),
        })?;

        Ok((level, response.probability))
    }

    /// Downloads a model artifact by its backend reference.
    ///
    /// References are either absolute URLs or backend-relative media
    /// paths; relative paths are joined onto the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails.
    pub async fn download_artifact(&self, reference: &str) -> Result<Bytes, GatewayError> {
        let url = if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else if reference.starts_with('/') {
            format!("{}{reference}", self.base_url)
        } else {
            format!("{}/{reference}", self.base_url)
        };

        info!(url, "Downloading model artifact");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: "download-artifact",
                source,
            })?;

        let response = ensure_success(response, "download-artifact").await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|source| GatewayError::Decode {
                endpoint: "download-artifact",
                source,
            })?;

        debug!(bytes = bytes.len(), "Downloaded artifact");
        Ok(bytes)
    }
}

/// Sends a request and decodes a JSON response, surfacing backend
/// rejections verbatim.
async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
    endpoint: &'static str,
) -> Result<T, GatewayError> {
    let response = request
        .send()
        .await
        .map_err(|source| GatewayError::Transport { endpoint, source })?;

    let response = ensure_success(response, endpoint).await?;

    response
        .json()
        .await
        .map_err(|source| GatewayError::Decode { endpoint, source })
}

/// Converts a non-success response into a rejection carrying the
/// backend's own error text when present.
async fn ensure_success(
    response: reqwest::Response,
    endpoint: &'static str,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error)
        .unwrap_or_else(|| {
            if body.is_empty() {
                format!("{endpoint} request failed with status {status}")
            } else {
                body
            }
        });

    Err(GatewayError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// Reads a model artifact from disk into an upload part.
async fn artifact_part(path: &Path) -> Result<multipart::Part, GatewayError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| GatewayError::Artifact {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path.file_name().map_or_else(
        || "model.bin".to_string(),
        |name| name.to_string_lossy().into_owned(),
    );

    Ok(multipart::Part::bytes(bytes).file_name(file_name))
}
