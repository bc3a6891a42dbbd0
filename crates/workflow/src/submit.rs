//! Client submission flow: validation, version pinning, refetch.

use std::path::PathBuf;

use fed_structs::{AssignedIteration, SubmissionMetrics};
use gateway::{GatewayClient, SubmitModelForm};
use tracing::info;

use crate::error::{WorkflowError, WorkflowResult};

/// Submission handling for an assigned client.
pub struct SubmissionFlow<'a> {
    gateway: &'a GatewayClient,
}

impl<'a> SubmissionFlow<'a> {
    #[must_use]
    pub const fn new(gateway: &'a GatewayClient) -> Self {
        Self { gateway }
    }

    /// Lists the iterations currently open for this client to submit to.
    ///
    /// # Errors
    ///
    /// Returns a fetch error when the backend call fails.
    pub async fn open_iterations(&self, email: &str) -> WorkflowResult<Vec<AssignedIteration>> {
        self.gateway
            .current_client_iterations(email)
            .await
            .map_err(WorkflowError::fetch)
    }

    /// Submits the draft and refetches the open-iteration list, so a
    /// just-submitted iteration disappears or reflects its updated state.
    ///
    /// The draft is borrowed: on failure the caller still holds it for a
    /// manual retry; on success the caller drops it, which clears the
    /// form state.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without issuing any request, when the
    /// selection, a metric, or the file is missing; a submit error when
    /// the upload fails; a fetch error when the upload succeeded but the
    /// refetch did not.
    pub async fn submit_and_refresh(
        &self,
        email: &str,
        draft: &SubmissionDraft,
    ) -> WorkflowResult<Vec<AssignedIteration>> {
        let form = draft.validate()?;

        self.gateway
            .submit_model(&form)
            .await
            .map_err(WorkflowError::submit)?;

        info!(assignment = form.assignment, "Model update submitted");

        self.open_iterations(email).await
    }
}

/// Form state for a model submission.
///
/// The version is never part of the form: it is pinned from the selected
/// assignment's current iteration version at validation time.
#[derive(Debug, Clone, Default)]
pub struct SubmissionDraft {
    /// The selected open iteration; `None` until the client picks one
    pub selection: Option<AssignedIteration>,

    /// Reported accuracy
    pub accuracy: Option<f64>,

    /// Reported precision
    pub precision: Option<f64>,

    /// Reported recall
    pub recall: Option<f64>,

    /// Reported F1 score
    pub f1_score: Option<f64>,

    /// Trained model artifact
    pub model_file: Option<PathBuf>,
}

impl SubmissionDraft {
    /// Validates the draft into an upload form.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing piece; nothing
    /// reaches the network until this passes.
    pub fn validate(&self) -> WorkflowResult<SubmitModelForm> {
        let selection = self
            .selection
            .as_ref()
            .ok_or_else(|| WorkflowError::validation("select an iteration first"))?;

        let metrics = SubmissionMetrics {
            accuracy: require_metric(self.accuracy, "accuracy")?,
            precision: require_metric(self.precision, "precision")?,
            recall: require_metric(self.recall, "recall")?,
            f1_score: require_metric(self.f1_score, "f1 score")?,
        };

        let model_file = self
            .model_file
            .clone()
            .ok_or_else(|| WorkflowError::validation("a trained model file is required"))?;

        let version = u32::try_from(selection.version).map_err(|_| {
            WorkflowError::validation(format!(
                "assignment carries invalid version {}",
                selection.version
            ))
        })?;

        Ok(SubmitModelForm {
            assignment: selection.assignment_id,
            metrics,
            version,
            model_file,
        })
    }
}

fn require_metric(value: Option<f64>, label: &str) -> WorkflowResult<f64> {
    value.ok_or_else(|| WorkflowError::validation(format!("{label} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_slot(version: i32) -> AssignedIteration {
        AssignedIteration {
            assignment_id: 42,
            iteration_name: "Iter_01".to_string(),
            model_name: "ResNet50".to_string(),
            data_domain: Some("chest-xray".to_string()),
            central_auth_email: Some("ca@cityhosp.org".to_string()),
            version,
        }
    }

    fn full_draft() -> SubmissionDraft {
        SubmissionDraft {
            selection: Some(open_slot(3)),
            accuracy: Some(0.91),
            precision: Some(0.88),
            recall: Some(0.85),
            f1_score: Some(0.86),
            model_file: Some(PathBuf::from("model.pkl")),
        }
    }

    #[test]
    fn test_version_is_pinned_from_selection() {
        let form = full_draft().validate().unwrap();
        assert_eq!(form.version, 3);
        assert_eq!(form.assignment, 42);
        assert!((form.metrics.accuracy - 0.91).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_selection_is_rejected() {
        let draft = SubmissionDraft {
            selection: None,
            ..full_draft()
        };
        assert!(matches!(
            draft.validate(),
            Err(WorkflowError::Validation { .. })
        ));
    }

    #[test]
    fn test_each_missing_metric_is_rejected() {
        for missing in 0..4 {
            let mut draft = full_draft();
            match missing {
                0 => draft.accuracy = None,
                1 => draft.precision = None,
                2 => draft.recall = None,
                _ => draft.f1_score = None,
            }
            assert!(matches!(
                draft.validate(),
                Err(WorkflowError::Validation { .. })
            ));
        }
    }

    #[test]
    fn test_missing_file_is_rejected() {
        let draft = SubmissionDraft {
            model_file: None,
            ..full_draft()
        };
        assert!(matches!(
            draft.validate(),
            Err(WorkflowError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_draft_issues_no_request() {
        // Port 1 never accepts connections: a validation error (not a
        // transport error) proves nothing reached the wire
        let gateway = gateway::GatewayClient::with_base_url("http://127.0.0.1:1").unwrap();
        let flow = SubmissionFlow::new(&gateway);

        let draft = SubmissionDraft {
            accuracy: None,
            ..full_draft()
        };

        assert!(matches!(
            flow.submit_and_refresh("node@cityhosp.org", &draft).await,
            Err(WorkflowError::Validation { .. })
        ));
    }

    #[test]
    fn test_negative_assignment_version_is_rejected() {
        let draft = SubmissionDraft {
            selection: Some(open_slot(-1)),
            ..full_draft()
        };
        assert!(matches!(
            draft.validate(),
            Err(WorkflowError::Validation { .. })
        ));
    }
}
