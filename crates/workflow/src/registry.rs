//! Iteration registry: start/update orchestration and the derived views.

use core::num::NonZeroU32;
use std::path::PathBuf;

use fed_structs::{Iteration, IterationState, ReopenPolicy};
use gateway::{GatewayClient, StartIterationForm, UpdateIterationForm};
use tracing::info;

use crate::error::{WorkflowError, WorkflowResult};

/// Iteration management for a central authority.
pub struct IterationRegistry<'a> {
    gateway: &'a GatewayClient,
    policy: ReopenPolicy,
}

impl<'a> IterationRegistry<'a> {
    /// Creates a registry with the default transition policy
    /// ([`ReopenPolicy::Forbid`]).
    #[must_use]
    pub fn new(gateway: &'a GatewayClient) -> Self {
        Self::with_policy(gateway, ReopenPolicy::default())
    }

    /// Creates a registry with an explicit reopen policy.
    #[must_use]
    pub const fn with_policy(gateway: &'a GatewayClient, policy: ReopenPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Fetches the full iteration set owned by an authority.
    ///
    /// # Errors
    ///
    /// Returns a fetch error; callers keep their previous or empty state.
    pub async fn list(&self, user_id: i64) -> WorkflowResult<Vec<Iteration>> {
        self.gateway
            .list_iterations(user_id)
            .await
            .map_err(WorkflowError::fetch)
    }

    /// Starts a new iteration.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without issuing any request, when a
    /// required field or the model artifact is missing; a submit error
    /// when the backend rejects the form.
    pub async fn start(
        &self,
        central_auth: i64,
        draft: &IterationDraft,
    ) -> WorkflowResult<Iteration> {
        draft.validate_fields()?;
        let Some(model_file) = draft.model_file.clone() else {
            return Err(WorkflowError::validation(
                "a model artifact file is required to start an iteration",
            ));
        };

        let form = StartIterationForm {
            central_auth,
            iteration_name: draft.iteration_name.clone(),
            model_name: draft.model_name.clone(),
            dataset_domain: draft.dataset_domain.clone(),
            version: draft.version,
            model_file,
        };

        let iteration = self
            .gateway
            .start_iteration(&form)
            .await
            .map_err(WorkflowError::submit)?;

        info!(
            id = iteration.id,
            iteration_name = iteration.iteration_name,
            "Iteration started"
        );
        Ok(iteration)
    }

    /// Updates an iteration; a draft version of 0 is the finalize
    /// transition. The artifact is optional and the existing one is kept
    /// when it is omitted.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without issuing any request, when a
    /// required field is missing or the lifecycle transition is rejected
    /// by the configured policy; a submit error when the backend rejects
    /// the form.
    pub async fn update(
        &self,
        central_auth: i64,
        current: &Iteration,
        draft: &IterationDraft,
    ) -> WorkflowResult<Iteration> {
        draft.validate_fields()?;
        check_transition(current, draft.version, self.policy)?;

        let form = UpdateIterationForm {
            central_auth,
            iteration_name: draft.iteration_name.clone(),
            model_name: draft.model_name.clone(),
            dataset_domain: draft.dataset_domain.clone(),
            version: draft.version,
            model_file: draft.model_file.clone(),
        };

        let updated = self
            .gateway
            .update_iteration(current.id, &form)
            .await
            .map_err(WorkflowError::submit)?;

        if updated.is_finalized() {
            info!(id = updated.id, "Iteration finalized");
        }
        Ok(updated)
    }

    /// Finalizes an iteration, keeping its current fields and artifact.
    ///
    /// # Errors
    ///
    /// Same contract as [`IterationRegistry::update`].
    pub async fn finalize(&self, central_auth: i64, current: &Iteration) -> WorkflowResult<Iteration> {
        let draft = IterationDraft {
            iteration_name: current.iteration_name.clone(),
            model_name: current.model_name.clone(),
            dataset_domain: current.dataset_domain.clone().unwrap_or_default(),
            version: 0,
            model_file: None,
        };

        self.update(central_auth, current, &draft).await
    }
}

/// Form state for starting or updating an iteration.
#[derive(Debug, Clone)]
pub struct IterationDraft {
    /// Iteration name, unique per authority
    pub iteration_name: String,

    /// Model architecture name
    pub model_name: String,

    /// Dataset domain the round trains on
    pub dataset_domain: String,

    /// Target version; 0 finalizes
    pub version: u32,

    /// Model artifact; required for start, optional for update
    pub model_file: Option<PathBuf>,
}

impl IterationDraft {
    /// Checks the always-required text fields.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first missing field.
    pub fn validate_fields(&self) -> WorkflowResult<()> {
        for (value, label) in [
            (&self.iteration_name, "iteration name"),
            (&self.model_name, "model name"),
            (&self.dataset_domain, "dataset domain"),
        ] {
            if value.trim().is_empty() {
                return Err(WorkflowError::validation(format!("{label} is required")));
            }
        }
        Ok(())
    }
}

/// Applies the lifecycle rules to a proposed version change. Runs before
/// any request is built, so a rejected transition never reaches the wire.
fn check_transition(
    current: &Iteration,
    target_version: u32,
    policy: ReopenPolicy,
) -> WorkflowResult<()> {
    let state: IterationState = current
        .state()
        .map_err(|err| WorkflowError::validation(err.to_string()))?;

    let transition = match NonZeroU32::new(target_version) {
        Some(version) => state.bump(version, policy),
        None => state.finalize(),
    };

    transition
        .map(|_| ())
        .map_err(|err| WorkflowError::validation(err.to_string()))
}

/// Running iterations (version > 0), ordered by version descending.
/// The sort is stable, so equal versions keep their fetch order.
#[must_use]
pub fn running_view(iterations: &[Iteration]) -> Vec<Iteration> {
    let mut running: Vec<Iteration> = iterations
        .iter()
        .filter(|iteration| iteration.is_running())
        .cloned()
        .collect();

    running.sort_by(|a, b| b.version.cmp(&a.version));
    running
}

/// Finalized iterations (version == 0), newest first.
#[must_use]
pub fn final_view(iterations: &[Iteration]) -> Vec<Iteration> {
    let mut finalized: Vec<Iteration> = iterations
        .iter()
        .filter(|iteration| iteration.is_finalized())
        .cloned()
        .collect();

    finalized.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    finalized
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn iteration(id: i64, name: &str, version: i32, created_offset_hours: i64) -> Iteration {
        Iteration {
            id,
            central_auth: None,
            central_auth_email: None,
            iteration_name: name.to_string(),
            model_name: "ResNet50".to_string(),
            dataset_domain: Some("chest-xray".to_string()),
            model_file: None,
            version,
            created_at: Utc.with_ymd_and_hms(2025, 11, 1, 8, 0, 0).unwrap()
                + Duration::hours(created_offset_hours),
        }
    }

    fn draft(version: u32) -> IterationDraft {
        IterationDraft {
            iteration_name: "Iter_01".to_string(),
            model_name: "ResNet50".to_string(),
            dataset_domain: "chest-xray".to_string(),
            version,
            model_file: None,
        }
    }

    #[test]
    fn test_views_partition_the_set() {
        let all = vec![
            iteration(1, "a", 2, 0),
            iteration(2, "b", 0, 1),
            iteration(3, "c", 5, 2),
            iteration(4, "d", 0, 3),
        ];

        let running = running_view(&all);
        let finalized = final_view(&all);

        assert_eq!(running.len() + finalized.len(), all.len());
        assert!(running.iter().all(|i| i.version > 0));
        assert!(finalized.iter().all(|i| i.version == 0));
    }

    #[test]
    fn test_running_sorted_by_version_descending() {
        let all = vec![
            iteration(1, "a", 1, 0),
            iteration(2, "b", 9, 0),
            iteration(3, "c", 4, 0),
        ];

        let running = running_view(&all);
        let versions: Vec<i32> = running.iter().map(|i| i.version).collect();
        assert_eq!(versions, vec![9, 4, 1]);
    }

    #[test]
    fn test_running_sort_ties_keep_fetch_order() {
        let all = vec![
            iteration(10, "first", 3, 0),
            iteration(11, "second", 3, 1),
            iteration(12, "third", 3, 2),
        ];

        let running = running_view(&all);
        let ids: Vec<i64> = running.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn test_final_sorted_newest_first() {
        let all = vec![
            iteration(1, "old", 0, 0),
            iteration(2, "newest", 0, 48),
            iteration(3, "mid", 0, 24),
        ];

        let finalized = final_view(&all);
        let ids: Vec<i64> = finalized.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_draft_rejects_each_missing_field() {
        for field in ["iteration_name", "model_name", "dataset_domain"] {
            let mut d = draft(1);
            match field {
                "iteration_name" => d.iteration_name.clear(),
                "model_name" => d.model_name.clear(),
                _ => d.dataset_domain.clear(),
            }
            assert!(matches!(
                d.validate_fields(),
                Err(WorkflowError::Validation { .. })
            ));
        }

        assert!(draft(1).validate_fields().is_ok());
    }

    #[tokio::test]
    async fn test_start_with_missing_fields_issues_no_request() {
        // Port 1 never accepts connections: a validation error (not a
        // transport error) proves nothing reached the wire
        let gateway = gateway::GatewayClient::with_base_url("http://127.0.0.1:1").unwrap();
        let registry = IterationRegistry::new(&gateway);

        let mut empty_name = draft(1);
        empty_name.iteration_name.clear();
        assert!(matches!(
            registry.start(1, &empty_name).await,
            Err(WorkflowError::Validation { .. })
        ));

        // All fields set but no artifact file
        assert!(matches!(
            registry.start(1, &draft(1)).await,
            Err(WorkflowError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_reopen_issues_no_request() {
        let gateway = gateway::GatewayClient::with_base_url("http://127.0.0.1:1").unwrap();
        let registry = IterationRegistry::new(&gateway);

        let finalized = iteration(1, "a", 0, 0);
        assert!(matches!(
            registry.update(1, &finalized, &draft(2)).await,
            Err(WorkflowError::Validation { .. })
        ));
    }

    #[test]
    fn test_finalize_transition_allowed_from_running() {
        let current = iteration(1, "a", 3, 0);
        assert!(check_transition(&current, 0, ReopenPolicy::Forbid).is_ok());
    }

    #[test]
    fn test_reopen_rejected_before_any_request() {
        let finalized = iteration(1, "a", 0, 0);
        let result = check_transition(&finalized, 2, ReopenPolicy::Forbid);
        assert!(matches!(result, Err(WorkflowError::Validation { .. })));
    }

    #[test]
    fn test_reopen_permitted_by_policy() {
        let finalized = iteration(1, "a", 0, 0);
        assert!(check_transition(&finalized, 2, ReopenPolicy::Permit).is_ok());
    }

    #[test]
    fn test_refinalizing_is_rejected() {
        let finalized = iteration(1, "a", 0, 0);
        let result = check_transition(&finalized, 0, ReopenPolicy::Permit);
        assert!(matches!(result, Err(WorkflowError::Validation { .. })));
    }
}
