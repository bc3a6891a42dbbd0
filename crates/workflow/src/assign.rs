//! Client search and assignment, with the two-phase update on success.

use fed_structs::{Assignment, Client, Iteration};
use gateway::{AssignClientRequest, AssignReceipt, GatewayClient};
use tracing::{debug, info};

use crate::error::{WorkflowError, WorkflowResult};

/// Minimum query length before the search hits the backend. Shorter input
/// clears the result list locally.
pub const MIN_SEARCH_LEN: usize = 2;

/// Assignment management for a central authority.
pub struct AssignmentManager<'a> {
    gateway: &'a GatewayClient,
}

impl<'a> AssignmentManager<'a> {
    #[must_use]
    pub const fn new(gateway: &'a GatewayClient) -> Self {
        Self { gateway }
    }

    /// Searches client accounts by email or hospital substring.
    ///
    /// Queries shorter than [`MIN_SEARCH_LEN`] return an empty list
    /// without a network call.
    ///
    /// # Errors
    ///
    /// Returns a fetch error when the backend call fails.
    pub async fn search(&self, query: &str) -> WorkflowResult<Vec<Client>> {
        if query.chars().count() < MIN_SEARCH_LEN {
            debug!(query, "Search below threshold, clearing locally");
            return Ok(Vec::new());
        }

        self.gateway
            .search_clients(query)
            .await
            .map_err(WorkflowError::fetch)
    }

    /// Lists the iterations a client may be assigned to: only running
    /// ones, filtered from the authority's full set.
    ///
    /// # Errors
    ///
    /// Returns a fetch error when the backend call fails.
    pub async fn assignable_iterations(&self, user_id: i64) -> WorkflowResult<Vec<Iteration>> {
        let iterations = self
            .gateway
            .list_iterations(user_id)
            .await
            .map_err(WorkflowError::fetch)?;

        Ok(iterations
            .into_iter()
            .filter(Iteration::is_running)
            .collect())
    }

    /// Lists the authority's assignments, normalized from either wire
    /// shape the backend produces.
    ///
    /// # Errors
    ///
    /// Returns a fetch error when the backend call fails.
    pub async fn assignments(&self, owner_email: &str) -> WorkflowResult<Vec<Assignment>> {
        self.gateway
            .fetch_assignments(owner_email)
            .await
            .map_err(WorkflowError::fetch)
    }

    /// Assigns the selected client to the selected iteration.
    ///
    /// # Errors
    ///
    /// Returns a validation error, without issuing any request, when no
    /// iteration is selected; a submit error carrying the backend's
    /// message verbatim when the assignment is rejected (e.g. the client
    /// is already on a running iteration).
    pub async fn assign(
        &self,
        selection: &AssignmentSelection<'_>,
    ) -> WorkflowResult<AssignReceipt> {
        let request = selection.to_request()?;

        self.gateway
            .assign_client(&request)
            .await
            .map_err(WorkflowError::submit)
    }

    /// Assigns and applies the two-phase update: first the optimistic
    /// local patch (the client disappears from the search results for
    /// instant feedback), then the authoritative reconciliation (the
    /// assignment list is refetched from the backend).
    ///
    /// # Errors
    ///
    /// Same contract as [`AssignmentManager::assign`]; a failed refetch
    /// after a successful assignment surfaces as a fetch error with the
    /// optimistic patch already applied.
    pub async fn assign_and_reconcile(
        &self,
        selection: &AssignmentSelection<'_>,
        search_results: &mut Vec<Client>,
        owner_email: &str,
    ) -> WorkflowResult<AssignOutcome> {
        let receipt = self.assign(selection).await?;

        // Phase 1: optimistic local patch
        remove_assigned(search_results, selection.client.id);

        // Phase 2: authoritative reconciliation
        let assignments = self.assignments(owner_email).await?;

        info!(
            client = selection.client.email,
            assignments = assignments.len(),
            "Client assigned"
        );

        Ok(AssignOutcome {
            receipt,
            assignments,
        })
    }
}

/// The operator's current picks for an assignment.
#[derive(Debug, Clone)]
pub struct AssignmentSelection<'a> {
    /// Acting central authority user ID
    pub central_auth_id: i64,

    /// The client to assign
    pub client: &'a Client,

    /// The chosen iteration; `None` until the operator picks one
    pub iteration: Option<&'a Iteration>,
}

impl AssignmentSelection<'_> {
    /// Shapes the backend request, with model name and data domain filled
    /// from the selected iteration.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no iteration is selected.
    fn to_request(&self) -> WorkflowResult<AssignClientRequest> {
        let iteration = self
            .iteration
            .ok_or_else(|| WorkflowError::validation("select an iteration first"))?;

        Ok(AssignClientRequest {
            central_auth_id: self.central_auth_id,
            client_id: self.client.id,
            iteration_name: iteration.iteration_name.clone(),
            data_domain: iteration.dataset_domain.clone().unwrap_or_default(),
            model_name: iteration.model_name.clone(),
        })
    }
}

/// Result of a successful two-phase assignment.
#[derive(Debug)]
pub struct AssignOutcome {
    /// Backend acknowledgement
    pub receipt: AssignReceipt,

    /// Authoritative assignment list after reconciliation
    pub assignments: Vec<Assignment>,
}

/// Optimistic local patch: drops the just-assigned client from the
/// in-memory search results.
pub fn remove_assigned(results: &mut Vec<Client>, client_id: i64) {
    results.retain(|client| client.id != client_id);
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use fed_structs::Role;

    use super::*;

    fn client(id: i64, email: &str) -> Client {
        Client {
            id,
            email: email.to_string(),
            hospital: Some("City Hospital".to_string()),
            role: Role::Client,
        }
    }

    fn iteration(version: i32) -> Iteration {
        Iteration {
            id: 9,
            central_auth: None,
            central_auth_email: None,
            iteration_name: "Iter_01".to_string(),
            model_name: "ResNet50".to_string(),
            dataset_domain: Some("chest-xray".to_string()),
            model_file: None,
            version,
            created_at: Utc.with_ymd_and_hms(2025, 11, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_selection_without_iteration_is_rejected() {
        let picked = client(4, "node@cityhosp.org");
        let selection = AssignmentSelection {
            central_auth_id: 1,
            client: &picked,
            iteration: None,
        };

        assert!(matches!(
            selection.to_request(),
            Err(WorkflowError::Validation { .. })
        ));
    }

    #[test]
    fn test_selection_fills_request_from_iteration() {
        let picked = client(4, "node@cityhosp.org");
        let running = iteration(2);
        let selection = AssignmentSelection {
            central_auth_id: 1,
            client: &picked,
            iteration: Some(&running),
        };

        let request = selection.to_request().unwrap();
        assert_eq!(request.client_id, 4);
        assert_eq!(request.iteration_name, "Iter_01");
        assert_eq!(request.model_name, "ResNet50");
        assert_eq!(request.data_domain, "chest-xray");
    }

    // Port 1 never accepts connections: if either call below tried the
    // network it would fail, so a clean result proves the short-circuit.
    fn dead_gateway() -> GatewayClient {
        GatewayClient::with_base_url("http://127.0.0.1:1").unwrap()
    }

    #[tokio::test]
    async fn test_search_below_threshold_issues_no_request() {
        let gateway = dead_gateway();
        let manager = AssignmentManager::new(&gateway);

        let results = manager.search("c").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_assign_without_selection_issues_no_request() {
        let gateway = dead_gateway();
        let manager = AssignmentManager::new(&gateway);

        let picked = client(4, "node@cityhosp.org");
        let selection = AssignmentSelection {
            central_auth_id: 1,
            client: &picked,
            iteration: None,
        };

        assert!(matches!(
            manager.assign(&selection).await,
            Err(WorkflowError::Validation { .. })
        ));
    }

    #[test]
    fn test_remove_assigned_drops_only_that_client() {
        let mut results = vec![client(1, "a@x.org"), client(2, "b@x.org"), client(3, "c@x.org")];

        remove_assigned(&mut results, 2);

        let ids: Vec<i64> = results.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);

        // Removing an absent ID leaves the list untouched
        remove_assigned(&mut results, 99);
        assert_eq!(results.len(), 2);
    }
}
