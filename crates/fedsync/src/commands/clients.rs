//! Client search, assignment and assignment listings (central role).

use anyhow::{Context, Result, bail};
use fed_structs::Role;
use gateway::GatewayClient;
use session::SessionStore;
use workflow::{AssignmentManager, AssignmentSelection, MIN_SEARCH_LEN};

use super::{current_user, require_role};

/// Searches client accounts by email or hospital substring.
///
/// # Errors
///
/// Returns an error if no central session is active or the fetch fails.
pub async fn search(gateway: &GatewayClient, store: &SessionStore, query: &str) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Central)?;

    let manager = AssignmentManager::new(gateway);
    let results = manager.search(query).await?;

    if results.is_empty() {
        if query.chars().count() < MIN_SEARCH_LEN {
            println!("Type at least {MIN_SEARCH_LEN} characters to search");
        } else {
            println!("No clients match '{query}'");
        }
        return Ok(());
    }

    for client in &results {
        println!(
            "  [{}] {} ({})",
            client.id,
            client.email,
            client.hospital.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Assigns a client, found through the search endpoint, to a running
/// iteration. On success the two-phase update applies: the client leaves
/// the local result list and the assignment list is refetched.
///
/// # Errors
///
/// Returns an error if the search does not identify exactly one client,
/// the iteration is unknown or not running, or the backend rejects the
/// assignment (its message is shown verbatim).
pub async fn assign(
    gateway: &GatewayClient,
    store: &SessionStore,
    client_query: &str,
    iteration_id: i64,
) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Central)?;

    let manager = AssignmentManager::new(gateway);

    let mut results = manager.search(client_query).await?;
    let picked = match results.as_slice() {
        [] => bail!("no client matches '{client_query}'"),
        [single] => single.clone(),
        many => {
            let emails: Vec<&str> = many.iter().map(|c| c.email.as_str()).collect();
            bail!(
                "'{client_query}' matches {} clients ({}); narrow the search",
                many.len(),
                emails.join(", ")
            );
        }
    };

    let assignable = manager.assignable_iterations(user.id).await?;
    let iteration = assignable
        .iter()
        .find(|iteration| iteration.id == iteration_id)
        .with_context(|| format!("iteration {iteration_id} is not running or not yours"))?;

    let selection = AssignmentSelection {
        central_auth_id: user.id,
        client: &picked,
        iteration: Some(iteration),
    };

    let outcome = manager
        .assign_and_reconcile(&selection, &mut results, &user.email)
        .await?;

    println!(
        "{}",
        outcome
            .receipt
            .message
            .unwrap_or_else(|| format!("Assigned {} to {}", picked.email, iteration.iteration_name))
    );
    println!("Assignments now on record: {}", outcome.assignments.len());
    Ok(())
}

/// Lists this authority's assignments.
///
/// # Errors
///
/// Returns an error if no central session is active or the fetch fails.
pub async fn assignments(gateway: &GatewayClient, store: &SessionStore) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Central)?;

    let manager = AssignmentManager::new(gateway);
    let assignments = manager.assignments(&user.email).await?;

    if assignments.is_empty() {
        println!("No assignments yet");
        return Ok(());
    }

    for assignment in &assignments {
        println!(
            "  [{}] {} ({})  iteration={}  model={}  domain={}  assigned={}",
            assignment.id,
            assignment.client_email.as_deref().unwrap_or("-"),
            assignment.client_hospital.as_deref().unwrap_or("-"),
            assignment.iteration_name,
            assignment.model_name,
            assignment.data_domain,
            assignment.assigned_at
        );
    }
    Ok(())
}

/// Lists the clients assigned to one iteration.
///
/// # Errors
///
/// Returns an error if no central session is active or the fetch fails.
pub async fn iteration_clients(
    gateway: &GatewayClient,
    store: &SessionStore,
    id: i64,
) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Central)?;

    let clients = gateway.iteration_clients(id).await?;

    if clients.is_empty() {
        println!("No clients assigned for this iteration");
        return Ok(());
    }

    for client in &clients {
        println!(
            "  {} ({})  domain={}  assigned={}",
            client.client_email,
            client.client_hospital.as_deref().unwrap_or("-"),
            client.data_domain,
            client.assigned_at
        );
    }
    Ok(())
}

/// Lists the latest submission per client for one iteration.
///
/// # Errors
///
/// Returns an error if no central session is active or the fetch fails.
pub async fn submissions(gateway: &GatewayClient, store: &SessionStore, id: i64) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Central)?;

    let submissions = gateway.iteration_submissions(id).await?;

    if submissions.is_empty() {
        println!("No submissions yet for this iteration");
        return Ok(());
    }

    for submission in &submissions {
        println!(
            "  {} ({})  v{}  acc={}  prec={}  rec={}  f1={}  submitted={}",
            submission.client_email,
            submission.client_hospital.as_deref().unwrap_or("-"),
            submission.version,
            fmt_metric(submission.accuracy),
            fmt_metric(submission.precision),
            fmt_metric(submission.recall),
            fmt_metric(submission.f1_score),
            submission.submitted_at
        );
    }
    Ok(())
}

fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.3}"))
}
