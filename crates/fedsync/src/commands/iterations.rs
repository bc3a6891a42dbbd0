//! Iteration listing, start, update and finalize (central role).

use std::path::PathBuf;

use anyhow::{Context, Result};
use fed_structs::{Iteration, Role};
use gateway::GatewayClient;
use session::SessionStore;
use workflow::{IterationDraft, IterationRegistry, final_view, running_view};

use super::{current_user, require_role};

/// Lists the running and finalized views of the authority's iterations.
///
/// # Errors
///
/// Returns an error if no central session is active or the fetch fails.
pub async fn list(gateway: &GatewayClient, store: &SessionStore) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Central)?;

    let registry = IterationRegistry::new(gateway);
    let iterations = registry.list(user.id).await?;

    let running = running_view(&iterations);
    let finalized = final_view(&iterations);

    println!("Running iterations ({}):", running.len());
    for iteration in &running {
        print_iteration(iteration);
    }

    println!("Finalized iterations ({}):", finalized.len());
    for iteration in &finalized {
        print_iteration(iteration);
    }

    Ok(())
}

/// Starts a new iteration.
///
/// # Errors
///
/// Returns an error if validation fails or the backend rejects the form.
#[expect(clippy::too_many_arguments, reason = "one argument per form field")]
pub async fn start(
    gateway: &GatewayClient,
    store: &SessionStore,
    iteration_name: String,
    model_name: String,
    dataset_domain: String,
    version: u32,
    model_file: PathBuf,
) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Central)?;

    let draft = IterationDraft {
        iteration_name,
        model_name,
        dataset_domain,
        version,
        model_file: Some(model_file),
    };

    let registry = IterationRegistry::new(gateway);
    let iteration = registry.start(user.id, &draft).await?;

    println!(
        "Iteration started: {} ({} v{})",
        iteration.iteration_name, iteration.model_name, iteration.version
    );
    Ok(())
}

/// Updates an iteration; omitted fields keep their current values, a
/// version of 0 finalizes it.
///
/// # Errors
///
/// Returns an error if the iteration is unknown, validation or the
/// transition policy rejects the draft, or the backend rejects the form.
#[expect(clippy::too_many_arguments, reason = "one argument per form field")]
pub async fn update(
    gateway: &GatewayClient,
    store: &SessionStore,
    id: i64,
    iteration_name: Option<String>,
    model_name: Option<String>,
    dataset_domain: Option<String>,
    version: Option<u32>,
    model_file: Option<PathBuf>,
) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Central)?;

    let registry = IterationRegistry::new(gateway);
    let current = find_iteration(&registry, user.id, id).await?;

    let target_version = match version {
        Some(version) => version,
        None => u32::try_from(current.version)
            .with_context(|| format!("iteration {id} carries a negative version"))?,
    };

    // The edit form pre-fills from the current record
    let draft = IterationDraft {
        iteration_name: iteration_name.unwrap_or_else(|| current.iteration_name.clone()),
        model_name: model_name.unwrap_or_else(|| current.model_name.clone()),
        dataset_domain: dataset_domain
            .unwrap_or_else(|| current.dataset_domain.clone().unwrap_or_default()),
        version: target_version,
        model_file,
    };

    let updated = registry.update(user.id, &current, &draft).await?;

    if updated.is_finalized() {
        println!("Iteration {} marked as final (version 0)", updated.iteration_name);
    } else {
        println!(
            "Iteration {} updated to v{}",
            updated.iteration_name, updated.version
        );
    }
    Ok(())
}

/// Finalizes an iteration, keeping its fields and artifact.
///
/// # Errors
///
/// Returns an error if the iteration is unknown, already finalized, or
/// the backend rejects the update.
pub async fn finalize(gateway: &GatewayClient, store: &SessionStore, id: i64) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Central)?;

    let registry = IterationRegistry::new(gateway);
    let current = find_iteration(&registry, user.id, id).await?;

    let finalized = registry.finalize(user.id, &current).await?;
    println!("Iteration {} marked as final (version 0)", finalized.iteration_name);
    Ok(())
}

/// Fetches the authority's set and picks one iteration out of it.
async fn find_iteration(
    registry: &IterationRegistry<'_>,
    user_id: i64,
    id: i64,
) -> Result<Iteration> {
    let iterations = registry.list(user_id).await?;

    iterations
        .into_iter()
        .find(|iteration| iteration.id == id)
        .with_context(|| format!("iteration {id} not found"))
}

fn print_iteration(iteration: &Iteration) {
    println!(
        "  [{}] {}  {} v{}  domain={}  created={}",
        iteration.id,
        iteration.iteration_name,
        iteration.model_name,
        iteration.version,
        iteration.dataset_domain.as_deref().unwrap_or("-"),
        iteration.created_at
    );
}
