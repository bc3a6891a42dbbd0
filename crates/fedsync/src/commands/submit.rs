//! Open-iteration listing and model submission (client role).

use std::path::PathBuf;

use anyhow::{Context, Result};
use fed_structs::Role;
use gateway::GatewayClient;
use session::SessionStore;
use workflow::{SubmissionDraft, SubmissionFlow};

use super::{current_user, require_role};

/// Lists the iterations currently open for this client to submit to.
///
/// # Errors
///
/// Returns an error if no client session is active or the fetch fails.
pub async fn open(gateway: &GatewayClient, store: &SessionStore) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Client)?;

    let flow = SubmissionFlow::new(gateway);
    let open = flow.open_iterations(&user.email).await?;

    if open.is_empty() {
        println!("No active iterations assigned to you");
        return Ok(());
    }

    for slot in &open {
        println!(
            "  [assignment {}] {}  {} v{}  domain={}  by {}",
            slot.assignment_id,
            slot.iteration_name,
            slot.model_name,
            slot.version,
            slot.data_domain.as_deref().unwrap_or("-"),
            slot.central_auth_email.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

/// Submits a trained model with its metrics for one open assignment.
///
/// The reported version is pinned from the assignment's current iteration
/// version, never taken from the command line.
///
/// # Errors
///
/// Returns an error if no client session is active, the assignment is not
/// open, validation rejects the draft (before any upload), or the backend
/// rejects the submission.
#[expect(clippy::too_many_arguments, reason = "one argument per form field")]
pub async fn submit(
    gateway: &GatewayClient,
    store: &SessionStore,
    assignment: i64,
    accuracy: Option<f64>,
    precision: Option<f64>,
    recall: Option<f64>,
    f1_score: Option<f64>,
    model_file: Option<PathBuf>,
) -> Result<()> {
    let user = current_user(store)?;
    require_role(&user, Role::Client)?;

    let flow = SubmissionFlow::new(gateway);

    let open = flow.open_iterations(&user.email).await?;
    let selection = open
        .into_iter()
        .find(|slot| slot.assignment_id == assignment)
        .with_context(|| format!("assignment {assignment} is not open for submission"))?;

    let draft = SubmissionDraft {
        selection: Some(selection),
        accuracy,
        precision,
        recall,
        f1_score,
        model_file,
    };

    let remaining = flow.submit_and_refresh(&user.email, &draft).await?;

    println!("Model submitted successfully");
    println!("Iterations still open: {}", remaining.len());
    Ok(())
}
