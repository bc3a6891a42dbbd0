//! Model artifact download into the local object store.

use anyhow::{Context, Result};
use config::OBJECT_STORE;
use fed_structs::{Iteration, Role};
use gateway::GatewayClient;
use object_store::path::Path as ObjectStorePath;
use session::SessionStore;
use tracing::info;

use super::current_user;

/// Downloads the model artifact of one iteration and stores it under the
/// configured artifact directory.
///
/// # Errors
///
/// Returns an error if no session is active, the iteration is unknown or
/// carries no artifact, or the download fails.
pub async fn run(gateway: &GatewayClient, store: &SessionStore, id: i64) -> Result<()> {
    let user = current_user(store)?;

    // Each role sees its own iteration listing
    let iterations: Vec<Iteration> = match user.role {
        Role::Central => gateway.list_iterations(user.id).await?,
        Role::Client => gateway.client_iterations(user.id).await?,
    };

    let iteration = iterations
        .into_iter()
        .find(|iteration| iteration.id == id)
        .with_context(|| format!("iteration {id} not found"))?;

    let reference = iteration
        .model_file
        .as_deref()
        .with_context(|| format!("iteration {} has no model artifact", iteration.iteration_name))?;

    let bytes = gateway.download_artifact(reference).await?;

    let file_name = reference
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("model.bin");

    let path = ObjectStorePath::from(format!("{}/{file_name}", iteration.iteration_name));
    OBJECT_STORE
        .put(&path, bytes.into())
        .await
        .context("failed to store artifact")?;

    info!(%path, "Artifact stored");
    println!(
        "Stored artifact for {} at {}/artifacts/{path}",
        iteration.iteration_name,
        config::CONFIG.base_path.display()
    );
    Ok(())
}
