//! Role-aware dashboard summary.

use anyhow::Result;
use fed_structs::Role;
use gateway::GatewayClient;
use session::SessionStore;
use workflow::{IterationRegistry, central_summary, client_summary};

use super::current_user;

/// Shows the dashboard for whichever role is logged in.
///
/// # Errors
///
/// Returns an error if no session is active or the fetch fails.
pub async fn show(gateway: &GatewayClient, store: &SessionStore) -> Result<()> {
    let user = current_user(store)?;

    match user.role {
        Role::Central => {
            let registry = IterationRegistry::new(gateway);
            let iterations = registry.list(user.id).await?;
            let summary = central_summary(&iterations);

            println!("Central dashboard for {}", user.email);
            println!("  running iterations:   {}", summary.running);
            println!("  finalized iterations: {}", summary.finalized);
            println!("  total iterations:     {}", summary.total);
        }
        Role::Client => {
            let data = gateway.client_dashboard(&user.email).await?;
            let summary = client_summary(&data);

            println!("Client dashboard for {}", user.email);
            println!("  current running rounds: {}", summary.current_running_rounds);
            println!("  total rounds:           {}", summary.total_rounds);
            println!("  finalized models:       {}", summary.total_finalized_models);
            println!(
                "  completed {}%  pending {}%",
                summary.completed_percentage, summary.pending_percentage
            );
        }
    }

    Ok(())
}
