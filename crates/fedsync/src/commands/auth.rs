//! Signup, login and logout.

use core::str::FromStr;

use anyhow::{Context, Result};
use fed_structs::Role;
use gateway::{GatewayClient, SignupRequest};
use session::SessionStore;
use tracing::info;

/// Registers a new account.
///
/// # Errors
///
/// Returns an error if the role does not parse or the backend rejects the
/// registration.
pub async fn signup(
    gateway: &GatewayClient,
    email: &str,
    password: &str,
    hospital: &str,
    role: &str,
) -> Result<()> {
    let role = Role::from_str(role)
        .with_context(|| format!("invalid role '{role}' (expected 'central' or 'client')"))?;

    let response = gateway
        .signup(&SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            hospital: hospital.to_string(),
            role,
        })
        .await?;

    println!(
        "{}",
        response
            .message
            .unwrap_or_else(|| "Account registered".to_string())
    );
    Ok(())
}

/// Logs in and persists the session record.
///
/// # Errors
///
/// Returns an error if the credentials are rejected or the session cannot
/// be stored.
pub async fn login(
    gateway: &GatewayClient,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<()> {
    let response = gateway.login(email, password).await?;
    let user = response.into_session_user();

    store.store(&user)?;
    info!(email = user.email, role = %user.role, "Session stored");

    println!("Logged in as {} ({})", user.email, user.role);
    Ok(())
}

/// Clears the persisted session record.
///
/// # Errors
///
/// Returns an error if the record cannot be removed.
pub fn logout(store: &SessionStore) -> Result<()> {
    store.clear()?;
    println!("Logged out");
    Ok(())
}
