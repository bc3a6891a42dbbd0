//! User records: the persisted session identity and searched client rows.

use serde::{Deserialize, Serialize};

use crate::Role;

/// The logged-in user as persisted for the duration of a session.
///
/// Written only at login/logout; every command reads it to decide which
/// operations are permitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionUser {
    /// Backend user ID
    pub id: i64,

    /// Account email
    pub email: String,

    /// Account role
    pub role: Role,

    /// Hospital the account belongs to
    #[serde(default)]
    pub hospital: Option<String>,
}

/// A client account row from the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Client {
    /// Backend user ID
    pub id: i64,

    /// Account email
    pub email: String,

    /// Hospital the account belongs to
    #[serde(default)]
    pub hospital: Option<String>,

    /// Account role; the search endpoint only returns clients
    pub role: Role,
}
