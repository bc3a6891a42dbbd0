//! Actor roles and their wire representation.

use serde::{Deserialize, Serialize};

/// Role of an account on the coordination backend.
///
/// The role gates which operations an actor may perform: central
/// authorities own iterations and assign clients, clients submit
/// trained-model updates for their assignments.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    /// Owns and drives model iterations.
    Central,

    /// A hospital contributing trained-model submissions.
    Client,
}

impl Role {
    /// Returns the wire string the backend expects for this role.
    #[must_use]
    pub const fn as_wire_str(self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Client => "client",
        }
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::*;

    #[test]
    fn test_wire_round_trip() {
        assert_eq!(Role::Central.as_wire_str(), "central");
        assert_eq!(Role::Client.as_wire_str(), "client");
        assert_eq!(Role::from_str("central"), Ok(Role::Central));
        assert_eq!(Role::from_str("CLIENT"), Ok(Role::Client));
        assert!(Role::from_str("admin").is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"client\"");
        let role: Role = serde_json::from_str("\"central\"").unwrap();
        assert_eq!(role, Role::Central);
    }
}
