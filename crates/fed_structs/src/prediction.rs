//! Outcome levels for the backend's prediction services.

/// Tri-level outcome returned by the heart-disease and diabetes endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    /// Wire value 0
    Low,

    /// Wire value 1
    Moderate,

    /// Wire value 2
    High,
}

impl RiskLevel {
    /// Maps the wire integer to an outcome level.
    #[must_use]
    pub const fn from_wire(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Low),
            1 => Some(Self::Moderate),
            2 => Some(Self::High),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire() {
        assert_eq!(RiskLevel::from_wire(0), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::from_wire(2), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_wire(3), None);
        assert_eq!(RiskLevel::from_wire(-1), None);
    }
}
