//! Dashboard aggregation: pure derivations over already-fetched data.

use fed_structs::Iteration;
use gateway::ClientDashboard;

/// Derived counts for a central authority's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralSummary {
    /// Iterations with version > 0
    pub running: usize,

    /// Iterations with version == 0
    pub finalized: usize,

    /// All iterations
    pub total: usize,
}

/// Derives the central dashboard counts from the fetched iteration set.
/// `running + finalized == total` for any valid set.
#[must_use]
pub fn central_summary(iterations: &[Iteration]) -> CentralSummary {
    let running = iterations.iter().filter(|i| i.is_running()).count();
    let finalized = iterations.iter().filter(|i| i.is_finalized()).count();

    CentralSummary {
        running,
        finalized,
        total: iterations.len(),
    }
}

/// Derived counts and chart percentages for a client's dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSummary {
    /// Iterations the client has participated in
    pub total_rounds: u64,

    /// Assigned iterations still running
    pub current_running_rounds: u64,

    /// Finalized models the client contributed to
    pub total_finalized_models: u64,

    /// Share of rounds that reached a finalized model, rounded
    pub completed_percentage: u32,

    /// Share of rounds still pending, rounded
    pub pending_percentage: u32,
}

/// Derives the client summary from the backend counts.
///
/// A zero round total substitutes 1 as the denominator, yielding 0%
/// rather than a division by zero.
#[must_use]
pub fn client_summary(data: &ClientDashboard) -> ClientSummary {
    let denominator = if data.total_rounds == 0 {
        1
    } else {
        data.total_rounds
    };

    let completed = percentage(data.total_finalized_models, denominator);
    let pending = percentage(
        data.total_rounds.saturating_sub(data.total_finalized_models),
        denominator,
    );

    ClientSummary {
        total_rounds: data.total_rounds,
        current_running_rounds: data.current_running_rounds,
        total_finalized_models: data.total_finalized_models,
        completed_percentage: completed,
        pending_percentage: pending,
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "percentages are bounded by 100"
)]
fn percentage(part: u64, whole: u64) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn iteration(version: i32) -> Iteration {
        Iteration {
            id: 1,
            central_auth: None,
            central_auth_email: None,
            iteration_name: "Iter".to_string(),
            model_name: "ResNet50".to_string(),
            dataset_domain: None,
            model_file: None,
            version,
            created_at: Utc.with_ymd_and_hms(2025, 11, 1, 8, 0, 0).unwrap(),
        }
    }

    fn dashboard(total: u64, running: u64, finalized: u64) -> ClientDashboard {
        ClientDashboard {
            client_email: None,
            hospital: None,
            total_rounds: total,
            current_running_rounds: running,
            total_finalized_models: finalized,
        }
    }

    #[test]
    fn test_central_counts_partition() {
        let all = vec![iteration(1), iteration(0), iteration(4), iteration(0)];
        let summary = central_summary(&all);

        assert_eq!(summary.running, 2);
        assert_eq!(summary.finalized, 2);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.running + summary.finalized, summary.total);
    }

    #[test]
    fn test_client_percentages() {
        let summary = client_summary(&dashboard(4, 3, 1));
        assert_eq!(summary.completed_percentage, 25);
        assert_eq!(summary.pending_percentage, 75);
    }

    #[test]
    fn test_zero_rounds_does_not_divide_by_zero() {
        let summary = client_summary(&dashboard(0, 0, 0));
        assert_eq!(summary.completed_percentage, 0);
        assert_eq!(summary.pending_percentage, 0);
    }

    #[test]
    fn test_rounding_matches_display_policy() {
        // 1 of 3 rounds finalized: 33.33 -> 33, 66.67 -> 67
        let summary = client_summary(&dashboard(3, 2, 1));
        assert_eq!(summary.completed_percentage, 33);
        assert_eq!(summary.pending_percentage, 67);
    }
}
