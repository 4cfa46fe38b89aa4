//! Aggregate counters derived from the history buffer.
//!
//! `SimStats` is never stored alongside the history; it is recomputed from
//! the records on every read so it cannot drift.

use serde::{Deserialize, Serialize};

use crate::{
    outcome::Outcome,
    record::DecisionRecord,
    scenario::HistoricalStats,
    template::round_tenth,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub total: u64,
    pub blocked: u64,
    pub escalated: u64,
    pub allowed: u64,
    /// Mean latency in milliseconds, one decimal place; `0.0` when empty.
    pub avg_latency: f64,
}

impl SimStats {
    /// Fold a sequence of records into counters.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a DecisionRecord>) -> Self {
        let mut stats = SimStats::default();
        let mut latency_sum = 0.0;
        for record in records {
            stats.total += 1;
            match record.outcome {
                Outcome::Allowed => stats.allowed += 1,
                Outcome::Blocked => stats.blocked += 1,
                Outcome::Escalated => stats.escalated += 1,
            }
            latency_sum += record.latency_ms;
        }
        if stats.total > 0 {
            stats.avg_latency = round_tenth(latency_sum / stats.total as f64);
        }
        stats
    }

    pub fn count(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Allowed => self.allowed,
            Outcome::Blocked => self.blocked,
            Outcome::Escalated => self.escalated,
        }
    }

    /// Live counts on top of a 24h baseline, as shown on the overview.
    ///
    /// Average latency falls back to the baseline until live data exists.
    pub fn combined_with(&self, baseline: &HistoricalStats) -> SimStats {
        SimStats {
            total: self.total + baseline.total,
            blocked: self.blocked + baseline.blocked,
            escalated: self.escalated + baseline.escalated,
            allowed: self.allowed + baseline.allowed(),
            avg_latency: if self.total > 0 {
                self.avg_latency
            } else {
                baseline.avg_latency
            },
        }
    }

    /// Blocked share of the total as a percentage, one decimal place.
    pub fn block_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        round_tenth(self.blocked as f64 / self.total as f64 * 100.0)
    }

    /// Per-outcome counts and shares for the enforcement breakdown chart.
    pub fn breakdown(&self) -> Vec<(Outcome, u64, f64)> {
        Outcome::ALL
            .iter()
            .map(|&outcome| {
                let count = self.count(outcome);
                let share = if self.total == 0 {
                    0.0
                } else {
                    count as f64 / self.total as f64
                };
                (outcome, count, share)
            })
            .collect()
    }
}
