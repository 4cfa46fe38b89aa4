//! Fixed simulator constants.
//!
//! Every field has a default, so a TOML `[simulator]` table may set any
//! subset of them. Values are not changeable while a simulator runs.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{PrxError, PrxResult};

/// Upper bound for every buffer size and the seed batch.
pub const MAX_CAPACITY: usize = 10_000;
/// Upper bound for the cadences, in milliseconds (one day).
pub const MAX_INTERVAL_MS: u64 = 86_400_000;
/// Upper bound for the escalation and seed windows, in seconds (one day).
pub const MAX_WINDOW_SECS: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimSettings {
    /// Maximum number of records kept in the history buffer.
    pub history_capacity: usize,
    /// Maximum number of pending escalations.
    pub pending_capacity: usize,
    /// Generation cadence while live.
    pub tick_interval_ms: u64,
    /// Expiry sweep cadence.
    pub sweep_interval_ms: u64,
    /// Time a pending escalation waits before it is blocked.
    pub escalation_window_secs: u64,
    /// Records generated when an industry is selected.
    pub seed_batch: usize,
    /// Seeded records are backdated up to this far.
    pub seed_window_secs: u64,
    /// Resolver recorded on manual approve/reject.
    pub reviewer_label: String,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            history_capacity: 100,
            pending_capacity: 20,
            tick_interval_ms: 2_500,
            sweep_interval_ms: 5_000,
            escalation_window_secs: 180,
            seed_batch: 20,
            seed_window_secs: 180,
            reviewer_label: "senior-trader".to_string(),
        }
    }
}

impl SimSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::milliseconds(self.tick_interval_ms as i64)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::milliseconds(self.sweep_interval_ms as i64)
    }

    pub fn escalation_window(&self) -> Duration {
        Duration::seconds(self.escalation_window_secs as i64)
    }

    pub fn seed_window(&self) -> Duration {
        Duration::seconds(self.seed_window_secs as i64)
    }

    /// Reject settings the simulator cannot run with.
    ///
    /// Capacities, intervals and windows are bounded above so every derived
    /// `Duration` and timestamp stays representable.
    pub fn validate(&self) -> PrxResult<()> {
        let checks = [
            (self.history_capacity == 0, "history_capacity must be greater than zero"),
            (self.pending_capacity == 0, "pending_capacity must be greater than zero"),
            (self.tick_interval_ms == 0, "tick_interval_ms must be greater than zero"),
            (self.sweep_interval_ms == 0, "sweep_interval_ms must be greater than zero"),
            (
                self.escalation_window_secs == 0,
                "escalation_window_secs must be greater than zero",
            ),
            (self.reviewer_label.trim().is_empty(), "reviewer_label must not be empty"),
        ];
        for (failed, reason) in checks {
            if failed {
                return Err(PrxError::ConfigError {
                    reason: reason.to_string(),
                });
            }
        }

        let limits = [
            ("history_capacity", self.history_capacity as u64, MAX_CAPACITY as u64),
            ("pending_capacity", self.pending_capacity as u64, MAX_CAPACITY as u64),
            ("seed_batch", self.seed_batch as u64, MAX_CAPACITY as u64),
            ("tick_interval_ms", self.tick_interval_ms, MAX_INTERVAL_MS),
            ("sweep_interval_ms", self.sweep_interval_ms, MAX_INTERVAL_MS),
            ("escalation_window_secs", self.escalation_window_secs, MAX_WINDOW_SECS),
            ("seed_window_secs", self.seed_window_secs, MAX_WINDOW_SECS),
        ];
        for (field, value, max) in limits {
            if value > max {
                return Err(PrxError::ConfigError {
                    reason: format!("{} must be at most {}, got {}", field, max, value),
                });
            }
        }
        Ok(())
    }
}
