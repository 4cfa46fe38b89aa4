//! Enforcement verdicts.
//!
//! `Outcome` is the verdict attached to every simulated decision.
//! `ResolvedOutcome` is the narrower set an escalation may resolve to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PrxError;

/// The simulated enforcement verdict for a synthetic action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// The action was let through.
    Allowed,
    /// The action was stopped.
    Blocked,
    /// The action was held for human review.
    Escalated,
}

impl Outcome {
    /// All outcomes in display order.
    pub const ALL: [Outcome; 3] = [Outcome::Allowed, Outcome::Blocked, Outcome::Escalated];

    /// Upper-case label used in feeds and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Allowed => "ALLOWED",
            Outcome::Blocked => "BLOCKED",
            Outcome::Escalated => "ESCALATED",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = PrxError;

    /// Accepts both the full (`allowed`) and short (`allow`) spellings, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allowed" | "allow" => Ok(Outcome::Allowed),
            "blocked" | "block" => Ok(Outcome::Blocked),
            "escalated" | "escalate" => Ok(Outcome::Escalated),
            other => Err(PrxError::ConfigError {
                reason: format!("unknown outcome '{}'", other),
            }),
        }
    }
}

/// The final verdict of a resolved escalation.
///
/// Escalations can only end allowed (approved) or blocked (rejected or timed out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolvedOutcome {
    Allowed,
    Blocked,
}

impl From<ResolvedOutcome> for Outcome {
    fn from(resolved: ResolvedOutcome) -> Self {
        match resolved {
            ResolvedOutcome::Allowed => Outcome::Allowed,
            ResolvedOutcome::Blocked => Outcome::Blocked,
        }
    }
}
