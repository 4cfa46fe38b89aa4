//! Decision records: one per simulated enforcement decision.
//!
//! Records are immutable once created. Resolving an escalation never edits
//! the original record; it produces a new one that shares its trace id.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::outcome::{Outcome, ResolvedOutcome};

/// Unique identifier of a decision record within the history buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub String);

impl RecordId {
    /// Create a new, unique record ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Derive the ID of a record that resolves this one, e.g. `<id>-approved`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self(format!("{}-{}", self.0, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier correlating a record and any later resolution record
/// back to the same synthetic action.
///
/// Rendered as `prx-` followed by an upper-case token, e.g. `prx-7QK2M9ZD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(pub String);

impl TraceId {
    pub const PREFIX: &'static str = "prx-";

    /// Build a trace id from a random token.
    pub fn from_token(token: &str) -> Self {
        Self(format!("{}{}", Self::PREFIX, token.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who resolved an escalation, when, and to what.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Reviewer label, or `system (SLA timeout)` for automatic expiry.
    pub resolved_by: String,
    /// Wall-clock time of the resolution (UTC).
    pub resolved_at: DateTime<Utc>,
    /// The final verdict.
    pub outcome: ResolvedOutcome,
}

/// One simulated enforcement decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: RecordId,
    pub trace_id: TraceId,
    /// Creation time (UTC). Seeded records are backdated.
    pub timestamp: DateTime<Utc>,
    /// Source agent label.
    pub agent: String,
    /// Action type, e.g. `transaction.create`.
    pub action_type: String,
    /// Free-form key/value payload.
    pub payload: Map<String, Value>,
    pub outcome: Outcome,
    /// Name of the policy bound to `outcome` by the originating template.
    pub policy_matched: String,
    /// Evaluation latency in milliseconds, one decimal place.
    pub latency_ms: f64,
    /// Present only on records that resolve an escalation.
    pub resolution: Option<Resolution>,
}

