//! Pending human-review escalations and their resolution.
//!
//! A `PendingEscalation` exists only between the tick that produced an
//! ESCALATED record and the moment it is approved, rejected, or expires.
//!
//! ```text
//! created(ESCALATED) → pending → approved → ALLOWED
//!                              → rejected → BLOCKED
//!                              → expired  → BLOCKED
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    outcome::ResolvedOutcome,
    record::{DecisionRecord, RecordId, Resolution, TraceId},
};

/// Reviewer and SLA assigned to escalations of one policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRoute {
    /// Reviewer or queue the escalation is sent to, e.g. `aml-team`.
    pub escalate_to: String,
    /// Nominal review SLA in minutes.
    pub sla_minutes: u32,
}

/// An escalated decision awaiting approve/reject before its deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingEscalation {
    /// Same id as the originating ESCALATED record.
    pub id: RecordId,
    pub trace_id: TraceId,
    pub timestamp: DateTime<Utc>,
    pub agent: String,
    pub action_type: String,
    pub payload: Map<String, Value>,
    pub policy_matched: String,
    pub latency_ms: f64,
    /// Deadline after which the sweep blocks the action.
    pub expires_at: DateTime<Utc>,
    pub escalate_to: String,
    pub sla_minutes: u32,
}

/// How a pending escalation left the pending set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionKind {
    Approved,
    Rejected,
    TimedOut,
}

impl ResolutionKind {
    /// Resolver label recorded for automatic expiry.
    pub const TIMEOUT_RESOLVER: &'static str = "system (SLA timeout)";

    /// Suffix appended to the originating id.
    pub fn id_suffix(self) -> &'static str {
        match self {
            ResolutionKind::Approved => "approved",
            ResolutionKind::Rejected => "rejected",
            ResolutionKind::TimedOut => "timeout",
        }
    }

    /// Unresolved escalations fail closed.
    pub fn outcome(self) -> ResolvedOutcome {
        match self {
            ResolutionKind::Approved => ResolvedOutcome::Allowed,
            ResolutionKind::Rejected | ResolutionKind::TimedOut => ResolvedOutcome::Blocked,
        }
    }
}

impl PendingEscalation {
    /// Build the pending entry for an ESCALATED record.
    pub fn from_record(
        record: &DecisionRecord,
        expires_at: DateTime<Utc>,
        route: EscalationRoute,
    ) -> Self {
        Self {
            id: record.id.clone(),
            trace_id: record.trace_id.clone(),
            timestamp: record.timestamp,
            agent: record.agent.clone(),
            action_type: record.action_type.clone(),
            payload: record.payload.clone(),
            policy_matched: record.policy_matched.clone(),
            latency_ms: record.latency_ms,
            expires_at,
            escalate_to: route.escalate_to,
            sla_minutes: route.sla_minutes,
        }
    }

    /// True once `now` has reached the deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Produce the new history record that resolves this escalation.
    ///
    /// The record keeps the trace id and descriptive fields; its id gets the
    /// kind's suffix and its outcome is the resolved verdict.
    pub fn resolve(
        &self,
        kind: ResolutionKind,
        resolved_by: &str,
        at: DateTime<Utc>,
    ) -> DecisionRecord {
        let outcome = kind.outcome();
        DecisionRecord {
            id: self.id.with_suffix(kind.id_suffix()),
            trace_id: self.trace_id.clone(),
            timestamp: at,
            agent: self.agent.clone(),
            action_type: self.action_type.clone(),
            payload: self.payload.clone(),
            outcome: outcome.into(),
            policy_matched: self.policy_matched.clone(),
            latency_ms: self.latency_ms,
            resolution: Some(Resolution {
                resolved_by: resolved_by.to_string(),
                resolved_at: at,
                outcome,
            }),
        }
    }
}

/// Read-only countdown view of a pending escalation at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    /// Time left before expiry, never negative.
    pub remaining: Duration,
    /// Share of the review window left, in `[0.0, 1.0]`.
    pub fraction: f64,
    pub expired: bool,
    /// Less than a minute left but not yet expired.
    pub urgent: bool,
}

impl Countdown {
    pub fn at(pending: &PendingEscalation, now: DateTime<Utc>, window: Duration) -> Self {
        let remaining = (pending.expires_at - now).max(Duration::zero());
        let window_ms = window.num_milliseconds();
        let fraction = if window_ms > 0 {
            (remaining.num_milliseconds() as f64 / window_ms as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let expired = remaining <= Duration::zero();
        Self {
            remaining,
            fraction,
            expired,
            urgent: !expired && remaining < Duration::minutes(1),
        }
    }

    /// `m:ss`, or `EXPIRED`. Partial seconds round up, so a live entry
    /// never reads `0:00`.
    pub fn label(&self) -> String {
        if self.expired {
            return "EXPIRED".to_string();
        }
        let secs = (self.remaining.num_milliseconds() + 999) / 1000;
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}
