//! Action templates: static definitions of one class of synthetic action.
//!
//! The simulator picks a template per tick, then an outcome from its
//! weighted list. Weighting is by repetition: an outcome listed three times
//! is three times as likely as one listed once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{PrxError, PrxResult},
    outcome::Outcome,
};

/// Inclusive `[min, max]` latency range in milliseconds.
///
/// Both bounds carry at most one decimal place so that a sample rounded to
/// one decimal never leaves the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct LatencyRange {
    min: f64,
    max: f64,
}

impl LatencyRange {
    /// Validate and build a range.
    ///
    /// Returns `PrxError::InvalidTemplate` for non-finite, negative, inverted,
    /// or finer-than-0.1 bounds. The range is built before its template, so
    /// the error names `latency` in place of an action type.
    pub fn new(min: f64, max: f64) -> PrxResult<Self> {
        let bad = |reason: String| PrxError::InvalidTemplate {
            action_type: "latency".to_string(),
            reason,
        };
        if !min.is_finite() || !max.is_finite() {
            return Err(bad(format!("latency bounds must be finite, got [{}, {}]", min, max)));
        }
        if min < 0.0 {
            return Err(bad(format!("latency minimum must be non-negative, got {}", min)));
        }
        if min > max {
            return Err(bad(format!("latency range is inverted: [{}, {}]", min, max)));
        }
        for bound in [min, max] {
            if round_tenth(bound) != bound {
                return Err(bad(format!(
                    "latency bound {} has more than one decimal place",
                    bound
                )));
            }
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// True if `value` lies within the range, bounds included.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl TryFrom<(f64, f64)> for LatencyRange {
    type Error = PrxError;

    fn try_from((min, max): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(min, max)
    }
}

impl From<LatencyRange> for (f64, f64) {
    fn from(range: LatencyRange) -> Self {
        (range.min, range.max)
    }
}

/// Round to one decimal place.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Outcome → policy-name mapping for one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyBinding {
    pub allowed: String,
    pub blocked: String,
    pub escalated: String,
}

impl PolicyBinding {
    /// Bind the same policy to every outcome.
    pub fn uniform(policy: impl Into<String>) -> Self {
        let policy = policy.into();
        Self {
            allowed: policy.clone(),
            blocked: policy.clone(),
            escalated: policy,
        }
    }

    pub fn for_outcome(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::Allowed => &self.allowed,
            Outcome::Blocked => &self.blocked,
            Outcome::Escalated => &self.escalated,
        }
    }
}

/// A static definition of one class of synthetic action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplate {
    /// Action type name, e.g. `wire.transfer`.
    pub action_type: String,
    /// Representative source label. Generated records draw their agent from
    /// the scenario's pool instead.
    pub agent: String,
    /// Representative payload, cloned and jittered per tick.
    pub payload: Map<String, Value>,
    /// Weighted outcome list (repeat an entry to raise its probability).
    pub outcomes: Vec<Outcome>,
    pub policies: PolicyBinding,
    pub latency: LatencyRange,
}

impl ActionTemplate {
    /// Build a template from a JSON object payload.
    ///
    /// Returns `PrxError::InvalidTemplate` if `payload` is not an object or
    /// `outcomes` is empty.
    pub fn new(
        action_type: impl Into<String>,
        agent: impl Into<String>,
        payload: Value,
        outcomes: Vec<Outcome>,
        policies: PolicyBinding,
        latency: LatencyRange,
    ) -> PrxResult<Self> {
        let action_type = action_type.into();
        let payload = match payload {
            Value::Object(map) => map,
            other => {
                return Err(PrxError::InvalidTemplate {
                    action_type,
                    reason: format!("payload must be a JSON object, got {}", other),
                })
            }
        };
        let template = Self {
            action_type,
            agent: agent.into(),
            payload,
            outcomes,
            policies,
            latency,
        };
        template.validate()?;
        Ok(template)
    }

    /// Check the invariants a deserialized or hand-built template must hold.
    pub fn validate(&self) -> PrxResult<()> {
        if self.action_type.is_empty() {
            return Err(PrxError::InvalidTemplate {
                action_type: self.action_type.clone(),
                reason: "action type must not be empty".to_string(),
            });
        }
        if self.outcomes.is_empty() {
            return Err(PrxError::InvalidTemplate {
                action_type: self.action_type.clone(),
                reason: "weighted outcome list must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Share of the weighted list taken by `outcome`.
    pub fn weight_of(&self, outcome: Outcome) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let hits = self.outcomes.iter().filter(|o| **o == outcome).count();
        hits as f64 / self.outcomes.len() as f64
    }
}
