//! Synthetic decision generation.
//!
//! One call to [`generate`] performs the random part of a tick:
//!
//! 1. pick a template uniformly;
//! 2. pick an outcome by uniform index over the template's weighted list;
//! 3. sample latency from the template range, rounded to one decimal;
//! 4. pick an agent uniformly from the scenario's pool;
//! 5. clone the payload, re-rolling the numeric fields in [`PAYLOAD_JITTER`].

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use prx_contracts::{
    record::{DecisionRecord, RecordId, TraceId},
    scenario::Scenario,
    template::{round_tenth, ActionTemplate, LatencyRange},
};

use crate::traits::Sampler;

/// Numeric payload fields replaced on every tick, with their `[min, max)` range.
pub const PAYLOAD_JITTER: [(&str, f64, f64); 4] = [
    ("amount", 500.0, 12_000.0),
    ("notional", 8_000.0, 90_000.0),
    ("rows", 500.0, 20_000.0),
    ("records", 500.0, 95_000.0),
];

/// Build one synthetic record stamped `now`.
///
/// Returns `None` if the scenario has no templates or no agents.
pub fn generate(
    scenario: &Scenario,
    sampler: &mut dyn Sampler,
    now: DateTime<Utc>,
) -> Option<DecisionRecord> {
    if scenario.actions.is_empty() || scenario.agents.is_empty() {
        return None;
    }

    let template = &scenario.actions[sampler.index(scenario.actions.len())];
    if template.outcomes.is_empty() {
        return None;
    }
    let outcome = template.outcomes[sampler.index(template.outcomes.len())];
    let latency_ms = sample_latency(&template.latency, sampler);
    let agent = scenario.agents[sampler.index(scenario.agents.len())].clone();
    let payload = jitter_payload(template, sampler);

    Some(DecisionRecord {
        id: RecordId::new(),
        trace_id: TraceId::from_token(&sampler.token()),
        timestamp: now,
        agent,
        action_type: template.action_type.clone(),
        payload,
        outcome,
        policy_matched: template.policies.for_outcome(outcome).to_string(),
        latency_ms,
        resolution: None,
    })
}

/// Uniform sample in the range, rounded to one decimal.
///
/// The range bounds carry one decimal at most, so rounding cannot push the
/// value outside them.
pub fn sample_latency(range: &LatencyRange, sampler: &mut dyn Sampler) -> f64 {
    round_tenth(sampler.between(range.min(), range.max()))
}

/// Clone the template payload with fresh values for the jittered fields.
///
/// Only fields already present and numeric are replaced.
pub fn jitter_payload(template: &ActionTemplate, sampler: &mut dyn Sampler) -> Map<String, Value> {
    let mut payload = template.payload.clone();
    for (field, min, max) in PAYLOAD_JITTER {
        if let Some(value) = payload.get_mut(field) {
            if value.is_number() {
                *value = Value::from(sampler.between(min, max).round() as i64);
            }
        }
    }
    payload
}
