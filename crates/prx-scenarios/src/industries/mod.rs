//! Built-in industry scenarios.
//!
//! Each module exposes `scenario()`, which builds and validates one
//! industry's templates, agent pool, policy definitions, and 24h baseline.
//! All names, accounts, and identifiers are fictional.

use serde_json::Value;

use prx_contracts::{
    error::PrxResult,
    outcome::Outcome,
    scenario::PolicyDef,
    template::{ActionTemplate, LatencyRange, PolicyBinding},
};

pub mod banking;
pub mod fintech;
pub mod healthcare;
pub mod saas;

/// Template whose every outcome reports the same policy.
fn template(
    action_type: &str,
    agent: &str,
    payload: Value,
    outcomes: &[Outcome],
    policy: &str,
    (min, max): (f64, f64),
) -> PrxResult<ActionTemplate> {
    ActionTemplate::new(
        action_type,
        agent,
        payload,
        outcomes.to_vec(),
        PolicyBinding::uniform(policy),
        LatencyRange::new(min, max)?,
    )
}

fn policy(id: &str, description: &str, effect: Outcome, conditions: &[&str], dsl: &str) -> PolicyDef {
    PolicyDef {
        id: id.to_string(),
        name: id.to_string(),
        description: description.to_string(),
        effect,
        conditions: conditions.iter().map(|c| c.to_string()).collect(),
        dsl: dsl.to_string(),
        active: true,
    }
}
