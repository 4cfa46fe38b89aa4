//! Routing table schema.
//!
//! A `RoutingConfig` is deserialized from TOML. It holds the fallback
//! reviewer, optional simulator settings, and one `RouteRule` per policy
//! whose escalations go somewhere other than the fallback.

use serde::{Deserialize, Serialize};

use prx_contracts::{escalation::EscalationRoute, settings::SimSettings};

/// Where escalations raised under one policy are sent.
///
/// Example in TOML:
/// ```toml
/// [[routes]]
/// policy = "WIRE_TRANSFER_POLICY"
/// escalate_to = "compliance-officer"
/// sla_minutes = 20
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteRule {
    /// Policy name, matched exactly against `DecisionRecord::policy_matched`.
    pub policy: String,

    /// Reviewer role or queue shown on the escalation card.
    pub escalate_to: String,

    /// Display SLA. Does not change the expiry window.
    pub sla_minutes: u32,
}

impl RouteRule {
    pub fn route(&self) -> EscalationRoute {
        EscalationRoute {
            escalate_to: self.escalate_to.clone(),
            sla_minutes: self.sla_minutes,
        }
    }
}

/// The top-level structure deserialized from a routing TOML file.
///
/// Example:
/// ```toml
/// default_reviewer = "senior-reviewer"
/// default_sla_minutes = 15
///
/// [simulator]
/// tick_interval_ms = 1000
///
/// [[routes]]
/// policy = "MARGIN_CONTROL"
/// escalate_to = "risk-manager"
/// sla_minutes = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    #[serde(default = "default_reviewer")]
    pub default_reviewer: String,

    #[serde(default = "default_sla_minutes")]
    pub default_sla_minutes: u32,

    /// Simulator settings. Every key is optional.
    #[serde(default)]
    pub simulator: SimSettings,

    #[serde(default)]
    pub routes: Vec<RouteRule>,
}

impl RoutingConfig {
    pub fn default_route(&self) -> EscalationRoute {
        EscalationRoute {
            escalate_to: self.default_reviewer.clone(),
            sla_minutes: self.default_sla_minutes,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_reviewer: default_reviewer(),
            default_sla_minutes: default_sla_minutes(),
            simulator: SimSettings::default(),
            routes: Vec::new(),
        }
    }
}

fn default_reviewer() -> String {
    "senior-reviewer".to_string()
}

fn default_sla_minutes() -> u32 {
    15
}
