//! Industry scenarios: the catalog data that parameterizes the simulator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::{PrxError, PrxResult},
    outcome::Outcome,
    template::ActionTemplate,
};

/// The industry groupings a simulator can be switched between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Banking,
    Fintech,
    Healthcare,
    Saas,
}

impl Industry {
    pub const ALL: [Industry; 4] = [
        Industry::Banking,
        Industry::Fintech,
        Industry::Healthcare,
        Industry::Saas,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Industry::Banking => "banking",
            Industry::Fintech => "fintech",
            Industry::Healthcare => "healthcare",
            Industry::Saas => "saas",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = PrxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "banking" => Ok(Industry::Banking),
            "fintech" => Ok(Industry::Fintech),
            "healthcare" => Ok(Industry::Healthcare),
            "saas" => Ok(Industry::Saas),
            other => Err(PrxError::ConfigError {
                reason: format!(
                    "unknown industry '{}' (expected banking, fintech, healthcare or saas)",
                    other
                ),
            }),
        }
    }
}

/// A policy as shown in the policy catalog.
///
/// Purely descriptive: nothing evaluates `conditions` or `dsl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDef {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Headline effect of the policy.
    pub effect: Outcome,
    pub conditions: Vec<String>,
    /// Policy source text in the product's DSL.
    pub dsl: String,
    pub active: bool,
}

/// A scenario's 24h baseline, added to live counts on the overview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalStats {
    pub total: u64,
    pub blocked: u64,
    pub escalated: u64,
    pub avg_latency: f64,
}

impl HistoricalStats {
    /// Baseline allowed count: whatever was neither blocked nor escalated.
    pub fn allowed(&self) -> u64 {
        self.total.saturating_sub(self.blocked + self.escalated)
    }
}

/// One industry's templates, agent pool, and policy metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub industry: Industry,
    /// Display label, e.g. `Enterprise SaaS`.
    pub label: String,
    /// Agent names a generated record may be attributed to.
    pub agents: Vec<String>,
    pub actions: Vec<ActionTemplate>,
    pub policies: Vec<PolicyDef>,
    pub stats_24h: HistoricalStats,
}

impl Scenario {
    /// Check that the simulator can draw from this scenario.
    pub fn validate(&self) -> PrxResult<()> {
        if self.agents.is_empty() {
            return Err(PrxError::InvalidScenario {
                label: self.label.clone(),
                reason: "agent pool must not be empty".to_string(),
            });
        }
        if self.actions.is_empty() {
            return Err(PrxError::InvalidScenario {
                label: self.label.clone(),
                reason: "scenario must define at least one action template".to_string(),
            });
        }
        for template in &self.actions {
            template.validate()?;
        }
        Ok(())
    }

    /// Look up a policy definition by id.
    pub fn policy(&self, id: &str) -> Option<&PolicyDef> {
        self.policies.iter().find(|p| p.id == id)
    }
}
