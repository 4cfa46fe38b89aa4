//! TOML-driven escalation routing.
//!
//! `RoutingTable` loads a `RoutingConfig` from a TOML string or file,
//! validates it, and implements the `EscalationRouter` trait from prx-core.
//!
//! Lookup: an exact policy-name match wins; anything else gets the default
//! route.

use std::{collections::HashMap, path::Path};

use tracing::{debug, info};

use prx_contracts::{
    error::{PrxError, PrxResult},
    escalation::EscalationRoute,
    settings::SimSettings,
};
use prx_core::traits::EscalationRouter;

use crate::route::RoutingConfig;

/// Routing file bundled with the crate.
const BUILTIN_ROUTES: &str = include_str!("../policies/escalation.toml");

/// An `EscalationRouter` backed by a validated routing document.
///
/// ```rust,ignore
/// use prx_config::RoutingTable;
///
/// let table = RoutingTable::from_file(Path::new("routes.toml"))?;
/// let settings = table.settings().clone();
/// // Pass `Box::new(table)` to `prx_core::Simulator::new(...)`.
/// ```
#[derive(Debug, Clone)]
pub struct RoutingTable {
    config: RoutingConfig,
    index: HashMap<String, EscalationRoute>,
    fallback: EscalationRoute,
}

impl RoutingTable {
    /// Parse `s` as TOML and build a validated `RoutingTable`.
    ///
    /// Returns `PrxError::ConfigError` if the TOML is malformed, does not
    /// match `RoutingConfig`, or fails validation.
    pub fn from_toml_str(s: &str) -> PrxResult<Self> {
        let config: RoutingConfig = toml::from_str(s).map_err(|e| PrxError::ConfigError {
            reason: format!("failed to parse routing TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a routing document.
    pub fn from_file(path: &Path) -> PrxResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PrxError::ConfigError {
            reason: format!("failed to read routing file '{}': {}", path.display(), e),
        })?;
        let table = Self::from_toml_str(&contents)?;
        info!(
            path = %path.display(),
            routes = table.len(),
            "routing table loaded"
        );
        Ok(table)
    }

    /// The routing table bundled with the built-in scenarios.
    pub fn builtin() -> PrxResult<Self> {
        Self::from_toml_str(BUILTIN_ROUTES)
    }

    pub fn from_config(config: RoutingConfig) -> PrxResult<Self> {
        config.simulator.validate()?;

        if config.default_reviewer.trim().is_empty() {
            return Err(PrxError::ConfigError {
                reason: "default_reviewer must not be empty".to_string(),
            });
        }
        if config.default_sla_minutes == 0 {
            return Err(PrxError::ConfigError {
                reason: "default_sla_minutes must be greater than zero".to_string(),
            });
        }

        let mut index = HashMap::with_capacity(config.routes.len());
        for rule in &config.routes {
            if rule.policy.trim().is_empty() {
                return Err(PrxError::ConfigError {
                    reason: "route policy must not be empty".to_string(),
                });
            }
            if rule.escalate_to.trim().is_empty() {
                return Err(PrxError::ConfigError {
                    reason: format!("route '{}' has an empty escalate_to", rule.policy),
                });
            }
            if rule.sla_minutes == 0 {
                return Err(PrxError::ConfigError {
                    reason: format!("route '{}' sla_minutes must be greater than zero", rule.policy),
                });
            }
            if index.insert(rule.policy.clone(), rule.route()).is_some() {
                return Err(PrxError::ConfigError {
                    reason: format!("duplicate route for policy '{}'", rule.policy),
                });
            }
        }

        let fallback = config.default_route();
        Ok(Self {
            config,
            index,
            fallback,
        })
    }

    /// Simulator settings carried in the `[simulator]` table.
    pub fn settings(&self) -> &SimSettings {
        &self.config.simulator
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn default_route(&self) -> &EscalationRoute {
        &self.fallback
    }

    /// Explicit route for `policy`, without falling back.
    pub fn get(&self, policy: &str) -> Option<&EscalationRoute> {
        self.index.get(policy)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl EscalationRouter for RoutingTable {
    fn route(&self, policy: &str) -> EscalationRoute {
        match self.index.get(policy) {
            Some(route) => route.clone(),
            None => {
                debug!(policy, escalate_to = %self.fallback.escalate_to, "no route for policy; using default");
                self.fallback.clone()
            }
        }
    }
}
