//! The bundled scenario catalog.

use tracing::debug;

use prx_contracts::{
    error::PrxResult,
    scenario::{Industry, Scenario},
};
use prx_core::traits::ScenarioCatalog;

use crate::industries::{banking, fintech, healthcare, saas};

/// All four built-in industries, validated once at construction.
#[derive(Debug, Clone)]
pub struct BuiltinCatalog {
    banking: Scenario,
    fintech: Scenario,
    healthcare: Scenario,
    saas: Scenario,
}

impl BuiltinCatalog {
    pub fn new() -> PrxResult<Self> {
        let catalog = Self {
            banking: banking::scenario()?,
            fintech: fintech::scenario()?,
            healthcare: healthcare::scenario()?,
            saas: saas::scenario()?,
        };
        for industry in Industry::ALL {
            let scenario = catalog.scenario(industry);
            scenario.validate()?;
            debug!(
                industry = %industry,
                templates = scenario.actions.len(),
                policies = scenario.policies.len(),
                "scenario loaded"
            );
        }
        Ok(catalog)
    }

    /// Iterate scenarios in `Industry::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        Industry::ALL.into_iter().map(move |i| self.scenario(i))
    }
}

impl ScenarioCatalog for BuiltinCatalog {
    fn scenario(&self, industry: Industry) -> &Scenario {
        match industry {
            Industry::Banking => &self.banking,
            Industry::Fintech => &self.fintech,
            Industry::Healthcare => &self.healthcare,
            Industry::Saas => &self.saas,
        }
    }
}
