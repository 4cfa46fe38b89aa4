//! Seam traits for the simulator.
//!
//! The simulator never reads the wall clock, draws randomness, or looks up
//! reviewer tables directly. Everything it depends on comes through one of
//! these traits so tests can substitute deterministic fixtures:
//!
//! - `Clock`: current time
//! - `Sampler`: uniform random choices and tokens
//! - `EscalationRouter`: reviewer/SLA per policy, with a default fallback
//! - `ScenarioCatalog`: the templates and agents for each industry

use chrono::{DateTime, Utc};

use prx_contracts::{
    escalation::EscalationRoute,
    scenario::{Industry, Scenario},
};

/// A source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Uniform random draws used by the record generator.
///
/// Implementations must be uniform: weighting is expressed by repeating
/// entries in the list being indexed, never inside the sampler.
pub trait Sampler: Send {
    /// Return an index in `0..len`. `len` is always non-zero.
    fn index(&mut self, len: usize) -> usize;

    /// Return a value in `[0.0, 1.0)`.
    fn unit(&mut self) -> f64;

    /// Return a fresh 8-character upper-case base-36 token.
    fn token(&mut self) -> String;

    /// Return a value in `[min, max)` (or exactly `min` when they are equal).
    fn between(&mut self, min: f64, max: f64) -> f64 {
        min + self.unit() * (max - min)
    }
}

/// Maps a matched policy to the reviewer that must handle its escalations.
pub trait EscalationRouter: Send + Sync {
    /// Return the route for `policy`, falling back to a default route for
    /// policies with no explicit entry. Never fails.
    fn route(&self, policy: &str) -> EscalationRoute;
}

/// Supplies the scenario for each industry.
pub trait ScenarioCatalog: Send + Sync {
    /// Every industry has a scenario; this lookup cannot fail.
    fn scenario(&self, industry: Industry) -> &Scenario;
}
