//! Mutex-guarded simulator for multi-threaded hosts.
//!
//! `SimulatorHandle` keeps the simulator behind `Arc<Mutex<_>>` so a driver
//! thread can advance it while another thread reads or issues commands.
//! Every method takes the lock exactly once: a tick's pending insertion and
//! history insertion are never observed separately.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use prx_contracts::{
    error::{PrxError, PrxResult},
    escalation::PendingEscalation,
    record::DecisionRecord,
    scenario::Industry,
    stats::SimStats,
};

use crate::simulator::{Advance, Simulator};

/// A consistent copy of everything the front ends read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub industry: Industry,
    pub live: bool,
    /// Newest first.
    pub history: Vec<DecisionRecord>,
    /// Newest first.
    pub pending: Vec<PendingEscalation>,
    pub stats: SimStats,
    /// History records lost to the capacity bound so far.
    pub evicted: u64,
}

impl Snapshot {
    pub fn of(sim: &Simulator) -> Self {
        Self {
            industry: sim.industry(),
            live: sim.is_live(),
            history: sim.history().cloned().collect(),
            pending: sim.pending().cloned().collect(),
            stats: sim.stats(),
            evicted: sim.evicted(),
        }
    }
}

/// Cloneable, thread-safe handle to one simulator.
#[derive(Clone)]
pub struct SimulatorHandle {
    inner: Arc<Mutex<Simulator>>,
}

impl SimulatorHandle {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(simulator)),
        }
    }

    fn lock(&self) -> PrxResult<MutexGuard<'_, Simulator>> {
        self.inner.lock().map_err(|e| PrxError::StateUnavailable {
            reason: format!("simulator lock poisoned: {}", e),
        })
    }

    /// Run `f` with exclusive access to the simulator.
    pub fn with<T>(&self, f: impl FnOnce(&mut Simulator) -> T) -> PrxResult<T> {
        let mut sim = self.lock()?;
        Ok(f(&mut sim))
    }

    pub fn advance(&self) -> PrxResult<Advance> {
        self.with(Simulator::advance)
    }

    pub fn tick(&self) -> PrxResult<Option<DecisionRecord>> {
        self.with(Simulator::tick)
    }

    pub fn expiry_sweep(&self) -> PrxResult<Vec<DecisionRecord>> {
        self.with(Simulator::expiry_sweep)
    }

    pub fn approve(&self, id: &str) -> PrxResult<Option<DecisionRecord>> {
        self.with(|sim| sim.approve(id))
    }

    pub fn reject(&self, id: &str) -> PrxResult<Option<DecisionRecord>> {
        self.with(|sim| sim.reject(id))
    }

    pub fn toggle_live(&self) -> PrxResult<bool> {
        self.with(Simulator::toggle_live)
    }

    pub fn configure(&self, industry: Industry) -> PrxResult<()> {
        self.with(|sim| sim.configure(industry))
    }

    pub fn stats(&self) -> PrxResult<SimStats> {
        self.with(|sim| sim.stats())
    }

    /// Copy of all readable state taken under a single lock.
    pub fn snapshot(&self) -> PrxResult<Snapshot> {
        self.with(|sim| Snapshot::of(sim))
    }
}
