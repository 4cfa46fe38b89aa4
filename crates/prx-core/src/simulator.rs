//! The event simulator: a single-writer state struct plus its transitions.
//!
//! The simulator owns the history buffer, the pending escalation set, the
//! live flag, and two cadences (generation and expiry sweep). Every
//! transition takes `&mut self`, so a reader can never observe half a tick.
//!
//! Hosts either call the transitions directly (`tick`, `expiry_sweep`,
//! `approve`, ...) or poll [`Simulator::advance`] from their event loop and
//! let the cadences decide what is due.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use prx_contracts::{
    escalation::{Countdown, PendingEscalation, ResolutionKind},
    outcome::Outcome,
    record::DecisionRecord,
    scenario::{Industry, Scenario},
    settings::SimSettings,
    stats::SimStats,
};

use crate::{
    buffer::RecentBuffer,
    cadence::Cadence,
    generator,
    traits::{Clock, EscalationRouter, Sampler, ScenarioCatalog},
};

/// What one call to [`Simulator::advance`] did.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Advance {
    /// The record produced by the generation cadence, if it fired.
    pub generated: Option<DecisionRecord>,
    /// Timeout records produced by the sweep cadence, if it fired.
    pub timed_out: Vec<DecisionRecord>,
}

impl Advance {
    pub fn is_idle(&self) -> bool {
        self.generated.is_none() && self.timed_out.is_empty()
    }
}

/// The in-memory enforcement-decision simulator.
///
/// Construct one per dashboard session. A new simulator starts live with
/// empty history; call [`Simulator::configure`] to seed it.
pub struct Simulator {
    settings: SimSettings,
    router: Box<dyn EscalationRouter>,
    catalog: Box<dyn ScenarioCatalog>,
    clock: Box<dyn Clock>,
    sampler: Box<dyn Sampler>,
    industry: Industry,
    history: RecentBuffer<DecisionRecord>,
    pending: RecentBuffer<PendingEscalation>,
    live: bool,
    tick_cadence: Cadence,
    sweep_cadence: Cadence,
}

impl Simulator {
    /// Create a simulator with the given collaborators and active industry.
    ///
    /// Both cadences are armed from the clock's current time.
    pub fn new(
        settings: SimSettings,
        router: Box<dyn EscalationRouter>,
        catalog: Box<dyn ScenarioCatalog>,
        clock: Box<dyn Clock>,
        sampler: Box<dyn Sampler>,
        industry: Industry,
    ) -> Self {
        let now = clock.now();
        let mut tick_cadence = Cadence::new(settings.tick_interval());
        let mut sweep_cadence = Cadence::new(settings.sweep_interval());
        tick_cadence.arm(now);
        sweep_cadence.arm(now);

        Self {
            history: RecentBuffer::new(settings.history_capacity),
            pending: RecentBuffer::new(settings.pending_capacity),
            settings,
            router,
            catalog,
            clock,
            sampler,
            industry,
            live: true,
            tick_cadence,
            sweep_cadence,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    /// Select `industry`, clear pending escalations, and reseed history with
    /// backdated records.
    ///
    /// Seeded records are spread over the preceding seed window and never
    /// enter the pending set. Both cadences restart from now.
    pub fn configure(&mut self, industry: Industry) {
        let now = self.clock.now();
        self.industry = industry;
        self.pending.clear();

        let scenario = self.catalog.scenario(industry);
        let window_ms = self.settings.seed_window().num_milliseconds() as f64;
        let mut seeded: Vec<DecisionRecord> = (0..self.settings.seed_batch)
            .filter_map(|_| {
                let mut record = generator::generate(scenario, self.sampler.as_mut(), now)?;
                let back = Duration::milliseconds((self.sampler.unit() * window_ms) as i64);
                record.timestamp = now - back;
                Some(record)
            })
            .collect();
        seeded.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.history.reset(seeded);

        if self.live {
            self.tick_cadence.arm(now);
        }
        self.sweep_cadence.arm(now);

        info!(
            industry = %industry,
            seeded = self.history.len(),
            "simulator configured"
        );
    }

    /// Alias of [`Simulator::configure`].
    pub fn start(&mut self, industry: Industry) {
        self.configure(industry);
    }

    /// Generate one record now, regardless of the live flag.
    pub fn tick(&mut self) -> Option<DecisionRecord> {
        let now = self.clock.now();
        self.tick_at(now)
    }

    /// Block every pending escalation whose deadline has passed.
    ///
    /// Returns the timeout records added to history.
    pub fn expiry_sweep(&mut self) -> Vec<DecisionRecord> {
        let now = self.clock.now();
        self.sweep_at(now)
    }

    /// Approve a pending escalation. Unknown or already-resolved ids are a no-op.
    pub fn approve(&mut self, id: &str) -> Option<DecisionRecord> {
        self.resolve(id, ResolutionKind::Approved)
    }

    /// Reject a pending escalation. Unknown or already-resolved ids are a no-op.
    pub fn reject(&mut self, id: &str) -> Option<DecisionRecord> {
        self.resolve(id, ResolutionKind::Rejected)
    }

    /// Flip the live flag and return the new value.
    ///
    /// Pausing cancels the generation cadence; resuming re-arms it from now.
    /// History and pending escalations are untouched either way.
    pub fn toggle_live(&mut self) -> bool {
        let live = !self.live;
        self.set_live(live);
        live
    }

    pub fn set_live(&mut self, live: bool) {
        if live == self.live {
            return;
        }
        self.live = live;
        if live {
            let now = self.clock.now();
            self.tick_cadence.arm(now);
        } else {
            self.tick_cadence.disarm();
        }
        info!(live, "simulator live flag changed");
    }

    /// Run whatever is due at the current time.
    ///
    /// The sweep runs first, then generation (only while live). Each
    /// cadence fires at most once per call.
    pub fn advance(&mut self) -> Advance {
        let now = self.clock.now();
        let timed_out = if self.sweep_cadence.fire(now) {
            self.sweep_at(now)
        } else {
            Vec::new()
        };
        let generated = if self.live && self.tick_cadence.fire(now) {
            self.tick_at(now)
        } else {
            None
        };
        Advance {
            generated,
            timed_out,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    /// Decision history, newest first.
    pub fn history(&self) -> impl DoubleEndedIterator<Item = &DecisionRecord> + ExactSizeIterator {
        self.history.iter()
    }

    /// Pending escalations, newest first.
    pub fn pending(&self) -> impl DoubleEndedIterator<Item = &PendingEscalation> + ExactSizeIterator {
        self.pending.iter()
    }

    pub fn find_pending(&self, id: &str) -> Option<&PendingEscalation> {
        self.pending.iter().find(|p| p.id.as_str() == id)
    }

    /// Aggregate counters, recomputed from the history on every call.
    pub fn stats(&self) -> SimStats {
        SimStats::from_records(self.history.iter())
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn industry(&self) -> Industry {
        self.industry
    }

    pub fn scenario(&self) -> &Scenario {
        self.catalog.scenario(self.industry)
    }

    /// Any industry's scenario, for tabs and policy listings.
    pub fn scenario_for(&self, industry: Industry) -> &Scenario {
        self.catalog.scenario(industry)
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    /// Records pushed out of history by newer ones since construction.
    pub fn evicted(&self) -> u64 {
        self.history.total_evicted()
    }

    /// Countdown for `pending` as of the current time.
    pub fn countdown(&self, pending: &PendingEscalation) -> Countdown {
        Countdown::at(pending, self.clock.now(), self.settings.escalation_window())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn tick_at(&mut self, now: DateTime<Utc>) -> Option<DecisionRecord> {
        let scenario = self.catalog.scenario(self.industry);
        let Some(record) = generator::generate(scenario, self.sampler.as_mut(), now) else {
            warn!(
                industry = %self.industry,
                "scenario has no templates or agents; nothing generated"
            );
            return None;
        };

        if record.outcome == Outcome::Escalated {
            let route = self.router.route(&record.policy_matched);
            let expires_at = now + self.settings.escalation_window();
            let pending = PendingEscalation::from_record(&record, expires_at, route);
            debug!(
                id = %pending.id,
                escalate_to = %pending.escalate_to,
                expires_at = %pending.expires_at,
                "escalation pending review"
            );
            if let Some(dropped) = self.pending.push_newest(pending) {
                debug!(id = %dropped.id, "pending set at capacity; oldest escalation dropped");
            }
        }

        debug!(
            id = %record.id,
            trace_id = %record.trace_id,
            action = %record.action_type,
            outcome = %record.outcome,
            latency_ms = record.latency_ms,
            "decision generated"
        );
        self.history.push_newest(record.clone());
        Some(record)
    }

    fn sweep_at(&mut self, now: DateTime<Utc>) -> Vec<DecisionRecord> {
        let expired = self.pending.drain_matching(|p| p.is_expired(now));
        let mut records = Vec::with_capacity(expired.len());
        // Oldest first, so the newest expiry ends up at the front of history.
        for item in expired.iter().rev() {
            let record = item.resolve(ResolutionKind::TimedOut, ResolutionKind::TIMEOUT_RESOLVER, now);
            info!(
                id = %item.id,
                trace_id = %item.trace_id,
                policy = %item.policy_matched,
                "escalation expired; action blocked"
            );
            self.history.push_newest(record.clone());
            records.push(record);
        }
        records
    }

    fn resolve(&mut self, id: &str, kind: ResolutionKind) -> Option<DecisionRecord> {
        let Some(item) = self.pending.take_first(|p| p.id.as_str() == id) else {
            debug!(id, ?kind, "escalation no longer pending; ignoring");
            return None;
        };
        let now = self.clock.now();
        let record = item.resolve(kind, &self.settings.reviewer_label, now);
        info!(
            id = %item.id,
            trace_id = %item.trace_id,
            resolved_by = %self.settings.reviewer_label,
            outcome = %record.outcome,
            "escalation resolved"
        );
        self.history.push_newest(record.clone());
        Some(record)
    }
}
