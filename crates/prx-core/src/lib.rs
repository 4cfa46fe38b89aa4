//! # prx-core
//!
//! The PRX event simulator: a timer-driven generator of synthetic
//! enforcement decisions with a human-review escalation lifecycle.
//!
//! This crate provides:
//! - The seam traits (`Clock`, `Sampler`, `EscalationRouter`, `ScenarioCatalog`)
//! - The `Simulator` state struct and its transitions
//! - `SimulatorHandle` and `LiveDriver` for multi-threaded hosts
//! - Audit-log filtering over the history
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prx_core::{Simulator, clock::SystemClock, sampler::RandSampler};
//!
//! let mut sim = Simulator::new(settings, router, catalog,
//!     Box::new(SystemClock), Box::new(RandSampler::from_entropy()), Industry::Banking);
//! sim.configure(Industry::Banking);
//! loop {
//!     sim.advance();
//!     // render sim.history(), sim.pending(), sim.stats()
//! }
//! ```

pub mod buffer;
pub mod cadence;
pub mod clock;
pub mod driver;
pub mod generator;
pub mod handle;
pub mod query;
pub mod sampler;
pub mod simulator;
pub mod traits;

pub use handle::{SimulatorHandle, Snapshot};
pub use simulator::{Advance, Simulator};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use serde_json::json;

    use prx_contracts::{
        escalation::{EscalationRoute, ResolutionKind},
        outcome::{Outcome, ResolvedOutcome},
        scenario::{HistoricalStats, Industry, Scenario},
        settings::SimSettings,
        template::{round_tenth, ActionTemplate, LatencyRange, PolicyBinding},
    };

    use crate::{
        clock::ManualClock,
        driver::LiveDriver,
        query::{outcome_counts, HistoryFilter, OutcomeFilter},
        sampler::{RandSampler, ScriptedSampler},
        traits::{Clock, EscalationRouter, Sampler, ScenarioCatalog},
        Simulator, SimulatorHandle, Snapshot,
    };

    // ── Fixtures ──────────────────────────────────────────────────────────────

    struct FixtureRouter;

    impl EscalationRouter for FixtureRouter {
        fn route(&self, policy: &str) -> EscalationRoute {
            match policy {
                "WIRE_TRANSFER_POLICY" => EscalationRoute {
                    escalate_to: "compliance-officer".to_string(),
                    sla_minutes: 20,
                },
                _ => EscalationRoute {
                    escalate_to: "senior-reviewer".to_string(),
                    sla_minutes: 15,
                },
            }
        }
    }

    /// Serves the same scenario for every industry.
    struct FixtureCatalog(Scenario);

    impl ScenarioCatalog for FixtureCatalog {
        fn scenario(&self, _industry: Industry) -> &Scenario {
            &self.0
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap()
    }

    /// One template, one agent: outcomes `[ALLOWED, ALLOWED, ESCALATED]`.
    fn wire_scenario() -> Scenario {
        Scenario {
            industry: Industry::Banking,
            label: "Banking".to_string(),
            agents: vec!["TradeBot-v2".to_string()],
            actions: vec![ActionTemplate::new(
                "wire.transfer",
                "TradeBot-v2",
                json!({ "amount": 95000, "currency": "USD", "toAccount": "EXT-884721" }),
                vec![Outcome::Allowed, Outcome::Allowed, Outcome::Escalated],
                PolicyBinding::uniform("WIRE_TRANSFER_POLICY"),
                LatencyRange::new(1.3, 2.1).unwrap(),
            )
            .unwrap()],
            policies: vec![],
            stats_24h: HistoricalStats { total: 53840, blocked: 11204, escalated: 6319, avg_latency: 1.4 },
        }
    }

    /// Several templates with distinct ranges and a mixed agent pool.
    fn mixed_scenario() -> Scenario {
        let t = |kind: &str, outcomes: Vec<Outcome>, policy: &str, min: f64, max: f64| {
            ActionTemplate::new(
                kind,
                "agent",
                json!({ "amount": 4200, "rows": 15000 }),
                outcomes,
                PolicyBinding::uniform(policy),
                LatencyRange::new(min, max).unwrap(),
            )
            .unwrap()
        };
        Scenario {
            industry: Industry::Fintech,
            label: "FinTech".to_string(),
            agents: vec!["trading-bot-v2".into(), "risk-analyzer".into(), "portfolio-manager".into()],
            actions: vec![
                t("transaction.create", vec![Outcome::Allowed, Outcome::Allowed, Outcome::Blocked], "TRANSACTION_LIMIT", 0.8, 1.6),
                t("position.open", vec![Outcome::Blocked, Outcome::Escalated, Outcome::Allowed], "MAX_POSITION_SIZE", 1.1, 2.2),
                t("margin.adjust", vec![Outcome::Escalated, Outcome::Escalated, Outcome::Allowed], "MARGIN_CONTROL", 0.7, 1.4),
                t("account.read", vec![Outcome::Allowed], "KYC_REQUIRED", 0.5, 1.0),
            ],
            policies: vec![],
            stats_24h: HistoricalStats { total: 0, blocked: 0, escalated: 0, avg_latency: 0.0 },
        }
    }

    fn build(
        scenario: Scenario,
        settings: SimSettings,
        sampler: Box<dyn Sampler>,
    ) -> (Simulator, ManualClock) {
        let clock = ManualClock::new(t0());
        let sim = Simulator::new(
            settings,
            Box::new(FixtureRouter),
            Box::new(FixtureCatalog(scenario)),
            Box::new(clock.clone()),
            sampler,
            Industry::Banking,
        );
        (sim, clock)
    }

    /// Script for `wire_scenario`: each tick draws template, outcome, agent.
    fn script(outcome_indices: &[usize]) -> ScriptedSampler {
        ScriptedSampler::new(outcome_indices.iter().flat_map(|&o| [0, o, 0]))
    }

    const ESC: usize = 2;

    // ── Generation ────────────────────────────────────────────────────────────

    #[test]
    fn new_simulator_is_live_and_empty() {
        let (sim, _clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[])));
        assert!(sim.is_live());
        assert_eq!(sim.history().len(), 0);
        assert_eq!(sim.pending().len(), 0);
        assert_eq!(sim.stats().total, 0);
    }

    /// Ten ticks over `[ALLOWED, ALLOWED, ESCALATED]` with one scripted
    /// escalation leave exactly one pending entry with a future deadline.
    #[test]
    fn ten_ticks_with_one_escalation() {
        let (mut sim, clock) = build(
            wire_scenario(),
            SimSettings::default(),
            Box::new(script(&[0, 1, 0, 1, 0, 1, ESC, 0, 1, 0])),
        );
        for _ in 0..10 {
            assert!(sim.tick().is_some());
        }

        let stats = sim.stats();
        assert_eq!(stats.total, 10);
        assert_eq!(stats.escalated, 1);
        assert_eq!(stats.allowed, 9);

        let pending: Vec<_> = sim.pending().collect();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].expires_at > clock.now());
        assert_eq!(pending[0].expires_at, t0() + Duration::minutes(3));
        assert_eq!(pending[0].escalate_to, "compliance-officer");
        assert_eq!(pending[0].sla_minutes, 20);
    }

    #[test]
    fn escalated_record_and_pending_share_identity() {
        let (mut sim, _clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[ESC])));
        let record = sim.tick().unwrap();
        assert_eq!(record.outcome, Outcome::Escalated);

        let pending = sim.find_pending(record.id.as_str()).unwrap();
        assert_eq!(pending.trace_id, record.trace_id);
        assert_eq!(pending.payload, record.payload);
        assert_eq!(sim.history().next().unwrap().id, record.id);
    }

    #[test]
    fn unmapped_policy_falls_back_to_default_route() {
        let mut scenario = wire_scenario();
        scenario.actions[0].policies = PolicyBinding::uniform("UNLISTED_POLICY");
        let (mut sim, _clock) = build(scenario, SimSettings::default(), Box::new(script(&[ESC])));
        sim.tick();
        let pending = sim.pending().next().unwrap();
        assert_eq!(pending.escalate_to, "senior-reviewer");
        assert_eq!(pending.sla_minutes, 15);
    }

    #[test]
    fn history_is_bounded_and_evicts_oldest_first() {
        let settings = SimSettings { history_capacity: 5, ..SimSettings::default() };
        let (mut sim, _clock) = build(wire_scenario(), settings, Box::new(script(&[])));

        let ids: Vec<String> = (0..8).map(|_| sim.tick().unwrap().id.0).collect();
        let kept: Vec<String> = sim.history().map(|r| r.id.0.clone()).collect();

        assert_eq!(kept.len(), 5);
        let expected: Vec<String> = ids[3..].iter().rev().cloned().collect();
        assert_eq!(kept, expected, "newest first, three oldest evicted");
        assert_eq!(sim.evicted(), 3);
        assert_eq!(Snapshot::of(&sim).evicted, 3);
    }

    #[test]
    fn pending_set_is_capped() {
        let settings = SimSettings { pending_capacity: 2, ..SimSettings::default() };
        let (mut sim, _clock) = build(wire_scenario(), settings, Box::new(script(&[ESC, ESC, ESC])));
        let ids: Vec<String> = (0..3).map(|_| sim.tick().unwrap().id.0).collect();

        let pending: Vec<String> = sim.pending().map(|p| p.id.0.clone()).collect();
        assert_eq!(pending, vec![ids[2].clone(), ids[1].clone()]);
    }

    #[test]
    fn record_ids_are_unique_across_history() {
        let (mut sim, _clock) = build(mixed_scenario(), SimSettings::default(), Box::new(RandSampler::seeded(9)));
        sim.configure(Industry::Fintech);
        for _ in 0..60 {
            sim.tick();
        }
        let pending_ids: Vec<String> = sim.pending().map(|p| p.id.0.clone()).collect();
        for id in pending_ids.iter().take(3) {
            sim.approve(id);
        }
        let ids: HashSet<&str> = sim.history().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), sim.history().len());
    }

    #[test]
    fn every_pending_entry_has_one_escalated_origin() {
        let (mut sim, _clock) = build(mixed_scenario(), SimSettings::default(), Box::new(RandSampler::seeded(21)));
        for _ in 0..40 {
            sim.tick();
        }
        assert!(sim.pending().len() > 0);
        for pending in sim.pending() {
            let origins = sim
                .history()
                .filter(|r| r.outcome == Outcome::Escalated && r.trace_id == pending.trace_id)
                .count();
            assert_eq!(origins, 1, "pending {} must map to one ESCALATED record", pending.id);
        }
    }

    // ── Configure ─────────────────────────────────────────────────────────────

    #[test]
    fn configure_seeds_backdated_history_and_clears_pending() {
        let (mut sim, clock) = build(mixed_scenario(), SimSettings::default(), Box::new(RandSampler::seeded(5)));
        clock.advance(Duration::minutes(10));
        for _ in 0..30 {
            sim.tick();
        }
        assert!(sim.pending().len() > 0);

        sim.configure(Industry::Healthcare);
        let now = clock.now();

        assert_eq!(sim.industry(), Industry::Healthcare);
        assert_eq!(sim.pending().len(), 0);
        assert_eq!(sim.history().len(), 20);
        let stamps: Vec<_> = sim.history().map(|r| r.timestamp).collect();
        for ts in &stamps {
            assert!(*ts <= now);
            assert!(*ts >= now - Duration::minutes(3));
        }
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]), "seeded history is newest first");
    }

    #[test]
    fn seeded_escalations_are_not_pending() {
        // Every draw picks index 2 (ESCALATED) for the outcome.
        let indices = std::iter::repeat([0, ESC, 0]).take(20).flatten();
        let (mut sim, _clock) = build(wire_scenario(), SimSettings::default(), Box::new(ScriptedSampler::new(indices)));
        sim.configure(Industry::Banking);
        assert_eq!(sim.stats().escalated, 20);
        assert_eq!(sim.pending().len(), 0);
    }

    // ── Resolution ────────────────────────────────────────────────────────────

    #[test]
    fn approve_moves_pending_to_allowed_record_once() {
        let (mut sim, clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[ESC])));
        let origin = sim.tick().unwrap();
        clock.advance(Duration::seconds(30));

        let resolved = sim.approve(origin.id.as_str()).unwrap();
        assert_eq!(sim.pending().len(), 0);
        assert_eq!(sim.history().len(), 2);
        assert_eq!(resolved.id.0, format!("{}-approved", origin.id.0));
        assert_eq!(resolved.trace_id, origin.trace_id);
        assert_eq!(resolved.outcome, Outcome::Allowed);
        let resolution = resolved.resolution.as_ref().unwrap();
        assert_eq!(resolution.outcome, ResolvedOutcome::Allowed);
        assert_eq!(resolution.resolved_by, "senior-trader");
        assert_eq!(resolution.resolved_at, t0() + Duration::seconds(30));
        assert_eq!(sim.history().next().unwrap().id, resolved.id);

        // Second call is a no-op.
        assert!(sim.approve(origin.id.as_str()).is_none());
        assert_eq!(sim.pending().len(), 0);
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn reject_moves_pending_to_blocked_record_once() {
        let (mut sim, _clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[ESC])));
        let origin = sim.tick().unwrap();

        let resolved = sim.reject(origin.id.as_str()).unwrap();
        assert_eq!(resolved.outcome, Outcome::Blocked);
        assert_eq!(resolved.resolution.as_ref().unwrap().outcome, ResolvedOutcome::Blocked);
        assert!(resolved.id.as_str().ends_with("-rejected"));

        assert!(sim.reject(origin.id.as_str()).is_none());
        assert!(sim.approve(origin.id.as_str()).is_none());
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn resolving_unknown_id_changes_nothing() {
        let (mut sim, _clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[ESC])));
        sim.tick();
        assert!(sim.approve("no-such-id").is_none());
        assert!(sim.reject("").is_none());
        assert_eq!(sim.pending().len(), 1);
        assert_eq!(sim.history().len(), 1);
    }

    #[test]
    fn reviewer_label_comes_from_settings() {
        let settings = SimSettings { reviewer_label: "risk-desk".to_string(), ..SimSettings::default() };
        let (mut sim, _clock) = build(wire_scenario(), settings, Box::new(script(&[ESC])));
        let origin = sim.tick().unwrap();
        let resolved = sim.approve(origin.id.as_str()).unwrap();
        assert_eq!(resolved.resolution.unwrap().resolved_by, "risk-desk");
    }

    // ── Expiry ────────────────────────────────────────────────────────────────

    /// A pending escalation left alone for the full window is blocked by the
    /// next sweep, with a timeout record carrying the original trace id.
    #[test]
    fn expired_escalation_is_blocked_by_sweep() {
        let (mut sim, clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[ESC])));
        let origin = sim.tick().unwrap();

        clock.advance(Duration::minutes(2));
        assert!(sim.expiry_sweep().is_empty(), "not yet expired");
        assert_eq!(sim.pending().len(), 1);

        clock.advance(Duration::minutes(1));
        let timed_out = sim.expiry_sweep();
        assert_eq!(timed_out.len(), 1);
        assert_eq!(sim.pending().len(), 0);

        let record = sim.history().next().unwrap();
        assert_eq!(record.trace_id, origin.trace_id);
        assert_eq!(record.outcome, Outcome::Blocked);
        assert!(record.id.as_str().ends_with("-timeout"));
        let resolution = record.resolution.as_ref().unwrap();
        assert_eq!(resolution.resolved_by, ResolutionKind::TIMEOUT_RESOLVER);
        assert_eq!(resolution.resolved_by, "system (SLA timeout)");
        assert_eq!(resolution.outcome, ResolvedOutcome::Blocked);

        // Exactly one timeout record; approving afterwards is a no-op.
        assert!(sim.approve(origin.id.as_str()).is_none());
        assert!(sim.expiry_sweep().is_empty());
        let timeouts = sim.history().filter(|r| r.id.as_str().ends_with("-timeout")).count();
        assert_eq!(timeouts, 1);
    }

    #[test]
    fn approved_escalation_never_times_out() {
        let (mut sim, clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[ESC])));
        let origin = sim.tick().unwrap();
        sim.approve(origin.id.as_str());
        clock.advance(Duration::minutes(5));
        assert!(sim.expiry_sweep().is_empty());
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn advance_sweeps_on_its_own_cadence() {
        let (mut sim, clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[ESC])));
        let origin = sim.tick().unwrap();

        // Three minutes plus one sweep period.
        clock.advance(Duration::minutes(3) + Duration::seconds(5));
        let step = sim.advance();
        assert_eq!(step.timed_out.len(), 1);
        assert_eq!(step.timed_out[0].trace_id, origin.trace_id);
        assert_eq!(sim.pending().len(), 0);
    }

    // ── Live / cadence ────────────────────────────────────────────────────────

    #[test]
    fn advance_fires_each_cadence_at_most_once() {
        let (mut sim, clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[])));
        assert!(sim.advance().is_idle());

        clock.advance(Duration::milliseconds(2500));
        assert!(sim.advance().generated.is_some());
        assert!(sim.advance().is_idle());

        // A long stall yields one tick, not a backlog.
        clock.advance(Duration::seconds(60));
        assert!(sim.advance().generated.is_some());
        assert!(sim.advance().generated.is_none());
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn paused_simulator_stops_generating_but_still_sweeps() {
        let (mut sim, clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[ESC])));
        sim.tick();
        assert!(!sim.toggle_live());

        clock.advance(Duration::minutes(4));
        let step = sim.advance();
        assert!(step.generated.is_none());
        assert_eq!(step.timed_out.len(), 1);
        assert_eq!(sim.pending().len(), 0);
        assert_eq!(sim.history().len(), 2, "history kept while paused");

        // Resuming re-arms from now: nothing fires until a full period passes.
        assert!(sim.toggle_live());
        assert!(sim.advance().generated.is_none());
        clock.advance(Duration::milliseconds(2500));
        assert!(sim.advance().generated.is_some());
    }

    #[test]
    fn stats_are_derived_from_history() {
        let (mut sim, _clock) = build(mixed_scenario(), SimSettings::default(), Box::new(RandSampler::seeded(77)));
        sim.configure(Industry::Fintech);
        for _ in 0..25 {
            sim.tick();
            let stats = sim.stats();
            assert_eq!(stats.total as usize, sim.history().len());
            assert_eq!(stats.allowed + stats.blocked + stats.escalated, stats.total);
        }
    }

    // ── Audit query ───────────────────────────────────────────────────────────

    #[test]
    fn history_filter_matches_outcome_and_search() {
        let (mut sim, _clock) = build(mixed_scenario(), SimSettings::default(), Box::new(RandSampler::seeded(4)));
        for _ in 0..50 {
            sim.tick();
        }

        let blocked = HistoryFilter::new(Some(Outcome::Blocked), "");
        let hits = blocked.apply(sim.history());
        assert_eq!(hits.len() as u64, sim.stats().blocked);

        let by_policy = HistoryFilter::new(OutcomeFilter::All, "margin_CONTROL");
        assert!(by_policy.apply(sim.history()).iter().all(|r| r.action_type == "margin.adjust"));

        let first = sim.history().next().unwrap().clone();
        let by_trace = HistoryFilter::new(OutcomeFilter::All, first.trace_id.as_str().to_lowercase());
        let found = by_trace.apply(sim.history());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, first.id);

        let nothing = HistoryFilter::new(OutcomeFilter::All, "no-such-agent");
        assert!(nothing.apply(sim.history()).is_empty());
    }

    #[test]
    fn outcome_filter_cycles_and_counts() {
        let mut filter = OutcomeFilter::All;
        let labels: Vec<&str> = (0..4)
            .map(|_| {
                filter = filter.next();
                filter.label()
            })
            .collect();
        assert_eq!(labels, vec!["ALLOWED", "BLOCKED", "ESCALATED", "ALL"]);

        let (mut sim, _clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[0, ESC, 1])));
        for _ in 0..3 {
            sim.tick();
        }
        let counts = outcome_counts(sim.history());
        assert_eq!(counts[0], (Outcome::Allowed, 2));
        assert_eq!(counts[2], (Outcome::Escalated, 1));
    }

    // ── Handle / driver ───────────────────────────────────────────────────────

    #[test]
    fn handle_snapshot_and_commands() {
        let (sim, _clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[ESC])));
        let handle = SimulatorHandle::new(sim);

        let record = handle.tick().unwrap().unwrap();
        let snap = handle.snapshot().unwrap();
        assert_eq!(snap.history.len(), 1);
        assert_eq!(snap.pending.len(), 1);
        assert_eq!(snap.stats.escalated, 1);
        assert!(snap.live);

        let other = handle.clone();
        assert!(other.approve(record.id.as_str()).unwrap().is_some());
        assert!(handle.approve(record.id.as_str()).unwrap().is_none());
        assert_eq!(handle.snapshot().unwrap().history.len(), 2);
        assert!(!handle.toggle_live().unwrap());
    }

    #[test]
    fn live_driver_advances_shared_simulator() {
        let (sim, clock) = build(wire_scenario(), SimSettings::default(), Box::new(script(&[])));
        let handle = SimulatorHandle::new(sim);
        let mut driver = LiveDriver::spawn(handle.clone(), std::time::Duration::from_millis(5));

        clock.advance(Duration::seconds(3));
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while handle.stats().unwrap().total == 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        driver.stop();

        assert_eq!(handle.stats().unwrap().total, 1);
        assert!(!driver.is_running());
    }

    // ── Properties ────────────────────────────────────────────────────────────

    proptest! {
        #[test]
        fn latency_stays_in_template_range(seed in any::<u64>(), ticks in 1usize..80) {
            let scenario = mixed_scenario();
            let (mut sim, _clock) = build(scenario.clone(), SimSettings::default(), Box::new(RandSampler::seeded(seed)));
            for _ in 0..ticks {
                let record = sim.tick().unwrap();
                let template = scenario
                    .actions
                    .iter()
                    .find(|t| t.action_type == record.action_type)
                    .unwrap();
                prop_assert!(template.latency.contains(record.latency_ms));
                prop_assert_eq!(round_tenth(record.latency_ms), record.latency_ms);
            }
        }

        #[test]
        fn history_never_exceeds_capacity(seed in any::<u64>(), capacity in 1usize..20, ticks in 0usize..80) {
            let settings = SimSettings { history_capacity: capacity, ..SimSettings::default() };
            let (mut sim, _clock) = build(mixed_scenario(), settings, Box::new(RandSampler::seeded(seed)));
            for _ in 0..ticks {
                sim.tick();
                prop_assert!(sim.history().len() <= capacity);
                let stats = sim.stats();
                prop_assert_eq!(stats.total as usize, sim.history().len());
                prop_assert_eq!(stats.allowed + stats.blocked + stats.escalated, stats.total);
            }
        }
    }
}
