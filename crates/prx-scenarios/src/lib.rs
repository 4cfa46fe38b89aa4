//! # prx-scenarios
//!
//! Built-in industry catalogs for the PRX simulator.
//!
//! Four scenarios ship with the crate:
//!
//! 1. **Banking**: trading desk, wire transfers, margin control.
//! 2. **FinTech**: automated trading platform with export limits.
//! 3. **Healthcare**: PHI access, prescriptions, lab orders.
//! 4. **Enterprise SaaS**: tenant isolation, RBAC, bulk exports.
//!
//! All data is hardcoded and fictional.

pub mod catalog;
pub mod industries;

pub use catalog::BuiltinCatalog;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use prx_config::RoutingTable;
    use prx_contracts::{
        outcome::Outcome,
        scenario::Industry,
        stats::SimStats,
    };
    use prx_core::{
        clock::ManualClock,
        sampler::{RandSampler, ScriptedSampler},
        traits::{Sampler, ScenarioCatalog},
        Simulator,
    };

    use crate::BuiltinCatalog;

    fn simulator(sampler: Box<dyn Sampler>, industry: Industry) -> (Simulator, ManualClock) {
        let table = RoutingTable::builtin().unwrap();
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap());
        let sim = Simulator::new(
            table.settings().clone(),
            Box::new(table),
            Box::new(BuiltinCatalog::new().unwrap()),
            Box::new(clock.clone()),
            sampler,
            industry,
        );
        (sim, clock)
    }

    // ── Catalog ───────────────────────────────────────────────────────────────

    #[test]
    fn every_builtin_scenario_validates() {
        let catalog = BuiltinCatalog::new().unwrap();
        for industry in Industry::ALL {
            let scenario = catalog.scenario(industry);
            assert_eq!(scenario.industry, industry);
            scenario.validate().unwrap();
            assert_eq!(scenario.agents.len(), 3, "{industry}");
            assert!(!scenario.policies.is_empty(), "{industry}");
            assert!(scenario.stats_24h.blocked + scenario.stats_24h.escalated <= scenario.stats_24h.total);
        }
    }

    #[test]
    fn labels_and_template_counts() {
        let catalog = BuiltinCatalog::new().unwrap();
        let summary: Vec<(&str, usize)> = catalog
            .iter()
            .map(|s| (s.label.as_str(), s.actions.len()))
            .collect();
        assert_eq!(
            summary,
            vec![("Banking", 7), ("FinTech", 6), ("Healthcare", 5), ("Enterprise SaaS", 5)]
        );
    }

    #[test]
    fn policy_definitions_carry_dsl() {
        let catalog = BuiltinCatalog::new().unwrap();
        let wire = catalog.scenario(Industry::Banking).policy("WIRE_TRANSFER_POLICY").unwrap();
        assert_eq!(wire.effect, Outcome::Escalated);
        assert!(wire.active);
        assert!(wire.dsl.starts_with("policy WIRE_TRANSFER_POLICY {"));
        assert!(wire.dsl.contains("escalate_to: \"compliance-officer\""));

        let saas = catalog.scenario(Industry::Saas);
        assert!(saas.policy("TENANT_ISOLATION").is_some());
        assert!(saas.policy("KYC_REQUIRED").is_none());
    }

    #[test]
    fn tenant_isolation_template_always_blocks() {
        let catalog = BuiltinCatalog::new().unwrap();
        let template = &catalog.scenario(Industry::Saas).actions[0];
        assert_eq!(template.action_type, "tenant.data.access");
        assert_eq!(template.weight_of(Outcome::Blocked), 1.0);
    }

    // ── End to end ────────────────────────────────────────────────────────────

    /// A banking wire transfer escalates to compliance, waits out the window,
    /// and is blocked by the sweep.
    #[test]
    fn banking_wire_escalation_times_out() {
        // wire.transfer is template 3; ESCALATED is outcome 2.
        let (mut sim, clock) = simulator(Box::new(ScriptedSampler::new([3, 2, 0])), Industry::Banking);
        let record = sim.tick().unwrap();
        assert_eq!(record.action_type, "wire.transfer");
        assert_eq!(record.outcome, Outcome::Escalated);
        assert_eq!(record.policy_matched, "WIRE_TRANSFER_POLICY");

        let pending = sim.find_pending(record.id.as_str()).unwrap();
        assert_eq!(pending.escalate_to, "compliance-officer");
        assert_eq!(pending.sla_minutes, 20);

        clock.advance(Duration::minutes(3));
        let timed_out = sim.expiry_sweep();
        assert_eq!(timed_out.len(), 1);
        assert_eq!(timed_out[0].trace_id, record.trace_id);
        assert_eq!(timed_out[0].outcome, Outcome::Blocked);
        assert_eq!(sim.pending().len(), 0);
    }

    #[test]
    fn healthcare_escalation_routes_to_privacy_officer() {
        // patient.record.access is template 0; its fourth outcome escalates.
        let (mut sim, _clock) = simulator(Box::new(ScriptedSampler::new([0, 3, 2])), Industry::Healthcare);
        let record = sim.tick().unwrap();
        assert_eq!(record.agent, "records-agent");
        let pending = sim.pending().next().unwrap();
        assert_eq!(pending.escalate_to, "on-call-privacy-officer");
        assert_eq!(pending.sla_minutes, 10);

        let id = pending.id.clone();
        let approved = sim.approve(id.as_str()).unwrap();
        assert_eq!(approved.outcome, Outcome::Allowed);
        assert_eq!(approved.resolution.unwrap().resolved_by, "senior-trader");
    }

    #[test]
    fn switching_industry_reseeds_from_new_catalog() {
        let (mut sim, _clock) = simulator(Box::new(RandSampler::seeded(42)), Industry::Banking);
        sim.configure(Industry::Banking);
        for _ in 0..30 {
            sim.tick();
        }

        sim.configure(Industry::Saas);
        assert_eq!(sim.pending().len(), 0);
        assert_eq!(sim.history().len(), 20);
        let saas_types: Vec<&str> = sim.scenario().actions.iter().map(|t| t.action_type.as_str()).collect();
        assert!(sim.history().all(|r| saas_types.contains(&r.action_type.as_str())));
    }

    #[test]
    fn live_stats_combine_with_baseline() {
        let (mut sim, _clock) = simulator(Box::new(RandSampler::seeded(3)), Industry::Fintech);
        sim.configure(Industry::Fintech);
        let live = sim.stats();
        let combined = live.combined_with(&sim.scenario().stats_24h);
        assert_eq!(combined.total, 48_291 + live.total);
        assert_eq!(combined.blocked, 9_134 + live.blocked);

        let idle = SimStats::default().combined_with(&sim.scenario().stats_24h);
        assert_eq!(idle.avg_latency, 1.4);
    }
}
