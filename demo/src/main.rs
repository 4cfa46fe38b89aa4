//! PRX Enforcement Simulator: Demo CLI
//!
//! Drives the simulator headless and prints what the dashboard would show.
//!
//! Usage:
//!   cargo run -p demo -- stream --industry banking --seconds 10
//!   cargo run -p demo -- snapshot --industry saas --ticks 40 --seed 7 --json
//!   cargo run -p demo -- audit --industry healthcare --ticks 60 --outcome blocked
//!   cargo run -p demo -- policies --industry fintech
//!   cargo run -p demo -- escalations --industry banking --ticks 30

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Duration as StdDuration,
};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use prx_config::RoutingTable;
use prx_contracts::{
    error::{PrxError, PrxResult},
    escalation::ResolutionKind,
    outcome::Outcome,
    record::DecisionRecord,
    scenario::Industry,
    stats::SimStats,
};
use prx_core::{
    clock::{ManualClock, SystemClock},
    driver::LiveDriver,
    query::HistoryFilter,
    sampler::RandSampler,
    traits::{Clock, EscalationRouter, Sampler, ScenarioCatalog},
    Simulator, SimulatorHandle, Snapshot,
};
use prx_scenarios::BuiltinCatalog;

// ── CLI definition ────────────────────────────────────────────────────────────

/// PRX: simulated AI-agent policy enforcement.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "PRX enforcement simulator demo",
    long_about = "Generates synthetic agent actions against industry policy sets,\n\
                  routes escalations to reviewers, and times them out when unanswered."
)]
struct Cli {
    /// Routing TOML to use instead of the bundled table.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run live in real time and print each decision as it happens.
    Stream {
        #[arg(long, default_value = "banking")]
        industry: Industry,
        #[arg(long, default_value_t = 15)]
        seconds: u64,
    },
    /// Advance simulated time by N tick intervals and print the resulting state.
    Snapshot {
        #[arg(long, default_value = "banking")]
        industry: Industry,
        #[arg(long, default_value_t = 20)]
        ticks: u32,
        /// Seed for the sampler; omit for a random run.
        #[arg(long)]
        seed: Option<u64>,
        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Filter the audit log by outcome and free-text search.
    Audit {
        #[arg(long, default_value = "banking")]
        industry: Industry,
        #[arg(long, default_value_t = 40)]
        ticks: u32,
        #[arg(long)]
        outcome: Option<Outcome>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List the industry's policy definitions and escalation routes.
    Policies {
        #[arg(long, default_value = "banking")]
        industry: Industry,
    },
    /// Show pending escalations with their countdowns.
    Escalations {
        #[arg(long, default_value = "banking")]
        industry: Industry,
        #[arg(long, default_value_t = 30)]
        ticks: u32,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-decision logs.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Command::Stream { industry, seconds } => run_stream(config, industry, seconds),
        Command::Snapshot {
            industry,
            ticks,
            seed,
            json,
        } => run_snapshot(config, industry, ticks, seed, json),
        Command::Audit {
            industry,
            ticks,
            outcome,
            search,
        } => run_audit(config, industry, ticks, HistoryFilter::new(outcome, search)),
        Command::Policies { industry } => run_policies(config, industry),
        Command::Escalations { industry, ticks } => run_escalations(config, industry, ticks),
    };

    if let Err(e) = result {
        eprintln!("Demo error: {}", e);
        std::process::exit(1);
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn load_table(config: Option<&Path>) -> PrxResult<RoutingTable> {
    match config {
        Some(path) => RoutingTable::from_file(path),
        None => RoutingTable::builtin(),
    }
}

fn build(
    config: Option<&Path>,
    industry: Industry,
    clock: Box<dyn Clock>,
    sampler: Box<dyn Sampler>,
) -> PrxResult<Simulator> {
    let table = load_table(config)?;
    let catalog = BuiltinCatalog::new()?;
    let mut sim = Simulator::new(
        table.settings().clone(),
        Box::new(table),
        Box::new(catalog),
        clock,
        sampler,
        industry,
    );
    sim.start(industry);
    Ok(sim)
}

/// Configure, then step a manual clock one tick interval at a time.
fn simulate(config: Option<&Path>, industry: Industry, ticks: u32, seed: Option<u64>) -> PrxResult<Simulator> {
    let clock = ManualClock::new(Utc::now());
    let sampler = match seed {
        Some(seed) => RandSampler::seeded(seed),
        None => RandSampler::from_entropy(),
    };
    let mut sim = build(config, industry, Box::new(clock.clone()), Box::new(sampler))?;
    let step = sim.settings().tick_interval();
    for _ in 0..ticks {
        clock.advance(step);
        sim.advance();
    }
    info!(industry = %industry, ticks, records = sim.history().len(), "simulation complete");
    Ok(sim)
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_stream(config: Option<&Path>, industry: Industry, seconds: u64) -> PrxResult<()> {
    let sim = build(
        config,
        industry,
        Box::new(SystemClock),
        Box::new(RandSampler::from_entropy()),
    )?;
    let handle = SimulatorHandle::new(sim);

    println!("=== Live stream: {} for {}s ===", industry, seconds);
    println!();

    let mut seen: HashSet<String> = HashSet::new();
    // Seeded history counts as already shown.
    for record in handle.snapshot()?.history {
        seen.insert(record.id.0);
    }

    let mut driver = LiveDriver::spawn(handle.clone(), StdDuration::from_millis(50));
    let deadline = std::time::Instant::now() + StdDuration::from_secs(seconds);
    while std::time::Instant::now() < deadline {
        std::thread::sleep(StdDuration::from_millis(200));
        let snapshot = handle.snapshot()?;
        for record in snapshot.history.iter().rev() {
            if seen.insert(record.id.0.clone()) {
                print_record(record);
            }
        }
    }
    driver.stop();

    println!();
    print_stats(&handle.stats()?);
    Ok(())
}

fn run_snapshot(
    config: Option<&Path>,
    industry: Industry,
    ticks: u32,
    seed: Option<u64>,
    json: bool,
) -> PrxResult<()> {
    let sim = simulate(config, industry, ticks, seed)?;
    let snapshot = Snapshot::of(&sim);

    if json {
        let text = serde_json::to_string_pretty(&snapshot).map_err(|e| PrxError::StateUnavailable {
            reason: format!("failed to serialize snapshot: {}", e),
        })?;
        println!("{}", text);
        return Ok(());
    }

    println!("=== Snapshot: {} after {} ticks ===", sim.scenario().label, ticks);
    println!();
    print_stats(&snapshot.stats);
    let baseline = snapshot.stats.combined_with(&sim.scenario().stats_24h);
    println!(
        "  24h + live:    {} total, {}% blocked, {} escalated, {:.1}ms avg",
        baseline.total,
        baseline.block_rate(),
        baseline.escalated,
        baseline.avg_latency
    );
    println!();
    println!("  Enforcement breakdown (live):");
    for (outcome, count, share) in snapshot.stats.breakdown() {
        println!(
            "    {:<9} {:>4}  {:>5.1}%  {}",
            outcome.as_str(),
            count,
            share * 100.0,
            "#".repeat((share * 40.0).round() as usize)
        );
    }
    println!();
    println!("  Most recent decisions:");
    for record in snapshot.history.iter().take(10) {
        print_record(record);
    }
    println!();
    println!("  Pending escalations: {}", snapshot.pending.len());
    println!("  Evicted from history: {}", snapshot.evicted);
    Ok(())
}

fn run_audit(config: Option<&Path>, industry: Industry, ticks: u32, filter: HistoryFilter) -> PrxResult<()> {
    let sim = simulate(config, industry, ticks, None)?;
    let hits = filter.apply(sim.history());

    println!(
        "=== Audit log: {} (outcome = {}, search = {:?}) ===",
        sim.scenario().label,
        filter.outcome.label(),
        filter.search()
    );
    println!();
    if hits.is_empty() {
        println!("  No records match.");
    }
    for record in &hits {
        print_record(record);
        if let Some(resolution) = &record.resolution {
            println!(
                "      resolved by {} at {}",
                resolution.resolved_by,
                resolution.resolved_at.format("%H:%M:%S")
            );
        }
    }
    println!();
    println!("  {} of {} records", hits.len(), sim.history().len());
    Ok(())
}

fn run_policies(config: Option<&Path>, industry: Industry) -> PrxResult<()> {
    let table = load_table(config)?;
    let catalog = BuiltinCatalog::new()?;
    let scenario = catalog.scenario(industry);

    println!("=== Policies: {} ===", scenario.label);
    println!();
    for policy in &scenario.policies {
        let route = table.route(&policy.id);
        println!(
            "  {:<26} {:<10} {}",
            policy.name,
            policy.effect.as_str(),
            if policy.active { "ACTIVE" } else { "INACTIVE" }
        );
        println!("    {}", policy.description);
        println!("    Conditions:   {}", policy.conditions.join("; "));
        println!("    Escalates to: {} (SLA {}m)", route.escalate_to, route.sla_minutes);
        println!();
        for line in policy.dsl.lines() {
            println!("      {}", line);
        }
        println!();
    }
    Ok(())
}

fn run_escalations(config: Option<&Path>, industry: Industry, ticks: u32) -> PrxResult<()> {
    let sim = simulate(config, industry, ticks, None)?;

    println!("=== Pending escalations: {} ===", sim.scenario().label);
    println!();
    if sim.pending().len() == 0 {
        println!("  None pending.");
    }
    for pending in sim.pending() {
        let countdown = sim.countdown(pending);
        println!(
            "  [{:>7}] {:<22} {:<18} → {} (SLA {}m)",
            countdown.label(),
            pending.action_type,
            pending.agent,
            pending.escalate_to,
            pending.sla_minutes
        );
        println!("            policy {}  trace {}", pending.policy_matched, pending.trace_id);
    }

    let timeouts = sim
        .history()
        .filter(|r| r.resolution.as_ref().is_some_and(|res| res.resolved_by == ResolutionKind::TIMEOUT_RESOLVER))
        .count();
    println!();
    println!("  Timed out so far: {}", timeouts);
    Ok(())
}

// ── Output ────────────────────────────────────────────────────────────────────

fn print_record(record: &DecisionRecord) {
    println!(
        "  {}  {:<9} {:<22} {:<18} {:<24} {:>4.1}ms  {}",
        record.timestamp.format("%H:%M:%S"),
        record.outcome.as_str(),
        record.action_type,
        record.agent,
        record.policy_matched,
        record.latency_ms,
        record.trace_id
    );
}

fn print_stats(stats: &SimStats) {
    println!(
        "  Live:          {} total, {} allowed, {} blocked, {} escalated, {:.1}ms avg",
        stats.total, stats.allowed, stats.blocked, stats.escalated, stats.avg_latency
    );
}
