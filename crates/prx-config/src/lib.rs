//! # prx-config
//!
//! TOML configuration for the PRX simulator: escalation routing plus the
//! optional `[simulator]` settings table.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use prx_config::RoutingTable;
//!
//! let table = RoutingTable::builtin()?;
//! let settings = table.settings().clone();
//! // Pass `settings` and `Box::new(table)` to `prx_core::Simulator::new(...)`.
//! ```
//!
//! ## Route matching
//!
//! Each route names one policy exactly. Escalations raised under a policy
//! with no route go to `default_reviewer` with `default_sla_minutes`.

pub mod route;
pub mod table;

pub use route::{RouteRule, RoutingConfig};
pub use table::RoutingTable;

// ── Tests ─────────────────────────────────────────────────────────────────────
