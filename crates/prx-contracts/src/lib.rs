//! # prx-contracts
//!
//! Shared types for the PRX enforcement simulator.
//!
//! All crates in the workspace import from here. No simulation logic lives
//! in this crate, only data definitions and validation helpers.

pub mod error;
pub mod escalation;
pub mod outcome;
pub mod record;
pub mod scenario;
pub mod settings;
pub mod stats;
pub mod template;
