//! Digital twin physics core for solar + battery energy sites.
//!
//! A small coupled simulation of solar generation, battery electro-thermal
//! state, and state-of-health degradation, advanced in discrete externally
//! driven ticks through [`sim::SimulationCore::run_step`].

pub mod config;
pub mod insights;
/// Solar, load, battery, and SOH physics models.
pub mod physics;
/// Orchestration: tick types, the simulation core, and the throughput ledger.
pub mod sim;
