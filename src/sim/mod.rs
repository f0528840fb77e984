/// Per-site simulation orchestrator.
pub mod core;
/// Energy-throughput odometer.
pub mod ledger;
pub mod types;

pub use self::core::SimulationCore;
pub use ledger::ThroughputLedger;
pub use types::{IDLE_DEADBAND_KW, StepInput, StepResult, SystemState};
