//! Health-state arbitration for a host game's player-health record.
//!
//! The host owns the record and the settings; this crate only decides what
//! the record should look like after each tick, hit or heal.

pub mod arbiter;
pub mod config;
pub mod error;
pub mod report;
pub mod state;

pub use arbiter::{
    apply_damage, apply_heal, arbitrate, arbitrate_record, mitigate_one_shot,
    reconcile_max_health, tick, ArbitrationResult, HealthEvent,
};
pub use config::HealthConfig;
pub use error::ConfigError;
pub use report::{run_simulation, ReportSummary, SimulationReport, StepRecord};
pub use state::{HealthRecord, PlayerHealthState};
