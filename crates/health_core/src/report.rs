use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::arbiter::{arbitrate, ArbitrationResult, HealthEvent};
use crate::config::HealthConfig;
use crate::state::PlayerHealthState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub id: String,
    pub timestamp: String,
    pub config: HealthConfig,
    pub initial: PlayerHealthState,
    pub final_state: PlayerHealthState,
    pub summary: ReportSummary,
    pub steps: Vec<StepRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub index: usize,
    pub event: HealthEvent,
    pub result: ArbitrationResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub ticks: usize,
    pub hits: usize,
    pub heals: usize,
    pub incoming_damage: i64,
    pub applied_damage: i64,
    pub blocked_hits: usize,
    pub lowest_health: i32,
}

impl ReportSummary {
    fn record(&mut self, event: HealthEvent, result: &ArbitrationResult) {
        match event {
            HealthEvent::Tick => self.ticks += 1,
            HealthEvent::Damage { amount } => {
                self.hits += 1;
                self.incoming_damage += i64::from(amount.max(0));
                self.applied_damage += i64::from(result.applied_damage);
                if result.damage_blocked {
                    self.blocked_hits += 1;
                }
            }
            HealthEvent::Heal { .. } => self.heals += 1,
        }
        self.lowest_health = self.lowest_health.min(result.new_health);
    }
}

/// Replays `events` against `initial` and collects every arbitration step.
pub fn run_simulation(
    id: impl Into<String>,
    config: &HealthConfig,
    initial: PlayerHealthState,
    events: &[HealthEvent],
) -> SimulationReport {
    let mut state = initial;
    let mut summary = ReportSummary {
        lowest_health: initial.health,
        ..Default::default()
    };
    let steps = events
        .iter()
        .enumerate()
        .map(|(index, &event)| {
            let result = arbitrate(&mut state, config, event);
            summary.record(event, &result);
            StepRecord {
                index,
                event,
                result,
            }
        })
        .collect();

    SimulationReport {
        id: id.into(),
        timestamp: Utc::now().to_rfc3339(),
        config: config.clone(),
        initial,
        final_state: state,
        summary,
        steps,
    }
}
