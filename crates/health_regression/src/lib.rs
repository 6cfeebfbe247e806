//! Helpers for deterministic regression tests.

use health_core::{arbitrate, ArbitrationResult, HealthConfig, HealthEvent, PlayerHealthState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

pub const DEFAULT_SEED: u64 = 42;

/// Reproducible mix of ticks, hits of widely varying size and small heals.
pub fn random_script(seed: u64, len: usize) -> Vec<HealthEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| match rng.gen_range(0..10) {
            0..=3 => HealthEvent::Tick,
            4..=7 => HealthEvent::Damage {
                amount: if rng.gen_bool(0.2) {
                    rng.gen_range(1_000..=50_000)
                } else {
                    rng.gen_range(1..=120)
                },
            },
            _ => HealthEvent::Heal {
                amount: rng.gen_range(1..=40),
            },
        })
        .collect()
}

pub fn run_events(
    config: &HealthConfig,
    initial: PlayerHealthState,
    events: &[HealthEvent],
) -> Vec<ArbitrationResult> {
    let mut state = initial;
    events
        .iter()
        .map(|&event| arbitrate(&mut state, config, event))
        .collect()
}

/// Compact trace used in snapshots.
pub fn trace(events: &[HealthEvent], results: &[ArbitrationResult]) -> serde_json::Value {
    let steps: Vec<_> = events
        .iter()
        .zip(results)
        .map(|(event, result)| {
            json!({
                "event": event,
                "applied": result.applied_damage,
                "health": result.new_health,
                "blocked": result.damage_blocked,
            })
        })
        .collect();
    json!({ "steps": steps })
}
