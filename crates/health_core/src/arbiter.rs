//! Health-state arbitration.
//!
//! Every operation takes the live [`HealthConfig`] by reference and re-reads
//! it on each call, so a settings change takes effect on the very next event.
//! Each call first repairs malformed state, reconciles max health against
//! the configured ceiling and clamps health into `[0, max_health]`; only then
//! does the event-specific rule run.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HealthConfig;
use crate::state::{HealthRecord, PlayerHealthState};

/// A discrete event the host forwards to the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthEvent {
    Tick,
    Damage { amount: i32 },
    Heal { amount: i32 },
}

/// Outcome of one arbitration call. The caller decides what to emit from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArbitrationResult {
    pub new_health: i32,
    pub new_max_health: i32,
    /// Damage actually subtracted after mitigation.
    pub applied_damage: i32,
    pub health_changed: bool,
    pub max_health_changed: bool,
    /// A positive hit arrived and none of it was applied.
    pub damage_blocked: bool,
}

impl ArbitrationResult {
    fn between(
        before: PlayerHealthState,
        after: PlayerHealthState,
        applied_damage: i32,
        damage_blocked: bool,
    ) -> Self {
        Self {
            new_health: after.health,
            new_max_health: after.max_health,
            applied_damage,
            health_changed: before.health != after.health,
            max_health_changed: before.max_health != after.max_health,
            damage_blocked,
        }
    }

    pub fn state(&self) -> PlayerHealthState {
        PlayerHealthState::new(self.new_health, self.new_max_health)
    }
}

/// Forces the stored ceiling to the configured one. Health is left alone.
pub fn reconcile_max_health(state: PlayerHealthState, config: &HealthConfig) -> PlayerHealthState {
    if state.max_health == config.max_health() {
        state
    } else {
        PlayerHealthState {
            max_health: config.max_health(),
            ..state
        }
    }
}

/// Runs the shared preamble and returns the state as it was handed in.
fn prepare(state: &mut PlayerHealthState, config: &HealthConfig) -> PlayerHealthState {
    let before = *state;
    let mut next = reconcile_max_health(state.normalized(), config);
    next.health = next.health.min(next.max_health);
    *state = next;
    before
}

/// One simulation step: god mode restores to full, otherwise regen applies.
pub fn tick(state: &mut PlayerHealthState, config: &HealthConfig) -> ArbitrationResult {
    let before = prepare(state, config);

    if config.god_mode() {
        if state.health < state.max_health {
            debug!(
                target: "health_core.arbiter",
                from = state.health,
                to = state.max_health,
                "god mode restored health"
            );
            state.health = state.max_health;
        }
    } else if config.regen_per_tick() > 0 {
        let regen = config.regen_per_tick();
        let next = state.health.saturating_add(regen).min(state.max_health);
        if next != state.health {
            debug!(
                target: "health_core.arbiter",
                from = state.health,
                to = next,
                regen,
                "health regen"
            );
            state.health = next;
        }
    }

    ArbitrationResult::between(before, *state, 0, false)
}

pub fn apply_damage(
    state: &mut PlayerHealthState,
    config: &HealthConfig,
    incoming: i32,
) -> ArbitrationResult {
    let before = prepare(state, config);

    if incoming <= 0 {
        return ArbitrationResult::between(before, *state, 0, false);
    }

    if config.god_mode() {
        debug!(target: "health_core.arbiter", incoming, "god mode blocked damage");
        return ArbitrationResult::between(before, *state, 0, true);
    }

    let applied = if config.one_shot_protection() {
        mitigate_one_shot(state.health, incoming, config)
    } else {
        incoming
    };
    state.health = state.health.saturating_sub(applied).max(0);

    ArbitrationResult::between(before, *state, applied, applied == 0)
}

pub fn apply_heal(
    state: &mut PlayerHealthState,
    config: &HealthConfig,
    amount: i32,
) -> ArbitrationResult {
    let before = prepare(state, config);
    if amount > 0 {
        state.health = state.health.saturating_add(amount).min(state.max_health);
    }
    ArbitrationResult::between(before, *state, 0, false)
}

/// Damage that a single protected hit is allowed to deal.
///
/// The hit is first capped by `max_single_damage` (0 = no cap). A hit that
/// would leave health strictly between zero and the floor is trimmed to land
/// exactly on the floor; a hit that would leave zero or less is absorbed
/// entirely. The result is never negative, so a player already at or under
/// the floor takes nothing.
pub fn mitigate_one_shot(current_health: i32, incoming: i32, config: &HealthConfig) -> i32 {
    if incoming <= 0 {
        return 0;
    }

    let cap = config.max_single_damage();
    let damage = if cap > 0 && incoming > cap {
        cap
    } else {
        incoming
    };

    let floor = config.one_shot_min_health();
    let health_after = current_health.saturating_sub(damage);
    let applied = if health_after > 0 && health_after < floor {
        (current_health - floor).max(0)
    } else if health_after <= 0 {
        0
    } else {
        damage
    };

    if applied != incoming {
        debug!(
            target: "health_core.arbiter",
            incoming,
            applied,
            current_health,
            floor,
            "one-shot protection mitigated hit"
        );
    }
    applied
}

pub fn arbitrate(
    state: &mut PlayerHealthState,
    config: &HealthConfig,
    event: HealthEvent,
) -> ArbitrationResult {
    match event {
        HealthEvent::Tick => tick(state, config),
        HealthEvent::Damage { amount } => apply_damage(state, config, amount),
        HealthEvent::Heal { amount } => apply_heal(state, config, amount),
    }
}

/// Reads a host record, arbitrates, and writes back only the fields that moved.
pub fn arbitrate_record(
    record: &mut impl HealthRecord,
    config: &HealthConfig,
    event: HealthEvent,
) -> ArbitrationResult {
    let mut state = PlayerHealthState::from_record(record);
    let result = arbitrate(&mut state, config, event);
    if result.max_health_changed {
        record.set_max_health(result.new_max_health);
    }
    if result.health_changed {
        record.set_health(result.new_health);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HealthConfig {
        let mut cfg = HealthConfig::default();
        cfg.set_god_mode(false).unwrap();
        cfg.set_one_shot_protection(false).unwrap();
        cfg.set_max_single_damage(0).unwrap();
        cfg.set_max_health(100).unwrap();
        cfg
    }

    fn protected(min_health: i32, max_single: i32) -> HealthConfig {
        let mut cfg = config();
        cfg.set_one_shot_protection(true).unwrap();
        cfg.set_one_shot_min_health(min_health).unwrap();
        cfg.set_max_single_damage(max_single).unwrap();
        cfg
    }

    #[test]
    fn reconcile_overwrites_max_and_keeps_health() {
        let cfg = config();
        let state = reconcile_max_health(PlayerHealthState::new(30, 75), &cfg);
        assert_eq!(PlayerHealthState::new(30, 100), state);
        assert_eq!(state, reconcile_max_health(state, &cfg));
    }

    #[test]
    fn god_mode_tick_is_a_full_heal() {
        let mut cfg = config();
        cfg.set_god_mode(true).unwrap();
        cfg.set_regen_per_tick(1).unwrap();
        let mut state = PlayerHealthState::new(40, 100);
        let result = tick(&mut state, &cfg);
        assert_eq!(100, state.health);
        assert!(result.health_changed);
        assert!(!result.max_health_changed);
    }

    #[test]
    fn god_mode_tick_at_full_reports_no_change() {
        let mut cfg = config();
        cfg.set_god_mode(true).unwrap();
        let mut state = PlayerHealthState::full(100);
        assert!(!tick(&mut state, &cfg).health_changed);
    }

    #[test]
    fn regen_saturates_at_max() {
        let mut cfg = config();
        cfg.set_max_health(10_000).unwrap();
        cfg.set_regen_per_tick(50).unwrap();
        let mut state = PlayerHealthState::new(9990, 10_000);
        let result = tick(&mut state, &cfg);
        assert_eq!(10_000, result.new_health);
        assert_eq!(10_000, state.health);
    }

    #[test]
    fn tick_without_regen_is_a_noop() {
        let cfg = config();
        let mut state = PlayerHealthState::new(40, 100);
        let result = tick(&mut state, &cfg);
        assert_eq!(40, state.health);
        assert!(!result.health_changed);
    }

    #[test]
    fn tick_reconciles_max_health_first() {
        let mut cfg = config();
        cfg.set_regen_per_tick(10).unwrap();
        let mut state = PlayerHealthState::new(95, 95);
        let result = tick(&mut state, &cfg);
        assert!(result.max_health_changed);
        assert_eq!(PlayerHealthState::new(100, 100), state);
    }

    #[test]
    fn shrinking_ceiling_clamps_health() {
        let mut cfg = config();
        cfg.set_max_health(50).unwrap();
        let mut state = PlayerHealthState::full(100);
        let result = tick(&mut state, &cfg);
        assert_eq!(PlayerHealthState::full(50), state);
        assert!(result.health_changed);
    }

    #[test]
    fn malformed_state_is_repaired() {
        let cfg = config();
        let mut state = PlayerHealthState::new(-20, 0);
        let result = apply_heal(&mut state, &cfg, 5);
        assert_eq!(PlayerHealthState::new(5, 100), state);
        assert!(result.max_health_changed);
    }

    #[test]
    fn god_mode_blocks_damage_regardless_of_protection() {
        let mut cfg = protected(10, 20);
        cfg.set_god_mode(true).unwrap();
        let mut state = PlayerHealthState::new(40, 100);
        let result = apply_damage(&mut state, &cfg, 9999);
        assert_eq!(0, result.applied_damage);
        assert!(result.damage_blocked);
        assert_eq!(40, state.health);
    }

    #[test]
    fn unprotected_damage_can_kill() {
        let cfg = config();
        let mut state = PlayerHealthState::new(30, 100);
        let result = apply_damage(&mut state, &cfg, 45);
        assert_eq!(45, result.applied_damage);
        assert_eq!(0, state.health);
        assert!(!result.damage_blocked);
    }

    #[test]
    fn near_lethal_hit_lands_on_floor() {
        let cfg = protected(10, 0);
        let mut state = PlayerHealthState::full(100);
        let result = apply_damage(&mut state, &cfg, 95);
        assert_eq!(90, result.applied_damage);
        assert_eq!(10, state.health);
    }

    #[test]
    fn hit_from_floor_is_absorbed() {
        let cfg = protected(10, 0);
        let mut state = PlayerHealthState::new(10, 100);
        let result = apply_damage(&mut state, &cfg, 50);
        assert_eq!(0, result.applied_damage);
        assert!(result.damage_blocked);
        assert_eq!(10, state.health);
    }

    #[test]
    fn lethal_hit_is_absorbed_even_above_floor() {
        let cfg = protected(10, 0);
        let mut state = PlayerHealthState::new(60, 100);
        assert_eq!(0, apply_damage(&mut state, &cfg, 60).applied_damage);
        assert_eq!(60, state.health);
    }

    #[test]
    fn hit_leaving_health_above_floor_passes_through() {
        let cfg = protected(10, 0);
        let mut state = PlayerHealthState::new(60, 100);
        assert_eq!(50, apply_damage(&mut state, &cfg, 50).applied_damage);
        assert_eq!(10, state.health);
    }

    #[test]
    fn small_hit_below_floor_is_absorbed() {
        let cfg = protected(10, 0);
        let mut state = PlayerHealthState::new(5, 100);
        let result = apply_damage(&mut state, &cfg, 3);
        assert_eq!(0, result.applied_damage);
        assert_eq!(5, state.health);
    }

    #[test]
    fn single_hit_cap_clamps_before_floor_check() {
        let cfg = protected(1, 25);
        assert_eq!(25, mitigate_one_shot(100, 10_000, &cfg));
        assert_eq!(20, mitigate_one_shot(100, 20, &cfg));
        // Capped hit would still leave 0 < hp < floor.
        let cfg = protected(10, 25);
        assert_eq!(20, mitigate_one_shot(30, 500, &cfg));
    }

    #[test]
    fn non_positive_inputs_are_noops() {
        let cfg = config();
        let mut state = PlayerHealthState::new(50, 100);
        let damage = apply_damage(&mut state, &cfg, 0);
        let heal = apply_heal(&mut state, &cfg, -4);
        assert_eq!(50, state.health);
        assert!(!damage.damage_blocked);
        assert!(!heal.health_changed);
        assert_eq!(0, mitigate_one_shot(50, -1, &protected(1, 0)));
    }

    #[test]
    fn heal_saturates_and_ignores_protection() {
        let cfg = protected(10, 5);
        let mut state = PlayerHealthState::new(70, 100);
        let result = apply_heal(&mut state, &cfg, 80);
        assert_eq!(100, state.health);
        assert_eq!(0, result.applied_damage);
    }

    #[test]
    fn record_writes_back_only_changed_fields() {
        struct Probe {
            state: PlayerHealthState,
            health_writes: u32,
            max_writes: u32,
        }

        impl HealthRecord for Probe {
            fn health(&self) -> i32 {
                self.state.health
            }
            fn set_health(&mut self, value: i32) {
                self.health_writes += 1;
                self.state.health = value;
            }
            fn max_health(&self) -> i32 {
                self.state.max_health
            }
            fn set_max_health(&mut self, value: i32) {
                self.max_writes += 1;
                self.state.max_health = value;
            }
        }

        let cfg = config();
        let mut probe = Probe {
            state: PlayerHealthState::new(60, 80),
            health_writes: 0,
            max_writes: 0,
        };
        let result = arbitrate_record(&mut probe, &cfg, HealthEvent::Damage { amount: 15 });
        assert_eq!(15, result.applied_damage);
        assert_eq!(PlayerHealthState::new(45, 100), probe.state);
        assert_eq!((1, 1), (probe.health_writes, probe.max_writes));

        arbitrate_record(&mut probe, &cfg, HealthEvent::Tick);
        assert_eq!((1, 1), (probe.health_writes, probe.max_writes));
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let events: Vec<HealthEvent> = serde_json::from_str(
            r#"[{"kind":"tick"},{"kind":"damage","amount":95},{"kind":"heal","amount":3}]"#,
        )
        .unwrap();
        assert_eq!(
            vec![
                HealthEvent::Tick,
                HealthEvent::Damage { amount: 95 },
                HealthEvent::Heal { amount: 3 },
            ],
            events
        );
    }
}
