use bevy::prelude::*;
use health_core::{arbitrate_record, reconcile_max_health, HealthEvent, PlayerHealthState};
use tracing::debug;

use crate::components::{LocalPlayer, PlayerHealth};
use crate::events::{DamageBlocked, DamageRequest, HealRequest, HealthChanged, SetHealthRequest};
use crate::settings::HealthSettings;

type LocalHealth<'w, 's> = Query<'w, 's, &'static mut PlayerHealth, With<LocalPlayer>>;

/// Applies the configured ceiling as soon as a local player spawns.
pub(crate) fn reconcile_spawned(
    settings: Res<HealthSettings>,
    mut players: Query<(Entity, &mut PlayerHealth), (Added<PlayerHealth>, With<LocalPlayer>)>,
) {
    for (entity, mut health) in players.iter_mut() {
        let current = PlayerHealthState::new(health.health, health.max_health);
        let reconciled = reconcile_max_health(current, settings.config());
        if reconciled != current {
            health.max_health = reconciled.max_health;
            if settings.logging() {
                debug!(
                    target: "health_host.spawn",
                    ?entity,
                    max_health = reconciled.max_health,
                    "max health set"
                );
            }
        }
    }
}

pub(crate) fn apply_damage_requests(
    settings: Res<HealthSettings>,
    mut requests: EventReader<DamageRequest>,
    mut players: LocalHealth,
    mut changed: EventWriter<HealthChanged>,
    mut blocked: EventWriter<DamageBlocked>,
) {
    for request in requests.read() {
        if request.amount <= 0 {
            continue;
        }
        let Ok(mut health) = players.get_mut(request.target) else {
            continue;
        };
        let result = arbitrate_record(
            &mut *health,
            settings.config(),
            HealthEvent::Damage {
                amount: request.amount,
            },
        );
        if settings.logging() {
            debug!(
                target: "health_host.damage",
                entity = ?request.target,
                incoming = request.amount,
                applied = result.applied_damage,
                health = result.new_health,
                "damage arbitrated"
            );
        }
        if result.damage_blocked {
            blocked.send(DamageBlocked {
                entity: request.target,
                incoming: request.amount,
            });
        }
        if result.health_changed || result.max_health_changed {
            changed.send(HealthChanged {
                entity: request.target,
                result,
            });
        }
    }
}

pub(crate) fn apply_heal_requests(
    settings: Res<HealthSettings>,
    mut requests: EventReader<HealRequest>,
    mut players: LocalHealth,
    mut changed: EventWriter<HealthChanged>,
) {
    for request in requests.read() {
        if request.amount <= 0 {
            continue;
        }
        let Ok(mut health) = players.get_mut(request.target) else {
            continue;
        };
        let result = arbitrate_record(
            &mut *health,
            settings.config(),
            HealthEvent::Heal {
                amount: request.amount,
            },
        );
        if result.health_changed || result.max_health_changed {
            changed.send(HealthChanged {
                entity: request.target,
                result,
            });
        }
    }
}

pub(crate) fn apply_set_health_requests(
    settings: Res<HealthSettings>,
    mut requests: EventReader<SetHealthRequest>,
    mut players: LocalHealth,
) {
    for request in requests.read() {
        let Ok(mut health) = players.get_mut(request.target) else {
            if settings.logging() {
                debug!(target: "health_host.api", entity = ?request.target, "player health not found");
            }
            continue;
        };
        health.health = request.health.clamp(0, health.max_health.max(1));
        if settings.logging() {
            debug!(
                target: "health_host.api",
                entity = ?request.target,
                health = health.health,
                "player health set"
            );
        }
    }
}

pub(crate) fn tick_health(
    settings: Res<HealthSettings>,
    mut players: Query<(Entity, &mut PlayerHealth), With<LocalPlayer>>,
    mut changed: EventWriter<HealthChanged>,
) {
    for (entity, mut health) in players.iter_mut() {
        let result = arbitrate_record(&mut *health, settings.config(), HealthEvent::Tick);
        if result.health_changed || result.max_health_changed {
            changed.send(HealthChanged { entity, result });
        }
    }
}
