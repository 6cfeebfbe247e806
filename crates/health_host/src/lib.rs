//! Bevy host adapter for the health arbiter.
//!
//! Owns the mutable health records, filters for the local player and turns
//! arbitration results into events. All decisions are delegated to
//! `health_core`.

mod components;
mod events;
mod settings;
mod systems;

use bevy::prelude::*;

pub use components::{LocalPlayer, PlayerHealth};
pub use events::{DamageBlocked, DamageRequest, HealRequest, HealthChanged, SetHealthRequest};
pub use settings::{HealthSettings, CONFIG_PATH_ENV};

/// Registers settings, events and the fixed-step health systems.
pub struct HealthArbiterPlugin;

impl Plugin for HealthArbiterPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<HealthSettings>() {
            app.insert_resource(HealthSettings::from_env());
        }

        app.add_event::<DamageRequest>()
            .add_event::<HealRequest>()
            .add_event::<SetHealthRequest>()
            .add_event::<HealthChanged>()
            .add_event::<DamageBlocked>()
            .add_systems(
                FixedUpdate,
                (
                    systems::reconcile_spawned,
                    systems::apply_damage_requests,
                    systems::apply_heal_requests,
                    systems::apply_set_health_requests,
                    systems::tick_health,
                )
                    .chain(),
            );
    }
}
