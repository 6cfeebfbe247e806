use bevy::prelude::*;
use health_core::ArbitrationResult;

#[derive(Event, Clone, Copy, Debug)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: i32,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct HealRequest {
    pub target: Entity,
    pub amount: i32,
}

/// Overwrites a player's health directly, clamped into `[0, max_health]`.
#[derive(Event, Clone, Copy, Debug)]
pub struct SetHealthRequest {
    pub target: Entity,
    pub health: i32,
}

/// Sent whenever arbitration moved health or max health.
#[derive(Event, Clone, Copy, Debug)]
pub struct HealthChanged {
    pub entity: Entity,
    pub result: ArbitrationResult,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct DamageBlocked {
    pub entity: Entity,
    pub incoming: i32,
}
