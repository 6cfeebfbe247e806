use bevy::prelude::*;
use health_core::HealthRecord;

/// Health record attached to a player entity.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerHealth {
    pub health: i32,
    pub max_health: i32,
}

impl PlayerHealth {
    pub fn new(health: i32, max_health: i32) -> Self {
        Self { health, max_health }
    }
}

impl HealthRecord for PlayerHealth {
    fn health(&self) -> i32 {
        self.health
    }

    fn set_health(&mut self, value: i32) {
        self.health = value;
    }

    fn max_health(&self) -> i32 {
        self.max_health
    }

    fn set_max_health(&mut self, value: i32) {
        self.max_health = value;
    }
}

/// Marks the entity controlled on this machine. Remote players are never
/// arbitrated here; their owner does that.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct LocalPlayer;
