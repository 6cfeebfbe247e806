use serde::{Deserialize, Serialize};

/// Plain read/write access to a host-owned health record.
pub trait HealthRecord {
    fn health(&self) -> i32;
    fn set_health(&mut self, value: i32);
    fn max_health(&self) -> i32;
    fn set_max_health(&mut self, value: i32);
}

/// Snapshot of one player's health as handed to the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHealthState {
    pub health: i32,
    pub max_health: i32,
}

impl PlayerHealthState {
    pub fn new(health: i32, max_health: i32) -> Self {
        Self { health, max_health }
    }

    pub fn full(max_health: i32) -> Self {
        Self::new(max_health, max_health)
    }

    pub fn from_record(record: &impl HealthRecord) -> Self {
        Self::new(record.health(), record.max_health())
    }

    pub fn write_to(&self, record: &mut impl HealthRecord) {
        record.set_max_health(self.max_health);
        record.set_health(self.health);
    }

    /// Repairs values the host should never hand over: `max_health < 1`
    /// and `health < 0`.
    pub fn normalized(self) -> Self {
        Self {
            health: self.health.max(0),
            max_health: self.max_health.max(1),
        }
    }
}

impl HealthRecord for PlayerHealthState {
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
