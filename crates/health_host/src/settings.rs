use std::path::Path;

use bevy::prelude::*;
use health_core::{ConfigError, HealthConfig};
use tracing::{info, warn};

pub const CONFIG_PATH_ENV: &str = "HEALTH_CONFIG";

/// Live arbitration settings shared by every health system.
///
/// The setters mirror the mod API other plugins call at runtime: they never
/// panic and report rejection as `false`, leaving the prior value in place.
#[derive(Resource, Clone, Debug, Default, PartialEq, Eq)]
pub struct HealthSettings {
    config: HealthConfig,
}

impl HealthSettings {
    pub fn new(config: HealthConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_PATH_ENV) else {
            return Self::default();
        };
        match HealthConfig::from_path(Path::new(&path)) {
            Ok(config) => {
                if config.enable_logging() {
                    info!(
                        target: "health_host.settings",
                        path = %path,
                        max_health = config.max_health(),
                        god_mode = config.god_mode(),
                        regen_per_tick = config.regen_per_tick(),
                        "configuration loaded"
                    );
                }
                Self::new(config)
            }
            Err(err) => {
                warn!(target: "health_host.settings", path = %path, "falling back to defaults: {err:#}");
                Self::default()
            }
        }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.config
    }

    pub fn max_health(&self) -> i32 {
        self.config.max_health()
    }

    pub fn set_max_health(&mut self, value: i32) -> bool {
        self.update("max_health", value, |cfg| cfg.set_max_health(value))
    }

    pub fn god_mode(&self) -> bool {
        self.config.god_mode()
    }

    pub fn set_god_mode(&mut self, enabled: bool) -> bool {
        self.update("god_mode", enabled, |cfg| cfg.set_god_mode(enabled))
    }

    pub fn health_regen_rate(&self) -> i32 {
        self.config.regen_per_tick()
    }

    pub fn set_health_regen_rate(&mut self, value: i32) -> bool {
        self.update("regen_per_tick", value, |cfg| cfg.set_regen_per_tick(value))
    }

    pub fn one_shot_protection(&self) -> bool {
        self.config.one_shot_protection()
    }

    pub fn set_one_shot_protection(&mut self, enabled: bool) -> bool {
        self.update("one_shot_protection", enabled, |cfg| {
            cfg.set_one_shot_protection(enabled)
        })
    }

    pub fn one_shot_min_health(&self) -> i32 {
        self.config.one_shot_min_health()
    }

    pub fn set_one_shot_min_health(&mut self, value: i32) -> bool {
        self.update("one_shot_min_health", value, |cfg| {
            cfg.set_one_shot_min_health(value)
        })
    }

    pub fn max_single_damage(&self) -> i32 {
        self.config.max_single_damage()
    }

    pub fn set_max_single_damage(&mut self, value: i32) -> bool {
        self.update("max_single_damage", value, |cfg| {
            cfg.set_max_single_damage(value)
        })
    }

    pub fn set_enable_logging(&mut self, enabled: bool) {
        self.config.set_enable_logging(enabled);
    }

    pub fn show_debug_info(&self) -> bool {
        self.config.show_debug_info()
    }

    pub fn set_show_debug_info(&mut self, enabled: bool) {
        self.config.set_show_debug_info(enabled);
    }

    pub(crate) fn logging(&self) -> bool {
        self.config.enable_logging()
    }

    fn update<V: std::fmt::Display>(
        &mut self,
        field: &str,
        value: V,
        apply: impl FnOnce(&mut HealthConfig) -> Result<(), ConfigError>,
    ) -> bool {
        match apply(&mut self.config) {
            Ok(()) => {
                if self.logging() {
                    info!(target: "health_host.settings", "{field} set to {value}");
                }
                true
            }
            Err(err) => {
                if self.logging() {
                    warn!(target: "health_host.settings", "rejected setting: {err}");
                }
                false
            }
        }
    }
}
