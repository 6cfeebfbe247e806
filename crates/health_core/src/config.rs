use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const MAX_HEALTH_RANGE: RangeInclusive<i32> = 1..=10_000_000;
pub const REGEN_PER_TICK_RANGE: RangeInclusive<i32> = 0..=1000;
pub const ONE_SHOT_MIN_HEALTH_RANGE: RangeInclusive<i32> = 1..=1000;
pub const MAX_SINGLE_DAMAGE_RANGE: RangeInclusive<i32> = 0..=10_000;

const DEFAULT_MAX_HEALTH: i32 = 10_000;
const DEFAULT_GOD_MODE: bool = true;
const DEFAULT_REGEN_PER_TICK: i32 = 0;
const DEFAULT_ONE_SHOT_PROTECTION: bool = true;
const DEFAULT_ONE_SHOT_MIN_HEALTH: i32 = 1;
const DEFAULT_MAX_SINGLE_DAMAGE: i32 = 500;

/// Live settings consulted by the arbiter on every call.
///
/// Fields are private so every mutation goes through a range-checked
/// setter; there is no path that clamps an out-of-range value into place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile", into = "ConfigFile")]
pub struct HealthConfig {
    max_health: i32,
    god_mode: bool,
    regen_per_tick: i32,
    one_shot_protection: bool,
    one_shot_min_health: i32,
    max_single_damage: i32,
    enable_logging: bool,
    show_debug_info: bool,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_health: DEFAULT_MAX_HEALTH,
            god_mode: DEFAULT_GOD_MODE,
            regen_per_tick: DEFAULT_REGEN_PER_TICK,
            one_shot_protection: DEFAULT_ONE_SHOT_PROTECTION,
            one_shot_min_health: DEFAULT_ONE_SHOT_MIN_HEALTH,
            max_single_damage: DEFAULT_MAX_SINGLE_DAMAGE,
            enable_logging: false,
            show_debug_info: false,
        }
    }
}

impl HealthConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&data).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn god_mode(&self) -> bool {
        self.god_mode
    }

    pub fn regen_per_tick(&self) -> i32 {
        self.regen_per_tick
    }

    pub fn one_shot_protection(&self) -> bool {
        self.one_shot_protection
    }

    pub fn one_shot_min_health(&self) -> i32 {
        self.one_shot_min_health
    }

    /// `0` means unlimited.
    pub fn max_single_damage(&self) -> i32 {
        self.max_single_damage
    }

    pub fn enable_logging(&self) -> bool {
        self.enable_logging
    }

    pub fn show_debug_info(&self) -> bool {
        self.show_debug_info
    }

    pub fn set_max_health(&mut self, value: i32) -> Result<(), ConfigError> {
        self.max_health = checked("max_health", value, &MAX_HEALTH_RANGE)?;
        Ok(())
    }

    pub fn set_god_mode(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.god_mode = enabled;
        Ok(())
    }

    pub fn set_regen_per_tick(&mut self, value: i32) -> Result<(), ConfigError> {
        self.regen_per_tick = checked("regen_per_tick", value, &REGEN_PER_TICK_RANGE)?;
        Ok(())
    }

    pub fn set_one_shot_protection(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.one_shot_protection = enabled;
        Ok(())
    }

    pub fn set_one_shot_min_health(&mut self, value: i32) -> Result<(), ConfigError> {
        self.one_shot_min_health =
            checked("one_shot_min_health", value, &ONE_SHOT_MIN_HEALTH_RANGE)?;
        Ok(())
    }

    pub fn set_max_single_damage(&mut self, value: i32) -> Result<(), ConfigError> {
        self.max_single_damage = checked("max_single_damage", value, &MAX_SINGLE_DAMAGE_RANGE)?;
        Ok(())
    }

    pub fn set_enable_logging(&mut self, enabled: bool) {
        self.enable_logging = enabled;
    }

    pub fn set_show_debug_info(&mut self, enabled: bool) {
        self.show_debug_info = enabled;
    }
}

fn checked(field: &'static str, value: i32, range: &RangeInclusive<i32>) -> Result<i32, ConfigError> {
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value.into(),
            min: (*range.start()).into(),
            max: (*range.end()).into(),
        })
    }
}

/// On-disk layout, grouped the same way the settings are presented to players.
#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    #[serde(default)]
    general: GeneralSection,
    #[serde(default)]
    gameplay: GameplaySection,
    #[serde(default)]
    ui: UiSection,
    #[serde(default)]
    protection: ProtectionSection,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct GeneralSection {
    #[serde(default)]
    enable_logging: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct GameplaySection {
    #[serde(default)]
    god_mode: Option<bool>,
    #[serde(default)]
    max_health: Option<i32>,
    #[serde(default)]
    regen_per_tick: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct UiSection {
    #[serde(default)]
    show_debug_info: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ProtectionSection {
    #[serde(default)]
    one_shot_protection: Option<bool>,
    #[serde(default)]
    one_shot_min_health: Option<i32>,
    #[serde(default)]
    max_single_damage: Option<i32>,
}

impl TryFrom<ConfigFile> for HealthConfig {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        let mut cfg = HealthConfig::default();
        if let Some(enabled) = file.general.enable_logging {
            cfg.set_enable_logging(enabled);
        }
        if let Some(enabled) = file.gameplay.god_mode {
            cfg.set_god_mode(enabled)?;
        }
        if let Some(value) = file.gameplay.max_health {
            cfg.set_max_health(value)?;
        }
        if let Some(value) = file.gameplay.regen_per_tick {
            cfg.set_regen_per_tick(value)?;
        }
        if let Some(enabled) = file.ui.show_debug_info {
            cfg.set_show_debug_info(enabled);
        }
        if let Some(enabled) = file.protection.one_shot_protection {
            cfg.set_one_shot_protection(enabled)?;
        }
        if let Some(value) = file.protection.one_shot_min_health {
            cfg.set_one_shot_min_health(value)?;
        }
        if let Some(value) = file.protection.max_single_damage {
            cfg.set_max_single_damage(value)?;
        }
        Ok(cfg)
    }
}

impl From<HealthConfig> for ConfigFile {
    fn from(cfg: HealthConfig) -> Self {
        Self {
            general: GeneralSection {
                enable_logging: Some(cfg.enable_logging),
            },
            gameplay: GameplaySection {
                god_mode: Some(cfg.god_mode),
                max_health: Some(cfg.max_health),
                regen_per_tick: Some(cfg.regen_per_tick),
            },
            ui: UiSection {
                show_debug_info: Some(cfg.show_debug_info),
            },
            protection: ProtectionSection {
                one_shot_protection: Some(cfg.one_shot_protection),
                one_shot_min_health: Some(cfg.one_shot_min_health),
                max_single_damage: Some(cfg.max_single_damage),
            },
        }
    }
}
