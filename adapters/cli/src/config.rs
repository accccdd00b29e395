//! Layered configuration: TOML file defaults overridden by command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result as AnyResult};
use motion_maze_core::MazeDimensions;
use motion_maze_world::{EffectDurations, WorldConfig};
use serde::Deserialize;

/// File consulted when `--config` is not given; a missing file is not an error.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "motion-maze.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) game: GameSettings,
    pub(crate) effects: EffectSettings,
    pub(crate) sensor: SensorSettings,
    pub(crate) status: StatusSettings,
    pub(crate) actuator: ActuatorSettings,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameSettings {
    pub(crate) seed: Option<u64>,
    pub(crate) tick_ms: u64,
    pub(crate) base_width: u32,
    pub(crate) base_height: u32,
    pub(crate) respect_walls: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: 16,
            base_width: 10,
            base_height: 10,
            respect_walls: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EffectSettings {
    pub(crate) haste_ms: u64,
    pub(crate) shield_ms: u64,
    pub(crate) slow_ms: u64,
}

impl Default for EffectSettings {
    fn default() -> Self {
        let durations = EffectDurations::default();
        Self {
            haste_ms: millis(durations.haste),
            shield_ms: millis(durations.shield),
            slow_ms: millis(durations.slow),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SensorSettings {
    pub(crate) enabled: bool,
    pub(crate) interval_ms: u64,
    pub(crate) fire_chance: f64,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 500,
            fire_chance: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StatusSettings {
    pub(crate) interval_secs: u64,
    pub(crate) json: bool,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            json: false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ActuatorSettings {
    /// Byte sink for panel commands; bytes are only logged when unset.
    pub(crate) device: Option<PathBuf>,
}

impl Settings {
    /// Loads settings from `path`, or from the default file when it exists.
    pub(crate) fn load(path: Option<&Path>) -> AnyResult<Self> {
        let (path, required) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Parses TOML text; absent keys keep their defaults.
    pub(crate) fn parse(text: &str) -> AnyResult<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects values the runtime cannot honour.
    pub(crate) fn validate(&self) -> AnyResult<()> {
        ensure!(self.game.tick_ms > 0, "game.tick_ms must be positive");
        ensure!(
            self.game.base_width >= 2 && self.game.base_height >= 2,
            "maze must be at least 2x2 (got {}x{})",
            self.game.base_width,
            self.game.base_height
        );
        ensure!(
            (0.0..=1.0).contains(&self.sensor.fire_chance),
            "sensor.fire_chance must lie in 0..=1 (got {})",
            self.sensor.fire_chance
        );
        ensure!(self.sensor.interval_ms > 0, "sensor.interval_ms must be positive");
        ensure!(self.status.interval_secs > 0, "status.interval_secs must be positive");
        Ok(())
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.game.tick_ms)
    }

    pub(crate) fn sensor_interval(&self) -> Duration {
        Duration::from_millis(self.sensor.interval_ms)
    }

    pub(crate) fn status_interval(&self) -> Duration {
        Duration::from_secs(self.status.interval_secs)
    }

    /// World construction parameters for the resolved seed.
    pub(crate) fn world_config(&self, seed: u64) -> WorldConfig {
        WorldConfig::new(seed)
            .with_base_dimensions(MazeDimensions::new(
                self.game.base_width,
                self.game.base_height,
            ))
            .with_respect_walls(self.game.respect_walls)
            .with_durations(EffectDurations {
                haste: Duration::from_millis(self.effects.haste_ms),
                shield: Duration::from_millis(self.effects.shield_ms),
                slow: Duration::from_millis(self.effects.slow_ms),
            })
    }
}
