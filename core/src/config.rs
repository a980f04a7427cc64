//! Session-wide configuration supplied before the first level starts.

use std::time::Duration;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    level::{duration_from_seconds, seconds},
    ConfigurationError, LevelCatalog, LevelDefinition, PlayerTuning, Position, SpawnBoundary,
    DEFAULT_INITIAL_LIVES, DEFAULT_RESPAWN_DELAY,
};

/// Horizontal edge along the top of the play field where entities appear.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopBoundary {
    /// Leftmost spawn coordinate.
    pub min_x: f32,
    /// Rightmost spawn coordinate.
    pub max_x: f32,
    /// Vertical coordinate of the edge.
    pub y: f32,
}

impl Default for TopBoundary {
    fn default() -> Self {
        Self {
            min_x: -8.0,
            max_x: 8.0,
            y: 6.0,
        }
    }
}

impl TopBoundary {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.min_x.is_finite()
            || !self.max_x.is_finite()
            || !self.y.is_finite()
            || self.min_x > self.max_x
        {
            return Err(ConfigurationError::EmptyTopBoundary {
                min_x: self.min_x,
                max_x: self.max_x,
            });
        }
        Ok(())
    }
}

impl SpawnBoundary for TopBoundary {
    fn random_top_position(&self, rng: &mut dyn RngCore) -> Position {
        let x = rng.gen_range(self.min_x..=self.max_x);
        Position::new(x, self.y)
    }
}

/// Everything a session needs before it starts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Levels in play order.
    pub levels: Vec<LevelDefinition>,
    /// Lives the player starts with.
    #[serde(default = "default_initial_lives")]
    pub initial_lives: u32,
    /// Player ship movement speed.
    #[serde(default = "default_player_speed")]
    pub player_speed: f32,
    /// Seconds a collected shield stays active.
    #[serde(default = "default_shield_duration")]
    pub shield_duration: f32,
    /// Seconds between losing a ship and its replacement appearing.
    #[serde(default = "default_respawn_delay")]
    pub respawn_delay: f32,
    /// Where the player ship is placed on spawn.
    #[serde(default = "default_player_spawn")]
    pub player_spawn: Position,
    /// Edge along which enemies and power-ups appear.
    #[serde(default)]
    pub top_boundary: TopBoundary,
    /// Number of power-up variants the factory can construct.
    #[serde(default = "default_power_up_variants")]
    pub power_up_variants: u32,
    /// Seed for every random draw made by the spawn scheduler.
    #[serde(default)]
    pub rng_seed: u64,
}

fn default_initial_lives() -> u32 {
    DEFAULT_INITIAL_LIVES
}

fn default_player_speed() -> f32 {
    5.0
}

fn default_shield_duration() -> f32 {
    3.0
}

fn default_respawn_delay() -> f32 {
    DEFAULT_RESPAWN_DELAY.as_secs_f32()
}

fn default_player_spawn() -> Position {
    Position::new(0.0, -4.67)
}

fn default_power_up_variants() -> u32 {
    1
}

impl SessionConfig {
    /// Creates a configuration for the provided levels using default settings.
    #[must_use]
    pub fn new(levels: Vec<LevelDefinition>) -> Self {
        Self {
            levels,
            initial_lives: default_initial_lives(),
            player_speed: default_player_speed(),
            shield_duration: default_shield_duration(),
            respawn_delay: default_respawn_delay(),
            player_spawn: default_player_spawn(),
            top_boundary: TopBoundary::default(),
            power_up_variants: default_power_up_variants(),
            rng_seed: 0,
        }
    }

    /// Overrides the number of starting lives.
    #[must_use]
    pub fn with_initial_lives(mut self, lives: u32) -> Self {
        self.initial_lives = lives;
        self
    }

    /// Overrides the scheduler seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Tuning handed to the factory whenever the player ship spawns.
    #[must_use]
    pub fn player_tuning(&self) -> PlayerTuning {
        PlayerTuning {
            speed: self.player_speed,
            shield_duration: self.shield_duration,
        }
    }

    /// Delay before a lost ship is replaced.
    #[must_use]
    pub fn respawn_delay(&self) -> Duration {
        seconds(self.respawn_delay)
    }

    /// Checks every invariant and builds the level catalog.
    pub fn validate(&self) -> Result<LevelCatalog, ConfigurationError> {
        let catalog = LevelCatalog::new(self.levels.clone())?;

        if self.initial_lives == 0 {
            return Err(ConfigurationError::NoLives);
        }

        for (field, value) in [
            ("speed", self.player_speed),
            ("shield duration", self.shield_duration),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::InvalidPlayerTuning { field, value });
            }
        }

        if duration_from_seconds(self.respawn_delay).is_none() {
            return Err(ConfigurationError::InvalidRespawnDelay(self.respawn_delay));
        }

        self.top_boundary.validate()?;

        if self.power_up_variants == 0 {
            if let Some(level) = catalog.first_power_up_level() {
                return Err(ConfigurationError::NoPowerUpVariants { level });
            }
        }

        Ok(catalog)
    }
}
