//! Level definitions and the validated catalog that orders them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, EnemyTuning};

/// Authored parameters of a single level.
///
/// Times are expressed in seconds, matching how level files are written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    /// Number of enemies that spawn and must be destroyed.
    pub enemy_count: u32,
    /// Seconds between consecutive enemy spawns, including the first.
    pub enemy_spawn_delay: f32,
    /// Enemy movement speed.
    #[serde(default = "default_enemy_speed")]
    pub enemy_speed: f32,
    /// Speed of enemy projectiles.
    #[serde(default = "default_enemy_shot_speed")]
    pub enemy_shot_speed: f32,
    /// Seconds between enemy shots.
    #[serde(default = "default_enemy_shot_delay")]
    pub enemy_shot_delay: f32,
    /// Seconds before an enemy turns aggressive.
    #[serde(default = "default_enemy_anger_delay")]
    pub enemy_anger_delay: f32,
    /// Whether the level runs the power-up stream.
    #[serde(default)]
    pub has_power_ups: bool,
    /// Lower bound of the random wait between power-ups, in seconds.
    #[serde(default)]
    pub power_up_min_wait: f32,
    /// Upper bound of the random wait between power-ups, in seconds.
    #[serde(default)]
    pub power_up_max_wait: f32,
}

fn default_enemy_speed() -> f32 {
    2.0
}

fn default_enemy_shot_speed() -> f32 {
    4.0
}

fn default_enemy_shot_delay() -> f32 {
    2.0
}

fn default_enemy_anger_delay() -> f32 {
    5.0
}

impl LevelDefinition {
    /// Creates a level without power-ups using default enemy tuning.
    #[must_use]
    pub fn new(enemy_count: u32, enemy_spawn_delay: f32) -> Self {
        Self {
            enemy_count,
            enemy_spawn_delay,
            enemy_speed: default_enemy_speed(),
            enemy_shot_speed: default_enemy_shot_speed(),
            enemy_shot_delay: default_enemy_shot_delay(),
            enemy_anger_delay: default_enemy_anger_delay(),
            has_power_ups: false,
            power_up_min_wait: 0.0,
            power_up_max_wait: 0.0,
        }
    }

    /// Enables the power-up stream with waits drawn from `[min_wait, max_wait]`.
    #[must_use]
    pub fn with_power_ups(mut self, min_wait: f32, max_wait: f32) -> Self {
        self.has_power_ups = true;
        self.power_up_min_wait = min_wait;
        self.power_up_max_wait = max_wait;
        self
    }

    /// Replaces the enemy tuning.
    #[must_use]
    pub fn with_enemy_tuning(mut self, tuning: EnemyTuning) -> Self {
        self.enemy_speed = tuning.speed;
        self.enemy_shot_speed = tuning.shot_speed;
        self.enemy_shot_delay = tuning.shot_delay;
        self.enemy_anger_delay = tuning.anger_delay;
        self
    }

    /// Delay between consecutive enemy spawns.
    #[must_use]
    pub fn enemy_spawn_delay(&self) -> Duration {
        seconds(self.enemy_spawn_delay)
    }

    /// Tuning handed to the factory for every enemy of this level.
    #[must_use]
    pub fn enemy_tuning(&self) -> EnemyTuning {
        EnemyTuning {
            speed: self.enemy_speed,
            shot_speed: self.enemy_shot_speed,
            shot_delay: self.enemy_shot_delay,
            anger_delay: self.enemy_anger_delay,
        }
    }

    /// Power-up wait range in seconds, or `None` when the level has no power-ups.
    #[must_use]
    pub fn power_up_wait(&self) -> Option<(f32, f32)> {
        self.has_power_ups
            .then_some((self.power_up_min_wait, self.power_up_max_wait))
    }

    fn validate(&self, level: usize) -> Result<(), ConfigurationError> {
        if self.enemy_count == 0 {
            return Err(ConfigurationError::NoEnemies { level });
        }

        check_seconds(level, "enemy spawn delay", self.enemy_spawn_delay)?;
        if self.enemy_spawn_delay().is_zero() {
            return Err(ConfigurationError::ZeroSpawnDelay { level });
        }

        for (field, value) in [
            ("speed", self.enemy_speed),
            ("shot speed", self.enemy_shot_speed),
            ("shot delay", self.enemy_shot_delay),
            ("anger delay", self.enemy_anger_delay),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidEnemyTuning {
                    level,
                    field,
                    value,
                });
            }
        }

        if !self.has_power_ups {
            return Ok(());
        }

        check_seconds(level, "power-up minimum wait", self.power_up_min_wait)?;
        check_seconds(level, "power-up maximum wait", self.power_up_max_wait)?;
        if self.power_up_min_wait > self.power_up_max_wait {
            return Err(ConfigurationError::InvertedPowerUpWait {
                level,
                min: self.power_up_min_wait,
                max: self.power_up_max_wait,
            });
        }
        if seconds(self.power_up_min_wait).is_zero() {
            return Err(ConfigurationError::ZeroPowerUpWait { level });
        }

        Ok(())
    }
}

/// Converts authored seconds into a duration rounded to whole microseconds.
///
/// `0.3` becomes exactly 300ms. Returns `None` for negative, non-finite or
/// out-of-range values.
#[must_use]
pub fn duration_from_seconds(value: f32) -> Option<Duration> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let micros = (f64::from(value) * 1e6).round();
    if micros >= u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_micros(micros as u64))
}

/// Converts authored seconds into a duration, mapping unusable values to zero.
#[must_use]
pub(crate) fn seconds(value: f32) -> Duration {
    duration_from_seconds(value).unwrap_or(Duration::ZERO)
}

fn check_seconds(level: usize, field: &'static str, value: f32) -> Result<(), ConfigurationError> {
    match duration_from_seconds(value) {
        Some(_) => Ok(()),
        None => Err(ConfigurationError::InvalidSeconds {
            level,
            field,
            value,
        }),
    }
}

/// Ordered, validated list of levels played during a session.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

impl LevelCatalog {
    /// Validates the provided levels and wraps them in a catalog.
    pub fn new(levels: Vec<LevelDefinition>) -> Result<Self, ConfigurationError> {
        if levels.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        for (index, level) in levels.iter().enumerate() {
            level.validate(index)?;
        }

        Ok(Self { levels })
    }

    /// Number of levels in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always `false`; an empty catalog is rejected on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at the provided index, if it exists.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LevelDefinition> {
        self.levels.get(index)
    }

    /// Iterator over the levels in play order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelDefinition> {
        self.levels.iter()
    }

    /// Index of the first level that enables power-ups.
    #[must_use]
    pub fn first_power_up_level(&self) -> Option<usize> {
        self.levels.iter().position(|level| level.has_power_ups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_catalog() {
        assert_eq!(
            LevelCatalog::new(Vec::new()),
            Err(ConfigurationError::EmptyCatalog)
        );
    }

    #[test]
    fn rejects_level_without_enemies() {
        let levels = vec![LevelDefinition::new(2, 1.0), LevelDefinition::new(0, 1.0)];
        assert_eq!(
            LevelCatalog::new(levels),
            Err(ConfigurationError::NoEnemies { level: 1 })
        );
    }

    #[test]
    fn rejects_negative_spawn_delay() {
        let result = LevelCatalog::new(vec![LevelDefinition::new(1, -0.5)]);
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidSeconds { level: 0, .. })
        ));
    }

    #[test]
    fn rejects_zero_spawn_delay() {
        assert_eq!(
            LevelCatalog::new(vec![LevelDefinition::new(1, 0.0)]),
            Err(ConfigurationError::ZeroSpawnDelay { level: 0 })
        );
    }

    #[test]
    fn rejects_inverted_power_up_wait() {
        let level = LevelDefinition::new(3, 1.0).with_power_ups(5.0, 2.0);
        assert_eq!(
            LevelCatalog::new(vec![level]),
            Err(ConfigurationError::InvertedPowerUpWait {
                level: 0,
                min: 5.0,
                max: 2.0,
            })
        );
    }

    #[test]
    fn rejects_non_finite_tuning() {
        let mut level = LevelDefinition::new(3, 1.0);
        level.enemy_shot_speed = f32::NAN;
        assert!(matches!(
            LevelCatalog::new(vec![level]),
            Err(ConfigurationError::InvalidEnemyTuning {
                field: "shot speed",
                ..
            })
        ));
    }

    #[test]
    fn ignores_power_up_wait_when_disabled() {
        let mut level = LevelDefinition::new(3, 1.0);
        level.power_up_min_wait = 9.0;
        level.power_up_max_wait = 1.0;
        let catalog = LevelCatalog::new(vec![level]).expect("power-ups are disabled");
        assert_eq!(catalog.first_power_up_level(), None);
        assert_eq!(catalog.get(0).and_then(LevelDefinition::power_up_wait), None);
    }

    #[test]
    fn parses_levels_from_toml_with_defaults() {
        #[derive(Deserialize)]
        struct File {
            levels: Vec<LevelDefinition>,
        }

        let file: File = toml::from_str(
            r#"
                [[levels]]
                enemy_count = 4
                enemy_spawn_delay = 1.5

                [[levels]]
                enemy_count = 6
                enemy_spawn_delay = 0.75
                enemy_speed = 3.5
                has_power_ups = true
                power_up_min_wait = 4.0
                power_up_max_wait = 8.0
            "#,
        )
        .expect("level file parses");

        let catalog = LevelCatalog::new(file.levels).expect("levels are valid");
        assert_eq!(catalog.len(), 2);
        let counts: Vec<u32> = catalog.iter().map(|level| level.enemy_count).collect();
        assert_eq!(counts, vec![4, 6]);
        let first = catalog.get(0).expect("first level");
        assert_eq!(first.enemy_spawn_delay(), Duration::from_millis(1500));
        assert_eq!(first.enemy_tuning().speed, 2.0);
        let second = catalog.get(1).expect("second level");
        assert_eq!(second.power_up_wait(), Some((4.0, 8.0)));
        assert_eq!(second.enemy_tuning().speed, 3.5);
        assert_eq!(catalog.first_power_up_level(), Some(1));
    }

    #[test]
    fn decimal_seconds_round_to_whole_microseconds() {
        assert_eq!(duration_from_seconds(0.1), Some(Duration::from_millis(100)));
        assert_eq!(duration_from_seconds(0.3), Some(Duration::from_millis(300)));
        assert_eq!(duration_from_seconds(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(duration_from_seconds(0.0), Some(Duration::ZERO));
        assert_eq!(duration_from_seconds(-0.1), None);
        assert_eq!(duration_from_seconds(f32::INFINITY), None);
        assert_eq!(duration_from_seconds(f32::MAX), None);
    }

    #[test]
    fn enemy_tuning_replaces_every_field() {
        let tuning = EnemyTuning {
            speed: 3.0,
            shot_speed: 6.0,
            shot_delay: 0.5,
            anger_delay: 1.0,
        };
        let level = LevelDefinition::new(2, 1.0).with_enemy_tuning(tuning);
        assert_eq!(level.enemy_tuning(), tuning);
        assert!(LevelCatalog::new(vec![level]).is_ok());
    }
}
