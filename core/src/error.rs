//! Error types surfaced by configuration loading and session transitions.

use thiserror::Error;

/// Reasons a session configuration is rejected before the session starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigurationError {
    /// The level catalog contains no levels.
    #[error("level catalog is empty")]
    EmptyCatalog,
    /// A level declares no enemies, so it could never be completed.
    #[error("level {level} must contain at least one enemy")]
    NoEnemies {
        /// Zero-based index of the offending level.
        level: usize,
    },
    /// A level field expressed in seconds is negative, non-finite or too large.
    #[error("level {level} has an invalid {field}: {value}")]
    InvalidSeconds {
        /// Zero-based index of the offending level.
        level: usize,
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// A level spawns enemies without any delay between them.
    #[error("level {level} must use a positive enemy spawn delay")]
    ZeroSpawnDelay {
        /// Zero-based index of the offending level.
        level: usize,
    },
    /// A level enables power-ups with a zero minimum wait.
    #[error("level {level} enables power-ups with a zero minimum wait")]
    ZeroPowerUpWait {
        /// Zero-based index of the offending level.
        level: usize,
    },
    /// A level's power-up wait range is inverted.
    #[error("level {level} has power-up minimum wait {min} above maximum wait {max}")]
    InvertedPowerUpWait {
        /// Zero-based index of the offending level.
        level: usize,
        /// Configured minimum wait in seconds.
        min: f32,
        /// Configured maximum wait in seconds.
        max: f32,
    },
    /// Enemy tuning contains a negative or non-finite value.
    #[error("level {level} has an invalid enemy {field}: {value}")]
    InvalidEnemyTuning {
        /// Zero-based index of the offending level.
        level: usize,
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// The session would start without any lives.
    #[error("initial lives must be positive")]
    NoLives,
    /// Player speed or shield duration is not a positive finite number.
    #[error("player {field} must be positive, got {value}")]
    InvalidPlayerTuning {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was rejected.
        value: f32,
    },
    /// The respawn delay is not a usable number of seconds.
    #[error("respawn delay must be a non-negative number of seconds, got {0}")]
    InvalidRespawnDelay(f32),
    /// A level enables power-ups but no power-up variants are available.
    #[error("level {level} enables power-ups but no power-up variants are configured")]
    NoPowerUpVariants {
        /// Zero-based index of the first level enabling power-ups.
        level: usize,
    },
    /// The top spawn edge has an empty or non-finite horizontal range.
    #[error("top boundary range [{min_x}, {max_x}] is empty")]
    EmptyTopBoundary {
        /// Left end of the range.
        min_x: f32,
        /// Right end of the range.
        max_x: f32,
    },
}

/// Failures raised while applying commands to a session.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SessionError {
    /// A level beyond the catalog bound was requested.
    #[error("level index {index} is out of range for a catalog of {len} levels")]
    IndexOutOfRange {
        /// Requested level index.
        index: usize,
        /// Number of levels in the catalog.
        len: usize,
    },
    /// The session configuration is invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
