#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Wave Shooter session engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative session, and pure systems. Adapters submit [`Command`] values
//! describing entity signals and elapsed time, the session executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that listeners consume. Collaborators that live outside the core (entity
//! construction, spawn placement, end-of-session listeners) are expressed as
//! the [`EntityFactory`], [`SpawnBoundary`] and [`EndOfSessionObserver`]
//! traits.

mod config;
mod error;
mod level;

use std::{rc::Rc, time::Duration};

use rand::RngCore;
use serde::{Deserialize, Serialize};

pub use config::{SessionConfig, TopBoundary};
pub use error::{ConfigurationError, SessionError};
pub use level::{duration_from_seconds, LevelCatalog, LevelDefinition};

/// Delay applied before a destroyed player ship is spawned again.
pub const DEFAULT_RESPAWN_DELAY: Duration = Duration::from_secs(2);

/// Number of lives a session starts with unless configured otherwise.
pub const DEFAULT_INITIAL_LIVES: u32 = 3;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts the first level of a freshly loaded session.
    StartSession,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports that a hostile entity was destroyed by the player.
    EnemyDestroyed {
        /// Identifier of the destroyed entity.
        entity: EntityId,
        /// Points awarded for the kill.
        points: u32,
    },
    /// Reports that the player ship collided with something hostile.
    PlayerHit {
        /// Identifier of the player ship that was hit.
        entity: EntityId,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a level began and its spawn streams are running.
    LevelStarted {
        /// Zero-based index of the level within the catalog.
        level: usize,
        /// Number of enemies that must be destroyed to clear the level.
        enemies: u32,
    },
    /// Announces that every enemy of a level was destroyed.
    LevelCompleted {
        /// Zero-based index of the level that was cleared.
        level: usize,
    },
    /// Confirms that the factory constructed an entity for a spawn request.
    EntitySpawned {
        /// Identifier assigned to the entity by the factory.
        entity: EntityId,
        /// Kind of entity that was constructed.
        kind: EntityKind,
        /// Position the entity was placed at.
        position: Position,
    },
    /// Reports the cumulative score after a kill.
    ScoreUpdated {
        /// Total points accumulated during the session.
        score: u64,
    },
    /// Reports that the player lost a life.
    LifeLost {
        /// Lives remaining after the loss, usable as a HUD icon index.
        remaining: u32,
    },
    /// Confirms that a replacement player ship will spawn after a delay.
    PlayerRespawnScheduled {
        /// Delay before the replacement ship appears.
        delay: Duration,
    },
    /// Announces that the session reached a terminal outcome.
    SessionEnded {
        /// Whether the session was won or lost.
        outcome: Outcome,
    },
}

/// Terminal result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every level of the catalog was cleared.
    Victory,
    /// The player ran out of lives.
    Defeat,
}

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The level at the provided index is about to start.
    Loading(usize),
    /// The level at the provided index is being played.
    InLevel(usize),
    /// The session ended with the provided outcome.
    GameOver(Outcome),
}

impl Phase {
    /// Reports whether the phase is terminal.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

/// Unique identifier assigned to a spawned entity by the factory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location in world units where an entity is placed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Index into the factory's catalogue of power-up variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerUpKind(u32);

impl PowerUpKind {
    /// Creates a power-up kind referring to the provided variant index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Variant index understood by the factory.
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.0
    }
}

/// Kinds of entities the session asks the factory to construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player-controlled ship.
    Player,
    /// A hostile ship that awards points when destroyed.
    Enemy,
    /// A collectable pickup.
    PowerUp(PowerUpKind),
}

/// Per-level tuning applied to a spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTuning {
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Speed of fired projectiles.
    pub shot_speed: f32,
    /// Seconds between shots.
    pub shot_delay: f32,
    /// Seconds before the enemy turns aggressive.
    pub anger_delay: f32,
}

/// Session-wide tuning applied to the player ship.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Seconds a collected shield stays active.
    pub shield_duration: f32,
}

/// Tuning parameters handed to the factory alongside a spawn request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpawnTuning {
    /// Parameters for the player ship.
    Player(PlayerTuning),
    /// Parameters for a hostile ship.
    Enemy(EnemyTuning),
    /// Power-ups carry no tuning.
    PowerUp,
}

/// Describes what the factory should construct and where.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest {
    /// Kind of entity to construct.
    pub kind: EntityKind,
    /// Position to place the entity at.
    pub position: Position,
    /// Tuning to apply to the constructed entity.
    pub tuning: SpawnTuning,
}

/// Independent timed streams run by the spawn scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StreamKind {
    /// Finite stream emitting the level's enemies.
    Enemies,
    /// Endless stream emitting random power-ups.
    PowerUps,
    /// One-shot stream that respawns the player ship.
    PlayerRespawn,
}

/// Listener notified once when the session reaches its outcome.
pub trait EndOfSessionObserver {
    /// Invoked exactly once when the session ends.
    fn notify(&self, outcome: Outcome);
}

/// Handle returned by the factory for every constructed entity.
#[derive(Clone)]
pub struct EntityHandle {
    id: EntityId,
    observer: Rc<dyn EndOfSessionObserver>,
}

impl EntityHandle {
    /// Creates a handle for the entity identified by `id`.
    ///
    /// The observer is registered with the end-of-session subject when the
    /// entity is a hostile ship or a power-up.
    #[must_use]
    pub fn new(id: EntityId, observer: Rc<dyn EndOfSessionObserver>) -> Self {
        Self { id, observer }
    }

    /// Identifier assigned to the entity.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Observer that receives the end-of-session notification.
    #[must_use]
    pub fn observer(&self) -> Rc<dyn EndOfSessionObserver> {
        Rc::clone(&self.observer)
    }
}

impl std::fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Collaborator that constructs and places entities.
pub trait EntityFactory {
    /// Constructs the requested entity and returns a handle to it.
    fn spawn(&mut self, request: &SpawnRequest) -> EntityHandle;
}

/// Collaborator answering where along the top edge new entities appear.
pub trait SpawnBoundary {
    /// Picks a uniformly random position on the top spawn edge.
    fn random_top_position(&self, rng: &mut dyn RngCore) -> Position;
}

#[cfg(test)]
mod tests {
    use super::{Outcome, Phase};

    #[test]
    fn only_game_over_phases_are_terminal() {
        assert!(!Phase::Loading(0).is_game_over());
        assert!(!Phase::InLevel(2).is_game_over());
        assert!(Phase::GameOver(Outcome::Victory).is_game_over());
        assert!(Phase::GameOver(Outcome::Defeat).is_game_over());
    }
}
