#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Wave Shooter.
//!
//! A [`Session`] owns lives, score, the live-enemy count and the level
//! progression state machine. Adapters drive it exclusively through
//! [`apply`], which consumes a [`Command`], mutates the session, and appends
//! the resulting [`Event`] values. Score and life events are also delivered
//! synchronously to the [`CombatEventHub`] subscribers, and the session
//! outcome is delivered once to every [`EndOfSessionSubject`] observer.
//!
//! Level completion is polled: the check runs once per tick after that tick's
//! spawns, so the final kill of a level is acted upon by the next tick.

pub mod end_of_session;

use std::{collections::BTreeSet, fmt};

use tracing::{debug, info, warn};
use wave_shooter_core::{
    Command, ConfigurationError, EntityFactory, EntityId, EntityKind, Event, LevelCatalog, Outcome,
    Phase, SessionConfig, SessionError, SpawnBoundary, SpawnRequest, SpawnTuning,
};
use wave_shooter_system_combat_events::CombatEventHub;
use wave_shooter_system_spawning::{Config as SpawnConfig, SpawnScheduler};

pub use end_of_session::{EndOfSessionSubject, ObserverId};

/// Represents one play-through from the first level to a win or a loss.
pub struct Session {
    config: SessionConfig,
    catalog: LevelCatalog,
    boundary: Box<dyn SpawnBoundary>,
    phase: Phase,
    level_index: usize,
    levels_completed: usize,
    lives: u32,
    score: u64,
    live_enemies: u32,
    hostiles: BTreeSet<EntityId>,
    player: Option<EntityId>,
    scheduler: SpawnScheduler,
    combat_events: CombatEventHub,
    end_of_session: EndOfSessionSubject,
}

impl Session {
    /// Validates the configuration and prepares the first level.
    ///
    /// Spawns are placed along the configured top boundary.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigurationError> {
        let boundary = Box::new(config.top_boundary);
        Self::with_boundary(config, boundary)
    }

    /// Validates the configuration, placing spawns with the provided boundary.
    pub fn with_boundary(
        config: SessionConfig,
        boundary: Box<dyn SpawnBoundary>,
    ) -> Result<Self, ConfigurationError> {
        let catalog = config.validate()?;
        let scheduler = SpawnScheduler::new(SpawnConfig::new(
            config.rng_seed,
            config.power_up_variants,
        ));

        Ok(Self {
            lives: config.initial_lives,
            config,
            catalog,
            boundary,
            phase: Phase::Loading(0),
            level_index: 0,
            levels_completed: 0,
            score: 0,
            live_enemies: 0,
            hostiles: BTreeSet::new(),
            player: None,
            scheduler,
            combat_events: CombatEventHub::new(),
            end_of_session: EndOfSessionSubject::new(),
        })
    }

    /// Score and life-lost channels for external listeners.
    pub fn combat_events_mut(&mut self) -> &mut CombatEventHub {
        &mut self.combat_events
    }

    /// Subject holding the end-of-session observers.
    pub fn end_of_session_mut(&mut self) -> &mut EndOfSessionSubject {
        &mut self.end_of_session
    }

    fn emit(&mut self, event: Event, out_events: &mut Vec<Event>) {
        self.combat_events.publish(&event);
        out_events.push(event);
    }

    fn start_level(
        &mut self,
        index: usize,
        factory: &mut dyn EntityFactory,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        let Some(level) = self.catalog.get(index) else {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: self.catalog.len(),
            });
        };

        self.scheduler.start_level(level);
        let enemies = level.enemy_count;
        self.level_index = index;
        self.live_enemies = enemies;
        self.phase = Phase::InLevel(index);

        info!(level = index, enemies, "level started");
        self.emit(
            Event::LevelStarted {
                level: index,
                enemies,
            },
            out_events,
        );

        if self.player.is_none() {
            let request = SpawnRequest {
                kind: EntityKind::Player,
                position: self.config.player_spawn,
                tuning: SpawnTuning::Player(self.config.player_tuning()),
            };
            self.spawn(request, factory, out_events);
        }

        Ok(())
    }

    fn end_level(
        &mut self,
        factory: &mut dyn EntityFactory,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        let level = self.level_index;
        self.scheduler.cancel_all();
        self.levels_completed += 1;

        info!(level, score = self.score, "level completed");
        self.emit(Event::LevelCompleted { level }, out_events);

        let next = level + 1;
        if next < self.catalog.len() {
            self.phase = Phase::Loading(next);
            self.start_level(next, factory, out_events)
        } else {
            self.finish(Outcome::Victory, out_events);
            Ok(())
        }
    }

    fn finish(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        if self.phase.is_game_over() {
            return;
        }

        self.scheduler.cancel_all();
        self.phase = Phase::GameOver(outcome);
        info!(?outcome, score = self.score, lives = self.lives, "session ended");
        self.emit(Event::SessionEnded { outcome }, out_events);

        let notified = self.end_of_session.notify_all(outcome);
        debug!(notified, "end-of-session observers notified");
    }

    fn spawn(
        &mut self,
        request: SpawnRequest,
        factory: &mut dyn EntityFactory,
        out_events: &mut Vec<Event>,
    ) {
        let handle = factory.spawn(&request);
        let entity = handle.id();

        match request.kind {
            EntityKind::Player => self.player = Some(entity),
            EntityKind::Enemy => {
                let _ = self.hostiles.insert(entity);
                let _ = self.end_of_session.add_observer(handle.observer());
            }
            EntityKind::PowerUp(_) => {
                let _ = self.end_of_session.add_observer(handle.observer());
            }
        }

        debug!(entity = entity.get(), kind = ?request.kind, "entity spawned");
        out_events.push(Event::EntitySpawned {
            entity,
            kind: request.kind,
            position: request.position,
        });
    }

    fn tick(
        &mut self,
        dt: std::time::Duration,
        factory: &mut dyn EntityFactory,
        out_events: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        out_events.push(Event::TimeAdvanced { dt });

        if !matches!(self.phase, Phase::InLevel(_)) {
            return Ok(());
        }

        let mut requests = Vec::new();
        self.scheduler
            .advance(dt, self.boundary.as_ref(), &mut requests);
        for request in requests {
            self.spawn(request, factory, out_events);
        }

        if self.live_enemies == 0 {
            self.end_level(factory, out_events)?;
        }

        Ok(())
    }

    fn enemy_destroyed(&mut self, entity: EntityId, points: u32, out_events: &mut Vec<Event>) {
        if !self.hostiles.remove(&entity) {
            warn!(entity = entity.get(), "ignoring destroy signal from unknown enemy");
            return;
        }

        self.score = self.score.saturating_add(u64::from(points));
        self.emit(Event::ScoreUpdated { score: self.score }, out_events);
        self.live_enemies = self.live_enemies.saturating_sub(1);
        debug!(
            entity = entity.get(),
            points,
            remaining = self.live_enemies,
            "enemy destroyed"
        );
    }

    fn player_hit(&mut self, entity: EntityId, out_events: &mut Vec<Event>) {
        if self.player != Some(entity) {
            warn!(entity = entity.get(), "ignoring hit signal from inactive player");
            return;
        }

        self.player = None;
        self.lives = self.lives.saturating_sub(1);
        self.emit(
            Event::LifeLost {
                remaining: self.lives,
            },
            out_events,
        );

        if self.lives > 0 {
            let delay = self.config.respawn_delay();
            self.scheduler.schedule_player(
                delay,
                self.config.player_spawn,
                self.config.player_tuning(),
            );
            self.emit(Event::PlayerRespawnScheduled { delay }, out_events);
        } else {
            self.finish(Outcome::Defeat, out_events);
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("lives", &self.lives)
            .field("score", &self.score)
            .field("live_enemies", &self.live_enemies)
            .field("player", &self.player)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

/// Applies the provided command to the session, mutating state deterministically.
///
/// Entity signals arriving outside of a running level, or from entities the
/// session does not track as alive, are ignored. An error indicates an
/// internal defect in the level progression and leaves the session unusable.
pub fn apply(
    session: &mut Session,
    command: Command,
    factory: &mut dyn EntityFactory,
    out_events: &mut Vec<Event>,
) -> Result<(), SessionError> {
    match command {
        Command::StartSession => match session.phase {
            Phase::Loading(index) => session.start_level(index, factory, out_events),
            phase => {
                warn!(?phase, "session already started");
                Ok(())
            }
        },
        Command::Tick { dt } => session.tick(dt, factory, out_events),
        Command::EnemyDestroyed { entity, points } => {
            if matches!(session.phase, Phase::InLevel(_)) {
                session.enemy_destroyed(entity, points, out_events);
            }
            Ok(())
        }
        Command::PlayerHit { entity } => {
            if matches!(session.phase, Phase::InLevel(_)) {
                session.player_hit(entity, out_events);
            }
            Ok(())
        }
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use wave_shooter_core::{EntityId, LevelDefinition, Outcome, Phase, StreamKind};

    use super::Session;

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(session: &Session) -> Phase {
        session.phase
    }

    /// Index of the level being played or about to start.
    #[must_use]
    pub fn level_index(session: &Session) -> usize {
        session.level_index
    }

    /// Definition of the level being played or about to start.
    #[must_use]
    pub fn current_level(session: &Session) -> Option<&LevelDefinition> {
        session.catalog.get(session.level_index)
    }

    /// Number of levels in the catalog.
    #[must_use]
    pub fn level_count(session: &Session) -> usize {
        session.catalog.len()
    }

    /// Number of levels cleared so far.
    #[must_use]
    pub fn levels_completed(session: &Session) -> usize {
        session.levels_completed
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(session: &Session) -> u32 {
        session.lives
    }

    /// Total score accumulated.
    #[must_use]
    pub fn score(session: &Session) -> u64 {
        session.score
    }

    /// Enemies of the current level that have not been destroyed yet.
    ///
    /// Counts enemies still waiting to spawn as well as spawned ones.
    #[must_use]
    pub fn live_enemies(session: &Session) -> u32 {
        session.live_enemies
    }

    /// Session outcome, once the session has ended.
    #[must_use]
    pub fn outcome(session: &Session) -> Option<Outcome> {
        match session.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Reports whether the session reached a terminal outcome.
    #[must_use]
    pub fn is_game_over(session: &Session) -> bool {
        session.phase.is_game_over()
    }

    /// Identifier of the player ship currently in play.
    #[must_use]
    pub fn player(session: &Session) -> Option<EntityId> {
        session.player
    }

    /// Spawned enemies that have not been destroyed, in identifier order.
    #[must_use]
    pub fn hostiles(session: &Session) -> Vec<EntityId> {
        session.hostiles.iter().copied().collect()
    }

    /// Spawn streams with emissions still pending.
    #[must_use]
    pub fn active_streams(session: &Session) -> Vec<StreamKind> {
        session.scheduler.active_streams()
    }

    /// Number of registered end-of-session observers.
    #[must_use]
    pub fn observer_count(session: &Session) -> usize {
        session.end_of_session.len()
    }
}
