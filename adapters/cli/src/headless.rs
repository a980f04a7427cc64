//! Entity factory and scripted pilot used to play a session without a renderer.

use std::{cell::Cell, collections::BTreeMap, rc::Rc};

use tracing::trace;
use wave_shooter_core::{
    Command, EndOfSessionObserver, EntityFactory, EntityHandle, EntityId, EntityKind, Event,
    Outcome, SpawnRequest,
};

/// Placeholder entity that only remembers whether the session end reached it.
#[derive(Debug, Default)]
struct HeadlessEntity {
    notified: Cell<bool>,
}

impl EndOfSessionObserver for HeadlessEntity {
    fn notify(&self, _outcome: Outcome) {
        self.notified.set(true);
    }
}

/// Factory that hands out sequential identifiers for every spawn request.
#[derive(Debug, Default)]
pub(crate) struct HeadlessFactory {
    next_id: u32,
    entities: Vec<Rc<HeadlessEntity>>,
}

impl HeadlessFactory {
    /// Number of entities created so far.
    pub(crate) fn spawned(&self) -> usize {
        self.entities.len()
    }

    /// Number of entities that received the end-of-session notification.
    pub(crate) fn notified(&self) -> usize {
        self.entities
            .iter()
            .filter(|entity| entity.notified.get())
            .count()
    }
}

impl EntityFactory for HeadlessFactory {
    fn spawn(&mut self, request: &SpawnRequest) -> EntityHandle {
        self.next_id += 1;
        let entity = Rc::new(HeadlessEntity::default());
        self.entities.push(Rc::clone(&entity));
        trace!(id = self.next_id, kind = ?request.kind, "headless entity created");
        EntityHandle::new(EntityId::new(self.next_id), entity)
    }
}

/// Scripted stand-in for player input and collisions.
///
/// Enemies are shot down once they have been alive for `kill_after` ticks.
/// When `hit_every` is set the player is hit on every multiple of that tick.
#[derive(Debug)]
pub(crate) struct Autopilot {
    kill_after: u32,
    hit_every: Option<u32>,
    points: u32,
    tick: u32,
    enemies: BTreeMap<EntityId, u32>,
    player: Option<EntityId>,
}

impl Autopilot {
    /// Creates a pilot with the provided pacing.
    pub(crate) fn new(kill_after: u32, hit_every: Option<u32>, points: u32) -> Self {
        Self {
            kill_after,
            hit_every: hit_every.filter(|every| *every > 0),
            points,
            tick: 0,
            enemies: BTreeMap::new(),
            player: None,
        }
    }

    /// Records spawns and the session end from the latest batch of events.
    pub(crate) fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => self.tick += 1,
                Event::EntitySpawned {
                    entity,
                    kind: EntityKind::Enemy,
                    ..
                } => {
                    let _ = self.enemies.insert(*entity, self.tick);
                }
                Event::EntitySpawned {
                    entity,
                    kind: EntityKind::Player,
                    ..
                } => self.player = Some(*entity),
                Event::LifeLost { .. } => self.player = None,
                Event::SessionEnded { .. } => {
                    self.enemies.clear();
                    self.player = None;
                }
                _ => {}
            }
        }
    }

    /// Commands the pilot issues for the current tick.
    pub(crate) fn commands(&mut self) -> Vec<Command> {
        let tick = self.tick;
        let kill_after = self.kill_after;
        let doomed: Vec<EntityId> = self
            .enemies
            .iter()
            .filter(|(_, spawned)| tick.saturating_sub(**spawned) >= kill_after)
            .map(|(entity, _)| *entity)
            .collect();

        let mut commands = Vec::with_capacity(doomed.len() + 1);
        for entity in doomed {
            let _ = self.enemies.remove(&entity);
            commands.push(Command::EnemyDestroyed {
                entity,
                points: self.points,
            });
        }

        if let (Some(every), Some(entity)) = (self.hit_every, self.player) {
            if tick > 0 && tick % every == 0 {
                commands.push(Command::PlayerHit { entity });
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wave_shooter_core::Position;

    use super::*;

    fn tick() -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        }
    }

    fn spawned(id: u32, kind: EntityKind) -> Event {
        Event::EntitySpawned {
            entity: EntityId::new(id),
            kind,
            position: Position::new(0.0, 0.0),
        }
    }

    #[test]
    fn factory_assigns_sequential_ids() {
        let mut factory = HeadlessFactory::default();
        let request = SpawnRequest {
            kind: EntityKind::Enemy,
            position: Position::new(1.0, 6.0),
            tuning: wave_shooter_core::SpawnTuning::PowerUp,
        };
        let first = factory.spawn(&request);
        let second = factory.spawn(&request);

        assert_eq!(first.id(), EntityId::new(1));
        assert_eq!(second.id(), EntityId::new(2));
        assert_eq!(factory.spawned(), 2);

        first.observer().notify(Outcome::Victory);
        assert_eq!(factory.notified(), 1);
    }

    #[test]
    fn enemies_are_destroyed_after_their_lifetime() {
        let mut pilot = Autopilot::new(2, None, 25);
        pilot.observe(&[tick(), spawned(4, EntityKind::Enemy)]);
        assert!(pilot.commands().is_empty());

        pilot.observe(&[tick()]);
        assert!(pilot.commands().is_empty());

        pilot.observe(&[tick()]);
        assert_eq!(
            pilot.commands(),
            vec![Command::EnemyDestroyed {
                entity: EntityId::new(4),
                points: 25,
            }]
        );
        pilot.observe(&[tick()]);
        assert!(pilot.commands().is_empty(), "each enemy dies once");
    }

    #[test]
    fn player_is_hit_on_schedule_while_alive() {
        let mut pilot = Autopilot::new(u32::MAX, Some(2), 10);
        pilot.observe(&[spawned(1, EntityKind::Player), tick()]);
        assert!(pilot.commands().is_empty());

        pilot.observe(&[tick()]);
        assert_eq!(
            pilot.commands(),
            vec![Command::PlayerHit {
                entity: EntityId::new(1),
            }]
        );

        pilot.observe(&[Event::LifeLost { remaining: 0 }, tick(), tick()]);
        assert!(pilot.commands().is_empty(), "no player to hit");
    }
}
