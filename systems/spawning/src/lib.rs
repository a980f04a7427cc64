#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick-driven spawn scheduler emitting enemy, power-up and respawn requests.
//!
//! Every stream is explicit timer state: an accumulator advanced by the
//! elapsed tick duration and compared against the stream's interval. A stream
//! emits every request whose wait elapsed within the tick, so a late or long
//! tick catches up instead of dropping spawns. Cancelling a stream discards
//! its accumulated time, which means nothing it had pending is ever emitted.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;
use wave_shooter_core::{
    duration_from_seconds, EnemyTuning, EntityKind, LevelDefinition, PlayerTuning, Position,
    PowerUpKind, SpawnBoundary, SpawnRequest, SpawnTuning, StreamKind,
};

/// Shortest wait the power-up stream will ever use between emissions.
const MIN_POWER_UP_WAIT: Duration = Duration::from_millis(1);

/// Configuration parameters required to construct the scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    power_up_variants: u32,
}

impl Config {
    /// Creates a new configuration using the provided seed and power-up catalogue size.
    #[must_use]
    pub const fn new(rng_seed: u64, power_up_variants: u32) -> Self {
        Self {
            rng_seed,
            power_up_variants,
        }
    }
}

/// Runs the independent spawn streams of the active level.
#[derive(Debug)]
pub struct SpawnScheduler {
    rng: ChaCha8Rng,
    power_up_variants: u32,
    enemies: Option<EnemyStream>,
    power_ups: Option<PowerUpStream>,
    respawn: Option<RespawnTimer>,
}

#[derive(Debug)]
struct EnemyStream {
    interval: Duration,
    accumulator: Duration,
    remaining: u32,
    tuning: EnemyTuning,
}

impl EnemyStream {
    fn resolve_spawn_attempts(&mut self) -> u32 {
        if self.interval.is_zero() {
            return std::mem::take(&mut self.remaining);
        }

        let mut attempts = 0;
        while self.remaining > 0 && self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            self.remaining -= 1;
            attempts += 1;
        }
        attempts
    }
}

#[derive(Debug)]
struct PowerUpStream {
    min_wait: f32,
    max_wait: f32,
    accumulator: Duration,
    next_wait: Duration,
}

#[derive(Debug)]
struct RespawnTimer {
    remaining: Duration,
    position: Position,
    tuning: PlayerTuning,
}

impl SpawnScheduler {
    /// Creates an idle scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            power_up_variants: config.power_up_variants,
            enemies: None,
            power_ups: None,
            respawn: None,
        }
    }

    /// Replaces every running stream with the streams of the provided level.
    pub fn start_level(&mut self, level: &LevelDefinition) {
        self.cancel_all();
        self.start_enemies(
            level.enemy_count,
            level.enemy_spawn_delay(),
            level.enemy_tuning(),
        );
        if let Some((min_wait, max_wait)) = level.power_up_wait() {
            self.start_power_ups(min_wait, max_wait);
        }
    }

    /// Starts the finite enemy stream, replacing any previous one.
    ///
    /// The first enemy appears after one full interval.
    pub fn start_enemies(&mut self, count: u32, interval: Duration, tuning: EnemyTuning) {
        debug!(count, ?interval, "starting enemy stream");
        self.enemies = Some(EnemyStream {
            interval,
            accumulator: Duration::ZERO,
            remaining: count,
            tuning,
        });
    }

    /// Starts the endless power-up stream, replacing any previous one.
    ///
    /// Waits are drawn uniformly from `[min_wait, max_wait]` seconds.
    pub fn start_power_ups(&mut self, min_wait: f32, max_wait: f32) {
        if self.power_up_variants == 0 {
            debug!("no power-up variants available, power-up stream not started");
            return;
        }

        debug!(min_wait, max_wait, "starting power-up stream");
        let next_wait = sample_wait(&mut self.rng, min_wait, max_wait);
        self.power_ups = Some(PowerUpStream {
            min_wait,
            max_wait,
            accumulator: Duration::ZERO,
            next_wait,
        });
    }

    /// Schedules a one-shot player spawn after `delay`.
    pub fn schedule_player(&mut self, delay: Duration, position: Position, tuning: PlayerTuning) {
        debug!(?delay, "scheduling player spawn");
        self.respawn = Some(RespawnTimer {
            remaining: delay,
            position,
            tuning,
        });
    }

    /// Stops the provided stream. Safe to call on finished or idle streams.
    pub fn cancel(&mut self, stream: StreamKind) {
        let was_running = match stream {
            StreamKind::Enemies => self.enemies.take().is_some(),
            StreamKind::PowerUps => self.power_ups.take().is_some(),
            StreamKind::PlayerRespawn => self.respawn.take().is_some(),
        };
        if was_running {
            debug!(?stream, "cancelled spawn stream");
        }
    }

    /// Stops every stream at once.
    pub fn cancel_all(&mut self) {
        self.cancel(StreamKind::Enemies);
        self.cancel(StreamKind::PowerUps);
        self.cancel(StreamKind::PlayerRespawn);
    }

    /// Reports whether the provided stream still has emissions pending.
    #[must_use]
    pub fn is_active(&self, stream: StreamKind) -> bool {
        match stream {
            StreamKind::Enemies => self.enemies.is_some(),
            StreamKind::PowerUps => self.power_ups.is_some(),
            StreamKind::PlayerRespawn => self.respawn.is_some(),
        }
    }

    /// Lists the streams that still have emissions pending.
    #[must_use]
    pub fn active_streams(&self) -> Vec<StreamKind> {
        [
            StreamKind::Enemies,
            StreamKind::PowerUps,
            StreamKind::PlayerRespawn,
        ]
        .into_iter()
        .filter(|stream| self.is_active(*stream))
        .collect()
    }

    /// Advances every stream by `dt` and appends the requests that came due.
    ///
    /// Requests are appended enemies first, then power-ups, then the player.
    pub fn advance(
        &mut self,
        dt: Duration,
        boundary: &dyn SpawnBoundary,
        out: &mut Vec<SpawnRequest>,
    ) {
        self.advance_enemies(dt, boundary, out);
        self.advance_power_ups(dt, boundary, out);
        self.advance_respawn(dt, out);
    }

    fn advance_enemies(
        &mut self,
        dt: Duration,
        boundary: &dyn SpawnBoundary,
        out: &mut Vec<SpawnRequest>,
    ) {
        let Some(stream) = self.enemies.as_mut() else {
            return;
        };

        stream.accumulator = stream.accumulator.saturating_add(dt);
        let attempts = stream.resolve_spawn_attempts();
        let tuning = stream.tuning;
        let finished = stream.remaining == 0;

        for _ in 0..attempts {
            out.push(SpawnRequest {
                kind: EntityKind::Enemy,
                position: boundary.random_top_position(&mut self.rng),
                tuning: SpawnTuning::Enemy(tuning),
            });
        }

        if finished {
            debug!("enemy stream exhausted");
            self.enemies = None;
        }
    }

    fn advance_power_ups(
        &mut self,
        dt: Duration,
        boundary: &dyn SpawnBoundary,
        out: &mut Vec<SpawnRequest>,
    ) {
        let Some(stream) = self.power_ups.as_mut() else {
            return;
        };

        stream.accumulator = stream.accumulator.saturating_add(dt);
        while stream.accumulator >= stream.next_wait {
            stream.accumulator -= stream.next_wait;
            let variant = self.rng.gen_range(0..self.power_up_variants);
            out.push(SpawnRequest {
                kind: EntityKind::PowerUp(PowerUpKind::new(variant)),
                position: boundary.random_top_position(&mut self.rng),
                tuning: SpawnTuning::PowerUp,
            });
            stream.next_wait = sample_wait(&mut self.rng, stream.min_wait, stream.max_wait);
        }
    }

    fn advance_respawn(&mut self, dt: Duration, out: &mut Vec<SpawnRequest>) {
        let Some(timer) = self.respawn.as_mut() else {
            return;
        };

        timer.remaining = timer.remaining.saturating_sub(dt);
        if !timer.remaining.is_zero() {
            return;
        }

        out.push(SpawnRequest {
            kind: EntityKind::Player,
            position: timer.position,
            tuning: SpawnTuning::Player(timer.tuning),
        });
        self.respawn = None;
    }
}

fn sample_wait(rng: &mut ChaCha8Rng, min_wait: f32, max_wait: f32) -> Duration {
    let seconds = if min_wait < max_wait {
        rng.gen_range(min_wait..=max_wait)
    } else {
        min_wait
    };
    duration_from_seconds(seconds)
        .unwrap_or(MIN_POWER_UP_WAIT)
        .max(MIN_POWER_UP_WAIT)
}
