//! Summary printed after a headless run.

use std::{fmt, time::Duration};

use serde::Serialize;
use wave_shooter_core::Outcome;
use wave_shooter_session::{query, Session};

use crate::{headless::HeadlessFactory, hud::Hud};

/// Final state of a headless session.
#[derive(Debug, Serialize)]
pub(crate) struct SessionReport {
    outcome: Option<Outcome>,
    banner: Option<&'static str>,
    score: u64,
    lives: u32,
    ships: String,
    levels_completed: usize,
    level_count: usize,
    ticks: u32,
    simulated_seconds: f64,
    entities_spawned: usize,
    entities_notified: usize,
}

impl SessionReport {
    /// Captures the report from the session and its adapters.
    pub(crate) fn capture(
        session: &Session,
        hud: &Hud,
        factory: &HeadlessFactory,
        ticks: u32,
        tick: Duration,
    ) -> Self {
        Self {
            outcome: query::outcome(session),
            banner: hud.banner(),
            score: query::score(session),
            lives: query::lives(session),
            ships: hud.ships_text(),
            levels_completed: query::levels_completed(session),
            level_count: query::level_count(session),
            ticks,
            simulated_seconds: tick.as_secs_f64() * f64::from(ticks),
            entities_spawned: factory.spawned(),
            entities_notified: factory.notified(),
        }
    }

    /// Outcome of the session, `None` when the tick limit was reached first.
    pub(crate) fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.banner.unwrap_or("Session unfinished"))?;
        writeln!(f, "score   {:05}", self.score)?;
        writeln!(f, "ships   {} ({} left)", self.ships, self.lives)?;
        writeln!(
            f,
            "levels  {}/{}",
            self.levels_completed, self.level_count
        )?;
        writeln!(
            f,
            "time    {:.2}s over {} ticks",
            self.simulated_seconds, self.ticks
        )?;
        write!(
            f,
            "spawned {} entities, {} notified of the end",
            self.entities_spawned, self.entities_notified
        )
    }
}
