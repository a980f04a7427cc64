//! Text HUD driven by combat events and the end-of-session notification.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use tracing::debug;
use wave_shooter_core::{EndOfSessionObserver, Outcome};
use wave_shooter_session::Session;

const SHIP: char = '^';
const LOST_SHIP: char = '.';
/// Ship icons drawn at most; lives beyond this are not shown.
const MAX_SHIP_ICONS: u32 = 10;

/// Heads-up display state mirrored from the session's notifications.
#[derive(Debug)]
pub(crate) struct Hud {
    score: Cell<u64>,
    ships: RefCell<Vec<bool>>,
    banner: Cell<Option<&'static str>>,
}

impl Hud {
    /// Creates a HUD showing up to `lives` ship icons and a zero score.
    pub(crate) fn new(lives: u32) -> Self {
        Self {
            score: Cell::new(0),
            ships: RefCell::new(vec![true; lives.min(MAX_SHIP_ICONS) as usize]),
            banner: Cell::new(None),
        }
    }

    /// Creates a HUD and subscribes it to the session's notifications.
    pub(crate) fn attach(session: &mut Session, lives: u32) -> Rc<Self> {
        let hud = Rc::new(Self::new(lives));

        let listener = Rc::clone(&hud);
        let _ = session
            .combat_events_mut()
            .on_score_updated(move |score| listener.show_score(score));

        let listener = Rc::clone(&hud);
        let _ = session
            .combat_events_mut()
            .on_life_lost(move |remaining| listener.hide_ship(remaining));

        let _ = session.end_of_session_mut().add_observer(hud.clone());
        hud
    }

    fn show_score(&self, score: u64) {
        self.score.set(score);
        debug!(score = %self.score_text(), "hud score");
    }

    fn hide_ship(&self, remaining: u32) {
        let mut ships = self.ships.borrow_mut();
        if let Some(ship) = ships.get_mut(remaining as usize) {
            *ship = false;
        }
        debug!(remaining, "hud ship hidden");
    }

    /// Score zero-padded to five digits.
    pub(crate) fn score_text(&self) -> String {
        format!("{:05}", self.score.get())
    }

    /// Row of ship icons, lost ships drawn as dots.
    pub(crate) fn ships_text(&self) -> String {
        self.ships
            .borrow()
            .iter()
            .map(|visible| if *visible { SHIP } else { LOST_SHIP })
            .collect()
    }

    /// Banner shown once the session ended.
    pub(crate) fn banner(&self) -> Option<&'static str> {
        self.banner.get()
    }
}

impl EndOfSessionObserver for Hud {
    fn notify(&self, outcome: Outcome) {
        self.banner.set(Some(match outcome {
            Outcome::Victory => "You Win!",
            Outcome::Defeat => "Game Over",
        }));
    }
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SCORE {}  SHIPS {}", self.score_text(), self.ships_text())?;
        if let Some(banner) = self.banner() {
            write!(f, "  {banner}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_zero_padded() {
        let hud = Hud::new(3);
        assert_eq!(hud.score_text(), "00000");
        hud.show_score(350);
        assert_eq!(hud.score_text(), "00350");
        hud.show_score(1_234_567);
        assert_eq!(hud.score_text(), "1234567");
    }

    #[test]
    fn life_lost_hides_the_ship_at_the_remaining_index() {
        let hud = Hud::new(3);
        hud.hide_ship(2);
        assert_eq!(hud.ships_text(), "^^.");
        hud.hide_ship(1);
        hud.hide_ship(0);
        assert_eq!(hud.ships_text(), "...");
        hud.hide_ship(7);
        assert_eq!(hud.ships_text(), "...");
    }

    #[test]
    fn ship_row_is_capped() {
        let hud = Hud::new(u32::MAX);
        assert_eq!(hud.ships_text(), "^".repeat(MAX_SHIP_ICONS as usize));
        hud.hide_ship(u32::MAX - 1);
        assert_eq!(hud.ships_text().len(), MAX_SHIP_ICONS as usize);
        hud.hide_ship(MAX_SHIP_ICONS - 1);
        assert!(hud.ships_text().ends_with('.'));
    }

    #[test]
    fn banner_reflects_outcome() {
        let hud = Hud::new(1);
        assert_eq!(hud.banner(), None);
        hud.notify(Outcome::Defeat);
        assert_eq!(hud.banner(), Some("Game Over"));
        assert_eq!(hud.to_string(), "SCORE 00000  SHIPS ^  Game Over");

        let hud = Hud::new(1);
        hud.notify(Outcome::Victory);
        assert_eq!(hud.banner(), Some("You Win!"));
    }
}
