#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Synchronous fan-out of score and life notifications to subscribers.
//!
//! The hub exposes two channels, score-updated and life-lost. The session
//! publishes every event it emits through [`CombatEventHub::publish`]; events
//! on other channels are ignored. Delivery happens in the calling tick, in
//! subscription order, and a channel without subscribers is a no-op.

use std::fmt;

use tracing::trace;
use wave_shooter_core::Event;

/// Token returned on subscription and used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type ScoreListener = Box<dyn FnMut(u64)>;
type LifeListener = Box<dyn FnMut(u32)>;

/// Registry of score-updated and life-lost subscribers.
#[derive(Default)]
pub struct CombatEventHub {
    next_id: u64,
    score_updated: Vec<(SubscriptionId, ScoreListener)>,
    life_lost: Vec<(SubscriptionId, LifeListener)>,
}

impl CombatEventHub {
    /// Creates a hub without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to cumulative score updates.
    pub fn on_score_updated(&mut self, listener: impl FnMut(u64) + 'static) -> SubscriptionId {
        let id = self.allocate_id();
        self.score_updated.push((id, Box::new(listener)));
        id
    }

    /// Subscribes to life-lost notifications carrying the remaining lives.
    pub fn on_life_lost(&mut self, listener: impl FnMut(u32) + 'static) -> SubscriptionId {
        let id = self.allocate_id();
        self.life_lost.push((id, Box::new(listener)));
        id
    }

    /// Removes a subscription from whichever channel holds it.
    ///
    /// Returns `false` when the subscription was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriber_count();
        self.score_updated.retain(|(existing, _)| *existing != id);
        self.life_lost.retain(|(existing, _)| *existing != id);
        self.subscriber_count() != before
    }

    /// Total number of subscriptions across both channels.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.score_updated.len() + self.life_lost.len()
    }

    /// Delivers the event to the subscribers of its channel.
    pub fn publish(&mut self, event: &Event) {
        match *event {
            Event::ScoreUpdated { score } => {
                trace!(score, listeners = self.score_updated.len(), "score updated");
                for (_, listener) in &mut self.score_updated {
                    listener(score);
                }
            }
            Event::LifeLost { remaining } => {
                trace!(remaining, listeners = self.life_lost.len(), "life lost");
                for (_, listener) in &mut self.life_lost {
                    listener(remaining);
                }
            }
            _ => {}
        }
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl fmt::Debug for CombatEventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatEventHub")
            .field("score_updated", &self.score_updated.len())
            .field("life_lost", &self.life_lost.len())
            .finish()
    }
}
