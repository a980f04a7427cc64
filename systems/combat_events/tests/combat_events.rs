use std::{cell::RefCell, rc::Rc, time::Duration};

use wave_shooter_core::{Event, Outcome};
use wave_shooter_system_combat_events::CombatEventHub;

fn recorder<T: 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(T) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |value| sink.borrow_mut().push(value))
}

#[test]
fn routes_events_to_their_channel() {
    let mut hub = CombatEventHub::new();
    let (scores, on_score) = recorder::<u64>();
    let (lives, on_life) = recorder::<u32>();
    let _ = hub.on_score_updated(on_score);
    let _ = hub.on_life_lost(on_life);

    for event in [
        Event::ScoreUpdated { score: 10 },
        Event::LifeLost { remaining: 2 },
        Event::TimeAdvanced {
            dt: Duration::from_millis(16),
        },
        Event::ScoreUpdated { score: 30 },
        Event::SessionEnded {
            outcome: Outcome::Defeat,
        },
    ] {
        hub.publish(&event);
    }

    assert_eq!(*scores.borrow(), vec![10, 30]);
    assert_eq!(*lives.borrow(), vec![2]);
}

#[test]
fn every_subscriber_receives_each_notification() {
    let mut hub = CombatEventHub::new();
    let (first, on_first) = recorder::<u64>();
    let (second, on_second) = recorder::<u64>();
    let _ = hub.on_score_updated(on_first);
    let _ = hub.on_score_updated(on_second);

    hub.publish(&Event::ScoreUpdated { score: 5 });

    assert_eq!(*first.borrow(), vec![5]);
    assert_eq!(*second.borrow(), vec![5]);
}

#[test]
fn unsubscribed_listeners_stop_receiving() {
    let mut hub = CombatEventHub::new();
    let (lives, on_life) = recorder::<u32>();
    let subscription = hub.on_life_lost(on_life);

    hub.publish(&Event::LifeLost { remaining: 1 });
    assert!(hub.unsubscribe(subscription));
    assert!(!hub.unsubscribe(subscription), "second removal is a no-op");
    hub.publish(&Event::LifeLost { remaining: 0 });

    assert_eq!(*lives.borrow(), vec![1]);
    assert_eq!(hub.subscriber_count(), 0);
}
