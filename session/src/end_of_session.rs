//! Subject that tells registered observers how the session ended.

use std::{fmt, rc::Rc};

use wave_shooter_core::{EndOfSessionObserver, Outcome};

/// Token returned on registration and used to remove an observer again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Registry of observers awaiting the one-time end-of-session notification.
#[derive(Default)]
pub struct EndOfSessionSubject {
    next_id: u64,
    observers: Vec<(ObserverId, Rc<dyn EndOfSessionObserver>)>,
    delivered: Option<Outcome>,
}

impl EndOfSessionSubject {
    /// Creates a subject without observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer and returns the token that removes it.
    pub fn add_observer(&mut self, observer: Rc<dyn EndOfSessionObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Unregisters an observer. Returns `false` when the token was unknown.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Reports whether no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Outcome that was delivered, if the notification already happened.
    #[must_use]
    pub fn delivered(&self) -> Option<Outcome> {
        self.delivered
    }

    /// Notifies every registered observer of the outcome.
    ///
    /// Only the first call delivers anything; later calls return zero. The
    /// observer list is snapshotted first so the set being notified is fixed
    /// when delivery starts.
    pub fn notify_all(&mut self, outcome: Outcome) -> usize {
        if self.delivered.is_some() {
            return 0;
        }
        self.delivered = Some(outcome);

        let snapshot: Vec<Rc<dyn EndOfSessionObserver>> = self
            .observers
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in &snapshot {
            observer.notify(outcome);
        }
        snapshot.len()
    }
}

impl fmt::Debug for EndOfSessionSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndOfSessionSubject")
            .field("observers", &self.observers.len())
            .field("delivered", &self.delivered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Default)]
    struct Counter {
        calls: Cell<u32>,
        last: Cell<Option<Outcome>>,
    }

    impl EndOfSessionObserver for Counter {
        fn notify(&self, outcome: Outcome) {
            self.calls.set(self.calls.get() + 1);
            self.last.set(Some(outcome));
        }
    }

    #[test]
    fn notifies_every_observer_once() {
        let mut subject = EndOfSessionSubject::new();
        let first = Rc::new(Counter::default());
        let second = Rc::new(Counter::default());
        let _ = subject.add_observer(first.clone());
        let _ = subject.add_observer(second.clone());

        assert_eq!(subject.notify_all(Outcome::Victory), 2);
        assert_eq!(subject.notify_all(Outcome::Defeat), 0);

        for counter in [&first, &second] {
            assert_eq!(counter.calls.get(), 1);
            assert_eq!(counter.last.get(), Some(Outcome::Victory));
        }
        assert_eq!(subject.delivered(), Some(Outcome::Victory));
    }

    #[test]
    fn removed_observers_are_skipped() {
        let mut subject = EndOfSessionSubject::new();
        let kept = Rc::new(Counter::default());
        let removed = Rc::new(Counter::default());
        let _ = subject.add_observer(kept.clone());
        let token = subject.add_observer(removed.clone());

        assert!(subject.remove_observer(token));
        assert!(!subject.remove_observer(token));
        assert_eq!(subject.len(), 1);

        let _ = subject.notify_all(Outcome::Defeat);
        assert_eq!(kept.calls.get(), 1);
        assert_eq!(removed.calls.get(), 0);
    }

    #[test]
    fn empty_subject_notifies_nobody() {
        let mut subject = EndOfSessionSubject::new();
        assert!(subject.is_empty());
        assert_eq!(subject.notify_all(Outcome::Victory), 0);
        assert_eq!(subject.delivered(), Some(Outcome::Victory));
    }
}
