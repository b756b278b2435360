//! Observable value store with a subscriber list.
//!
//! Subscribers are notified synchronously after each effective change. A
//! subscription stays live until it is explicitly removed, so owners must
//! unsubscribe on teardown.

use std::fmt;

/// Handle returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Box<dyn FnMut(&T)>;

/// A value plus the callbacks interested in its changes.
pub struct Observable<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
}

impl<T> Observable<T> {
    /// Wraps an initial value with no subscribers.
    pub fn new(initial_value: T) -> Self {
        Self {
            value: initial_value,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Returns the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutates the value in place. `f` returns whether it changed anything;
    /// subscribers are notified only in that case.
    pub fn update(&mut self, f: impl FnOnce(&mut T) -> bool) -> bool {
        let changed = f(&mut self.value);
        if changed {
            self.notify();
        }
        changed
    }

    /// Registers a change callback.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a callback. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Drops every callback.
    pub fn clear_subscribers(&mut self) {
        self.subscribers.clear();
    }

    fn notify(&mut self) {
        let value = &self.value;
        for (_, subscriber) in &mut self.subscribers {
            subscriber(value);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_update_respects_changed_flag() {
        let count = Rc::new(RefCell::new(0));
        let mut observable = Observable::new(Vec::<u8>::new());
        let sink = Rc::clone(&count);
        observable.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(observable.update(|v| {
            v.push(1);
            true
        }));
        assert!(!observable.update(|_| false));

        assert_eq!(*count.borrow(), 1);
        assert_eq!(observable.get(), &vec![1]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        // Arrange
        let count = Rc::new(RefCell::new(0));
        let mut observable = Observable::new(0);
        let sink = Rc::clone(&count);
        let id = observable.subscribe(move |_| *sink.borrow_mut() += 1);

        // Act
        observable.update(|v| {
            *v = 1;
            true
        });
        assert!(observable.unsubscribe(id));
        assert!(!observable.unsubscribe(id));
        observable.update(|v| {
            *v = 2;
            true
        });

        // Assert
        assert_eq!(*count.borrow(), 1);
        assert_eq!(*observable.get(), 2);
    }
}
