//! Change notifications
//!
//! Subscribers register a callback and get back a [`Subscription`] guard.
//! Dropping the guard unsubscribes, so a subscriber cannot outlive its owner
//! by accident.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::resolution::DetailLevel;

/// Emitted after a setting changes. Persisted setters emit their typed
/// event followed by `Changed`; brightness only emits `Brightness`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsEvent {
    MusicVolume(f32),
    SoundVolume(f32),
    ResolutionLevel(DetailLevel),
    FullScreen(bool),
    PostProcessing(bool),
    Brightness(f32),
    Changed,
}

type Callback = Rc<RefCell<dyn FnMut(&SettingsEvent)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(u64, Callback)>,
}

/// Subscriber list owned by the settings store
#[derive(Default)]
pub struct Observers {
    registry: Rc<RefCell<Registry>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl FnMut(&SettingsEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let callback: Callback = Rc::new(RefCell::new(callback));
        registry.subscribers.push((id, callback));
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` to every subscriber, in subscription order.
    /// The list is snapshotted first so callbacks may subscribe or unsubscribe.
    pub fn emit(&self, event: &SettingsEvent) {
        let snapshot: Vec<Callback> = self
            .registry
            .borrow()
            .subscribers
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in snapshot {
            (&mut *callback.borrow_mut())(event);
        }
    }
}

/// Keeps a callback registered until dropped
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Unsubscribe now (same as dropping)
    pub fn cancel(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Registry may already be gone with its store
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<SettingsEvent>>>, impl FnMut(&SettingsEvent) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |event: &SettingsEvent| sink.borrow_mut().push(*event))
    }

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let observers = Observers::new();
        let (first, cb1) = recorder();
        let (second, cb2) = recorder();
        let _s1 = observers.subscribe(cb1);
        let _s2 = observers.subscribe(cb2);

        observers.emit(&SettingsEvent::FullScreen(true));

        assert_eq!(*first.borrow(), vec![SettingsEvent::FullScreen(true)]);
        assert_eq!(*second.borrow(), vec![SettingsEvent::FullScreen(true)]);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let observers = Observers::new();
        let (seen, cb) = recorder();
        let subscription = observers.subscribe(cb);
        assert_eq!(observers.len(), 1);

        drop(subscription);
        assert!(observers.is_empty());

        observers.emit(&SettingsEvent::Changed);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_cancel_only_removes_own_callback() {
        let observers = Observers::new();
        let (kept, cb1) = recorder();
        let (_gone, cb2) = recorder();
        let _keep = observers.subscribe(cb1);
        observers.subscribe(cb2).cancel();

        observers.emit(&SettingsEvent::Changed);
        assert_eq!(observers.len(), 1);
        assert_eq!(kept.borrow().len(), 1);
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let observers = Observers::new();
        let subscription = observers.subscribe(|_| {});
        drop(observers);
        // Must not panic
        drop(subscription);
    }

    #[test]
    fn test_unsubscribe_from_callback() {
        let observers = Observers::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let calls = Rc::new(RefCell::new(0));

        let inner_slot = Rc::clone(&slot);
        let inner_calls = Rc::clone(&calls);
        let subscription = observers.subscribe(move |_| {
            *inner_calls.borrow_mut() += 1;
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(subscription);

        observers.emit(&SettingsEvent::Changed);
        observers.emit(&SettingsEvent::Changed);

        assert_eq!(*calls.borrow(), 1);
        assert!(observers.is_empty());
    }
}
