//! Observable values with ordered change listeners.
//!
//! An [`Observable`] holds one value and a registry of listeners. Every
//! [`Observable::set`] notifies all listeners synchronously, in registration
//! order, with the old and the new value.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by a subscription, used to unsubscribe again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

type ChangeListener<T> = Rc<dyn Fn(&T, &T)>;

/// Single value plus change listeners.
///
/// Listeners receive `(&old, &new)`.
pub struct Observable<T> {
    value: RefCell<T>,
    listeners: RefCell<Vec<(ListenerId, ChangeListener<T>)>>,
    next_id: Cell<u64>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RefCell::new(value),
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Current value (cloned).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Replace the value, notify listeners, and return the previous value.
    ///
    /// No borrow is held while listeners run, so a listener may set this
    /// observable again. The nested set notifies every listener before the
    /// outer notification continues.
    pub fn set(&self, value: T) -> T
    where
        T: Clone,
    {
        let old = self.value.replace(value.clone());
        // Snapshot so listeners may (un)subscribe while being notified.
        let listeners: Vec<ChangeListener<T>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(&old, &value);
        }
        old
    }

    pub fn subscribe(&self, listener: impl Fn(&T, &T) + 'static) -> ListenerId {
        let id = ListenerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Shared handle to an [`Observable`] that can be read and watched but not set.
pub struct ReadOnly<T> {
    inner: Rc<Observable<T>>,
}

impl<T> ReadOnly<T> {
    pub fn new(inner: Rc<Observable<T>>) -> Self {
        Self { inner }
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.inner.get()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    pub fn subscribe(&self, listener: impl Fn(&T, &T) + 'static) -> ListenerId {
        self.inner.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listener_count()
    }
}

impl<T> Clone for ReadOnly<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReadOnly<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_set_notifies_in_registration_order() {
        let obs = Observable::new(1);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l1 = Rc::clone(&log);
        obs.subscribe(move |old, new| l1.borrow_mut().push(("first", *old, *new)));
        let l2 = Rc::clone(&log);
        obs.subscribe(move |old, new| l2.borrow_mut().push(("second", *old, *new)));

        assert_eq!(obs.set(5), 1);
        assert_eq!(
            *log.borrow(),
            vec![("first", 1, 5), ("second", 1, 5)]
        );
        assert_eq!(obs.get(), 5);
    }

    #[test]
    fn test_unsubscribe() {
        let obs = Observable::new(0.0_f32);
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let id = obs.subscribe(move |_, _| h.set(h.get() + 1));

        obs.set(1.0);
        assert!(obs.unsubscribe(id));
        assert!(!obs.unsubscribe(id));
        obs.set(2.0);

        assert_eq!(hits.get(), 1);
        assert_eq!(obs.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_unsubscribe_during_notify() {
        let obs = Rc::new(Observable::new(0));
        let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let weak = Rc::downgrade(&obs);
        let s = Rc::clone(&slot);
        let id = obs.subscribe(move |_, _| {
            if let (Some(o), Some(id)) = (weak.upgrade(), s.get()) {
                o.unsubscribe(id);
            }
        });
        slot.set(Some(id));

        obs.set(1);
        assert_eq!(obs.listener_count(), 0);
    }

    #[test]
    fn test_listener_may_set_again() {
        let obs = Rc::new(Observable::new(0_i32));
        let log = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&obs);
        obs.subscribe(move |_, new| {
            if *new < 0 {
                if let Some(o) = weak.upgrade() {
                    o.set(0);
                }
            }
        });
        let l = Rc::clone(&log);
        obs.subscribe(move |old, new| l.borrow_mut().push((*old, *new)));

        assert_eq!(obs.set(-3), 0);
        assert_eq!(obs.get(), 0);
        // Nested set reported first, then the rest of the outer notification
        assert_eq!(*log.borrow(), vec![(-3, 0), (0, -3)]);
    }

    #[test]
    fn test_read_only_handle_tracks_source() {
        let obs = Rc::new(Observable::new(1.0_f32));
        let handle = ReadOnly::new(Rc::clone(&obs));
        let seen = Rc::new(Cell::new(0.0_f32));
        let s = Rc::clone(&seen);
        handle.subscribe(move |_, new| s.set(*new));

        obs.set(2.5);
        assert_eq!(handle.get(), 2.5);
        assert_eq!(seen.get(), 2.5);
        assert_eq!(handle.clone().listener_count(), 1);
    }
}
