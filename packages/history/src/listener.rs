use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use slab::Slab;

type Listeners = Rc<RefCell<Slab<Rc<dyn Fn()>>>>;

/// A set of callbacks that are invoked whenever something they observe changes.
///
/// Every subscription hands out a [`ListenerHandle`]. Dropping the handle, or calling
/// [`ListenerHandle::cancel`], removes the callback again.
///
/// ```rust
/// # use std::{cell::Cell, rc::Rc};
/// # use waymark_history::ListenerSet;
/// let listeners = ListenerSet::new();
/// let hits = Rc::new(Cell::new(0));
///
/// let counter = hits.clone();
/// let handle = listeners.subscribe(Rc::new(move || counter.set(counter.get() + 1)));
/// listeners.notify();
/// assert_eq!(hits.get(), 1);
///
/// handle.cancel();
/// listeners.notify();
/// assert_eq!(hits.get(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ListenerSet {
    listeners: Listeners,
}

impl ListenerSet {
    /// Create an empty [`ListenerSet`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`. It stays registered for as long as the returned handle lives.
    pub fn subscribe(&self, callback: Rc<dyn Fn()>) -> ListenerHandle {
        let id = self.listeners.borrow_mut().insert(callback);
        ListenerHandle {
            listeners: Rc::downgrade(&self.listeners),
            id: Some(id),
        }
    }

    /// Invoke every registered callback.
    ///
    /// The callbacks are collected before any of them runs, so a callback may subscribe,
    /// cancel or trigger another notification without tripping over a borrowed set.
    pub fn notify(&self) {
        let snapshot: Vec<_> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();

        for callback in snapshot {
            (*callback)();
        }
    }

    /// The number of live subscriptions.
    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Check whether nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }
}

/// A live subscription to a [`ListenerSet`].
///
/// The subscription ends when the handle is dropped.
#[must_use = "the subscription is cancelled as soon as the handle is dropped"]
pub struct ListenerHandle {
    listeners: Weak<RefCell<Slab<Rc<dyn Fn()>>>>,
    id: Option<usize>,
}

impl ListenerHandle {
    /// End the subscription now.
    pub fn cancel(mut self) {
        self.release();
    }

    /// Check whether the callback is still registered.
    ///
    /// This is [`false`] once the owning [`ListenerSet`] is gone.
    pub fn is_active(&self) -> bool {
        match (self.id, self.listeners.upgrade()) {
            (Some(id), Some(listeners)) => listeners.borrow().contains(id),
            _ => false,
        }
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(listeners) = self.listeners.upgrade() {
                let _ = listeners.borrow_mut().try_remove(id);
            }
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
