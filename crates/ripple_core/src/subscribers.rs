//! Subscriber registries
//!
//! An ordered set of callbacks addressed by generational handles. Dispatch
//! never iterates the live set: callers take a [`Subscribers::snapshot`],
//! release any borrow on the owner, and check [`Subscribers::contains`]
//! before each call. A callback may therefore add or remove subscribers
//! (including itself) while a dispatch is in flight; removals take effect
//! immediately for the rest of that dispatch, additions on the next one.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::rc::Rc;

new_key_type! {
    /// Handle to one registered callback
    pub struct SubscriberId;
}

/// Callbacks in registration order
pub struct Subscribers<F: ?Sized> {
    entries: SlotMap<SubscriberId, Rc<RefCell<Box<F>>>>,
    order: Vec<SubscriberId>,
}

impl<F: ?Sized> Subscribers<F> {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register a callback; it runs after every callback registered before it
    pub fn insert(&mut self, callback: Box<F>) -> SubscriberId {
        let id = self.entries.insert(Rc::new(RefCell::new(callback)));
        self.order.push(id);
        id
    }

    /// Remove exactly one callback. Returns false if it was already gone.
    pub fn remove(&mut self, id: SubscriberId) -> bool {
        if self.entries.remove(id).is_none() {
            return false;
        }
        self.order.retain(|entry| *entry != id);
        true
    }

    pub fn contains(&self, id: SubscriberId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Detached copy of the current callbacks, in registration order
    pub fn snapshot(&self) -> SmallVec<[(SubscriberId, Rc<RefCell<Box<F>>>); 4]> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(*id).map(|cb| (*id, Rc::clone(cb))))
            .collect()
    }
}

impl<F: ?Sized> Default for Subscribers<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> std::fmt::Debug for Subscribers<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.entries.len())
            .finish()
    }
}
