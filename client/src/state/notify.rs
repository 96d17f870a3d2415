//! Subscriber registry shared by the stores.
//!
//! DESIGN
//! ======
//! Each store owns its own `Subscribers`; nothing here is global. Callbacks
//! are cloned out of the registry before they run, so a callback may re-enter
//! the registry or the store.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Rc<dyn Fn(&T)>;

/// Ordered list of change callbacks for one store.
pub struct Subscribers<T> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(SubscriptionId, Callback<T>)>>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self { next_id: Cell::new(0), entries: RefCell::new(Vec::new()) }
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers").field("len", &self.len()).finish()
    }
}

impl<T> Subscribers<T> {
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push((id, Rc::new(callback)));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Call every registered callback in subscription order.
    pub fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = self.entries.borrow().iter().map(|(_, cb)| Rc::clone(cb)).collect();
        for callback in callbacks {
            callback(value);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
