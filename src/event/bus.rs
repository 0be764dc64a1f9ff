use std::cell::{Cell, RefCell};

use super::{LifecycleEvent, ToolEvent};

pub type SubscriptionId = usize;

type Callback<E> = Box<dyn FnMut(&ToolEvent<'_, E>)>;

/// Ordered listeners per lifecycle event.
///
/// Several subscriptions to the same event coexist and fire in the order
/// they were registered, synchronously, before the triggering handler
/// returns.
pub struct CallbackRegistry<E> {
    next_id: Cell<SubscriptionId>,
    callbacks: RefCell<Vec<(SubscriptionId, LifecycleEvent, Callback<E>)>>,
}

impl<E> std::fmt::Debug for CallbackRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &format!("<{} callbacks>", self.callbacks.borrow().len()))
            .finish()
    }
}

impl<E> Default for CallbackRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> CallbackRegistry<E> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            callbacks: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe(
        &self,
        kind: LifecycleEvent,
        callback: impl FnMut(&ToolEvent<'_, E>) + 'static,
    ) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.callbacks.borrow_mut().push((id, kind, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let before = callbacks.len();
        callbacks.retain(|(entry_id, _, _)| *entry_id != id);
        callbacks.len() != before
    }

    pub fn count(&self, kind: LifecycleEvent) -> usize {
        self.callbacks
            .borrow()
            .iter()
            .filter(|(_, entry_kind, _)| *entry_kind == kind)
            .count()
    }

    /// Call every listener for `event.kind` in registration order
    pub fn emit(&self, event: &ToolEvent<'_, E>) {
        for (_, kind, callback) in self.callbacks.borrow_mut().iter_mut() {
            if *kind == event.kind {
                callback(event);
            }
        }
    }
}
