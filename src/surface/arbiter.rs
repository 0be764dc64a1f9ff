use std::sync::Arc;

use parking_lot::Mutex;

use crate::id_generator;

pub type ToolId = usize;

#[derive(Debug, Default)]
struct ArbiterState {
    registered: Vec<ToolId>,
    holder: Option<ToolId>,
}

/// Advisory lock deciding which tool on a surface owns the current gesture.
///
/// Every tool registers once when it is bound to the surface. A tool must
/// hold the lock for the whole of a spawn, vertex drag or shape drag, and
/// siblings ignore pointer-downs while another tool holds it.
#[derive(Debug, Clone, Default)]
pub struct Arbiter {
    state: Arc<Mutex<ArbiterState>>,
}

impl Arbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self) -> ToolId {
        let id = id_generator::generate_tool_id();
        self.state.lock().registered.push(id);
        id
    }

    pub fn unregister(&self, tool: ToolId) {
        let mut state = self.state.lock();
        state.registered.retain(|id| *id != tool);
        if state.holder == Some(tool) {
            state.holder = None;
        }
    }

    /// Take the lock for `tool`. Re-acquiring a lock already held succeeds.
    pub fn try_acquire(&self, tool: ToolId) -> bool {
        let mut state = self.state.lock();
        if !state.registered.contains(&tool) {
            log::warn!("Tool {} is not registered with this surface", tool);
            return false;
        }
        match state.holder {
            None => {
                state.holder = Some(tool);
                true
            }
            Some(holder) => holder == tool,
        }
    }

    /// Release the lock if `tool` holds it
    pub fn release(&self, tool: ToolId) {
        let mut state = self.state.lock();
        if state.holder == Some(tool) {
            state.holder = None;
        }
    }

    pub fn holder(&self) -> Option<ToolId> {
        self.state.lock().holder
    }

    pub fn is_held_by_other(&self, tool: ToolId) -> bool {
        matches!(self.state.lock().holder, Some(holder) if holder != tool)
    }

    pub fn registered_count(&self) -> usize {
        self.state.lock().registered.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_is_exclusive() {
        let arbiter = Arbiter::new();
        let a = arbiter.register();
        let b = arbiter.register();

        assert!(arbiter.try_acquire(a));
        assert!(arbiter.try_acquire(a));
        assert!(!arbiter.try_acquire(b));
        assert!(arbiter.is_held_by_other(b));

        // Only the holder can release
        arbiter.release(b);
        assert_eq!(arbiter.holder(), Some(a));
        arbiter.release(a);
        assert!(arbiter.try_acquire(b));
    }

    #[test]
    fn test_unregister_drops_held_lock() {
        let arbiter = Arbiter::new();
        let a = arbiter.register();
        assert!(arbiter.try_acquire(a));
        arbiter.unregister(a);
        assert_eq!(arbiter.holder(), None);
        assert_eq!(arbiter.registered_count(), 0);
        assert!(!arbiter.try_acquire(a));
    }

    #[test]
    fn test_clones_share_state() {
        let arbiter = Arbiter::new();
        let shared = arbiter.clone();
        let a = arbiter.register();
        assert!(shared.try_acquire(a));
        assert_eq!(arbiter.holder(), Some(a));
    }
}
