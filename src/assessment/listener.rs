//! Pointer-down listeners with scoped registration.
//!
//! A handler stays registered exactly as long as its [`ListenerGuard`]
//! lives. Dropping the guard, on any path, removes the handler.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::autocomplete::SuggestionKey;

/// A pointer press, with the food input it landed on (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDown {
    pub target: Option<SuggestionKey>,
}

type Handler = Box<dyn Fn(&PointerDown) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<u64, Handler>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Page-wide pointer-down event source.
#[derive(Clone, Default)]
pub struct PointerHub {
    registry: Arc<Mutex<Registry>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` until the returned guard is dropped.
    #[must_use = "the listener is removed as soon as the guard is dropped"]
    pub fn subscribe<F>(&self, handler: F) -> ListenerGuard
    where
        F: Fn(&PointerDown) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.handlers.insert(id, Box::new(handler));
        tracing::trace!(listener = id, "Pointer listener attached");

        ListenerGuard {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver an event to every registered handler.
    pub fn dispatch(&self, event: &PointerDown) {
        let registry = lock(&self.registry);
        for handler in registry.handlers.values() {
            handler(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).handlers.len()
    }
}

impl std::fmt::Debug for PointerHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Keeps one handler registered on a [`PointerHub`].
#[derive(Debug)]
pub struct ListenerGuard {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).handlers.remove(&self.id);
            tracing::trace!(listener = self.id, "Pointer listener detached");
        }
    }
}
