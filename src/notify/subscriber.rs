//! Listeners notified with each freshly reloaded snapshot.

use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

type Listener = Arc<dyn Fn(&[u8]) + Send + Sync>;

/// Handle for a listener that can be dropped to unsubscribe.
///
/// Removal takes effect immediately; the next notification skips it.
pub struct ListenerHandle {
    id: usize,
    registry: Weak<RegistryInner>,
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            let id = self.id;
            inner.listeners.rcu(|current| {
                current
                    .iter()
                    .filter(|(listener_id, _)| *listener_id != id)
                    .cloned()
                    .collect::<Vec<_>>()
            });
        }
    }
}

struct RegistryInner {
    listeners: ArcSwap<Vec<(usize, Listener)>>,
    next_id: AtomicUsize,
}

/// Registry of callbacks invoked whenever a watched file is reloaded.
///
/// The listener list is swapped atomically on subscribe and unsubscribe, so
/// notifying never takes a lock and can run from inside a watch callback.
///
/// # Examples
///
/// ```rust
/// use hotfile::notify::ListenerRegistry;
///
/// let registry = ListenerRegistry::new();
///
/// let handle = registry.subscribe(|data| {
///     println!("reloaded {} bytes", data.len());
/// });
///
/// registry.notify_all(b"port = 8080");
///
/// // Unsubscribe by dropping the handle
/// drop(handle);
/// ```
#[derive(Clone)]
pub struct ListenerRegistry {
    inner: Arc<RegistryInner>,
}

impl ListenerRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                listeners: ArcSwap::from_pointee(Vec::new()),
                next_id: AtomicUsize::new(0),
            }),
        }
    }

    /// Register a listener. Returns a handle that unsubscribes on drop.
    pub fn subscribe<F>(&self, listener: F) -> ListenerHandle
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener = Arc::new(listener);

        self.inner.listeners.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push((id, Arc::clone(&listener)));
            next
        });

        ListenerHandle {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    /// Call every listener, in subscription order, with `data`.
    pub fn notify_all(&self, data: &[u8]) {
        let listeners = self.inner.listeners.load();
        for (_id, listener) in listeners.iter() {
            listener(data);
        }
    }

    /// Get the number of active listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.load().len()
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
