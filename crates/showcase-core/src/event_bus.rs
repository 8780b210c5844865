//! Synchronous publish/subscribe used for every observable stream.
//!
//! Listeners are invoked on the publishing task, in registration order.
//! `subscribe` hands back a [`Subscription`] disposer; dropping it (or calling
//! [`Subscription::unsubscribe`]) removes the listener.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
}

/// A cloneable handle to a list of listeners for values of type `T`.
///
/// Clones share the same listener list.
pub struct EventBus<T> {
    registry: Arc<Registry<T>>,
}

impl<T> Clone for EventBus<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> EventBus<T> {
    /// Creates a bus without listeners.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                next_id: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Registers a listener.
    ///
    /// # Returns
    ///
    /// A [`Subscription`] that removes the listener when dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
        T: 'static,
    {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, Arc::new(listener)));

        let weak: Weak<Registry<T>> = Arc::downgrade(&self.registry);
        Subscription {
            dispose: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    let mut listeners = registry
                        .listeners
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    listeners.retain(|(listener_id, _)| *listener_id != id);
                }
            })),
        }
    }

    /// Delivers `value` to every listener, in registration order.
    ///
    /// The listener list is snapshotted first, so a listener may subscribe or
    /// unsubscribe from within its callback.
    pub fn publish(&self, value: &T) {
        let snapshot: Vec<Listener<T>> = self
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(u64, Listener<T>)>> {
        self.registry
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Send + Sync + 'static> EventBus<T> {
    /// Publishes `value` after the current synchronous work has completed.
    ///
    /// Inside a tokio runtime the delivery is spawned and yields once before
    /// publishing, so a listener registered right after the triggering call
    /// still receives it. Outside a runtime the value is published
    /// immediately.
    pub fn publish_deferred(&self, value: T) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let bus = self.clone();
                handle.spawn(async move {
                    tokio::task::yield_now().await;
                    bus.publish(&value);
                });
            }
            Err(_) => self.publish(&value),
        }
    }
}

/// Disposer returned by [`EventBus::subscribe`].
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Removes the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}
