//! Toast queue store and observer fan-out.
//!
//! One store instance is shared (via `Arc`) by every producer in the
//! process and by the rendering surface. Every mutation recomputes the
//! full queue snapshot and broadcasts it to all subscribed listeners.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::types::{OpenChangeFn, Toast, ToastPayload, ToastUpdate};

/// Maximum number of records retained in the queue.
const DEFAULT_CAPACITY: usize = 1;

/// Delay between dismissal and removal of a record.
const DEFAULT_REMOVE_DELAY: Duration = Duration::from_secs(1000);

type Listener = Arc<dyn Fn(&[Toast]) + Send + Sync>;

/// Store configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Queue capacity; inserting beyond it evicts the oldest records.
    /// Clamped to a minimum of 1.
    pub capacity: usize,
    /// How long a dismissed record lingers before removal.
    pub remove_delay: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            remove_delay: DEFAULT_REMOVE_DELAY,
        }
    }
}

/// The shared toast store.
///
/// All operations are total: referencing an unknown id is a silent no-op,
/// never an error. Dismissal timers run on the ambient tokio runtime, so
/// [`ToastStore::dismiss`] must be called from within one.
pub struct ToastStore {
    config: StoreConfig,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Newest first.
    toasts: Vec<Toast>,
    listeners: Vec<(u64, Listener)>,
    /// Pending removal task per dismissed record, keyed by toast id.
    timers: HashMap<String, JoinHandle<()>>,
    next_toast_id: u64,
    next_listener_id: u64,
}

impl ToastStore {
    pub fn new(config: StoreConfig) -> Arc<Self> {
        let config = StoreConfig {
            capacity: config.capacity.max(1),
            ..config
        };
        Arc::new(Self {
            config,
            inner: Mutex::new(Inner::default()),
        })
    }

    pub fn with_defaults() -> Arc<Self> {
        Self::new(StoreConfig::default())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Create a new record at the head of the queue and broadcast.
    ///
    /// The record starts with `open = true` and its open-change callback
    /// wired to dismiss it when a surface reports closure. Records pushed
    /// past capacity are evicted from the tail, along with any pending
    /// removal timer they may hold.
    pub fn create(self: &Arc<Self>, payload: ToastPayload) -> ToastHandle {
        let mut inner = self.lock();

        inner.next_toast_id = inner.next_toast_id.wrapping_add(1);
        let id = inner.next_toast_id.to_string();

        let on_open_change: OpenChangeFn = {
            let store = Arc::downgrade(self);
            let id = id.clone();
            Arc::new(move |open| {
                if !open {
                    if let Some(store) = store.upgrade() {
                        store.dismiss(Some(&id));
                    }
                }
            })
        };

        inner.toasts.insert(
            0,
            Toast {
                id: id.clone(),
                title: payload.title,
                description: payload.description,
                action: payload.action,
                variant: payload.variant,
                open: true,
                on_open_change: Some(on_open_change),
            },
        );

        while inner.toasts.len() > self.config.capacity {
            if let Some(evicted) = inner.toasts.pop() {
                if let Some(timer) = inner.timers.remove(&evicted.id) {
                    timer.abort();
                }
                tracing::debug!(id = %evicted.id, "toast evicted");
            }
        }

        tracing::debug!(%id, "toast created");
        self.publish(inner);

        ToastHandle {
            id,
            store: Arc::downgrade(self),
        }
    }

    /// Merge `update` into the record matching `id` and broadcast.
    pub fn update(&self, id: &str, update: ToastUpdate) {
        let mut inner = self.lock();

        let Some(toast) = inner.toasts.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(%id, "update for unknown toast ignored");
            return;
        };

        if let Some(title) = update.title {
            toast.title = Some(title);
        }
        if let Some(description) = update.description {
            toast.description = Some(description);
        }
        if let Some(action) = update.action {
            toast.action = Some(action);
        }
        if let Some(variant) = update.variant {
            toast.variant = variant;
        }
        if let Some(open) = update.open {
            toast.open = open;
        }

        tracing::debug!(%id, "toast updated");
        self.publish(inner);
    }

    /// Close the record matching `id`, or every record when `id` is
    /// `None`, and schedule removal after the configured delay.
    ///
    /// One timer per record id: repeated dismissal of the same record
    /// never stacks timers, so dismissal is idempotent.
    pub fn dismiss(self: &Arc<Self>, id: Option<&str>) {
        let mut inner = self.lock();

        let affected: Vec<String> = inner
            .toasts
            .iter_mut()
            .filter(|t| id.is_none_or(|id| t.id == id))
            .map(|t| {
                t.open = false;
                t.id.clone()
            })
            .collect();

        for id in &affected {
            self.schedule_removal(&mut inner, id);
        }

        tracing::debug!(count = affected.len(), "toasts dismissed");
        self.publish(inner);
    }

    /// Delete the record matching `id`, or clear the queue when `id` is
    /// `None`, cancelling any pending removal timers for the deleted
    /// records.
    pub fn remove(&self, id: Option<&str>) {
        let mut inner = self.lock();

        match id {
            Some(id) => {
                if let Some(timer) = inner.timers.remove(id) {
                    timer.abort();
                }
                inner.toasts.retain(|t| t.id != id);
                tracing::debug!(%id, "toast removed");
            }
            None => {
                for (_, timer) in inner.timers.drain() {
                    timer.abort();
                }
                inner.toasts.clear();
                tracing::debug!("toast queue cleared");
            }
        }

        self.publish(inner);
    }

    /// Register an observer invoked with the full queue snapshot after
    /// every mutation. The returned handle deregisters it on
    /// [`Subscription::unsubscribe`] or drop.
    pub fn subscribe<F>(self: &Arc<Self>, listener: F) -> Subscription
    where
        F: Fn(&[Toast]) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        inner.next_listener_id = inner.next_listener_id.wrapping_add(1);
        let id = inner.next_listener_id;
        inner.listeners.push((id, Arc::new(listener)));
        Subscription {
            id,
            store: Arc::downgrade(self),
        }
    }

    /// Copy of the current queue, newest first.
    pub fn snapshot(&self) -> Vec<Toast> {
        self.lock().toasts.clone()
    }

    /// Number of dismissed records awaiting removal.
    pub fn pending_removals(&self) -> usize {
        self.lock().timers.len()
    }

    fn schedule_removal(self: &Arc<Self>, inner: &mut Inner, id: &str) {
        if inner.timers.contains_key(id) {
            return;
        }

        let task = tokio::spawn({
            let store = Arc::downgrade(self);
            let id = id.to_string();
            let delay = self.config.remove_delay;
            async move {
                sleep(delay).await;
                if let Some(store) = store.upgrade() {
                    store.expire(&id);
                }
            }
        });
        inner.timers.insert(id.to_string(), task);
    }

    /// Removal-timer completion path: drop the record and its timer entry.
    fn expire(&self, id: &str) {
        let mut inner = self.lock();
        inner.timers.remove(id);
        inner.toasts.retain(|t| t.id != id);
        tracing::debug!(%id, "toast expired");
        self.publish(inner);
    }

    fn unsubscribe_listener(&self, id: u64) {
        let mut inner = self.lock();
        inner.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Broadcast the current snapshot to all listeners. The lock is
    /// released first so a listener may call back into the store.
    fn publish(&self, guard: MutexGuard<'_, Inner>) {
        let snapshot = guard.toasts.clone();
        let listeners: Vec<Listener> = guard
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        drop(guard);

        tracing::trace!(
            toasts = snapshot.len(),
            listeners = listeners.len(),
            "broadcasting queue state"
        );
        for listener in &listeners {
            listener(&snapshot);
        }
    }
}

/// Producer-side handle for one record, returned by [`ToastStore::create`].
///
/// Holds only a weak store reference; outliving the store makes every
/// method a no-op.
#[derive(Debug, Clone)]
pub struct ToastHandle {
    id: String,
    store: Weak<ToastStore>,
}

impl ToastHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dismiss(&self) {
        if let Some(store) = self.store.upgrade() {
            store.dismiss(Some(&self.id));
        }
    }

    pub fn update(&self, update: ToastUpdate) {
        if let Some(store) = self.store.upgrade() {
            store.update(&self.id, update);
        }
    }
}

/// Observer registration handle. Deregisters the listener when dropped.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    store: Weak<ToastStore>,
}

impl Subscription {
    /// Explicitly deregister the listener.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            store.unsubscribe_listener(self.id);
        }
    }
}
