//! Rendering-surface bridge over the toast store.
//!
//! A surface mirrors the shared queue into a `watch` channel a render
//! loop can poll or await, and exposes the producer API so any part of
//! the application can raise a toast on the shared surface.

use std::sync::Arc;

use tokio::sync::watch;

use crate::store::{Subscription, ToastHandle, ToastStore};
use crate::types::{Toast, ToastPayload};

pub struct ToastSurface {
    store: Arc<ToastStore>,
    rx: watch::Receiver<Vec<Toast>>,
    _subscription: Subscription,
}

impl ToastSurface {
    /// Attach to a store. The surface starts from the current snapshot
    /// and follows every broadcast until it is dropped.
    pub fn attach(store: Arc<ToastStore>) -> Self {
        let (tx, rx) = watch::channel(store.snapshot());
        let subscription = store.subscribe(move |toasts| {
            let _ = tx.send(toasts.to_vec());
        });
        Self {
            store,
            rx,
            _subscription: subscription,
        }
    }

    /// Current queue snapshot, newest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.rx.borrow().clone()
    }

    /// Receiver a render loop can await for queue changes.
    pub fn watch(&self) -> watch::Receiver<Vec<Toast>> {
        self.rx.clone()
    }

    /// Producer API: enqueue a toast on the shared store.
    pub fn toast(&self, payload: ToastPayload) -> ToastHandle {
        self.store.create(payload)
    }

    /// Dismiss one record, or all of them when `id` is `None`.
    pub fn dismiss(&self, id: Option<&str>) {
        self.store.dismiss(id);
    }

    /// Report a user-driven visibility toggle for one record, invoking
    /// its open-change callback. Closing dismisses the record; toggling
    /// an unknown id does nothing.
    pub fn set_open(&self, id: &str, open: bool) {
        let callback = self
            .store
            .snapshot()
            .into_iter()
            .find(|t| t.id == id)
            .and_then(|t| t.on_open_change);
        match callback {
            Some(callback) => callback(open),
            None => tracing::debug!(%id, "visibility toggle for unknown toast ignored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> ToastPayload {
        ToastPayload {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn attach_seeds_from_current_snapshot() {
        let store = ToastStore::with_defaults();
        store.create(titled("existing"));

        let surface = ToastSurface::attach(Arc::clone(&store));
        let toasts = surface.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].title.as_deref(), Some("existing"));
    }

    #[test]
    fn surface_follows_store_mutations() {
        let store = ToastStore::with_defaults();
        let surface = ToastSurface::attach(Arc::clone(&store));
        assert!(surface.toasts().is_empty());

        let handle = surface.toast(titled("hello"));
        assert_eq!(surface.toasts()[0].id, handle.id());

        store.remove(Some(handle.id()));
        assert!(surface.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn watch_receiver_sees_changes() {
        let store = ToastStore::with_defaults();
        let surface = ToastSurface::attach(store);
        let mut rx = surface.watch();

        surface.toast(titled("ping"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        surface.dismiss(None);
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update()[0].open);
    }

    #[tokio::test(start_paused = true)]
    async fn set_open_false_dismisses_record() {
        let store = ToastStore::with_defaults();
        let surface = ToastSurface::attach(Arc::clone(&store));
        let handle = surface.toast(titled("closable"));

        surface.set_open(handle.id(), false);

        assert!(!surface.toasts()[0].open);
        assert_eq!(store.pending_removals(), 1);
    }

    #[test]
    fn set_open_unknown_id_is_a_noop() {
        let store = ToastStore::with_defaults();
        let surface = ToastSurface::attach(store);
        surface.set_open("404", false);
        assert!(surface.toasts().is_empty());
    }

    #[test]
    fn dropping_surface_detaches_listener() {
        let store = ToastStore::with_defaults();
        let surface = ToastSurface::attach(Arc::clone(&store));
        let rx = surface.watch();
        drop(surface);

        store.create(titled("after drop"));
        assert!(rx.borrow().is_empty(), "detached surface sees no updates");
    }
}
