//! In-process toast notification store.
//!
//! A bounded, newest-first queue of notification records shared by every
//! producer in the process, with observer fan-out to rendering surfaces
//! and timer-driven removal of dismissed records.

pub mod store;
pub mod surface;
pub mod types;

pub use store::{StoreConfig, Subscription, ToastHandle, ToastStore};
pub use surface::ToastSurface;
pub use types::{OpenChangeFn, Toast, ToastAction, ToastPayload, ToastUpdate, ToastVariant};
