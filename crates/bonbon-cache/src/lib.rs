//! Client-side storage and notification plumbing for Bonbon.
//!
//! Provides the shared infrastructure the cart and session stores sit on:
//!
//! - **Storage**: a [`StorageBackend`] trait modeling durable client storage,
//!   with a namespaced, JSON-serializing [`KvStore`] wrapper.
//! - **Deduplication**: [`NotificationDedup`], a TTL suppression map that
//!   stops the same user-facing message from firing twice in quick
//!   succession.
//! - **Clock**: an injectable [`Clock`] so suppression windows can be tested
//!   without real sleeps.
//! - **Notifications**: the narrow [`NotificationSink`] seam the stores emit
//!   user-visible feedback through.
//!
//! # Example
//!
//! ```rust,ignore
//! use bonbon_cache::{KvStore, MemoryBackend};
//! use std::sync::Arc;
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let store = KvStore::new(backend, "bonbon.cart");
//!
//! store.set("items", &items)?;
//! let items: Option<Vec<LineItem>> = store.get("items")?;
//! ```

mod clock;
mod dedup;
mod error;
mod kv;
mod notify;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dedup::{NotificationDedup, DEFAULT_SUPPRESSION_WINDOW};
pub use error::CacheError;
pub use kv::{KvStore, MemoryBackend, StorageBackend};
pub use notify::{NoticeKind, Notification, NotificationSink, NullSink, Severity};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CacheError, Clock, KvStore, MemoryBackend, NoticeKind, Notification, NotificationDedup,
        NotificationSink, NullSink, Severity, StorageBackend, SystemClock,
    };
}
