//! Notification deduplication.
//!
//! Suppresses repeated user-facing messages that share a (kind, key)
//! signature within a trailing time window, e.g. two near-simultaneous
//! "only N left in stock" warnings for the same product when a button is
//! double-clicked before the UI re-renders.
//!
//! Expiry is passive: entries are never evicted on a timer, a lookup simply
//! treats "now past expiry" as absent. Live lookups sweep expired entries so
//! the map stays bounded even if key cardinality grows.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::clock::Clock;

/// How long an emitted notification suppresses identical ones.
pub const DEFAULT_SUPPRESSION_WINDOW: Duration = Duration::from_secs(2);

/// TTL suppression map keyed by (kind, key).
///
/// Best-effort UX affordance, not a correctness mechanism: a suppressed
/// notification is simply not shown again, state changes are unaffected.
pub struct NotificationDedup {
    clock: Arc<dyn Clock>,
    window: Duration,
    entries: HashMap<(String, String), Instant>,
}

impl NotificationDedup {
    /// Create a deduplicator with the default suppression window.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            window: DEFAULT_SUPPRESSION_WINDOW,
            entries: HashMap::new(),
        }
    }

    /// Override the suppression window.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// The configured suppression window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Decide whether a notification with this (kind, key) signature may be
    /// emitted right now.
    ///
    /// Returns `false` while a live suppression entry exists. Otherwise
    /// returns `true` and records a new entry expiring at `now + window`.
    pub fn should_emit(&mut self, kind: &str, key: &str) -> bool {
        let now = self.clock.now();

        if let Some(&expires_at) = self.entries.get(&(kind.to_string(), key.to_string())) {
            if now < expires_at {
                return false;
            }
        }

        // Sweep everything that has expired while we are here.
        self.entries.retain(|_, expires_at| now < *expires_at);

        self.entries
            .insert((kind.to_string(), key.to_string()), now + self.window);
        true
    }

    /// Number of live suppression entries.
    pub fn live_entries(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .values()
            .filter(|expires_at| now < **expires_at)
            .count()
    }
}
