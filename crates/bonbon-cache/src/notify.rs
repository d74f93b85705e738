//! User-facing notification seam.
//!
//! The stores never talk to a toast library directly; they emit
//! [`Notification`]s into a [`NotificationSink`] and move on. The sink is
//! fire-and-forget, its return value is never inspected.

use std::time::Duration;

/// What a notification is about. Doubles as the deduplication kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// An item was added to the cart.
    Added,
    /// An item was removed from the cart.
    Removed,
    /// A line item quantity changed.
    Updated,
    /// The cart was emptied.
    Cleared,
    /// A mutation was rejected for exceeding available stock.
    StockError,
}

impl NoticeKind {
    /// String form used as the deduplication kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeKind::Added => "added",
            NoticeKind::Removed => "removed",
            NoticeKind::Updated => "updated",
            NoticeKind::Cleared => "cleared",
            NoticeKind::StockError => "stock-error",
        }
    }
}

/// Visual severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// How long notifications stay on screen by default.
const SUCCESS_DISPLAY_DURATION: Duration = Duration::from_secs(3);
const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(4);

/// A user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// What this notification is about.
    pub kind: NoticeKind,
    /// Deduplication key, usually a product id.
    pub key: String,
    /// Display text.
    pub message: String,
    /// Visual severity.
    pub severity: Severity,
    /// How long the message should stay visible.
    pub duration: Duration,
}

impl Notification {
    /// Build a success notification.
    pub fn success(kind: NoticeKind, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            message: message.into(),
            severity: Severity::Success,
            duration: SUCCESS_DISPLAY_DURATION,
        }
    }

    /// Build an error notification.
    pub fn error(kind: NoticeKind, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            message: message.into(),
            severity: Severity::Error,
            duration: ERROR_DISPLAY_DURATION,
        }
    }
}

/// Where notifications go. Implemented by the UI layer.
pub trait NotificationSink: Send + Sync {
    /// Display a notification. Fire-and-forget.
    fn display(&self, notification: &Notification);
}

/// A sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn display(&self, _notification: &Notification) {}
}
