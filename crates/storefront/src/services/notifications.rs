//! Notification Queue: at most one live toast.
//!
//! Posting replaces the current toast and restarts the dismissal timer, so
//! a superseded toast can never clear its successor.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

/// How long a toast stays up unless superseded.
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ToastKind::Success,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ToastKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: ToastKind::Error,
        }
    }
}

#[derive(Default)]
struct Slot {
    current: Option<Toast>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
}

/// Cloneable handle to the single toast slot.
///
/// Must be used from within a Tokio runtime; posting spawns the timer.
#[derive(Clone, Default)]
pub struct NotificationQueue {
    slot: Arc<Mutex<Slot>>,
}

impl std::fmt::Debug for NotificationQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationQueue")
            .field("current", &self.current())
            .finish()
    }
}

impl NotificationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show `toast`, superseding whatever is showing.
    pub fn post(&self, toast: Toast) {
        tracing::debug!(kind = ?toast.kind, text = %toast.text, "Posting toast");
        let mut slot = self.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.current = Some(toast);

        let generation = slot.generation;
        let weak = Arc::downgrade(&self.slot);
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(TOAST_DURATION).await;
            if let Some(shared) = weak.upgrade() {
                let mut slot = shared.lock().unwrap_or_else(PoisonError::into_inner);
                if slot.generation == generation {
                    slot.current = None;
                    slot.timer = None;
                }
            }
        }));
    }

    /// The toast currently showing, if any.
    #[must_use]
    pub fn current(&self) -> Option<Toast> {
        self.lock().current.clone()
    }

    /// Take the toast down early.
    pub fn dismiss(&self) {
        let mut slot = self.lock();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.generation = slot.generation.wrapping_add(1);
        slot.current = None;
    }
}
