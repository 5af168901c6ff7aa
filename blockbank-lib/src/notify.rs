//! Transient user notifications.
//!
//! Account services never hand errors to the page. They report a
//! [`Notification`], which the frontend shows briefly and then drops.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::BlockbankError;

const DEFAULT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

/// A toast-style message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl From<&BlockbankError> for Notification {
    fn from(err: &BlockbankError) -> Self {
        Self::error(err.user_message())
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// A notification with its queue id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

#[derive(Debug, Default)]
struct Queue {
    next_id: u64,
    toasts: VecDeque<Toast>,
}

/// Bounded queue of dismissible notifications; the oldest falls off first.
#[derive(Debug)]
pub struct NotificationCenter {
    capacity: usize,
    queue: Mutex<Queue>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            queue: Mutex::new(Queue::default()),
        }
    }

    /// Queue a notification, returning its id.
    pub fn push(&self, notification: Notification) -> u64 {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        let id = queue.next_id;
        queue.next_id += 1;
        if queue.toasts.len() == self.capacity {
            queue.toasts.pop_front();
        }
        queue.toasts.push_back(Toast { id, notification });
        id
    }

    /// Remove a notification. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        let before = queue.toasts.len();
        queue.toasts.retain(|t| t.id != id);
        queue.toasts.len() != before
    }

    /// Currently visible notifications, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        let queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.toasts.iter().cloned().collect()
    }

    pub fn drain(&self) -> Vec<Notification> {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.toasts.drain(..).map(|t| t.notification).collect()
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        self.push(notification);
    }
}

/// The `loading` flag of a form.
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag until the guard is dropped. `None` if already set.
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(&self.0))
    }
}

pub struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_dismiss() {
        let center = NotificationCenter::default();
        let first = center.push(Notification::success("saved"));
        let second = center.push(Notification::error("failed"));
        assert_eq!(center.active().len(), 2);

        assert!(center.dismiss(first));
        assert!(!center.dismiss(first));
        let active = center.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second);
        assert!(active[0].notification.is_error());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let center = NotificationCenter::new(2);
        center.push(Notification::info("one"));
        center.push(Notification::info("two"));
        center.push(Notification::info("three"));
        let messages: Vec<_> = center.drain().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
        assert!(center.active().is_empty());
    }

    #[test]
    fn test_busy_flag() {
        let flag = BusyFlag::default();
        {
            let _guard = flag.try_acquire().unwrap();
            assert!(flag.is_busy());
            assert!(flag.try_acquire().is_none());
        }
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_from_error_uses_user_message() {
        let err = BlockbankError::validation("Please select a currency");
        let note = Notification::from(&err);
        assert_eq!(note.message, "Please select a currency");
        assert_eq!(note.level, NotificationLevel::Error);
    }
}
