//! User-facing notification queue.
//!
//! Serializes modal/alert presentation: at most one notification is
//! visible at a time, and later ones queue FIFO behind it so overlapping
//! async outcomes never clobber each other on the same UI surface.

use std::collections::VecDeque;

/// Presentation kind of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Single acknowledge action which also runs the continuation.
    Info,
    /// Acknowledge plus a plain dismiss that runs nothing.
    Error,
}

/// Continuation invoked when the user acknowledges a notification
/// (e.g. navigation to the job list).
pub type AckContinuation = Box<dyn FnOnce() + Send>;

/// One queued notification.
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    on_acknowledge: Option<AckContinuation>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Info,
            on_acknowledge: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
            on_acknowledge: None,
        }
    }

    /// Attach a continuation to run on acknowledge.
    pub fn with_acknowledge(mut self, f: AckContinuation) -> Self {
        self.on_acknowledge = Some(f);
        self
    }
}

/// FIFO queue with a single visible slot.
#[derive(Default)]
pub struct NotificationQueue {
    visible: Option<Notification>,
    pending: VecDeque<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present a notification, or queue it behind the currently visible
    /// one.
    pub fn show(&mut self, notification: Notification) {
        if self.visible.is_none() {
            self.visible = Some(notification);
        } else {
            self.pending.push_back(notification);
        }
    }

    /// The currently visible notification, if any.
    pub fn visible(&self) -> Option<(&str, NotificationKind)> {
        self.visible.as_ref().map(|n| (n.message.as_str(), n.kind))
    }

    /// Acknowledge the visible notification, running its continuation,
    /// and promote the next queued one.
    pub fn acknowledge(&mut self) {
        if let Some(notification) = self.visible.take() {
            if let Some(f) = notification.on_acknowledge {
                f();
            }
        }
        self.promote_next();
    }

    /// Dismiss the visible notification without running its continuation
    /// and promote the next queued one.
    pub fn dismiss(&mut self) {
        self.visible = None;
        self.promote_next();
    }

    /// Number of notifications waiting behind the visible one.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn promote_next(&mut self) {
        if self.visible.is_none() {
            self.visible = self.pending.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn first_notification_is_visible_immediately() {
        let mut queue = NotificationQueue::new();
        queue.show(Notification::info("uploaded"));
        assert_eq!(queue.visible(), Some(("uploaded", NotificationKind::Info)));
    }

    #[test]
    fn second_notification_waits_behind_first() {
        let mut queue = NotificationQueue::new();
        queue.show(Notification::info("upload accepted"));
        queue.show(Notification::error("other upload failed"));

        assert_eq!(
            queue.visible(),
            Some(("upload accepted", NotificationKind::Info))
        );
        assert_eq!(queue.pending_len(), 1);

        queue.acknowledge();
        assert_eq!(
            queue.visible(),
            Some(("other upload failed", NotificationKind::Error))
        );
    }

    #[test]
    fn acknowledge_runs_continuation() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);

        let mut queue = NotificationQueue::new();
        queue.show(
            Notification::info("uploaded")
                .with_acknowledge(Box::new(move || flag.store(true, Ordering::SeqCst))),
        );
        queue.acknowledge();

        assert!(ran.load(Ordering::SeqCst));
        assert!(queue.visible().is_none());
    }

    #[test]
    fn dismiss_skips_continuation() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);

        let mut queue = NotificationQueue::new();
        queue.show(
            Notification::error("failed")
                .with_acknowledge(Box::new(move || flag.store(true, Ordering::SeqCst))),
        );
        queue.dismiss();

        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn queue_drains_in_fifo_order() {
        let mut queue = NotificationQueue::new();
        queue.show(Notification::info("one"));
        queue.show(Notification::info("two"));
        queue.show(Notification::info("three"));

        let mut seen = Vec::new();
        while let Some((msg, _)) = queue.visible() {
            seen.push(msg.to_string());
            queue.dismiss();
        }
        assert_eq!(seen, vec!["one", "two", "three"]);
    }

    #[test]
    fn acknowledge_on_empty_queue_is_a_no_op() {
        let mut queue = NotificationQueue::new();
        queue.acknowledge();
        queue.dismiss();
        assert!(queue.visible().is_none());
    }
}
