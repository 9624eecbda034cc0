//! Content notifications.
//!
//! Publishing content raises a [`ContentPublished`] notification that is
//! delivered to every registered [`PublishedHandler`]. Delivery can be
//! suppressed for the lifetime of a [`SuppressionGuard`], which is how a
//! handler that publishes content itself avoids re-entering itself.

use crate::catalog::ContentNode;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Notification raised after one or more nodes were published.
#[derive(Debug, Clone)]
pub struct ContentPublished {
    /// The nodes that were published, in publish order.
    pub published_entities: Vec<ContentNode>,
}

impl ContentPublished {
    /// Create a notification for the given nodes.
    pub fn new(published_entities: Vec<ContentNode>) -> Self {
        Self { published_entities }
    }
}

/// Handler invoked for every delivered [`ContentPublished`] notification.
pub trait PublishedHandler: Send + Sync {
    /// Handle a publish notification.
    fn handle(&self, notification: &ContentPublished);
}

/// Dispatches publish notifications to registered handlers.
#[derive(Default)]
pub struct NotificationDispatcher {
    handlers: RwLock<Vec<Arc<dyn PublishedHandler>>>,
    /// Number of live suppression guards.
    suppressed: AtomicUsize,
}

impl NotificationDispatcher {
    /// Create a dispatcher with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler.
    pub fn register(&self, handler: Arc<dyn PublishedHandler>) {
        self.handlers.write().push(handler);
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Suppress delivery until the returned guard is dropped.
    pub fn suppress(self: &Arc<Self>) -> SuppressionGuard {
        self.suppressed.fetch_add(1, Ordering::SeqCst);
        SuppressionGuard {
            dispatcher: Arc::clone(self),
        }
    }

    /// Whether delivery is currently suppressed.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed.load(Ordering::SeqCst) > 0
    }

    /// Deliver a notification to every handler.
    ///
    /// Returns `false` if the notification was dropped because delivery is
    /// suppressed.
    pub fn publish(&self, notification: &ContentPublished) -> bool {
        if self.is_suppressed() {
            tracing::debug!(
                count = notification.published_entities.len(),
                "publish notification suppressed"
            );
            return false;
        }

        // Handlers may publish content themselves, so the lock is not held
        // while they run.
        let handlers = self.handlers.read().clone();
        for handler in handlers {
            handler.handle(notification);
        }
        true
    }
}

/// Keeps notification delivery suppressed while alive.
#[must_use = "notifications are only suppressed while the guard is alive"]
pub struct SuppressionGuard {
    dispatcher: Arc<NotificationDispatcher>,
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        self.dispatcher.suppressed.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingHandler {
        seen: Mutex<Vec<u64>>,
    }

    impl PublishedHandler for RecordingHandler {
        fn handle(&self, notification: &ContentPublished) {
            let mut seen = self.seen.lock();
            seen.extend(notification.published_entities.iter().map(|n| n.id));
        }
    }

    fn notification(id: u64) -> ContentPublished {
        ContentPublished::new(vec![ContentNode::new(id, "Node", "page")])
    }

    #[test]
    fn test_publish_reaches_handlers() {
        let dispatcher = Arc::new(NotificationDispatcher::new());
        let handler = Arc::new(RecordingHandler::default());
        assert_eq!(dispatcher.handler_count(), 0);
        dispatcher.register(handler.clone());
        assert_eq!(dispatcher.handler_count(), 1);

        assert!(dispatcher.publish(&notification(1)));
        assert!(dispatcher.publish(&notification(2)));
        assert_eq!(*handler.seen.lock(), vec![1, 2]);
    }

    #[test]
    fn test_suppression_is_scoped() {
        let dispatcher = Arc::new(NotificationDispatcher::new());
        let handler = Arc::new(RecordingHandler::default());
        dispatcher.register(handler.clone());

        {
            let _outer = dispatcher.suppress();
            {
                let _inner = dispatcher.suppress();
                assert!(!dispatcher.publish(&notification(1)));
            }
            assert!(dispatcher.is_suppressed());
            assert!(!dispatcher.publish(&notification(2)));
        }

        assert!(!dispatcher.is_suppressed());
        assert!(dispatcher.publish(&notification(3)));
        assert_eq!(*handler.seen.lock(), vec![3]);
    }
}
