use std::sync::Arc;

use tokio::sync::watch;

/// How prominently the UI should render a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// A user-facing status message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
}

/// Single-slot notification broadcaster.
///
/// At most one notification is live at a time: [`show`](Notifier::show)
/// replaces the previous one unconditionally, there is no queue.
/// Decoupled from any UI — consumers either poll
/// [`current`](Notifier::current) or watch a
/// [`subscribe`](Notifier::subscribe) receiver for push updates.
#[derive(Debug, Clone)]
pub struct Notifier {
    slot: Arc<watch::Sender<Option<Notification>>>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { slot: Arc::new(tx) }
    }

    /// Replace the live notification.
    pub fn show(&self, title: impl Into<String>, body: impl Into<String>, severity: Severity) {
        self.slot.send_replace(Some(Notification {
            title: title.into(),
            body: body.into(),
            severity,
        }));
    }

    /// Clear the live notification.
    pub fn dismiss(&self) {
        self.slot.send_replace(None);
    }

    /// The currently live notification, if any.
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.slot.borrow().clone()
    }

    /// A receiver that observes every slot change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.slot.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
