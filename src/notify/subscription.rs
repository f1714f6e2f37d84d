//! Subscriptions to change notifications for one path.

use crate::error::Result;
use notify::event::ModifyKind;
use notify::{Event, EventKind};
use std::any::Any;
use std::path::Path;
use tokio::sync::mpsc;

/// Creates subscriptions for a resolved path.
///
/// The default implementation is [`NotifySource`](super::NotifySource). Implement
/// this to plug in a different notification mechanism.
pub trait ChangeSource: Send + Sync {
    /// Start delivering change notifications for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::SubscriptionSetup`](crate::error::WatchError::SubscriptionSetup)
    /// if the mechanism cannot be created or the path cannot be registered.
    fn subscribe(&self, path: &Path) -> Result<Subscription>;
}

impl<F> ChangeSource for F
where
    F: Fn(&Path) -> Result<Subscription> + Send + Sync,
{
    fn subscribe(&self, path: &Path) -> Result<Subscription> {
        self(path)
    }
}

/// A live subscription: a stream of change events and a stream of backend errors.
///
/// Whatever keeps the backend alive is held alongside the receivers, so
/// dropping the subscription unregisters the watch and releases the backend.
pub struct Subscription {
    events: mpsc::UnboundedReceiver<Event>,
    errors: mpsc::UnboundedReceiver<notify::Error>,
    _guard: Option<Box<dyn Any + Send>>,
}

impl Subscription {
    /// Assemble a subscription from its two streams and the resource that
    /// feeds them.
    pub fn new(
        events: mpsc::UnboundedReceiver<Event>,
        errors: mpsc::UnboundedReceiver<notify::Error>,
        guard: impl Any + Send,
    ) -> Self {
        Self {
            events,
            errors,
            _guard: Some(Box::new(guard)),
        }
    }

    /// A subscription fed by hand through the returned [`SubscriptionFeed`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use hotfile::notify::Subscription;
    ///
    /// let (mut feed, _subscription) = Subscription::manual();
    /// feed.write();
    /// feed.close_events();
    /// ```
    pub fn manual() -> (SubscriptionFeed, Self) {
        let (event_tx, events) = mpsc::unbounded_channel();
        let (error_tx, errors) = mpsc::unbounded_channel();

        let feed = SubscriptionFeed {
            events: Some(event_tx),
            errors: Some(error_tx),
        };

        (
            feed,
            Self {
                events,
                errors,
                _guard: None,
            },
        )
    }

    /// Wait for the next change event. `None` means the stream is closed.
    pub async fn next_event(&mut self) -> Option<Event> {
        self.events.recv().await
    }

    /// Wait for the next backend error. `None` means the stream is closed.
    pub async fn next_error(&mut self) -> Option<notify::Error> {
        self.errors.recv().await
    }

    /// Both receivers at once, for waiting on either.
    pub(crate) fn streams(
        &mut self,
    ) -> (
        &mut mpsc::UnboundedReceiver<Event>,
        &mut mpsc::UnboundedReceiver<notify::Error>,
    ) {
        (&mut self.events, &mut self.errors)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Sending half of a [manual](Subscription::manual) subscription.
///
/// Each stream can be closed on its own. Dropping the feed closes both.
#[derive(Debug)]
pub struct SubscriptionFeed {
    events: Option<mpsc::UnboundedSender<Event>>,
    errors: Option<mpsc::UnboundedSender<notify::Error>>,
}

impl SubscriptionFeed {
    /// Deliver an event. Returns `false` if the event stream is closed.
    pub fn send_event(&self, event: Event) -> bool {
        self.events
            .as_ref()
            .is_some_and(|tx| tx.send(event).is_ok())
    }

    /// Deliver a content-write event.
    pub fn write(&self) -> bool {
        self.send_event(Event::new(EventKind::Modify(ModifyKind::Data(
            notify::event::DataChange::Content,
        ))))
    }

    /// Deliver a backend error. Returns `false` if the error stream is closed.
    pub fn send_error(&self, error: notify::Error) -> bool {
        self.errors
            .as_ref()
            .is_some_and(|tx| tx.send(error).is_ok())
    }

    /// Close the event stream.
    pub fn close_events(&mut self) {
        self.events = None;
    }

    /// Close the error stream.
    pub fn close_errors(&mut self) {
        self.errors = None;
    }

    /// Whether the receiving subscription has been dropped.
    pub fn is_released(&self) -> bool {
        match (&self.events, &self.errors) {
            (Some(tx), _) => tx.is_closed(),
            (None, Some(tx)) => tx.is_closed(),
            (None, None) => true,
        }
    }
}

/// Whether an event reports a change to file content.
///
/// Backends that cannot tell what was modified report `Modify(Any)`, which is
/// treated as a write. Metadata, rename, access, create and remove events are not.
pub fn is_write(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, MetadataKind, RemoveKind, RenameMode};

    #[test]
    fn test_is_write() {
        assert!(is_write(&EventKind::Modify(ModifyKind::Data(
            notify::event::DataChange::Any
        ))));
        assert!(is_write(&EventKind::Modify(ModifyKind::Any)));

        assert!(!is_write(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::Permissions
        ))));
        assert!(!is_write(&EventKind::Modify(ModifyKind::Name(
            RenameMode::Both
        ))));
        assert!(!is_write(&EventKind::Access(AccessKind::Any)));
        assert!(!is_write(&EventKind::Create(CreateKind::File)));
        assert!(!is_write(&EventKind::Remove(RemoveKind::File)));
        assert!(!is_write(&EventKind::Any));
    }

    #[tokio::test]
    async fn test_manual_feed_delivers() {
        let (feed, mut subscription) = Subscription::manual();
        assert!(feed.write());
        assert!(feed.send_error(notify::Error::generic("overflow")));

        let event = subscription.next_event().await.unwrap();
        assert!(is_write(&event.kind));

        let error = subscription.next_error().await.unwrap();
        assert!(error.to_string().contains("overflow"));
    }

    #[tokio::test]
    async fn test_manual_feed_closes_streams_independently() {
        let (mut feed, mut subscription) = Subscription::manual();
        feed.close_events();

        assert!(!feed.write());
        assert!(subscription.next_event().await.is_none());
        assert!(feed.send_error(notify::Error::generic("still open")));
        assert!(subscription.next_error().await.is_some());
    }

    #[test]
    fn test_feed_sees_release() {
        let (feed, subscription) = Subscription::manual();
        assert!(!feed.is_released());
        drop(subscription);
        assert!(feed.is_released());
    }
}
