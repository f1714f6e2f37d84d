//! Change notification plumbing.
//!
//! A [`ChangeSource`] turns a path into a [`Subscription`]: one stream of change
//! events and one stream of backend errors. [`NotifySource`] is the default,
//! backed by the `notify` crate. Reloaded snapshots fan out to a
//! [`ListenerRegistry`].

mod subscriber;
mod subscription;
mod watcher;

pub use subscriber::{ListenerHandle, ListenerRegistry};
pub use subscription::{ChangeSource, Subscription, SubscriptionFeed, is_write};
pub use watcher::NotifySource;
