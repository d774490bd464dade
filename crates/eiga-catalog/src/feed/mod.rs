//! Live review feed.
//!
//! A subscription delivers the *full* ordered review set on every change
//! ([`FeedEvent::Snapshot`]); consumers replace whatever they held before.
//! The only way to end a subscription is [`Subscription::unsubscribe`].

mod client;
mod protocol;

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use eiga_core::prelude::*;
use eiga_core::ReviewDocument;

pub use client::{WsReviewFeed, WsReviewFeedConfig, DEFAULT_COLLECTION, DEFAULT_FEED_URL};
pub use protocol::{
    parse_feed_message, sort_newest_first, subscribe_frame, unsubscribe_frame, FeedMessage,
};

/// How long `unsubscribe` waits for the feed task to wind down
const UNSUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Something a live subscription reports
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// The complete current result set, newest first
    Snapshot(Vec<ReviewDocument>),
    /// Connection status change
    Status(FeedStatus),
}

/// Connection status of a review subscription
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Connecting,
    Live,
    Reconnecting {
        attempt: u32,
        max_attempts: u32,
    },
    /// Released by the consumer
    Closed,
    /// Gave up; carries the last error
    Failed(String),
}

impl FeedStatus {
    /// Short label for the status bar
    pub fn label(&self) -> String {
        match self {
            FeedStatus::Connecting => "connecting".to_string(),
            FeedStatus::Live => "live".to_string(),
            FeedStatus::Reconnecting {
                attempt,
                max_attempts,
            } => format!("reconnecting ({attempt}/{max_attempts})"),
            FeedStatus::Closed => "closed".to_string(),
            FeedStatus::Failed(reason) => format!("offline: {reason}"),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FeedStatus::Failed(_))
    }
}

/// Opens live subscriptions to the review collection
#[trait_variant::make(ReviewFeed: Send)]
pub trait LocalReviewFeed {
    /// Start a subscription. Events are pushed into `events` until the returned
    /// [`Subscription`] is released.
    async fn subscribe(&self, events: mpsc::Sender<FeedEvent>) -> Result<Subscription>;
}

/// Handle to a running subscription.
///
/// Release it with [`Subscription::unsubscribe`]; consuming `self` guarantees it
/// is released at most once. Dropping an unreleased handle aborts the feed task.
#[derive(Debug)]
pub struct Subscription {
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Wrap a feed task. The task must stop once `cancel` fires (or is dropped).
    pub fn new(cancel: oneshot::Sender<()>, task: JoinHandle<()>) -> Self {
        Self {
            cancel: Some(cancel),
            task: Some(task),
        }
    }

    /// Signal the feed task to unsubscribe and wait for it to finish
    pub async fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }

        if let Some(task) = self.task.take() {
            match tokio::time::timeout(UNSUBSCRIBE_TIMEOUT, task).await {
                Ok(Ok(())) => debug!("Review subscription released"),
                Ok(Err(e)) => warn!("Review feed task panicked: {}", e),
                Err(_) => warn!("Review feed task did not stop in time"),
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            warn!("Review subscription dropped without unsubscribe; aborting feed task");
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_status_labels() {
        assert_eq!(FeedStatus::Live.label(), "live");
        assert_eq!(
            FeedStatus::Reconnecting {
                attempt: 2,
                max_attempts: 10
            }
            .label(),
            "reconnecting (2/10)"
        );
        assert!(FeedStatus::Failed("refused".into()).label().contains("refused"));
        assert!(FeedStatus::Failed(String::new()).is_failed());
        assert!(!FeedStatus::Closed.is_failed());
    }

    #[tokio::test]
    async fn test_unsubscribe_signals_task_and_waits() {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _ = cancel_rx.await;
            let _ = done_tx.send(());
        });

        Subscription::new(cancel_tx, task).unsubscribe().await;

        assert!(done_rx.await.is_ok());
    }
}
