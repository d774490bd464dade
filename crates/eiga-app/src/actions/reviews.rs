//! Review subscription task
//!
//! Opens the feed, parks the [`eiga_catalog::Subscription`] in the shared slot
//! (so teardown can release it) and forwards feed events as messages until the
//! feed ends or shutdown is signalled.
//!
//! The slot lock is only taken once `subscribe` has answered, so a slow connect
//! never holds up teardown. Shutdown during the connect abandons it.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};

use eiga_catalog::{FeedEvent, ReviewFeed, Subscription};
use eiga_core::prelude::*;

use crate::message::Message;

use super::SubscriptionSlot;

const FEED_CHANNEL_CAPACITY: usize = 64;

pub(super) fn spawn_review_subscription<F>(
    feed: Arc<F>,
    slot: SubscriptionSlot,
    msg_tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    F: ReviewFeed + Send + Sync + 'static,
{
    tokio::spawn(async move {
        if *shutdown_rx.borrow() {
            debug!("Shutdown in progress, not subscribing to reviews");
            return;
        }

        let (event_tx, mut event_rx) = mpsc::channel::<FeedEvent>(FEED_CHANNEL_CAPACITY);

        let subscribed = tokio::select! {
            result = feed.subscribe(event_tx) => result,
            _ = wait_for_shutdown(&mut shutdown_rx) => {
                debug!("Shutdown while connecting to the review feed");
                return;
            }
        };

        let subscription = match subscribed {
            Ok(subscription) => subscription,
            Err(e) => {
                let _ = msg_tx.send(Message::FeedSubscribeFailed(e.to_string())).await;
                return;
            }
        };

        if !park_subscription(&slot, subscription, &shutdown_rx).await {
            return;
        }

        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let msg = match event {
                        Some(FeedEvent::Snapshot(docs)) => Message::ReviewSnapshot(docs),
                        Some(FeedEvent::Status(status)) => Message::FeedStatusChanged(status),
                        None => break,
                    };
                    if msg_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                _ = wait_for_shutdown(&mut shutdown_rx) => break,
            }
        }

        debug!("Review forwarding task exiting");
    });
}

/// Store `subscription` as the live one. Returns `false` when teardown has
/// already emptied the slot, in which case the subscription is released here.
async fn park_subscription(
    slot: &SubscriptionSlot,
    subscription: Subscription,
    shutdown_rx: &watch::Receiver<bool>,
) -> bool {
    let mut guard = slot.lock().await;

    // Teardown flips the flag before it takes the lock
    if *shutdown_rx.borrow() {
        drop(guard);
        subscription.unsubscribe().await;
        return false;
    }

    // A retry replaces whatever subscription is still parked
    let previous = guard.replace(subscription);
    drop(guard);
    if let Some(previous) = previous {
        previous.unsubscribe().await;
    }
    true
}

/// Resolves once shutdown is signalled; pending forever if the sender is gone
/// without signalling.
async fn wait_for_shutdown(shutdown_rx: &mut watch::Receiver<bool>) {
    let signalled = shutdown_rx.wait_for(|stop| *stop).await.is_ok();
    if !signalled {
        std::future::pending::<()>().await;
    }
}
