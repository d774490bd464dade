//! Action handlers: UpdateAction dispatch and background task spawning

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};

use eiga_catalog::{CatalogApi, ReviewFeed, Subscription};

use crate::handler::UpdateAction;
use crate::message::Message;

pub(crate) mod catalog;
pub(crate) mod navigation;
pub(crate) mod reviews;

/// Slot holding the one live review subscription
pub type SubscriptionSlot = Arc<Mutex<Option<Subscription>>>;

/// External collaborators the actions talk to
pub struct Services<C, F> {
    pub catalog: Arc<C>,
    pub feed: Arc<F>,
    pub subscription: SubscriptionSlot,
}

impl<C, F> Services<C, F> {
    pub fn new(catalog: C, feed: F) -> Self {
        Self {
            catalog: Arc::new(catalog),
            feed: Arc::new(feed),
            subscription: Arc::new(Mutex::new(None)),
        }
    }
}

impl<C, F> Clone for Services<C, F> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            feed: Arc::clone(&self.feed),
            subscription: Arc::clone(&self.subscription),
        }
    }
}

/// Execute an action by spawning a background task
pub fn handle_action<C, F>(
    action: UpdateAction,
    msg_tx: mpsc::Sender<Message>,
    services: &Services<C, F>,
    shutdown_rx: watch::Receiver<bool>,
) where
    C: CatalogApi + Send + Sync + 'static,
    F: ReviewFeed + Send + Sync + 'static,
{
    match action {
        UpdateAction::FetchPopular => {
            catalog::spawn_fetch_popular(Arc::clone(&services.catalog), msg_tx);
        }

        UpdateAction::FetchGenre(request) => {
            catalog::spawn_fetch_genre(Arc::clone(&services.catalog), request, msg_tx);
        }

        UpdateAction::FetchFamous { ids } => {
            catalog::spawn_fetch_famous(Arc::clone(&services.catalog), ids, msg_tx);
        }

        UpdateAction::SubscribeReviews => {
            reviews::spawn_review_subscription(
                Arc::clone(&services.feed),
                Arc::clone(&services.subscription),
                msg_tx,
                shutdown_rx,
            );
        }

        UpdateAction::OpenDetail { url, browser } => {
            navigation::spawn_open_detail(url, browser);
        }
    }
}
