//! Engine - shared orchestration core for TUI and headless runners
//!
//! The Engine owns the state, the message channel and the external services
//! (catalog and review feed). Runners feed it messages and render its state;
//! it never touches a terminal.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};

use eiga_catalog::{CatalogApi, FeedStatus, ReviewFeed};
use eiga_core::prelude::*;

use crate::actions::Services;
use crate::engine_event::{EngineEvent, Loader};
use crate::message::Message;
use crate::process;
use crate::signals;
use crate::state::{AppState, LoadStatus};

const MESSAGE_CHANNEL_CAPACITY: usize = 256;
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How long teardown waits for an in-flight subscribe before giving up
const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(3);

/// Loader generations before/after a processing cycle, used to derive events.
///
/// Every applied response bumps its loader's generation, so two identical
/// results in a row still produce two events.
#[derive(Debug, Clone)]
struct StateSnapshot {
    popular: u64,
    genre: u64,
    famous: u64,
    comments_generation: u64,
    feed_status: FeedStatus,
}

impl StateSnapshot {
    fn capture(state: &AppState) -> Self {
        Self {
            popular: state.popular.generation,
            genre: state.genre_movies.generation,
            famous: state.famous.generation,
            comments_generation: state.comments_generation,
            feed_status: state.feed_status.clone(),
        }
    }
}

/// Shared orchestration core
pub struct Engine<C, F> {
    pub state: AppState,

    msg_tx: mpsc::Sender<Message>,
    msg_rx: mpsc::Receiver<Message>,

    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,

    services: Services<C, F>,

    event_tx: broadcast::Sender<EngineEvent>,
}

impl<C, F> Engine<C, F>
where
    C: CatalogApi + Send + Sync + 'static,
    F: ReviewFeed + Send + Sync + 'static,
{
    pub fn new(state: AppState, catalog: C, feed: F) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel::<Message>(MESSAGE_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            state,
            msg_tx,
            msg_rx,
            shutdown_tx,
            shutdown_rx,
            services: Services::new(catalog, feed),
            event_tx,
        }
    }

    /// Subscribe to domain events
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Start every loader
    pub fn mount(&mut self) {
        self.process_message(Message::Mount);
    }

    /// Run one message (and its follow-ups) through update, then emit events
    pub fn process_message(&mut self, msg: Message) {
        if self.state.torn_down {
            trace!("Dropping {:?} after teardown", msg);
            return;
        }

        let pre = StateSnapshot::capture(&self.state);

        process::process_message(
            &mut self.state,
            msg,
            &self.msg_tx,
            &self.services,
            &self.shutdown_rx,
        );

        let post = StateSnapshot::capture(&self.state);
        self.emit_events(&pre, &post);
    }

    /// Process every message already queued; returns how many were handled
    pub fn drain_pending_messages(&mut self) -> usize {
        let mut count = 0;
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.process_message(msg);
            count += 1;
        }
        count
    }

    /// Wait for the next message from background tasks
    pub async fn next_message(&mut self) -> Option<Message> {
        self.msg_rx.recv().await
    }

    pub fn msg_sender(&self) -> mpsc::Sender<Message> {
        self.msg_tx.clone()
    }

    /// Turn SIGINT/SIGTERM into a quit until this engine shuts down
    pub fn spawn_signal_handler(&self) {
        signals::spawn_signal_handler(self.msg_tx.clone(), self.shutdown_rx.clone());
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit()
    }

    /// Tear down: stop applying updates and release the review subscription.
    ///
    /// Safe to call more than once; the subscription is released on the first call only.
    pub async fn shutdown(&mut self) {
        if self.state.torn_down {
            return;
        }
        self.state.torn_down = true;
        self.emit(EngineEvent::Shutdown);

        let _ = self.shutdown_tx.send(true);

        let subscription =
            match tokio::time::timeout(TEARDOWN_TIMEOUT, self.services.subscription.lock()).await {
                Ok(mut guard) => guard.take(),
                Err(_) => {
                    warn!("Timed out waiting for review subscription; leaving it to drop");
                    None
                }
            };

        if let Some(subscription) = subscription {
            info!("Releasing review subscription");
            subscription.unsubscribe().await;
        }

        self.msg_rx.close();
    }

    fn emit_events(&self, pre: &StateSnapshot, post: &StateSnapshot) {
        if pre.popular != post.popular {
            match &self.state.popular.status {
                LoadStatus::Loaded => self.emit(EngineEvent::PopularLoaded {
                    movies: self.state.popular.data.clone(),
                }),
                LoadStatus::Failed(error) => self.emit(EngineEvent::LoaderFailed {
                    loader: Loader::Popular,
                    error: error.clone(),
                }),
                _ => {}
            }
        }

        if pre.genre != post.genre {
            match &self.state.genre_movies.status {
                LoadStatus::Loaded => self.emit(EngineEvent::GenreLoaded {
                    genre_id: self.state.genre.genre_id.clone().unwrap_or_default(),
                    page: self.state.page.current(),
                    total_pages: self.state.page.total(),
                    movies: self.state.genre_movies.data.clone(),
                }),
                LoadStatus::Failed(error) => self.emit(EngineEvent::LoaderFailed {
                    loader: Loader::Genre,
                    error: error.clone(),
                }),
                _ => {}
            }
        }

        if pre.famous != post.famous {
            match &self.state.famous.status {
                LoadStatus::Loaded => self.emit(EngineEvent::FamousLoaded {
                    movies: self.state.famous.data.clone(),
                }),
                LoadStatus::Failed(error) => self.emit(EngineEvent::LoaderFailed {
                    loader: Loader::Famous,
                    error: error.clone(),
                }),
                _ => {}
            }
        }

        if pre.comments_generation != post.comments_generation {
            self.emit(EngineEvent::CommentsUpdated {
                comments: self.state.comments.clone(),
            });
        }

        if pre.feed_status != post.feed_status {
            self.emit(EngineEvent::FeedStatus {
                status: post.feed_status.label(),
            });
        }
    }

    fn emit(&self, event: EngineEvent) {
        trace!("Engine event: {}", event.event_type());
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use eiga_catalog::test_utils::{test_page, test_review, StubCatalog, StubReviewFeed};
    use eiga_core::{GenreSelection, MovieId, MovieSummary};

    use crate::config::Settings;
    use crate::message::GenreRequest;
    use crate::state::FAMOUS_MOVIE_IDS;

    type TestEngine = Engine<StubCatalog, StubReviewFeed>;

    fn engine(genre: GenreSelection, catalog: StubCatalog, feed: StubReviewFeed) -> TestEngine {
        let state = AppState::with_rng(Settings::default(), genre, StdRng::seed_from_u64(5));
        Engine::new(state, catalog, feed)
    }

    fn famous_catalog() -> StubCatalog {
        StubCatalog::new()
            .with_popular(test_page(1, 20, 500))
            .with_movies(&FAMOUS_MOVIE_IDS)
    }

    /// Process background messages until `done` holds
    async fn settle(engine: &mut TestEngine, done: impl Fn(&AppState) -> bool) {
        let result = tokio::time::timeout(Duration::from_secs(5), async {
            while !done(&engine.state) {
                // Poll so conditions driven by spawned tasks are rechecked
                match tokio::time::timeout(Duration::from_millis(20), engine.next_message()).await {
                    Ok(Some(msg)) => engine.process_message(msg),
                    Ok(None) => break,
                    Err(_) => {}
                }
            }
        })
        .await;
        assert!(result.is_ok(), "engine did not settle in time");
    }

    #[tokio::test]
    async fn test_default_mount_loads_popular_and_famous() {
        let feed = StubReviewFeed::new();
        let mut engine = engine(GenreSelection::none(), famous_catalog(), feed.clone());
        let mut events = engine.subscribe();

        engine.mount();
        settle(&mut engine, |s| {
            s.popular.status == LoadStatus::Loaded && s.famous.status == LoadStatus::Loaded
        })
        .await;

        assert_eq!(engine.state.popular.data.len(), 20);
        let ids: Vec<MovieId> = engine.state.famous.data.iter().map(|m| m.id).collect();
        assert_eq!(ids, FAMOUS_MOVIE_IDS.to_vec());

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event.event_type());
        }
        assert!(seen.contains(&"popular_loaded"));
        assert!(seen.contains(&"famous_loaded"));
    }

    #[tokio::test]
    async fn test_famous_order_survives_out_of_order_completion() {
        let catalog = famous_catalog()
            .with_delay(1891, Duration::from_millis(60))
            .with_delay(238, Duration::from_millis(30));
        let mut engine = engine(GenreSelection::none(), catalog.clone(), StubReviewFeed::new());

        engine.mount();
        settle(&mut engine, |s| s.famous.status == LoadStatus::Loaded).await;

        let ids: Vec<MovieId> = engine.state.famous.data.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1891, 11, 238, 155, 278, 122]);
        assert_eq!(catalog.movie_requests(), 6);
    }

    #[tokio::test]
    async fn test_famous_is_all_or_nothing() {
        // 122 is missing from the catalog
        let catalog = StubCatalog::new().with_movies(&[1891, 11, 238, 155, 278]);
        let mut engine = engine(GenreSelection::none(), catalog, StubReviewFeed::new());

        engine.mount();
        settle(&mut engine, |s| s.famous.is_failed()).await;

        assert!(engine.state.famous.data.is_empty());
    }

    #[tokio::test]
    async fn test_genre_mount_skips_popular() {
        let catalog = StubCatalog::new()
            .with_movies(&FAMOUS_MOVIE_IDS)
            .with_genre_page("28", 1, test_page(100, 5, 5));
        let mut engine = engine(
            GenreSelection::genre("28", "Action"),
            catalog.clone(),
            StubReviewFeed::new(),
        );

        engine.mount();
        settle(&mut engine, |s| s.genre_movies.status == LoadStatus::Loaded).await;

        assert_eq!(catalog.popular_requests(), 0);
        assert_eq!(engine.state.page.total(), 5);
        assert!(engine.state.genre_movies.data.iter().all(|m| m.id >= 100));
    }

    #[tokio::test]
    async fn test_previous_from_last_page_issues_exactly_one_request() {
        let catalog = StubCatalog::new()
            .with_movies(&FAMOUS_MOVIE_IDS)
            .with_genre_page("28", 1, test_page(100, 5, 5))
            .with_genre_page("28", 4, test_page(400, 5, 5));
        let mut engine = engine(
            GenreSelection::genre("28", "Action"),
            catalog.clone(),
            StubReviewFeed::new(),
        );
        engine.mount();
        settle(&mut engine, |s| s.genre_movies.status == LoadStatus::Loaded).await;
        for _ in 0..4 {
            engine.state.page.next();
        }
        assert_eq!(engine.state.page.current(), 5);
        let before = catalog.genre_requests().len();

        engine.process_message(Message::NextPage);
        engine.process_message(Message::PreviousPage);
        settle(&mut engine, |s| s.genre_movies.status == LoadStatus::Loaded).await;

        assert_eq!(engine.state.page.current(), 4);
        let requests = catalog.genre_requests();
        assert_eq!(requests.len(), before + 1);
        assert_eq!(requests.last(), Some(&("28".to_string(), 4)));
    }

    #[tokio::test]
    async fn test_slow_response_for_previous_genre_is_dropped() {
        let catalog = StubCatalog::new()
            .with_movies(&FAMOUS_MOVIE_IDS)
            .with_genre_page("28", 1, test_page(100, 3, 9))
            .with_genre_delay("28", 1, Duration::from_millis(80))
            .with_genre_page("35", 1, test_page(350, 2, 2));
        let mut engine = engine(
            GenreSelection::genre("28", "Action"),
            catalog,
            StubReviewFeed::new(),
        );

        engine.mount();
        engine.process_message(Message::Navigate(eiga_core::Route::home(
            GenreSelection::genre("35", "Comedy"),
        )));
        settle(&mut engine, |s| s.genre_movies.status == LoadStatus::Loaded).await;
        // Give the slow response time to arrive
        tokio::time::sleep(Duration::from_millis(120)).await;
        engine.drain_pending_messages();

        assert_eq!(
            engine.state.current_genre_request(),
            Some(GenreRequest::new("35", 1))
        );
        assert_eq!(engine.state.page.total(), 2);
        assert!(engine.state.genre_movies.data.iter().all(|m| m.id >= 350));
    }

    #[tokio::test]
    async fn test_snapshots_replace_overlay() {
        let feed = StubReviewFeed::new();
        let mut engine = engine(GenreSelection::none(), famous_catalog(), feed.clone());
        engine.mount();
        settle(&mut engine, |s| s.feed_status == FeedStatus::Live || feed_ready(&feed)).await;

        assert!(
            feed.push_snapshot(vec![
                test_review("a", 11, 3.0, 2_000),
                test_review("b", 238, 0.0, 1_000),
            ])
            .await
        );
        settle(&mut engine, |s| s.comments_generation == 1).await;
        assert_eq!(engine.state.comments.len(), 2);
        assert_eq!(engine.state.comments[0].star_count(), 3);
        assert_eq!(engine.state.comments[1].star_count(), 0);

        assert!(feed.push_snapshot(vec![test_review("c", 155, 5.0, 3_000)]).await);
        settle(&mut engine, |s| s.comments_generation == 2).await;
        assert_eq!(engine.state.comments.len(), 1);
        assert_eq!(engine.state.comments[0].document.id, "c");
    }

    fn feed_ready(feed: &StubReviewFeed) -> bool {
        feed.subscribe_count() > 0
    }

    #[tokio::test]
    async fn test_shutdown_releases_subscription_exactly_once() {
        let feed = StubReviewFeed::new();
        let mut engine = engine(GenreSelection::none(), famous_catalog(), feed.clone());
        engine.mount();
        settle(&mut engine, |_| feed_ready(&feed)).await;
        // Let the subscribe task park its handle
        tokio::time::sleep(Duration::from_millis(20)).await;

        engine.shutdown().await;
        engine.shutdown().await;

        assert_eq!(feed.unsubscribe_count(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_does_not_wait_for_slow_connect() {
        let feed = StubReviewFeed::new().with_subscribe_delay(Duration::from_secs(30));
        let mut engine = engine(GenreSelection::none(), famous_catalog(), feed.clone());
        engine.mount();
        settle(&mut engine, |_| feed.subscribe_count() == 1).await;

        let teardown = tokio::time::timeout(Duration::from_secs(1), engine.shutdown()).await;

        assert!(teardown.is_ok(), "shutdown blocked on the connecting feed");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(feed.unsubscribe_count(), 0);
    }

    #[tokio::test]
    async fn test_no_updates_after_teardown() {
        let feed = StubReviewFeed::new();
        let mut engine = engine(GenreSelection::none(), famous_catalog(), feed.clone());
        engine.mount();
        settle(&mut engine, |_| feed_ready(&feed)).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        engine.shutdown().await;
        engine.process_message(Message::ReviewSnapshot(vec![test_review("late", 1, 1.0, 1)]));
        engine.process_message(Message::PopularLoaded(test_page(900, 1, 1)));

        assert!(engine.state.comments.is_empty());
        assert!(engine
            .state
            .popular
            .data
            .iter()
            .all(|m: &MovieSummary| m.id != 900));
    }

    #[tokio::test]
    async fn test_failed_feed_is_retried() {
        let feed = StubReviewFeed::new().failing();
        let mut engine = engine(GenreSelection::none(), famous_catalog(), feed.clone());
        engine.mount();
        settle(&mut engine, |s| s.feed_status.is_failed()).await;

        feed.set_subscribe_failure(false);
        engine.process_message(Message::RetryFailed);
        settle(&mut engine, |_| feed.subscribe_count() == 2).await;

        assert_eq!(engine.state.feed_status, FeedStatus::Connecting);
    }

    #[tokio::test]
    async fn test_popular_failure_then_retry() {
        let catalog = famous_catalog();
        catalog.set_popular_failure(true);
        let mut engine = engine(GenreSelection::none(), catalog.clone(), StubReviewFeed::new());
        let mut events = engine.subscribe();

        engine.mount();
        settle(&mut engine, |s| s.popular.is_failed()).await;

        let mut saw_failure = false;
        while let Ok(event) = events.try_recv() {
            if let EngineEvent::LoaderFailed { loader, .. } = event {
                saw_failure |= loader == Loader::Popular;
            }
        }
        assert!(saw_failure);

        catalog.set_popular_failure(false);
        engine.process_message(Message::RetryFailed);
        settle(&mut engine, |s| s.popular.status == LoadStatus::Loaded).await;
        assert_eq!(catalog.popular_requests(), 2);
    }

    #[tokio::test]
    async fn test_each_popular_response_emits_an_event() {
        let mut engine = engine(GenreSelection::none(), famous_catalog(), StubReviewFeed::new());
        let mut events = engine.subscribe();

        // Home -> genre -> home before the first response lands
        engine.process_message(Message::PopularLoaded(test_page(1, 2, 1)));
        engine.process_message(Message::PopularLoaded(test_page(1, 2, 1)));

        let mut popular_events = 0;
        while let Ok(event) = events.try_recv() {
            if matches!(event, EngineEvent::PopularLoaded { .. }) {
                popular_events += 1;
            }
        }
        assert_eq!(popular_events, 2);
    }
}
