//! Test doubles for the catalog and the review feed
//!
//! Both stubs are cheap to clone and share their state, so a test can hand one
//! copy to the engine and keep another to inspect requests or push events.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use eiga_core::prelude::*;
use eiga_core::{MovieId, MoviePage, MovieSummary, ReviewDocument};

use crate::feed::{FeedEvent, FeedStatus, ReviewFeed, Subscription};
use crate::tmdb::CatalogApi;

/// Creates a movie summary with a placeholder title
pub fn test_movie(id: MovieId) -> MovieSummary {
    MovieSummary::new(id, format!("Movie {id}"))
}

/// Creates a page of placeholder movies with ids `first..first + count`
pub fn test_page(first: MovieId, count: u64, total_pages: u32) -> MoviePage {
    MoviePage::new((first..first + count).map(test_movie).collect(), total_pages)
}

/// Creates a review with a millisecond timestamp
pub fn test_review(id: &str, movie_id: MovieId, rating: f64, millis: i64) -> ReviewDocument {
    ReviewDocument::new(id, movie_id, format!("review {id}"))
        .with_rating(rating)
        .with_timestamp(eiga_core::ReviewTimestamp::from_millis(millis))
}

#[derive(Default)]
struct CatalogScript {
    popular: Option<MoviePage>,
    genre_pages: HashMap<(String, u32), MoviePage>,
    genre_delays: HashMap<(String, u32), Duration>,
    movies: HashMap<MovieId, MovieSummary>,
    movie_delays: HashMap<MovieId, Duration>,
    fail_popular: bool,
    fail_genre: bool,
}

#[derive(Default)]
struct CatalogInner {
    script: Mutex<CatalogScript>,
    popular_requests: AtomicUsize,
    movie_requests: AtomicUsize,
    genre_requests: Mutex<Vec<(String, u32)>>,
}

/// Scripted in-memory catalog.
///
/// Unknown movie ids answer with a 404; unknown genre pages answer with an
/// empty single page.
#[derive(Clone, Default)]
pub struct StubCatalog {
    inner: Arc<CatalogInner>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> std::sync::MutexGuard<'_, CatalogScript> {
        self.inner
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub fn with_popular(self, page: MoviePage) -> Self {
        self.script().popular = Some(page);
        self
    }

    pub fn with_genre_page(self, genre_id: &str, page: u32, result: MoviePage) -> Self {
        self.script()
            .genre_pages
            .insert((genre_id.to_string(), page), result);
        self
    }

    /// Hold back the response for one genre page
    pub fn with_genre_delay(self, genre_id: &str, page: u32, delay: Duration) -> Self {
        self.script()
            .genre_delays
            .insert((genre_id.to_string(), page), delay);
        self
    }

    pub fn with_movie(self, movie: MovieSummary) -> Self {
        self.script().movies.insert(movie.id, movie);
        self
    }

    /// Register placeholder movies for every id
    pub fn with_movies(self, ids: &[MovieId]) -> Self {
        for &id in ids {
            self.script().movies.insert(id, test_movie(id));
        }
        self
    }

    /// Hold back the response for one movie id
    pub fn with_delay(self, id: MovieId, delay: Duration) -> Self {
        self.script().movie_delays.insert(id, delay);
        self
    }

    pub fn set_popular_failure(&self, fail: bool) {
        self.script().fail_popular = fail;
    }

    pub fn set_genre_failure(&self, fail: bool) {
        self.script().fail_genre = fail;
    }

    pub fn popular_requests(&self) -> usize {
        self.inner.popular_requests.load(Ordering::SeqCst)
    }

    pub fn movie_requests(&self) -> usize {
        self.inner.movie_requests.load(Ordering::SeqCst)
    }

    /// Every `(genre_id, page)` requested so far, in order
    pub fn genre_requests(&self) -> Vec<(String, u32)> {
        self.inner
            .genre_requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl CatalogApi for StubCatalog {
    async fn popular(&self, _page: u32) -> Result<MoviePage> {
        self.inner.popular_requests.fetch_add(1, Ordering::SeqCst);
        let (fail, page) = {
            let script = self.script();
            (script.fail_popular, script.popular.clone())
        };
        if fail {
            return Err(Error::catalog("stub: popular unavailable"));
        }
        Ok(page.unwrap_or_else(|| MoviePage::new(Vec::new(), 1)))
    }

    async fn discover_by_genre(&self, genre_id: &str, page: u32) -> Result<MoviePage> {
        let key = (genre_id.to_string(), page);
        self.inner
            .genre_requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(key.clone());

        let (fail, delay, result) = {
            let script = self.script();
            (
                script.fail_genre,
                script.genre_delays.get(&key).copied(),
                script.genre_pages.get(&key).cloned(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(Error::catalog_status(503, "stub: discover unavailable"));
        }
        Ok(result.unwrap_or_else(|| MoviePage::new(Vec::new(), 1)))
    }

    async fn movie(&self, id: MovieId) -> Result<MovieSummary> {
        self.inner.movie_requests.fetch_add(1, Ordering::SeqCst);
        let (delay, movie) = {
            let script = self.script();
            (
                script.movie_delays.get(&id).copied(),
                script.movies.get(&id).cloned(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        movie.ok_or_else(|| Error::catalog_status(404, format!("stub: no movie {id}")))
    }
}

#[derive(Default)]
struct FeedInner {
    events: Mutex<Option<mpsc::Sender<FeedEvent>>>,
    fail_subscribe: Mutex<bool>,
    subscribe_delay: Mutex<Option<Duration>>,
    subscribes: AtomicUsize,
    unsubscribes: Arc<AtomicUsize>,
}

/// In-memory review feed driven by the test
#[derive(Clone, Default)]
pub struct StubReviewFeed {
    inner: Arc<FeedInner>,
}

impl StubReviewFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `subscribe` call fail
    pub fn failing(self) -> Self {
        self.set_subscribe_failure(true);
        self
    }

    /// Hold every `subscribe` call for `delay` before it answers
    pub fn with_subscribe_delay(self, delay: Duration) -> Self {
        *self
            .inner
            .subscribe_delay
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(delay);
        self
    }

    pub fn set_subscribe_failure(&self, fail: bool) {
        *self
            .inner
            .fail_subscribe
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = fail;
    }

    fn sender(&self) -> Option<mpsc::Sender<FeedEvent>> {
        self.inner
            .events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Deliver a snapshot to the current subscriber. Returns `false` when nobody listens.
    pub async fn push_snapshot(&self, docs: Vec<ReviewDocument>) -> bool {
        self.push(FeedEvent::Snapshot(docs)).await
    }

    pub async fn push_status(&self, status: FeedStatus) -> bool {
        self.push(FeedEvent::Status(status)).await
    }

    async fn push(&self, event: FeedEvent) -> bool {
        match self.sender() {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }

    pub fn subscribe_count(&self) -> usize {
        self.inner.subscribes.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.inner.unsubscribes.load(Ordering::SeqCst)
    }
}

impl ReviewFeed for StubReviewFeed {
    async fn subscribe(&self, events: mpsc::Sender<FeedEvent>) -> Result<Subscription> {
        self.inner.subscribes.fetch_add(1, Ordering::SeqCst);

        let delay = *self
            .inner
            .subscribe_delay
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let fail = *self
            .inner
            .fail_subscribe
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if fail {
            return Err(Error::review_feed("stub: feed unreachable"));
        }

        *self
            .inner
            .events
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(events.clone());

        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let unsubscribes = Arc::clone(&self.inner.unsubscribes);
        let task = tokio::spawn(async move {
            if cancel_rx.await.is_ok() {
                unsubscribes.fetch_add(1, Ordering::SeqCst);
                let _ = events.send(FeedEvent::Status(FeedStatus::Closed)).await;
            }
        });

        Ok(Subscription::new(cancel_tx, task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_catalog_counts_requests() {
        let catalog = StubCatalog::new().with_movies(&[1, 2]);
        assert!(catalog.movie(1).await.is_ok());
        assert!(catalog.movie(3).await.is_err());
        assert_eq!(catalog.movie_requests(), 2);
    }

    #[tokio::test]
    async fn test_stub_catalog_records_genre_requests() {
        let catalog = StubCatalog::new().with_genre_page("28", 2, test_page(10, 3, 7));
        let page = catalog.discover_by_genre("28", 2).await.unwrap();
        assert_eq!(page.total_pages, 7);
        assert_eq!(catalog.genre_requests(), vec![("28".to_string(), 2)]);
    }

    #[tokio::test]
    async fn test_stub_feed_counts_unsubscribe() {
        let feed = StubReviewFeed::new();
        let (tx, mut rx) = mpsc::channel(8);
        let subscription = feed.subscribe(tx).await.unwrap();

        assert!(feed.push_snapshot(vec![test_review("a", 1, 3.0, 10)]).await);
        assert!(matches!(rx.recv().await, Some(FeedEvent::Snapshot(docs)) if docs.len() == 1));

        subscription.unsubscribe().await;
        assert_eq!(feed.unsubscribe_count(), 1);
    }
}
