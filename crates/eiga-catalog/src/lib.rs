//! # eiga-catalog - External Service Clients
//!
//! Talks to the two external collaborators of the view: the movie catalog REST
//! API and the live review feed.
//!
//! Depends on [`eiga_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! ### Catalog
//! - [`CatalogApi`] - Async catalog operations (popular, discover by genre, by id)
//! - [`TmdbClient`] - `reqwest`-backed implementation against TMDB v3
//! - [`fetch_movies_in_order()`] - Concurrent by-id fan-out preserving input order
//!
//! ### Review Feed
//! - [`ReviewFeed`] - Opens a live, full-replace subscription to review documents
//! - [`WsReviewFeed`] - WebSocket implementation with reconnection
//! - [`Subscription`] - Handle that must be released with [`Subscription::unsubscribe`]
//! - [`FeedEvent`], [`FeedStatus`] - What a subscription reports

pub mod feed;
pub mod tmdb;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use feed::{
    parse_feed_message, FeedEvent, FeedMessage, FeedStatus, LocalReviewFeed, ReviewFeed,
    Subscription, WsReviewFeed, WsReviewFeedConfig, DEFAULT_COLLECTION, DEFAULT_FEED_URL,
};
pub use tmdb::{
    fetch_movies_in_order, CatalogApi, LocalCatalogApi, TmdbClient, TmdbConfig,
    DEFAULT_BASE_URL, DEFAULT_LANGUAGE,
};
