//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. The headless runner prints them as JSON lines.

use serde::Serialize;

use eiga_core::{MovieSummary, ReviewComment};

/// Which loader an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Popular,
    Genre,
    Famous,
}

/// Domain events emitted by the Engine.
///
/// Subscribers see a consistent view: an event is only emitted once the
/// message that caused it, and all its follow-ups, have been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EngineEvent {
    PopularLoaded {
        movies: Vec<MovieSummary>,
    },

    GenreLoaded {
        genre_id: String,
        page: u32,
        total_pages: u32,
        movies: Vec<MovieSummary>,
    },

    /// Famous movies, in id order
    FamousLoaded {
        movies: Vec<MovieSummary>,
    },

    /// A new snapshot replaced the overlay
    CommentsUpdated {
        comments: Vec<ReviewComment>,
    },

    LoaderFailed {
        loader: Loader,
        error: String,
    },

    FeedStatus {
        status: String,
    },

    /// Engine is shutting down
    Shutdown,
}

impl EngineEvent {
    /// Returns a short string label for this event type (for logging/debugging).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PopularLoaded { .. } => "popular_loaded",
            Self::GenreLoaded { .. } => "genre_loaded",
            Self::FamousLoaded { .. } => "famous_loaded",
            Self::CommentsUpdated { .. } => "comments_updated",
            Self::LoaderFailed { .. } => "loader_failed",
            Self::FeedStatus { .. } => "feed_status",
            Self::Shutdown => "shutdown",
        }
    }
}
