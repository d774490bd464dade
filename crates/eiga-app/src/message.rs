//! Message types for the application (TEA pattern)

use eiga_catalog::FeedStatus;
use eiga_core::{MoviePage, MovieSummary, ReviewDocument, Route};

use crate::input_key::InputKey;

/// One genre-loader request: which genre, which page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenreRequest {
    pub genre_id: String,
    pub page: u32,
}

impl GenreRequest {
    pub fn new(genre_id: impl Into<String>, page: u32) -> Self {
        Self {
            genre_id: genre_id.into(),
            page,
        }
    }
}

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    /// Keyboard event from terminal
    Key(InputKey),

    /// Terminal resized
    Resize { width: u16, height: u16 },

    /// Tick event for periodic updates (animation frames)
    Tick,

    /// Quit immediately (q, Ctrl+C, signal handler)
    Quit,

    // ─────────────────────────────────────────────────────────
    // Lifecycle / Navigation
    // ─────────────────────────────────────────────────────────
    /// First message after the engine starts: kick off every loader
    Mount,

    /// Run whichever list loader the current mode needs
    RefreshView,

    /// Move to a location (home with or without genre, or a movie detail)
    Navigate(Route),

    /// Genre view: one page back
    PreviousPage,

    /// Genre view: one page forward
    NextPage,

    /// Re-issue every failed loader of the current mode
    RetryFailed,

    // ─────────────────────────────────────────────────────────
    // Loader Results
    // ─────────────────────────────────────────────────────────
    PopularLoaded(MoviePage),
    PopularFailed(String),

    GenreLoaded {
        request: GenreRequest,
        page: MoviePage,
    },
    GenreFailed {
        request: GenreRequest,
        error: String,
    },

    /// All famous movies, in id order
    FamousLoaded(Vec<MovieSummary>),
    FamousFailed(String),

    // ─────────────────────────────────────────────────────────
    // Review Feed
    // ─────────────────────────────────────────────────────────
    /// Open the live review subscription
    SubscribeReviews,

    /// Full replacement of the review set
    ReviewSnapshot(Vec<ReviewDocument>),

    FeedStatusChanged(FeedStatus),

    /// The subscription could not be opened at all
    FeedSubscribeFailed(String),

    // ─────────────────────────────────────────────────────────
    // Selection / Genre Picker
    // ─────────────────────────────────────────────────────────
    /// Tab / Shift+Tab between sections
    CycleFocus { forward: bool },

    /// Move the selection within the focused section
    MoveSelection(SelectionMove),

    /// Open the detail route of the selected entry
    OpenSelected,

    OpenGenrePicker,
    CloseGenrePicker,
    GenrePickerUp,
    GenrePickerDown,
    GenrePickerSelect,
}

/// Direction of a selection move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMove {
    Left,
    Right,
    /// One grid row up
    Up,
    /// One grid row down
    Down,
}
