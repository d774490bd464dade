//! Application state (Model in TEA pattern)

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use eiga_catalog::FeedStatus;
use eiga_core::{
    DisplayMode, GenreSelection, MovieId, MovieSummary, PageState, ReviewComment, CATALOG_GENRES,
};

use crate::config::Settings;
use crate::message::GenreRequest;

/// Ids fetched by the famous-movies loader, in display order
pub const FAMOUS_MOVIE_IDS: [MovieId; 6] = [1891, 11, 238, 155, 278, 122];

/// Terminal columns taken by one movie card, gap included
pub const CARD_WIDTH: u16 = 20;

/// Cells taken by a section's left and right borders
pub const SECTION_BORDER_WIDTH: u16 = 2;

/// Cards per grid row at a given inner width (at least one)
pub fn grid_columns(width: u16) -> usize {
    usize::from((width / CARD_WIDTH).max(1))
}

/// Cards per grid row for a full-width bordered section in `viewport_width`
pub fn section_grid_columns(viewport_width: u16) -> usize {
    grid_columns(viewport_width.saturating_sub(SECTION_BORDER_WIDTH))
}

/// Load status of one loader
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Never requested
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Last request failed; data still holds the previous result
    Failed(String),
}

/// A loader's data plus its load status
#[derive(Debug, Clone, Default)]
pub struct Loadable<T> {
    pub data: T,
    pub status: LoadStatus,
    /// Responses applied so far, success or failure
    pub generation: u64,
}

impl<T> Loadable<T> {
    pub fn start_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// Replace the data wholesale
    pub fn finish(&mut self, data: T) {
        self.data = data;
        self.status = LoadStatus::Loaded;
        self.generation += 1;
    }

    /// Record a failure, keeping the previous data
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = LoadStatus::Failed(error.into());
        self.generation += 1;
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, LoadStatus::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            LoadStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Focusable area of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Popular,
    Famous,
    Comments,
    Genre,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::Popular => "人気の映画",
            Section::Famous => "みんなが知ってる有名映画",
            Section::Comments => "コメント",
            Section::Genre => "ジャンル",
        }
    }
}

const DEFAULT_SECTIONS: &[Section] = &[Section::Popular, Section::Famous, Section::Comments];
const GENRE_SECTIONS: &[Section] = &[Section::Genre];

/// Current UI mode/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Browse,
    /// Genre list open; index into [`CATALOG_GENRES`]
    GenrePicker { selected: usize },
}

/// Terminal size in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// Complete application state (the Model in TEA)
#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,

    /// Navigation-derived genre filter; decides the display mode
    pub genre: GenreSelection,

    /// Pagination cursor of the genre view
    pub page: PageState,

    pub popular: Loadable<Vec<MovieSummary>>,
    pub genre_movies: Loadable<Vec<MovieSummary>>,
    pub famous: Loadable<Vec<MovieSummary>>,

    /// Current overlay contents, replaced on every snapshot
    pub comments: Vec<ReviewComment>,
    /// When the current snapshot was projected; the animation clock starts here
    pub comments_received_at: Option<Instant>,
    /// Bumped on every snapshot
    pub comments_generation: u64,

    pub feed_status: FeedStatus,

    /// Injected terminal size; read when a snapshot is projected
    pub viewport: Viewport,

    /// Randomness for comment placement
    pub rng: StdRng,

    pub focus: Section,
    pub selected: usize,
    pub ui_mode: UiMode,

    /// Last detail location handed to the opener
    pub last_opened: Option<String>,

    /// Set once teardown has begun; no further updates are applied
    pub torn_down: bool,

    quit: bool,
}

impl AppState {
    pub fn new(settings: Settings, genre: GenreSelection) -> Self {
        Self::with_rng(settings, genre, StdRng::from_entropy())
    }

    /// State with a caller-supplied generator (seeded in tests)
    pub fn with_rng(settings: Settings, genre: GenreSelection, rng: StdRng) -> Self {
        let focus = if genre.is_selected() {
            Section::Genre
        } else {
            Section::Popular
        };

        Self {
            settings,
            genre,
            page: PageState::new(),
            popular: Loadable::default(),
            genre_movies: Loadable::default(),
            famous: Loadable::default(),
            comments: Vec::new(),
            comments_received_at: None,
            comments_generation: 0,
            feed_status: FeedStatus::default(),
            viewport: Viewport::default(),
            rng,
            focus,
            selected: 0,
            ui_mode: UiMode::default(),
            last_opened: None,
            torn_down: false,
            quit: false,
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.genre.display_mode()
    }

    /// The `(genre, page)` the genre loader should currently show
    pub fn current_genre_request(&self) -> Option<GenreRequest> {
        self.genre
            .genre_id
            .as_ref()
            .map(|id| GenreRequest::new(id.clone(), self.page.current()))
    }

    /// Sections reachable with Tab in the current mode
    pub fn sections(&self) -> &'static [Section] {
        match self.display_mode() {
            DisplayMode::Default => DEFAULT_SECTIONS,
            DisplayMode::Genre => GENRE_SECTIONS,
        }
    }

    /// Number of selectable entries in `section`
    pub fn section_len(&self, section: Section) -> usize {
        match section {
            Section::Popular => self.popular.data.len(),
            Section::Famous => self.famous.data.len(),
            Section::Comments => self.comments.len(),
            Section::Genre => self.genre_movies.data.len(),
        }
    }

    /// Movie the current selection points at
    pub fn selected_movie_id(&self) -> Option<MovieId> {
        let index = self.selected;
        match self.focus {
            Section::Popular => self.popular.data.get(index).map(|m| m.id),
            Section::Famous => self.famous.data.get(index).map(|m| m.id),
            Section::Genre => self.genre_movies.data.get(index).map(|m| m.id),
            Section::Comments => self.comments.get(index).map(|c| c.document.movie_id),
        }
    }

    /// Put focus on the first section of the current mode
    pub fn reset_focus(&mut self) {
        self.focus = self.sections()[0];
        self.selected = 0;
    }

    /// Pull the selection back inside the focused section
    pub fn clamp_selection(&mut self) {
        let len = self.section_len(self.focus);
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn genre_picker_entry(&self, index: usize) -> Option<(&'static str, &'static str)> {
        CATALOG_GENRES.get(index).copied()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loadable_failure_keeps_data() {
        let mut loadable: Loadable<Vec<u32>> = Loadable::default();
        assert_eq!(loadable.status, LoadStatus::Idle);

        loadable.start_loading();
        loadable.finish(vec![1, 2]);
        loadable.start_loading();
        loadable.fail("timeout");

        assert_eq!(loadable.data, vec![1, 2]);
        assert_eq!(loadable.error(), Some("timeout"));
        assert!(loadable.is_failed());
    }

    #[test]
    fn test_default_mode_sections() {
        let state = AppState::new(Settings::default(), GenreSelection::none());
        assert_eq!(state.display_mode(), DisplayMode::Default);
        assert_eq!(state.focus, Section::Popular);
        assert_eq!(state.sections().len(), 3);
        assert!(state.current_genre_request().is_none());
    }

    #[test]
    fn test_genre_mode_sections() {
        let state = AppState::new(Settings::default(), GenreSelection::genre("28", "Action"));
        assert_eq!(state.display_mode(), DisplayMode::Genre);
        assert_eq!(state.focus, Section::Genre);
        assert_eq!(
            state.current_genre_request(),
            Some(GenreRequest::new("28", 1))
        );
    }

    #[test]
    fn test_selected_movie_follows_focus() {
        let mut state = AppState::new(Settings::default(), GenreSelection::none());
        state
            .famous
            .finish(vec![MovieSummary::new(1891, "a"), MovieSummary::new(11, "b")]);
        state.focus = Section::Famous;
        state.selected = 1;
        assert_eq!(state.selected_movie_id(), Some(11));

        state.focus = Section::Popular;
        assert_eq!(state.selected_movie_id(), None);
    }

    #[test]
    fn test_loadable_counts_applied_responses() {
        let mut loadable: Loadable<Vec<u32>> = Loadable::default();
        loadable.start_loading();
        assert_eq!(loadable.generation, 0);

        loadable.finish(vec![1]);
        loadable.finish(vec![1]);
        loadable.fail("HTTP 500");
        assert_eq!(loadable.generation, 3);
        assert_eq!(loadable.data, vec![1]);
    }

    #[test]
    fn test_grid_columns_never_zero() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(CARD_WIDTH * 4 + 3), 4);
    }

    #[test]
    fn test_section_grid_columns_leaves_room_for_borders() {
        assert_eq!(section_grid_columns(80), 3);
        assert_eq!(section_grid_columns(CARD_WIDTH * 4 + SECTION_BORDER_WIDTH), 4);
        assert_eq!(section_grid_columns(1), 1);
    }

    #[test]
    fn test_famous_ids_order() {
        assert_eq!(FAMOUS_MOVIE_IDS, [1891, 11, 238, 155, 278, 122]);
    }
}
