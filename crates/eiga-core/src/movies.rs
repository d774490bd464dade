//! Movie catalog domain types: summaries, pages, genre selection and pagination

use serde::{Deserialize, Serialize};

/// Numeric catalog identifier of a movie
pub type MovieId = u64;

/// Highest page the catalog's list endpoints will serve.
///
/// The discover endpoint rejects `page > 500` even when `total_pages` reports more.
pub const MAX_CATALOG_PAGES: u32 = 500;

/// One movie as returned by the catalog list and by-id endpoints.
///
/// The poster path is carried but never rendered; a placeholder is drawn instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieSummary {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
        }
    }
}

/// One page of a list endpoint (`/movie/popular`, `/discover/movie`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub results: Vec<MovieSummary>,

    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
}

fn default_total_pages() -> u32 {
    1
}

impl MoviePage {
    pub fn new(results: Vec<MovieSummary>, total_pages: u32) -> Self {
        Self {
            results,
            total_pages,
        }
    }
}

/// Which of the two mutually exclusive layouts is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Popular + famous + comment overlay
    #[default]
    Default,
    /// Paginated genre results only
    Genre,
}

/// Genre filter derived from the current location (`?genre=<id>&name=<label>`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GenreSelection {
    pub genre_id: Option<String>,
    pub genre_name: Option<String>,
}

impl GenreSelection {
    /// Build a selection, treating empty strings as absent
    pub fn new(genre_id: Option<String>, genre_name: Option<String>) -> Self {
        Self {
            genre_id: genre_id.filter(|id| !id.is_empty()),
            genre_name: genre_name.filter(|name| !name.is_empty()),
        }
    }

    pub fn genre(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(Some(id.into()), Some(name.into()))
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_selected(&self) -> bool {
        self.genre_id.is_some()
    }

    pub fn display_mode(&self) -> DisplayMode {
        if self.is_selected() {
            DisplayMode::Genre
        } else {
            DisplayMode::Default
        }
    }

    /// Label shown in the genre header; falls back to the id when no name was given
    pub fn label(&self) -> &str {
        self.genre_name
            .as_deref()
            .or(self.genre_id.as_deref())
            .unwrap_or("")
    }
}

/// Pagination cursor for the genre view.
///
/// Invariant: `1 <= current <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    current: u32,
    total: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current: 1,
            total: 1,
        }
    }
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Back to page 1 of 1 (used on every genre change)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    /// Move back one page. Returns `false` (and changes nothing) on page 1.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Move forward one page. Returns `false` (and changes nothing) on the last page.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Overwrite the page count from a catalog response.
    ///
    /// The count is clamped to `[1, MAX_CATALOG_PAGES]`. Returns `true` when the
    /// current page had to be pulled back inside the new bound.
    pub fn set_total(&mut self, total: u32) -> bool {
        self.total = total.clamp(1, MAX_CATALOG_PAGES);
        if self.current > self.total {
            self.current = self.total;
            return true;
        }
        false
    }
}

/// Genres offered by the genre picker (catalog id, display name)
pub const CATALOG_GENRES: &[(&str, &str)] = &[
    ("28", "Action"),
    ("12", "Adventure"),
    ("16", "Animation"),
    ("35", "Comedy"),
    ("80", "Crime"),
    ("99", "Documentary"),
    ("18", "Drama"),
    ("10751", "Family"),
    ("14", "Fantasy"),
    ("36", "History"),
    ("27", "Horror"),
    ("10402", "Music"),
    ("9648", "Mystery"),
    ("10749", "Romance"),
    ("878", "Science Fiction"),
    ("10770", "TV Movie"),
    ("53", "Thriller"),
    ("10752", "War"),
    ("37", "Western"),
];
