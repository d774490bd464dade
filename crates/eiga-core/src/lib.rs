//! # eiga-core - Core Domain Types
//!
//! Foundation crate for eiga. Provides the movie/review domain model, navigation
//! routes, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, url, tracing).
//!
//! ## Public API
//!
//! ### Movies (`movies`)
//! - [`MovieSummary`] - One catalog entry (id + title)
//! - [`MoviePage`] - One page of a list endpoint with its page count
//! - [`GenreSelection`], [`DisplayMode`] - Navigation-derived genre filter
//! - [`PageState`] - Bounded pagination cursor
//!
//! ### Reviews (`reviews`)
//! - [`ReviewDocument`] - A review as delivered by the live feed
//! - [`ReviewComment`] - A review placed on the danmaku overlay
//! - [`ReviewTimestamp`] - Ordering key of a review
//!
//! ### Navigation (`route`)
//! - [`Route`] - Home (with optional genre) or movie detail
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum, one variant group per layer
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ### Logging (`logging`)
//! - [`logging::init`] - Tracing to a daily file (TUI) or stderr (headless)
//!
//! ## Prelude
//!
//! ```rust
//! use eiga_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod movies;
pub mod reviews;
pub mod route;

/// Prelude for common imports used throughout all eiga crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use error::{Error, Result};
pub use movies::{
    DisplayMode, GenreSelection, MovieId, MoviePage, MovieSummary, PageState, CATALOG_GENRES,
    MAX_CATALOG_PAGES,
};
pub use reviews::{bounded_stars, ReviewComment, ReviewDocument, ReviewTimestamp, MAX_STARS};
pub use route::Route;
