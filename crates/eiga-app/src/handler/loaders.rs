//! Loader handlers: issuing fetches and applying their results

use std::time::Instant;

use eiga_catalog::FeedStatus;
use eiga_core::prelude::*;
use eiga_core::{DisplayMode, MoviePage, MovieSummary, ReviewDocument};

use crate::danmaku;
use crate::message::{GenreRequest, Message};
use crate::state::{AppState, Section, FAMOUS_MOVIE_IDS};

use super::{UpdateAction, UpdateResult};

/// Start every loader: famous once, the review feed, then the mode's list
pub fn handle_mount(state: &mut AppState) -> UpdateResult {
    info!("Mounting view at {}", eiga_core::Route::home(state.genre.clone()));
    UpdateResult::action_then(fetch_famous(state), Message::SubscribeReviews)
}

pub fn handle_subscribe_reviews(state: &mut AppState) -> UpdateResult {
    state.feed_status = FeedStatus::Connecting;
    UpdateResult::action_then(UpdateAction::SubscribeReviews, Message::RefreshView)
}

/// Fetch whichever list the current display mode shows
pub fn handle_refresh_view(state: &mut AppState) -> UpdateResult {
    match state.display_mode() {
        DisplayMode::Default => UpdateResult::action(fetch_popular(state)),
        DisplayMode::Genre => fetch_genre(state)
            .map(UpdateResult::action)
            .unwrap_or_else(UpdateResult::none),
    }
}

pub(super) fn fetch_popular(state: &mut AppState) -> UpdateAction {
    state.popular.start_loading();
    UpdateAction::FetchPopular
}

pub(super) fn fetch_famous(state: &mut AppState) -> UpdateAction {
    state.famous.start_loading();
    UpdateAction::FetchFamous {
        ids: FAMOUS_MOVIE_IDS.to_vec(),
    }
}

/// Request the current `(genre, page)`; `None` when no genre is selected
pub(super) fn fetch_genre(state: &mut AppState) -> Option<UpdateAction> {
    let request = state.current_genre_request()?;
    state.genre_movies.start_loading();
    Some(UpdateAction::FetchGenre(request))
}

pub fn handle_popular_loaded(state: &mut AppState, page: MoviePage) -> UpdateResult {
    debug!("Popular loaded: {} movie(s)", page.results.len());
    state.popular.finish(page.results);
    if state.focus == Section::Popular {
        state.clamp_selection();
    }
    UpdateResult::none()
}

pub fn handle_popular_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Popular loader failed: {}", error);
    state.popular.fail(error);
    UpdateResult::none()
}

pub fn handle_genre_loaded(
    state: &mut AppState,
    request: GenreRequest,
    page: MoviePage,
) -> UpdateResult {
    if state.current_genre_request().as_ref() != Some(&request) {
        debug!(
            "Discarding stale genre response for genre {} page {}",
            request.genre_id, request.page
        );
        return UpdateResult::none();
    }

    debug!(
        "Genre {} page {} loaded: {} movie(s), {} page(s)",
        request.genre_id,
        request.page,
        page.results.len(),
        page.total_pages
    );
    state.genre_movies.finish(page.results);
    if state.focus == Section::Genre {
        state.clamp_selection();
    }

    // The catalog shrank below the page we are on: show the last page instead
    if state.page.set_total(page.total_pages) {
        info!(
            "Genre {} now has {} page(s), moving to the last one",
            request.genre_id,
            state.page.total()
        );
        if let Some(action) = fetch_genre(state) {
            return UpdateResult::action(action);
        }
    }

    UpdateResult::none()
}

pub fn handle_genre_failed(
    state: &mut AppState,
    request: GenreRequest,
    error: String,
) -> UpdateResult {
    if state.current_genre_request().as_ref() != Some(&request) {
        debug!("Ignoring failure of stale genre request {:?}", request);
        return UpdateResult::none();
    }
    warn!("Genre loader failed: {}", error);
    state.genre_movies.fail(error);
    UpdateResult::none()
}

pub fn handle_famous_loaded(state: &mut AppState, movies: Vec<MovieSummary>) -> UpdateResult {
    state.famous.finish(movies);
    if state.focus == Section::Famous {
        state.clamp_selection();
    }
    UpdateResult::none()
}

pub fn handle_famous_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Famous loader failed: {}", error);
    state.famous.fail(error);
    UpdateResult::none()
}

/// Replace the overlay with a fresh projection of `docs`
pub fn handle_review_snapshot(state: &mut AppState, docs: Vec<ReviewDocument>) -> UpdateResult {
    let max_delay = state.settings.danmaku.max_delay_secs;
    let height = state.viewport.height;
    state.comments = danmaku::project_snapshot(docs, height, max_delay, &mut state.rng);
    state.comments_received_at = Some(Instant::now());
    state.comments_generation += 1;
    if state.focus == Section::Comments {
        state.clamp_selection();
    }
    UpdateResult::none()
}

pub fn handle_feed_status(state: &mut AppState, status: FeedStatus) -> UpdateResult {
    debug!("Review feed status: {}", status.label());
    state.feed_status = status;
    UpdateResult::none()
}

pub fn handle_feed_subscribe_failed(state: &mut AppState, error: String) -> UpdateResult {
    warn!("Review subscription failed: {}", error);
    state.feed_status = FeedStatus::Failed(error);
    UpdateResult::none()
}

/// Re-issue one failed loader and come back for the next.
///
/// Each retried loader leaves the failed state immediately, so the chain ends
/// once nothing in the current mode is failed.
pub fn handle_retry_failed(state: &mut AppState) -> UpdateResult {
    match state.display_mode() {
        DisplayMode::Genre => {
            if state.genre_movies.is_failed() {
                if let Some(action) = fetch_genre(state) {
                    return UpdateResult::action(action);
                }
            }
            UpdateResult::none()
        }
        DisplayMode::Default => {
            if state.popular.is_failed() {
                return UpdateResult::action_then(fetch_popular(state), Message::RetryFailed);
            }
            if state.famous.is_failed() {
                return UpdateResult::action_then(fetch_famous(state), Message::RetryFailed);
            }
            if state.feed_status.is_failed() {
                state.feed_status = FeedStatus::Connecting;
                return UpdateResult::action(UpdateAction::SubscribeReviews);
            }
            UpdateResult::none()
        }
    }
}
