//! Route changes and pagination

use eiga_core::prelude::*;
use eiga_core::{GenreSelection, MovieId, Route};

use crate::state::{AppState, Loadable, UiMode};

use super::loaders::{fetch_genre, fetch_popular};
use super::{UpdateAction, UpdateResult};

pub fn handle_navigate(state: &mut AppState, route: Route) -> UpdateResult {
    match route {
        Route::Home(selection) => change_genre(state, selection),
        Route::MovieDetail(id) => open_detail(state, id),
    }
}

/// Apply a new genre selection.
///
/// The page resets to 1 in the same step that issues the dependent fetch, so
/// no request for the old page can be sent under the new genre.
fn change_genre(state: &mut AppState, selection: GenreSelection) -> UpdateResult {
    state.ui_mode = UiMode::Browse;

    if selection.genre_id == state.genre.genre_id {
        // Same filter; only the label may differ
        state.genre.genre_name = selection.genre_name;
        return UpdateResult::none();
    }

    info!(
        "Navigating to {}",
        Route::home(selection.clone()).to_location()
    );
    state.genre = selection;
    state.page.reset();
    state.genre_movies = Loadable::default();
    state.reset_focus();

    match fetch_genre(state) {
        Some(action) => UpdateResult::action(action),
        None => UpdateResult::action(fetch_popular(state)),
    }
}

fn open_detail(state: &mut AppState, id: MovieId) -> UpdateResult {
    let route = Route::MovieDetail(id);
    let url = detail_url(&state.settings.navigation.detail_base_url, id);
    debug!("Opening {} ({})", route, url);
    state.last_opened = Some(route.to_location());
    UpdateResult::action(UpdateAction::OpenDetail {
        url,
        browser: state.settings.navigation.browser.clone(),
    })
}

/// Absolute URL of a movie's detail route
pub fn detail_url(base: &str, id: MovieId) -> String {
    format!(
        "{}{}",
        base.trim_end_matches('/'),
        Route::MovieDetail(id).to_location()
    )
}

pub fn handle_previous_page(state: &mut AppState) -> UpdateResult {
    if !state.genre.is_selected() || !state.page.previous() {
        return UpdateResult::none();
    }
    fetch_genre(state)
        .map(UpdateResult::action)
        .unwrap_or_else(UpdateResult::none)
}

pub fn handle_next_page(state: &mut AppState) -> UpdateResult {
    if !state.genre.is_selected() || !state.page.next() {
        return UpdateResult::none();
    }
    fetch_genre(state)
        .map(UpdateResult::action)
        .unwrap_or_else(UpdateResult::none)
}
