//! Focus, selection and genre picker handlers

use eiga_core::{GenreSelection, Route, CATALOG_GENRES};

use crate::message::{Message, SelectionMove};
use crate::state::{section_grid_columns, AppState, Section, UiMode};

use super::UpdateResult;

pub fn handle_cycle_focus(state: &mut AppState, forward: bool) -> UpdateResult {
    let sections = state.sections();
    let current = sections
        .iter()
        .position(|s| *s == state.focus)
        .unwrap_or(0);
    let next = if forward {
        (current + 1) % sections.len()
    } else {
        (current + sections.len() - 1) % sections.len()
    };
    state.focus = sections[next];
    state.selected = 0;
    UpdateResult::none()
}

pub fn handle_move_selection(state: &mut AppState, movement: SelectionMove) -> UpdateResult {
    let len = state.section_len(state.focus);
    if len == 0 {
        state.selected = 0;
        return UpdateResult::none();
    }

    // The comment list is a single column
    let stride = match state.focus {
        Section::Comments => 1,
        _ => section_grid_columns(state.viewport.width),
    };

    let selected = state.selected;
    state.selected = match movement {
        SelectionMove::Left => selected.saturating_sub(1),
        SelectionMove::Right => (selected + 1).min(len - 1),
        SelectionMove::Up => selected.checked_sub(stride).unwrap_or(selected),
        SelectionMove::Down => {
            if selected + stride < len {
                selected + stride
            } else {
                selected
            }
        }
    };
    UpdateResult::none()
}

pub fn handle_open_selected(state: &mut AppState) -> UpdateResult {
    match state.selected_movie_id() {
        Some(id) => UpdateResult::message(Message::Navigate(Route::MovieDetail(id))),
        None => UpdateResult::none(),
    }
}

pub fn handle_open_genre_picker(state: &mut AppState) -> UpdateResult {
    let selected = state
        .genre
        .genre_id
        .as_deref()
        .and_then(|id| CATALOG_GENRES.iter().position(|(gid, _)| *gid == id))
        .unwrap_or(0);
    state.ui_mode = UiMode::GenrePicker { selected };
    UpdateResult::none()
}

pub fn handle_close_genre_picker(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::Browse;
    UpdateResult::none()
}

pub fn handle_genre_picker_move(state: &mut AppState, down: bool) -> UpdateResult {
    if let UiMode::GenrePicker { selected } = state.ui_mode {
        let last = CATALOG_GENRES.len().saturating_sub(1);
        let selected = if down {
            (selected + 1).min(last)
        } else {
            selected.saturating_sub(1)
        };
        state.ui_mode = UiMode::GenrePicker { selected };
    }
    UpdateResult::none()
}

pub fn handle_genre_picker_select(state: &mut AppState) -> UpdateResult {
    let UiMode::GenrePicker { selected } = state.ui_mode else {
        return UpdateResult::none();
    };
    state.ui_mode = UiMode::Browse;

    match state.genre_picker_entry(selected) {
        Some((id, name)) => UpdateResult::message(Message::Navigate(Route::home(
            GenreSelection::genre(id, name),
        ))),
        None => UpdateResult::none(),
    }
}
