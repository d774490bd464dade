//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;

use super::{keys::handle_key, loaders, navigation, selection, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Quit => {
            state.request_quit();
            UpdateResult::none()
        }

        Message::Key(key) => {
            if let Some(msg) = handle_key(state, key) {
                UpdateResult::message(msg)
            } else {
                UpdateResult::none()
            }
        }

        Message::Resize { width, height } => {
            state.viewport.width = width;
            state.viewport.height = height;
            UpdateResult::none()
        }

        Message::Tick => UpdateResult::none(),

        // ─────────────────────────────────────────────────────────
        // Lifecycle / Navigation
        // ─────────────────────────────────────────────────────────
        Message::Mount => loaders::handle_mount(state),
        Message::RefreshView => loaders::handle_refresh_view(state),
        Message::Navigate(route) => navigation::handle_navigate(state, route),
        Message::PreviousPage => navigation::handle_previous_page(state),
        Message::NextPage => navigation::handle_next_page(state),
        Message::RetryFailed => loaders::handle_retry_failed(state),

        // ─────────────────────────────────────────────────────────
        // Loader Results
        // ─────────────────────────────────────────────────────────
        Message::PopularLoaded(page) => loaders::handle_popular_loaded(state, page),
        Message::PopularFailed(error) => loaders::handle_popular_failed(state, error),
        Message::GenreLoaded { request, page } => {
            loaders::handle_genre_loaded(state, request, page)
        }
        Message::GenreFailed { request, error } => {
            loaders::handle_genre_failed(state, request, error)
        }
        Message::FamousLoaded(movies) => loaders::handle_famous_loaded(state, movies),
        Message::FamousFailed(error) => loaders::handle_famous_failed(state, error),

        // ─────────────────────────────────────────────────────────
        // Review Feed
        // ─────────────────────────────────────────────────────────
        Message::SubscribeReviews => loaders::handle_subscribe_reviews(state),
        Message::ReviewSnapshot(docs) => loaders::handle_review_snapshot(state, docs),
        Message::FeedStatusChanged(status) => loaders::handle_feed_status(state, status),
        Message::FeedSubscribeFailed(error) => {
            loaders::handle_feed_subscribe_failed(state, error)
        }

        // ─────────────────────────────────────────────────────────
        // Selection / Genre Picker
        // ─────────────────────────────────────────────────────────
        Message::CycleFocus { forward } => selection::handle_cycle_focus(state, forward),
        Message::MoveSelection(movement) => selection::handle_move_selection(state, movement),
        Message::OpenSelected => selection::handle_open_selected(state),
        Message::OpenGenrePicker => selection::handle_open_genre_picker(state),
        Message::CloseGenrePicker => selection::handle_close_genre_picker(state),
        Message::GenrePickerUp => selection::handle_genre_picker_move(state, false),
        Message::GenrePickerDown => selection::handle_genre_picker_move(state, true),
        Message::GenrePickerSelect => selection::handle_genre_picker_select(state),
    }
}
