//! Key event handlers for different UI modes

use eiga_core::{DisplayMode, GenreSelection, Route};

use crate::input_key::InputKey;
use crate::message::{Message, SelectionMove};
use crate::state::{AppState, UiMode};

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    match state.ui_mode {
        UiMode::Browse => handle_key_browse(state, key),
        UiMode::GenrePicker { .. } => handle_key_genre_picker(key),
    }
}

fn handle_key_browse(state: &AppState, key: InputKey) -> Option<Message> {
    let genre_mode = state.display_mode() == DisplayMode::Genre;

    match key {
        InputKey::Char('q') | InputKey::CharCtrl('c') => Some(Message::Quit),

        InputKey::Char('g') => Some(Message::OpenGenrePicker),
        InputKey::Char('h') | InputKey::Esc if genre_mode => {
            Some(Message::Navigate(Route::home(GenreSelection::none())))
        }

        // Pagination only means something in the genre view
        InputKey::Char('[') | InputKey::PageUp if genre_mode => Some(Message::PreviousPage),
        InputKey::Char(']') | InputKey::PageDown if genre_mode => Some(Message::NextPage),

        InputKey::Tab => Some(Message::CycleFocus { forward: true }),
        InputKey::BackTab => Some(Message::CycleFocus { forward: false }),

        InputKey::Left => Some(Message::MoveSelection(SelectionMove::Left)),
        InputKey::Right => Some(Message::MoveSelection(SelectionMove::Right)),
        InputKey::Up => Some(Message::MoveSelection(SelectionMove::Up)),
        InputKey::Down => Some(Message::MoveSelection(SelectionMove::Down)),

        InputKey::Enter => Some(Message::OpenSelected),
        InputKey::Char('r') => Some(Message::RetryFailed),

        _ => None,
    }
}

fn handle_key_genre_picker(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Up | InputKey::Char('k') => Some(Message::GenrePickerUp),
        InputKey::Down | InputKey::Char('j') => Some(Message::GenrePickerDown),
        InputKey::Enter => Some(Message::GenrePickerSelect),
        InputKey::Esc | InputKey::Char('g') => Some(Message::CloseGenrePicker),
        InputKey::CharCtrl('c') => Some(Message::Quit),
        _ => None,
    }
}
