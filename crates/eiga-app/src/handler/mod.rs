//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `loaders`: Loader result handlers and fetch issuing
//! - `navigation`: Route changes and pagination
//! - `selection`: Focus, selection and genre picker
//! - `keys`: Key event handlers for UI modes

pub(crate) mod keys;
pub(crate) mod loaders;
pub(crate) mod navigation;
pub(crate) mod selection;
pub(crate) mod update;


use eiga_core::MovieId;

use crate::message::{GenreRequest, Message};

// Re-export main entry point
pub use update::update;

#[cfg(test)]
pub(crate) use keys::handle_key;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateAction {
    /// Page 1 of the popular feed
    FetchPopular,

    /// One page of a genre
    FetchGenre(GenreRequest),

    /// Concurrent by-id fetch, published in id order once all settle
    FetchFamous { ids: Vec<MovieId> },

    /// Open (or reopen) the live review subscription
    SubscribeReviews,

    /// Hand a detail URL to the browser opener
    OpenDetail { url: String, browser: String },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    pub fn action_then(action: UpdateAction, msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: Some(action),
        }
    }
}
