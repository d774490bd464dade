//! eiga-app - Application state and orchestration for eiga
//!
//! This crate implements the TEA (The Elm Architecture) pattern for the landing
//! view: the loaders, the review-feed subscription, the danmaku projection, the
//! Engine abstraction shared by the TUI and headless runners, and configuration
//! loading.

pub mod actions;
pub mod config;
pub mod danmaku;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod signals;
pub mod state;

// Re-export primary types
pub use actions::Services;
pub use engine::Engine;
pub use engine_event::{EngineEvent, Loader};
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::{GenreRequest, Message, SelectionMove};
pub use state::{AppState, LoadStatus, Loadable, Section, UiMode, Viewport};
