//! Glyph constants

/// Drawn in place of the poster image
pub const POSTER_PLACEHOLDER: &str = "▒▒▒▒▒▒";

pub const FEED_LIVE: &str = "●";
pub const FEED_IDLE: &str = "○";
pub const FEED_DOWN: &str = "✗";

pub const PREVIOUS: &str = "◀";
pub const NEXT: &str = "▶";

pub const ELLIPSIS: &str = "…";
