//! Centralized theme:
//! - `palette` - Raw color constants
//! - `styles` - Semantic style builder functions
//! - `icons` - Glyph constants

pub mod icons;
pub mod palette;
pub mod styles;
