//! Custom widget components

mod danmaku;
mod genre_picker;
mod header;
mod movie_grid;
mod pagination;
mod status_bar;

pub use danmaku::DanmakuOverlay;
pub use genre_picker::{centered_rect, GenrePicker};
pub use header::MainHeader;
pub use movie_grid::MovieGrid;
pub use pagination::Pagination;
pub use status_bar::StatusBar;

use unicode_width::UnicodeWidthChar;

use crate::theme::icons;

/// Cut `text` to at most `max_width` terminal cells, marking the cut with an ellipsis
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if unicode_width::UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(icons::ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Fight Club", 18), "Fight Club");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("The Dark Knight", 8), "The Dar…");
    }

    #[test]
    fn test_truncate_wide_chars_never_overflow() {
        // Each kana is two cells wide
        let cut = truncate_to_width("千と千尋の神隠し", 6);
        assert_eq!(cut, "千と…");
        assert!(unicode_width::UnicodeWidthStr::width(cut.as_str()) <= 6);
    }

    #[test]
    fn test_truncate_to_zero() {
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
