//! Header bar widget
//!
//! App title, the current location and the mode's key hints.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use eiga_core::{GenreSelection, Route};

use crate::theme::{palette, styles};

/// Main header showing the app title and the current location
pub struct MainHeader<'a> {
    genre: &'a GenreSelection,
}

impl<'a> MainHeader<'a> {
    pub fn new(genre: &'a GenreSelection) -> Self {
        Self { genre }
    }

    fn shortcuts(&self) -> Line<'static> {
        let mut hints: Vec<(&str, &str)> = vec![("g", "Genre")];
        if self.genre.is_selected() {
            hints.push(("h", "Home"));
            hints.push(("[ ]", "Page"));
        }
        hints.push(("r", "Retry"));
        hints.push(("q", "Quit"));

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled("[", styles::text_muted()));
            spans.push(Span::styled(key, styles::keybinding()));
            spans.push(Span::styled(format!("] {label}"), styles::text_muted()));
        }
        Line::from(spans)
    }
}

impl Widget for MainHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false).style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let location = Route::home(self.genre.clone()).to_location();
        let left = Line::from(vec![
            Span::raw(" "),
            Span::styled("eiga", styles::accent_bold()),
            Span::raw(" "),
            Span::styled("/", styles::text_muted()),
            Span::raw(" "),
            Span::styled(location, styles::text_secondary()),
        ]);
        let left_width = left.width() as u16;
        buf.set_line(inner.x, inner.y, &left, inner.width);

        // Right-align the key hints when they fit
        let shortcuts = self.shortcuts();
        let shortcuts_width = shortcuts.width() as u16;
        if left_width + shortcuts_width + 2 <= inner.width {
            let x = inner.x + inner.width - shortcuts_width - 1;
            buf.set_line(x, inner.y, &shortcuts, shortcuts_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;

    #[test]
    fn test_header_renders_title_and_home_location() {
        let mut term = TestTerminal::new();
        let genre = GenreSelection::none();
        term.render_widget(MainHeader::new(&genre), Rect::new(0, 0, 80, 3));

        assert!(term.line_contains(1, "eiga"));
        assert!(term.line_contains(1, "/"));
        assert!(term.line_contains(1, "[g] Genre"));
        assert!(!term.buffer_contains("[h] Home"));
    }

    #[test]
    fn test_header_shows_genre_location_and_paging_hints() {
        let mut term = TestTerminal::with_size(100, 3);
        let genre = GenreSelection::genre("28", "Action");
        term.render_widget(MainHeader::new(&genre), term.area());

        assert!(term.buffer_contains("/?genre=28&name=Action"));
        assert!(term.buffer_contains("[h] Home"));
        assert!(term.buffer_contains("[[ ]] Page"));
    }

    #[test]
    fn test_header_drops_hints_when_narrow() {
        let mut term = TestTerminal::with_size(30, 3);
        let genre = GenreSelection::genre("28", "Action");
        term.render_widget(MainHeader::new(&genre), term.area());

        assert!(term.buffer_contains("eiga"));
        assert!(!term.buffer_contains("Quit"));
    }
}
