//! Status bar widget
//!
//! Review feed status, loader errors, and what the selection points at.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use eiga_app::state::{AppState, Section};
use eiga_core::{DisplayMode, Route};

use crate::theme::styles;

pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Feed status; only meaningful in the default view
    fn feed_indicator(&self) -> Option<Span<'static>> {
        if self.state.display_mode() != DisplayMode::Default {
            return None;
        }
        let (icon, style) = styles::feed_indicator(&self.state.feed_status);
        Some(Span::styled(
            format!("{} reviews: {}", icon, self.state.feed_status.label()),
            style,
        ))
    }

    /// Names of the failed loaders of the current mode
    fn failures(&self) -> Option<Span<'static>> {
        let state = self.state;
        let failed: Vec<&str> = match state.display_mode() {
            DisplayMode::Genre => [("genre", state.genre_movies.is_failed())]
                .into_iter()
                .filter(|(_, failed)| *failed)
                .map(|(name, _)| name)
                .collect(),
            DisplayMode::Default => [
                ("popular", state.popular.is_failed()),
                ("famous", state.famous.is_failed()),
            ]
            .into_iter()
            .filter(|(_, failed)| *failed)
            .map(|(name, _)| name)
            .collect(),
        };

        if failed.is_empty() {
            return None;
        }
        Some(Span::styled(
            format!("✗ failed: {} [r]", failed.join(", ")),
            styles::status_red(),
        ))
    }

    /// Position in the focused section and the route Enter would open
    fn selection(&self) -> Span<'static> {
        let state = self.state;
        let len = state.section_len(state.focus);
        let position = if len == 0 {
            format!("{} 0/0", state.focus.title())
        } else {
            format!("{} {}/{}", state.focus.title(), state.selected + 1, len)
        };
        let target = state
            .selected_movie_id()
            .map(|id| format!(" → {}", Route::MovieDetail(id).to_location()))
            .unwrap_or_default();
        let posted = self.posted_at().unwrap_or_default();

        let style = if state.focus == Section::Comments {
            styles::accent()
        } else {
            styles::text_secondary()
        };
        Span::styled(format!("{position}{target}{posted}"), style)
    }

    /// When the focused review was posted
    fn posted_at(&self) -> Option<String> {
        let state = self.state;
        if state.focus != Section::Comments {
            return None;
        }
        let posted = state
            .comments
            .get(state.selected)?
            .document
            .timestamp?
            .to_datetime()?;
        Some(format!(" · {}", posted.format("%Y-%m-%d %H:%M UTC")))
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let separator = || Span::styled(" │ ", styles::text_muted());
        let mut spans = vec![Span::raw(" "), self.selection()];
        if let Some(feed) = self.feed_indicator() {
            spans.push(separator());
            spans.push(feed);
        }
        if let Some(failures) = self.failures() {
            spans.push(separator());
            spans.push(failures);
        }

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_state, TestTerminal};
    use eiga_catalog::FeedStatus;
    use eiga_core::{GenreSelection, MovieSummary, ReviewComment, ReviewDocument, ReviewTimestamp};

    #[test]
    fn test_status_shows_feed_state_in_default_mode() {
        let mut state = create_test_state(GenreSelection::none());
        state.feed_status = FeedStatus::Live;

        let mut term = TestTerminal::with_size(100, 1);
        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("reviews: live"));
    }

    #[test]
    fn test_status_hides_feed_in_genre_mode() {
        let state = create_test_state(GenreSelection::genre("28", "Action"));

        let mut term = TestTerminal::with_size(100, 1);
        term.render_widget(StatusBar::new(&state), term.area());

        assert!(!term.buffer_contains("reviews:"));
    }

    #[test]
    fn test_status_lists_failed_loaders() {
        let mut state = create_test_state(GenreSelection::none());
        state.popular.fail("HTTP 500");
        state.famous.fail("HTTP 404");

        let mut term = TestTerminal::with_size(120, 1);
        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("failed: popular, famous"));
    }

    #[test]
    fn test_status_shows_selection_target() {
        let mut state = create_test_state(GenreSelection::none());
        state
            .popular
            .finish(vec![MovieSummary::new(550, "Fight Club"), MovieSummary::new(11, "Star Wars")]);
        state.selected = 1;

        let mut term = TestTerminal::with_size(100, 1);
        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("2/2"));
        assert!(term.buffer_contains("/movie/11"));
    }

    #[test]
    fn test_status_shows_when_focused_review_was_posted() {
        let mut state = create_test_state(GenreSelection::none());
        state.comments = vec![ReviewComment {
            document: ReviewDocument::new("a", 11, "sugoi")
                .with_timestamp(ReviewTimestamp::from_millis(1_700_000_000_000)),
            top: 0.0,
            delay_secs: 0.0,
        }];
        state.focus = Section::Comments;

        let mut term = TestTerminal::with_size(120, 1);
        term.render_widget(StatusBar::new(&state), term.area());

        assert!(term.buffer_contains("/movie/11"));
        assert!(term.buffer_contains("2023-11-14 22:13 UTC"));
    }
}
