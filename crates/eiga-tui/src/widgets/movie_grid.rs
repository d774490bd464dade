//! Movie grid widget
//!
//! One bordered section of movie cards. Each card is a poster placeholder
//! above the title; the selected card is highlighted.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use eiga_app::state::{grid_columns, LoadStatus, Loadable, CARD_WIDTH};
use eiga_core::MovieSummary;

use super::truncate_to_width;
use crate::theme::{icons, palette, styles};

/// Rows taken by one card: placeholder, title, gap
const CARD_HEIGHT: u16 = 3;

pub struct MovieGrid<'a> {
    title: String,
    movies: &'a Loadable<Vec<MovieSummary>>,
    focused: bool,
    selected: usize,
}

impl<'a> MovieGrid<'a> {
    pub fn new(title: impl Into<String>, movies: &'a Loadable<Vec<MovieSummary>>) -> Self {
        Self {
            title: title.into(),
            movies,
            focused: false,
            selected: 0,
        }
    }

    /// Mark this section as focused with `selected` highlighted
    pub fn focused(mut self, selected: usize) -> Self {
        self.focused = true;
        self.selected = selected;
        self
    }

    /// Message shown instead of cards, if any
    fn placeholder_message(&self) -> Option<(String, Style)> {
        let empty = self.movies.data.is_empty();
        match &self.movies.status {
            LoadStatus::Failed(error) if empty => Some((
                format!("読み込みに失敗しました: {error}  [r] 再試行"),
                styles::status_red(),
            )),
            LoadStatus::Idle | LoadStatus::Loading if empty => {
                Some(("読み込み中…".to_string(), styles::text_muted()))
            }
            LoadStatus::Loaded if empty => {
                Some(("映画が見つかりません".to_string(), styles::text_muted()))
            }
            _ => None,
        }
    }

    fn render_card(&self, movie: &MovieSummary, index: usize, area: Rect, buf: &mut Buffer) {
        let label_width = usize::from(CARD_WIDTH.saturating_sub(2));
        let is_selected = index == self.selected;
        let title_style = match (is_selected, self.focused) {
            (true, true) => styles::focused_selected(),
            (true, false) => styles::unfocused_selected(),
            _ => styles::text_primary(),
        };

        buf.set_stringn(
            area.x,
            area.y,
            icons::POSTER_PLACEHOLDER,
            label_width,
            Style::default().fg(palette::POSTER_PLACEHOLDER),
        );
        if area.height > 1 {
            let title = truncate_to_width(&movie.title, label_width);
            buf.set_stringn(area.x, area.y + 1, title, label_width, title_style);
        }
    }
}

impl Widget for MovieGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(self.focused)
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(self.title.clone(), styles::accent_bold()),
                Span::raw(" "),
            ]))
            .style(Style::default().bg(palette::CARD_BG));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if let Some((message, style)) = self.placeholder_message() {
            Paragraph::new(Span::styled(message, style))
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        }

        let columns = grid_columns(inner.width);
        let visible_rows = usize::from((inner.height / CARD_HEIGHT).max(1));

        // Scroll just enough to keep the selected row on screen
        let selected_row = self.selected / columns;
        let first_row = (selected_row + 1).saturating_sub(visible_rows);

        for (index, movie) in self.movies.data.iter().enumerate() {
            let row = index / columns;
            if row < first_row {
                continue;
            }
            let visible_row = (row - first_row) as u16;
            let y = inner.y + visible_row * CARD_HEIGHT;
            if y >= inner.bottom() {
                break;
            }

            let column = (index % columns) as u16;
            let card = Rect {
                x: inner.x + column * CARD_WIDTH + 1,
                y,
                width: CARD_WIDTH.saturating_sub(1),
                height: CARD_HEIGHT.min(inner.bottom() - y),
            }
            .intersection(inner);
            self.render_card(movie, index, card, buf);
        }
    }
}
