//! Danmaku overlay widget
//!
//! Draws every comment of the current snapshot on its assigned row, scrolled
//! horizontally according to the time since the snapshot arrived. Cells not
//! covered by comment text are left untouched so the sections below stay
//! visible.

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use eiga_app::danmaku::{overlay_row, scroll_column};
use eiga_core::ReviewComment;

use crate::theme::{palette, styles};

pub struct DanmakuOverlay<'a> {
    comments: &'a [ReviewComment],
    elapsed_secs: f64,
    scroll_secs: f64,
    /// Index of the highlighted comment, when the comment section has focus
    selected: Option<usize>,
}

impl<'a> DanmakuOverlay<'a> {
    pub fn new(comments: &'a [ReviewComment], elapsed_secs: f64, scroll_secs: f64) -> Self {
        Self {
            comments,
            elapsed_secs,
            scroll_secs,
            selected: None,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }
}

impl Widget for DanmakuOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        for (index, comment) in self.comments.iter().enumerate() {
            let Some(row) = overlay_row(comment.top, area.height) else {
                continue;
            };

            let label = comment.label();
            let text_width = u16::try_from(label.width()).unwrap_or(u16::MAX);
            let Some(column) = scroll_column(
                self.elapsed_secs,
                comment.delay_secs,
                self.scroll_secs,
                area.width,
                text_width,
            ) else {
                continue;
            };

            let (stars, text) = if self.selected == Some(index) {
                (styles::focused_selected(), styles::focused_selected())
            } else {
                (
                    Style::default().fg(palette::DANMAKU_STARS),
                    Style::default().fg(palette::DANMAKU_TEXT),
                )
            };
            let spans = [(comment.star_count(), stars), (usize::MAX, text)];
            draw_clipped(buf, area, row, column, &label, &spans);
        }
    }
}

/// Draw `text` starting at `column` (relative to `area`, may be negative),
/// dropping every glyph that does not fit entirely inside the area.
///
/// `runs` styles the text in order: `(char count, style)`.
fn draw_clipped(
    buf: &mut Buffer,
    area: Rect,
    row: u16,
    column: i32,
    text: &str,
    runs: &[(usize, Style)],
) {
    let width = i32::from(area.width);
    let y = area.y + row;
    let mut x = column;
    let mut run = 0;
    let mut left_in_run = runs.first().map(|r| r.0).unwrap_or(usize::MAX);

    for c in text.chars() {
        while left_in_run == 0 && run + 1 < runs.len() {
            run += 1;
            left_in_run = runs[run].0;
        }
        left_in_run = left_in_run.saturating_sub(1);
        let style = runs.get(run).map(|r| r.1).unwrap_or_default();

        let w = c.width().unwrap_or(0) as i32;
        if w == 0 {
            continue;
        }
        if x >= width {
            break;
        }
        if x >= 0 && x + w <= width {
            let cell_x = area.x + x as u16;
            let mut symbol = [0u8; 4];
            buf[(cell_x, y)]
                .set_symbol(c.encode_utf8(&mut symbol))
                .set_style(style);
            // Cells hidden under a wide glyph
            for hidden in 1..w {
                buf[(cell_x + hidden as u16, y)].reset();
            }
        }
        x += w;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use eiga_core::ReviewDocument;

    fn comment(text: &str, rating: f64, top: f64, delay_secs: f64) -> ReviewComment {
        ReviewComment {
            document: ReviewDocument::new("r1", 11, text).with_rating(rating),
            top,
            delay_secs,
        }
    }

    #[test]
    fn test_hidden_during_delay() {
        let comments = vec![comment("great", 0.0, 2.0, 3.0)];
        let mut term = TestTerminal::with_size(40, 5);
        term.render_widget(DanmakuOverlay::new(&comments, 1.0, 15.0), term.area());

        assert!(!term.buffer_contains("great"));
    }

    #[test]
    fn test_comment_drawn_on_its_row() {
        // Label " great" (no stars) is 6 wide; travel 46 cells over 15s.
        // At 7.5s the first cell sits at 40 - 23 = 17.
        let comments = vec![comment("great", 0.0, 2.7, 0.0)];
        let mut term = TestTerminal::with_size(40, 5);
        term.render_widget(DanmakuOverlay::new(&comments, 7.5, 15.0), term.area());

        assert!(term.line_contains(2, "great"));
        assert_eq!(term.cell_at(18, 2), Some("g"));
    }

    #[test]
    fn test_stars_precede_text() {
        let comments = vec![comment("名作", 3.0, 0.0, 0.0)];
        let mut term = TestTerminal::with_size(40, 2);
        term.render_widget(DanmakuOverlay::new(&comments, 5.0, 15.0), term.area());

        assert!(term.buffer_contains("⭐⭐⭐ 名作"));
    }

    #[test]
    fn test_partially_off_left_edge_is_clipped() {
        // 90 cells of travel: at 14.5s the first cell is at -7
        let text = "x".repeat(9);
        let comments = vec![comment(&text, 0.0, 0.0, 0.0)];
        let mut term = TestTerminal::with_size(80, 1);
        term.render_widget(DanmakuOverlay::new(&comments, 14.5, 15.0), term.area());

        // " xxxxxxxxx" from -7: cells 0..=2 hold the last three x's
        assert!(term.line_contains(0, "xxx"));
        assert!(!term.line_contains(0, "xxxx"));
        assert_eq!(term.cell_at(3, 0), Some(" "));
    }

    #[test]
    fn test_rows_beyond_area_are_skipped() {
        let comments = vec![comment("below", 0.0, 10.0, 0.0)];
        let mut term = TestTerminal::with_size(40, 5);
        term.render_widget(DanmakuOverlay::new(&comments, 7.5, 15.0), term.area());

        assert!(!term.buffer_contains("below"));
    }

    #[test]
    fn test_stars_use_their_own_color() {
        let comments = vec![comment("ok", 1.0, 0.0, 0.0)];
        let mut term = TestTerminal::with_size(40, 1);
        term.render_widget(DanmakuOverlay::new(&comments, 0.0, 15.0), term.area());

        // At t=0 the label starts at the right edge; nothing is drawn yet
        assert!(!term.buffer_contains("ok"));

        term.render_widget(DanmakuOverlay::new(&comments, 5.0, 15.0), term.area());
        let star_x = (0..40)
            .find(|&x| term.cell_at(x, 0) == Some("⭐"))
            .expect("star rendered");
        assert_eq!(term.buffer()[(star_x, 0)].fg, palette::DANMAKU_STARS);
        assert_eq!(term.buffer()[(star_x + 3, 0)].fg, palette::DANMAKU_TEXT);
    }
}
