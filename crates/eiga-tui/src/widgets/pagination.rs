//! Pagination row of the genre view: `◀ 前へ  n / total  次へ ▶`

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use eiga_core::PageState;

use crate::theme::{icons, styles};

pub struct Pagination<'a> {
    page: &'a PageState,
    loading: bool,
}

impl<'a> Pagination<'a> {
    pub fn new(page: &'a PageState) -> Self {
        Self {
            page,
            loading: false,
        }
    }

    /// Dim the counter while the page is being fetched
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    fn control_style(enabled: bool) -> Style {
        if enabled {
            styles::accent()
        } else {
            styles::text_muted()
        }
    }
}

impl Widget for Pagination<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let previous = Self::control_style(self.page.has_previous());
        let next = Self::control_style(self.page.has_next());
        let counter = if self.loading {
            styles::text_muted()
        } else {
            styles::text_primary()
        };

        let line = Line::from(vec![
            Span::styled(format!("{} 前へ", icons::PREVIOUS), previous),
            Span::raw("   "),
            Span::styled(
                format!("{} / {}", self.page.current(), self.page.total()),
                counter,
            ),
            Span::raw("   "),
            Span::styled(format!("次へ {}", icons::NEXT), next),
        ]);

        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
