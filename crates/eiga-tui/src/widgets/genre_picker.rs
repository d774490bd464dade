//! Genre picker modal

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, StatefulWidget, Widget},
};

use eiga_core::CATALOG_GENRES;

use crate::theme::styles;

const PICKER_WIDTH: u16 = 40;

/// Center a fixed-size rect within an area, clamped to the area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Modal list of catalog genres with the current choice highlighted
pub struct GenrePicker {
    selected: usize,
}

impl GenrePicker {
    pub fn new(selected: usize) -> Self {
        Self { selected }
    }
}

impl Widget for GenrePicker {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (CATALOG_GENRES.len() as u16 + 2).min(area.height);
        let modal = centered_rect(PICKER_WIDTH, height, area);
        Clear.render(modal, buf);

        let items: Vec<ListItem> = CATALOG_GENRES
            .iter()
            .map(|(id, name)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {name}"), styles::text_primary()),
                    Span::styled(format!("  #{id}"), styles::text_muted()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(styles::modal_block(" ジャンル [Enter] 選択 [Esc] 閉じる "))
            .highlight_style(styles::focused_selected());

        let mut list_state = ListState::default().with_selected(Some(self.selected));
        StatefulWidget::render(list, modal, buf, &mut list_state);
    }
}
