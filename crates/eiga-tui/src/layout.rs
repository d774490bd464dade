//! Screen layout definitions for the TUI
//!
//! The default view stacks the popular and famous sections; the genre view
//! gives the whole body to the genre grid plus a pagination row.

use ratatui::layout::{Constraint, Layout, Rect};

use eiga_core::DisplayMode;

/// Header height: top border + title row + bottom border
const HEADER_HEIGHT: u16 = 3;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    pub header: Rect,

    /// Popular section (default mode) or genre grid (genre mode)
    pub primary: Rect,

    /// Famous section; only present in default mode
    pub secondary: Option<Rect>,

    /// Pagination row; only present in genre mode
    pub pagination: Option<Rect>,

    pub status: Rect,
}

/// Create the main screen layout for a display mode
pub fn create(area: Rect, mode: DisplayMode) -> ScreenAreas {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    match mode {
        DisplayMode::Default => {
            let [popular, famous] =
                Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .areas(body);
            ScreenAreas {
                header,
                primary: popular,
                secondary: Some(famous),
                pagination: None,
                status,
            }
        }
        DisplayMode::Genre => {
            let [grid, pagination] =
                Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(body);
            ScreenAreas {
                header,
                primary: grid,
                secondary: None,
                pagination: Some(pagination),
                status,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_has_two_sections() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = create(area, DisplayMode::Default);

        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 23);
        assert!(layout.secondary.is_some());
        assert!(layout.pagination.is_none());
    }

    #[test]
    fn test_genre_layout_has_pagination_row() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = create(area, DisplayMode::Genre);

        assert!(layout.secondary.is_none());
        let pagination = layout.pagination.expect("genre layout has pagination");
        assert_eq!(pagination.height, 1);
        assert_eq!(pagination.y, 22);
        assert_eq!(layout.primary.height, 24 - 3 - 1 - 1);
    }

    #[test]
    fn test_layout_areas_contiguous() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = create(area, DisplayMode::Default);
        let secondary = layout.secondary.map(|r| r.height).unwrap_or(0);
        assert_eq!(
            layout.header.height + layout.primary.height + secondary + layout.status.height,
            area.height
        );
    }
}
