//! Main render/view function (View in TEA pattern)


use std::time::Instant;

use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use eiga_app::state::{AppState, Section, UiMode};
use eiga_core::DisplayMode;

use super::{layout, widgets};
use crate::theme::palette;

/// Header of the genre section
pub fn genre_heading(state: &AppState) -> String {
    format!("{} の映画", state.genre.label())
}

/// Seconds the overlay animation has been running at `now`
fn overlay_elapsed(state: &AppState, now: Instant) -> f64 {
    state
        .comments_received_at
        .map(|received| now.saturating_duration_since(received).as_secs_f64())
        .unwrap_or(0.0)
}

/// Render the complete UI (View function in TEA)
///
/// A pure function of the state and the clock: the same state rendered at the
/// same instant always produces the same frame.
pub fn view(frame: &mut Frame, state: &AppState, now: Instant) {
    let area = frame.area();

    let bg_block = Block::default().style(Style::default().bg(palette::DEEPEST_BG));
    frame.render_widget(bg_block, area);

    let mode = state.display_mode();
    let areas = layout::create(area, mode);

    frame.render_widget(widgets::MainHeader::new(&state.genre), areas.header);

    let grid = |section: Section| {
        let movies = match section {
            Section::Popular => &state.popular,
            Section::Famous => &state.famous,
            _ => &state.genre_movies,
        };
        let title = match section {
            Section::Genre => genre_heading(state),
            other => other.title().to_string(),
        };
        let grid = widgets::MovieGrid::new(title, movies);
        if state.focus == section {
            grid.focused(state.selected)
        } else {
            grid
        }
    };

    match mode {
        DisplayMode::Genre => {
            frame.render_widget(grid(Section::Genre), areas.primary);
            if let Some(pagination) = areas.pagination {
                frame.render_widget(
                    widgets::Pagination::new(&state.page).loading(state.genre_movies.is_loading()),
                    pagination,
                );
            }
        }
        DisplayMode::Default => {
            frame.render_widget(grid(Section::Popular), areas.primary);
            if let Some(famous) = areas.secondary {
                frame.render_widget(grid(Section::Famous), famous);
            }
        }
    }

    frame.render_widget(widgets::StatusBar::new(state), areas.status);

    // Comment overlay floats over the whole screen, default view only
    if mode == DisplayMode::Default && !state.comments.is_empty() {
        let mut overlay = widgets::DanmakuOverlay::new(
            &state.comments,
            overlay_elapsed(state, now),
            state.settings.danmaku.scroll_secs,
        );
        if state.focus == Section::Comments {
            overlay = overlay.selected(state.selected);
        }
        frame.render_widget(overlay, area);
    }

    if let UiMode::GenrePicker { selected } = state.ui_mode {
        frame.render_widget(widgets::GenrePicker::new(selected), area);
    }
}
