//! Test utilities for TUI rendering verification
//!
//! Helpers for testing widgets and full-screen rendering on ratatui's
//! TestBackend.

use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::Frame;
use ratatui::Terminal;
use unicode_width::UnicodeWidthStr;

use eiga_app::config::Settings;
use eiga_app::state::AppState;
use eiga_core::GenreSelection;

/// Standard test terminal size
pub const TEST_WIDTH: u16 = 80;
pub const TEST_HEIGHT: u16 = 24;

/// Wrapper around a TestBackend terminal with buffer assertions
pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    /// Standard dimensions (80x24)
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let backend = TestBackend::new(width, height);
        let terminal = Terminal::new(backend).expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("Failed to render widget");
    }

    /// Draw a full frame (for `render::view`)
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    /// Check if the buffer contains a string anywhere
    pub fn buffer_contains(&self, text: &str) -> bool {
        buffer_to_string(self.buffer()).contains(text)
    }

    /// Check if a specific line contains text
    pub fn line_contains(&self, line: u16, text: &str) -> bool {
        get_line_content(self.buffer(), line).contains(text)
    }

    /// Get the content of a specific cell
    pub fn cell_at(&self, x: u16, y: u16) -> Option<&str> {
        let buffer = self.buffer();
        if x < buffer.area.width && y < buffer.area.height {
            Some(buffer[(x, y)].symbol())
        } else {
            None
        }
    }

    /// Top-left cell of the first occurrence of `text`, scanning cell by cell
    pub fn find_text(&self, text: &str) -> Option<(u16, u16)> {
        let buffer = self.buffer();
        let symbols: Vec<String> = text.chars().map(String::from).collect();
        let len = symbols.len() as u16;
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width.saturating_sub(len.saturating_sub(1)) {
                let matches = symbols
                    .iter()
                    .enumerate()
                    .all(|(i, sym)| buffer[(x + i as u16, y)].symbol() == sym);
                if matches {
                    return Some((x, y));
                }
            }
        }
        None
    }

    /// All content as a string (for debugging)
    pub fn content(&self) -> String {
        buffer_to_string(self.buffer())
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

fn buffer_to_string(buffer: &Buffer) -> String {
    (0..buffer.area.height)
        .map(|y| get_line_content(buffer, y))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One row of the buffer, skipping the cells hidden under wide glyphs
fn get_line_content(buffer: &Buffer, line: u16) -> String {
    let mut result = String::new();
    if line >= buffer.area.height {
        return result;
    }
    let mut hidden = 0;
    for x in 0..buffer.area.width {
        let symbol = buffer[(x, line)].symbol();
        if hidden > 0 {
            hidden -= 1;
            continue;
        }
        result.push_str(symbol);
        hidden = symbol.width().saturating_sub(1);
    }
    result
}

/// AppState with default settings and a fixed seed
pub fn create_test_state(genre: GenreSelection) -> AppState {
    AppState::with_rng(Settings::default(), genre, StdRng::seed_from_u64(11))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_terminal_creation() {
        let term = TestTerminal::new();
        assert_eq!(term.area().width, TEST_WIDTH);
        assert_eq!(term.area().height, TEST_HEIGHT);
    }

    #[test]
    fn test_line_contains() {
        let mut term = TestTerminal::with_size(20, 5);
        term.render_widget(Paragraph::new("Hello\nWorld"), term.area());

        assert!(term.line_contains(0, "Hello"));
        assert!(term.line_contains(1, "World"));
        assert!(!term.line_contains(0, "World"));
    }

    #[test]
    fn test_wide_glyphs_read_back_contiguously() {
        let mut term = TestTerminal::with_size(20, 1);
        term.render_widget(Paragraph::new("人気の映画"), term.area());

        assert!(term.buffer_contains("人気の映画"));
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let term = TestTerminal::with_size(10, 5);
        assert_eq!(term.cell_at(100, 100), None);
    }
}
