//! Terminal setup and restoration

use ratatui::layout::Size;

use eiga_app::state::Viewport;

/// Install a panic hook that restores the terminal
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));
}

/// Viewport handed to the engine for a terminal size
pub fn viewport_of(size: Size) -> Viewport {
    Viewport {
        width: size.width,
        height: size.height,
    }
}
