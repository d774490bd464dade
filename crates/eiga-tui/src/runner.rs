//! Main TUI runner - entry point and event loop

use std::time::Instant;

use eiga_app::Engine;
use eiga_catalog::{CatalogApi, ReviewFeed};
use eiga_core::prelude::*;

use super::{event, render, terminal};

/// Run the TUI until the user quits or a termination signal arrives.
///
/// The review subscription is released and the terminal restored before returning.
pub async fn run<C, F>(mut engine: Engine<C, F>) -> Result<()>
where
    C: CatalogApi + Send + Sync + 'static,
    F: ReviewFeed + Send + Sync + 'static,
{
    terminal::install_panic_hook();

    let mut term = ratatui::init();

    // Comments are placed within the real screen height from the first snapshot on
    match term.size() {
        Ok(size) => engine.state.viewport = terminal::viewport_of(size),
        Err(e) => warn!("Could not read terminal size, using defaults: {}", e),
    }

    // Sends Message::Quit on SIGINT/SIGTERM
    engine.spawn_signal_handler();

    engine.mount();

    let result = run_loop(&mut term, &mut engine);

    engine.shutdown().await;
    ratatui::restore();

    result
}

/// Main event loop
fn run_loop<C, F>(terminal: &mut ratatui::DefaultTerminal, engine: &mut Engine<C, F>) -> Result<()>
where
    C: CatalogApi + Send + Sync + 'static,
    F: ReviewFeed + Send + Sync + 'static,
{
    while !engine.should_quit() {
        // Results from loaders and the review feed
        engine.drain_pending_messages();

        let now = Instant::now();
        terminal.draw(|frame| render::view(frame, &engine.state, now))?;

        if let Some(message) = event::poll()? {
            engine.process_message(message);
        }
    }

    Ok(())
}
