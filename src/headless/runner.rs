//! Headless mode runner - main event loop without TUI

use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use eiga_app::message::Message;
use eiga_app::{Engine, EngineEvent};
use eiga_catalog::{CatalogApi, ReviewFeed};
use eiga_core::prelude::Result;
use eiga_core::Route;

/// Run in headless mode until SIGINT/SIGTERM or a `q` on stdin
pub async fn run_headless<C, F>(mut engine: Engine<C, F>) -> Result<()>
where
    C: CatalogApi + Send + Sync + 'static,
    F: ReviewFeed + Send + Sync + 'static,
{
    info!("eiga starting in HEADLESS mode");

    // Subscribe before mount so no event is missed
    let events = engine.subscribe();
    let printer = tokio::spawn(print_events(events));

    engine.spawn_signal_handler();

    let stdin_tx = engine.msg_sender();
    std::thread::spawn(move || {
        read_stdin_commands(stdin_tx);
    });

    engine.mount();

    loop {
        if engine.should_quit() {
            info!("Quit requested");
            break;
        }

        match engine.next_message().await {
            Some(msg) => engine.process_message(msg),
            None => {
                info!("Message channel closed");
                break;
            }
        }
    }

    engine.shutdown().await;

    // Dropping the engine closes the event channel and ends the printer
    drop(engine);
    if let Err(e) = printer.await {
        error!("Event printer failed: {}", e);
    }

    info!("eiga headless mode exiting");
    Ok(())
}

async fn print_events(mut events: broadcast::Receiver<EngineEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => super::emit(&event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Headless output lagged, {} events skipped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

/// Map one stdin line to a message
fn parse_command(line: &str) -> Option<Message> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    match command {
        "q" | "quit" => Some(Message::Quit),
        "r" | "retry" => Some(Message::RetryFailed),
        "n" | "next" => Some(Message::NextPage),
        "p" | "prev" => Some(Message::PreviousPage),
        "go" => {
            let location = parts.next()?;
            match Route::parse(location) {
                Ok(route) => Some(Message::Navigate(route)),
                Err(e) => {
                    warn!("Stdin: {}", e);
                    None
                }
            }
        }
        _ => {
            warn!("Unknown stdin command: {}", line);
            None
        }
    }
}

/// Read commands from stdin until EOF or quit (blocking)
fn read_stdin_commands(msg_tx: mpsc::Sender<Message>) {
    use std::io::BufRead;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let Some(msg) = parse_command(trimmed) else {
                    continue;
                };
                let quit = matches!(msg, Message::Quit);
                if msg_tx.blocking_send(msg).is_err() || quit {
                    break;
                }
            }
            Err(e) => {
                error!("Failed to read stdin: {}", e);
                break;
            }
        }
    }

    info!("Stdin reader exiting");
}
