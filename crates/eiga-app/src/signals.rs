//! Termination signals
//!
//! SIGINT and SIGTERM (Ctrl+C on Windows) become [`Message::Quit`], so a
//! signalled exit runs the same teardown as `q`: loader results stop applying
//! and the review subscription is released before the process ends. The
//! listener itself stops once the engine has shut down.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use eiga_core::prelude::*;

use crate::message::Message;

/// Signal that ended the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitSignal {
    Interrupt,
    Terminate,
}

impl ExitSignal {
    pub fn name(self) -> &'static str {
        match self {
            ExitSignal::Interrupt => "SIGINT",
            ExitSignal::Terminate => "SIGTERM",
        }
    }
}

/// Listen for termination signals until the engine shuts down
pub fn spawn_signal_handler(
    tx: mpsc::Sender<Message>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let signal = tokio::select! {
            result = wait_for_signal() => match result {
                Ok(signal) => signal,
                Err(e) => {
                    error!("Signal handler error: {}", e);
                    return;
                }
            },
            _ = engine_stopped(&mut shutdown_rx) => {
                debug!("Engine shut down, signal listener exiting");
                return;
            }
        };

        info!("{} received, tearing down", signal.name());
        let _ = tx.send(Message::Quit).await;
    })
}

/// Shutdown signalled, or the engine dropped without signalling
async fn engine_stopped(shutdown_rx: &mut watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}

async fn wait_for_signal() -> Result<ExitSignal> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| Error::signal(format!("SIGINT: {e}")))?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| Error::signal(format!("SIGTERM: {e}")))?;

        let received = tokio::select! {
            _ = sigint.recv() => ExitSignal::Interrupt,
            _ = sigterm.recv() => ExitSignal::Terminate,
        };
        Ok(received)
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| Error::signal(format!("Ctrl+C: {e}")))?;
        Ok(ExitSignal::Interrupt)
    }
}
