//! Message processing: runs the TEA update chain and dispatches actions

use tokio::sync::{mpsc, watch};

use eiga_catalog::{CatalogApi, ReviewFeed};

use crate::actions::{handle_action, Services};
use crate::handler;
use crate::message::Message;
use crate::state::AppState;

/// Process a message through the TEA update function
pub fn process_message<C, F>(
    state: &mut AppState,
    message: Message,
    msg_tx: &mpsc::Sender<Message>,
    services: &Services<C, F>,
    shutdown_rx: &watch::Receiver<bool>,
) where
    C: CatalogApi + Send + Sync + 'static,
    F: ReviewFeed + Send + Sync + 'static,
{
    let mut msg = Some(message);
    while let Some(m) = msg {
        let result = handler::update(state, m);

        if let Some(action) = result.action {
            handle_action(action, msg_tx.clone(), services, shutdown_rx.clone());
        }

        // Continue with follow-up message
        msg = result.message;
    }
}
