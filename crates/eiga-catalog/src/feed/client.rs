//! WebSocket implementation of [`ReviewFeed`].
//!
//! The first connection is made inside [`ReviewFeed::subscribe`] so the caller
//! learns immediately whether the feed is reachable. After that a background
//! task owns the socket:
//!
//! ```text
//!  subscribe() ──connect──▶ run_feed_task
//!                             │
//!                             ├─ run_io_loop ── snapshot ──▶ events
//!                             │        │
//!                             │   lost │ cancelled ──▶ unsubscribe + close
//!                             ▼        ▼
//!                          backoff, reconnect, resubscribe
//! ```

use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::protocol::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use eiga_core::prelude::*;

use super::protocol::{parse_feed_message, subscribe_frame, unsubscribe_frame, FeedMessage};
use super::{FeedEvent, FeedStatus, ReviewFeed, Subscription};

/// Default local feed endpoint
pub const DEFAULT_FEED_URL: &str = "ws://127.0.0.1:8787/feed";

/// Collection the landing page listens to
pub const DEFAULT_COLLECTION: &str = "reviews";

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Connection settings for [`WsReviewFeed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsReviewFeedConfig {
    pub url: String,
    pub collection: String,
    pub max_reconnect_attempts: u32,
    /// Bound on one connect + WebSocket handshake
    pub connect_timeout: Duration,
}

impl Default for WsReviewFeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Review feed over a WebSocket
#[derive(Debug, Clone)]
pub struct WsReviewFeed {
    config: WsReviewFeedConfig,
}

impl WsReviewFeed {
    pub fn new(config: WsReviewFeedConfig) -> Self {
        Self { config }
    }
}

impl ReviewFeed for WsReviewFeed {
    async fn subscribe(&self, events: mpsc::Sender<FeedEvent>) -> Result<Subscription> {
        info!("Subscribing to review feed at {}", self.config.url);
        let _ = events.send(FeedEvent::Status(FeedStatus::Connecting)).await;

        let ws_stream = connect_ws(&self.config.url, self.config.connect_timeout).await?;

        let (cancel_tx, cancel_rx) = oneshot::channel();
        let task = tokio::spawn(run_feed_task(
            self.config.clone(),
            ws_stream,
            events,
            cancel_rx,
        ));

        Ok(Subscription::new(cancel_tx, task))
    }
}

/// How one connection's loop ended
#[derive(Debug, PartialEq, Eq)]
enum LoopExit {
    /// Consumer released the subscription (or went away)
    Cancelled,
    /// Socket dropped; try again
    Lost,
    /// Server rejected the subscription
    Rejected(String),
}

async fn run_feed_task(
    config: WsReviewFeedConfig,
    ws_stream: WsStream,
    events: mpsc::Sender<FeedEvent>,
    mut cancel_rx: oneshot::Receiver<()>,
) {
    let mut exit = run_io_loop(ws_stream, &config.collection, &events, &mut cancel_rx).await;

    let mut attempt: u32 = 1;
    loop {
        match exit {
            LoopExit::Cancelled => {
                let _ = events.send(FeedEvent::Status(FeedStatus::Closed)).await;
                break;
            }
            LoopExit::Rejected(message) => {
                error!("Review feed rejected subscription: {}", message);
                let _ = events
                    .send(FeedEvent::Status(FeedStatus::Failed(message)))
                    .await;
                break;
            }
            LoopExit::Lost => {}
        }

        if attempt > config.max_reconnect_attempts {
            error!(
                "Review feed: exceeded {} reconnection attempts, giving up",
                config.max_reconnect_attempts
            );
            let _ = events
                .send(FeedEvent::Status(FeedStatus::Failed(
                    "connection lost".to_string(),
                )))
                .await;
            break;
        }

        let _ = events
            .send(FeedEvent::Status(FeedStatus::Reconnecting {
                attempt,
                max_attempts: config.max_reconnect_attempts,
            }))
            .await;

        let backoff = compute_backoff(attempt);
        warn!(
            "Review feed: connection lost, retrying in {:?} (attempt {}/{})",
            backoff, attempt, config.max_reconnect_attempts
        );

        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = &mut cancel_rx => {
                exit = LoopExit::Cancelled;
                continue;
            }
        }

        match connect_ws(&config.url, config.connect_timeout).await {
            Ok(ws_stream) => {
                info!("Review feed: reconnected (attempt {})", attempt);
                attempt = 1;
                exit = run_io_loop(ws_stream, &config.collection, &events, &mut cancel_rx).await;
            }
            Err(err) => {
                warn!("Review feed: reconnection attempt {} failed: {}", attempt, err);
                attempt += 1;
                exit = LoopExit::Lost;
            }
        }
    }

    debug!("Review feed task exiting");
}

/// Subscribe on a fresh socket and pump frames until it ends
async fn run_io_loop(
    ws_stream: WsStream,
    collection: &str,
    events: &mpsc::Sender<FeedEvent>,
    cancel_rx: &mut oneshot::Receiver<()>,
) -> LoopExit {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    if let Err(err) = ws_sink
        .send(WsMessage::Text(subscribe_frame(collection).into()))
        .await
    {
        warn!("Review feed: failed to send subscribe frame: {}", err);
        return LoopExit::Lost;
    }

    if events
        .send(FeedEvent::Status(FeedStatus::Live))
        .await
        .is_err()
    {
        send_unsubscribe(&mut ws_sink).await;
        return LoopExit::Cancelled;
    }

    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                match frame {
                    Some(Ok(WsMessage::Text(text))) => {
                        match parse_feed_message(text.as_str()) {
                            FeedMessage::Snapshot(docs) => {
                                debug!("Review feed: snapshot with {} document(s)", docs.len());
                                if events.send(FeedEvent::Snapshot(docs)).await.is_err() {
                                    debug!("Review feed: consumer gone, unsubscribing");
                                    send_unsubscribe(&mut ws_sink).await;
                                    return LoopExit::Cancelled;
                                }
                            }
                            FeedMessage::Error(message) => {
                                send_close(&mut ws_sink).await;
                                return LoopExit::Rejected(message);
                            }
                            FeedMessage::Unknown(raw) => {
                                debug!(
                                    "Review feed: ignoring unknown frame: {}",
                                    raw.chars().take(120).collect::<String>()
                                );
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) => {
                        debug!("Review feed: received Close frame");
                        return LoopExit::Lost;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("Review feed: WebSocket read error: {}", err);
                        return LoopExit::Lost;
                    }
                    None => {
                        debug!("Review feed: WebSocket stream ended");
                        return LoopExit::Lost;
                    }
                }
            }

            _ = &mut *cancel_rx => {
                send_unsubscribe(&mut ws_sink).await;
                return LoopExit::Cancelled;
            }
        }
    }
}

async fn connect_ws(url: &str, timeout: Duration) -> Result<WsStream> {
    let (ws_stream, _response) = tokio::time::timeout(timeout, connect_async(url))
        .await
        .map_err(|_| {
            Error::review_feed(format!("Connecting to {url} timed out after {timeout:?}"))
        })?
        .map_err(|err| Error::review_feed(format!("Failed to connect to {url}: {err}")))?;
    Ok(ws_stream)
}

/// Exponential backoff for reconnection attempt `n`: `INITIAL_BACKOFF * 2^(n-1)`,
/// capped at `MAX_BACKOFF`.
fn compute_backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1);
    let multiplier: u64 = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let secs = INITIAL_BACKOFF.as_secs().saturating_mul(multiplier);
    Duration::from_secs(secs.min(MAX_BACKOFF.as_secs()))
}

async fn send_unsubscribe(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink
        .send(WsMessage::Text(unsubscribe_frame().into()))
        .await;
    send_close(ws_sink).await;
}

/// Send a Close frame, ignoring write errors
async fn send_close(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles_from_one_second() {
        assert_eq!(compute_backoff(1), Duration::from_secs(1));
        assert_eq!(compute_backoff(2), Duration::from_secs(2));
        assert_eq!(compute_backoff(3), Duration::from_secs(4));
        assert_eq!(compute_backoff(5), Duration::from_secs(16));
    }

    #[test]
    fn test_backoff_capped_at_max() {
        assert_eq!(compute_backoff(6), MAX_BACKOFF);
        assert_eq!(compute_backoff(u32::MAX), MAX_BACKOFF);
    }

    #[test]
    fn test_default_config() {
        let config = WsReviewFeedConfig::default();
        assert_eq!(config.collection, "reviews");
        assert_eq!(config.max_reconnect_attempts, 10);
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(config.url.starts_with("ws://"));
    }

    #[tokio::test]
    async fn test_subscribe_fails_when_feed_unreachable() {
        let feed = WsReviewFeed::new(WsReviewFeedConfig {
            url: "ws://127.0.0.1:1/feed".to_string(),
            ..Default::default()
        });
        let (tx, mut rx) = mpsc::channel(8);

        let result = feed.subscribe(tx).await;

        assert!(matches!(result, Err(Error::ReviewFeed { .. })));
        assert_eq!(
            rx.recv().await,
            Some(FeedEvent::Status(FeedStatus::Connecting))
        );
    }

    #[tokio::test]
    async fn test_subscribe_gives_up_on_silent_handshake() {
        // Accepts TCP but never answers the WebSocket upgrade
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let feed = WsReviewFeed::new(WsReviewFeedConfig {
            url: format!("ws://{addr}/feed"),
            connect_timeout: Duration::from_millis(100),
            ..Default::default()
        });
        let (tx, _rx) = mpsc::channel(8);

        let result = tokio::time::timeout(Duration::from_secs(5), feed.subscribe(tx))
            .await
            .expect("subscribe should honour the connect timeout");

        match result {
            Err(Error::ReviewFeed { message }) => assert!(message.contains("timed out")),
            other => panic!("expected a timeout error, got {other:?}"),
        }
        drop(listener);
    }
}
