//! Wire format of the review feed.
//!
//! Client to server:
//!
//! ```json
//! {"type":"subscribe","collection":"reviews","orderBy":{"field":"timestamp","direction":"desc"}}
//! {"type":"unsubscribe"}
//! ```
//!
//! Server to client:
//!
//! ```json
//! {"type":"snapshot","docs":[{"id":"r1","data":{"movieId":11,"text":"..","rating":4,"timestamp":1700000000000}}]}
//! {"type":"error","message":".."}
//! ```

use serde::Deserialize;
use serde_json::{json, Value};

use eiga_core::prelude::*;
use eiga_core::{MovieId, ReviewDocument, ReviewTimestamp};

/// A parsed server frame
#[derive(Debug, Clone, PartialEq)]
pub enum FeedMessage {
    /// Full result set, already sorted newest first
    Snapshot(Vec<ReviewDocument>),
    /// Server-side subscription error
    Error(String),
    /// Anything else; carries the raw text for logging
    Unknown(String),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ServerFrame {
    Snapshot {
        #[serde(default)]
        docs: Vec<Value>,
    },
    Error {
        #[serde(default)]
        message: String,
    },
}

#[derive(Deserialize)]
struct WireDoc {
    id: String,
    data: WireReview,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReview {
    movie_id: WireMovieId,
    #[serde(default)]
    text: String,
    #[serde(default)]
    rating: Option<Value>,
    #[serde(default)]
    timestamp: Option<ReviewTimestamp>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireMovieId {
    Number(MovieId),
    Text(String),
}

impl WireMovieId {
    fn resolve(self) -> Option<MovieId> {
        match self {
            WireMovieId::Number(id) => Some(id),
            WireMovieId::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Parse one text frame from the feed.
///
/// Documents that do not have the expected shape are skipped with a warning;
/// the rest of the snapshot is still delivered.
pub fn parse_feed_message(text: &str) -> FeedMessage {
    let frame: ServerFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(_) => return FeedMessage::Unknown(text.to_string()),
    };

    match frame {
        ServerFrame::Error { message } => FeedMessage::Error(message),
        ServerFrame::Snapshot { docs } => {
            let mut documents: Vec<ReviewDocument> =
                docs.into_iter().filter_map(parse_document).collect();
            sort_newest_first(&mut documents);
            FeedMessage::Snapshot(documents)
        }
    }
}

fn parse_document(value: Value) -> Option<ReviewDocument> {
    let doc: WireDoc = match serde_json::from_value(value) {
        Ok(doc) => doc,
        Err(e) => {
            warn!("Skipping malformed review document: {}", e);
            return None;
        }
    };

    let Some(movie_id) = doc.data.movie_id.resolve() else {
        warn!("Skipping review {} with non-numeric movieId", doc.id);
        return None;
    };

    Some(ReviewDocument {
        id: doc.id,
        movie_id,
        text: doc.data.text,
        rating: doc.data.rating.as_ref().and_then(rating_value),
        timestamp: doc.data.timestamp,
    })
}

/// Ratings may arrive as numbers or numeric strings
fn rating_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Order by timestamp descending. Stable; documents without a timestamp go last.
pub fn sort_newest_first(documents: &mut [ReviewDocument]) {
    documents.sort_by(|a, b| match (&a.timestamp, &b.timestamp) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Subscribe to `collection`, ordered by timestamp descending
pub fn subscribe_frame(collection: &str) -> String {
    json!({
        "type": "subscribe",
        "collection": collection,
        "orderBy": { "field": "timestamp", "direction": "desc" },
    })
    .to_string()
}

pub fn unsubscribe_frame() -> String {
    json!({ "type": "unsubscribe" }).to_string()
}
