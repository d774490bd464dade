//! Review domain types: feed documents and their overlay projection

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::movies::MovieId;

/// Upper bound on rendered stars; ratings above it are capped
pub const MAX_STARS: usize = 5;

const STAR_GLYPH: &str = "⭐";

/// Ordering key of a review document.
///
/// Accepts either epoch milliseconds or a `{seconds, nanoseconds}` object on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawTimestamp")]
pub struct ReviewTimestamp {
    pub seconds: i64,
    pub nanoseconds: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Parts {
        #[serde(alias = "_seconds")]
        seconds: i64,
        #[serde(default, alias = "_nanoseconds", alias = "nanos")]
        nanoseconds: u32,
    },
}

impl From<RawTimestamp> for ReviewTimestamp {
    fn from(raw: RawTimestamp) -> Self {
        match raw {
            RawTimestamp::Millis(ms) => Self::from_millis(ms),
            RawTimestamp::Parts {
                seconds,
                nanoseconds,
            } => Self {
                seconds,
                nanoseconds,
            },
        }
    }
}

impl ReviewTimestamp {
    pub fn from_millis(ms: i64) -> Self {
        Self {
            seconds: ms.div_euclid(1000),
            nanoseconds: (ms.rem_euclid(1000) as u32) * 1_000_000,
        }
    }

    /// Posting time in UTC; `None` when outside chrono's range
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.seconds, self.nanoseconds).single()
    }
}

/// A review as delivered by the live feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDocument {
    /// Document key in the collection
    pub id: String,
    pub movie_id: MovieId,
    pub text: String,
    /// Raw rating; may be absent, fractional or out of range
    pub rating: Option<f64>,
    pub timestamp: Option<ReviewTimestamp>,
}

impl ReviewDocument {
    pub fn new(id: impl Into<String>, movie_id: MovieId, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            movie_id,
            text: text.into(),
            rating: None,
            timestamp: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_timestamp(mut self, timestamp: ReviewTimestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Number of stars to render for a raw rating.
///
/// Missing, negative and non-finite ratings render no stars; fractional ratings
/// are truncated; everything is capped at [`MAX_STARS`].
pub fn bounded_stars(rating: Option<f64>) -> usize {
    match rating {
        Some(r) if r.is_finite() && r > 0.0 => (r.trunc() as usize).min(MAX_STARS),
        _ => 0,
    }
}

/// A review placed on the danmaku overlay.
///
/// `top` and `delay_secs` are assigned when the snapshot carrying this review is
/// received and are never carried over to the next snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewComment {
    #[serde(flatten)]
    pub document: ReviewDocument,
    /// Vertical offset within the viewport at receipt time
    pub top: f64,
    /// Seconds before the first scroll pass starts
    pub delay_secs: f64,
}

impl ReviewComment {
    /// Overlay identity: document keys are not unique across snapshot replacements
    pub fn render_key(&self, index: usize) -> String {
        format!("{}-{}", self.document.id, index)
    }

    pub fn star_count(&self) -> usize {
        bounded_stars(self.document.rating)
    }

    /// Stars followed by the review text, as scrolled across the screen
    pub fn label(&self) -> String {
        format!("{} {}", STAR_GLYPH.repeat(self.star_count()), self.document.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(rating: Option<f64>) -> ReviewComment {
        let mut document = ReviewDocument::new("a", 11, "Great");
        document.rating = rating;
        ReviewComment {
            document,
            top: 0.0,
            delay_secs: 0.0,
        }
    }

    #[test]
    fn test_timestamp_from_millis() {
        let ts: ReviewTimestamp = serde_json::from_str("1700000000123").unwrap();
        assert_eq!(ts.seconds, 1_700_000_000);
        assert_eq!(ts.nanoseconds, 123_000_000);
    }

    #[test]
    fn test_timestamp_from_firestore_object() {
        let ts: ReviewTimestamp =
            serde_json::from_str(r#"{"seconds": 1700000000, "nanoseconds": 5}"#).unwrap();
        assert_eq!(ts.seconds, 1_700_000_000);
        assert_eq!(ts.nanoseconds, 5);

        let admin: ReviewTimestamp =
            serde_json::from_str(r#"{"_seconds": 12, "_nanoseconds": 0}"#).unwrap();
        assert_eq!(admin.seconds, 12);
    }

    #[test]
    fn test_timestamp_ordering() {
        let older = ReviewTimestamp::from_millis(1_000);
        let newer = ReviewTimestamp::from_millis(2_000);
        assert!(newer > older);
    }

    #[test]
    fn test_timestamp_to_utc_datetime() {
        let posted = ReviewTimestamp::from_millis(1_700_000_000_000)
            .to_datetime()
            .unwrap();
        assert_eq!(posted.to_rfc3339(), "2023-11-14T22:13:20+00:00");

        let out_of_range = ReviewTimestamp {
            seconds: i64::MAX,
            nanoseconds: 0,
        };
        assert!(out_of_range.to_datetime().is_none());
    }

    #[test]
    fn test_bounded_stars() {
        assert_eq!(bounded_stars(Some(3.0)), 3);
        assert_eq!(bounded_stars(Some(0.0)), 0);
        assert_eq!(bounded_stars(None), 0);
        assert_eq!(bounded_stars(Some(-2.0)), 0);
        assert_eq!(bounded_stars(Some(4.7)), 4);
        assert_eq!(bounded_stars(Some(1e9)), MAX_STARS);
        assert_eq!(bounded_stars(Some(f64::NAN)), 0);
    }

    #[test]
    fn test_label_repeats_star_per_rating_point() {
        assert_eq!(comment(Some(3.0)).label(), "⭐⭐⭐ Great");
        assert_eq!(comment(Some(0.0)).label(), " Great");
    }

    #[test]
    fn test_render_key_combines_id_and_position() {
        assert_eq!(comment(None).render_key(4), "a-4");
    }
}
