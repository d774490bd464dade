//! Danmaku overlay: snapshot projection and scroll geometry
//!
//! Every snapshot is projected afresh. Each review gets a random row in
//! `[0, viewport_height)` and a random start delay in `[0, max_delay)`, drawn
//! from the injected generator at receipt time. Nothing carries over from the
//! previous snapshot.
//!
//! A comment then scrolls from just past the right edge until its last cell
//! leaves the left edge, one pass every `scroll_secs`, forever.

use rand::Rng;

use eiga_core::{ReviewComment, ReviewDocument};

/// Map one feed snapshot onto the overlay
pub fn project_snapshot<R>(
    docs: Vec<ReviewDocument>,
    viewport_height: u16,
    max_delay_secs: f64,
    rng: &mut R,
) -> Vec<ReviewComment>
where
    R: Rng + ?Sized,
{
    docs.into_iter()
        .map(|document| ReviewComment {
            document,
            top: random_below(rng, f64::from(viewport_height)),
            delay_secs: random_below(rng, max_delay_secs),
        })
        .collect()
}

/// Uniform in `[0, upper)`; zero when the range is empty
fn random_below<R: Rng + ?Sized>(rng: &mut R, upper: f64) -> f64 {
    if upper.is_finite() && upper > 0.0 {
        rng.gen_range(0.0..upper)
    } else {
        0.0
    }
}

/// Column of the comment's first cell at `elapsed_secs` after receipt.
///
/// `None` while the start delay is running. The result may be negative (partly
/// off the left edge) or `>= viewport_width` (not yet entered).
pub fn scroll_column(
    elapsed_secs: f64,
    delay_secs: f64,
    scroll_secs: f64,
    viewport_width: u16,
    text_width: u16,
) -> Option<i32> {
    let since_start = elapsed_secs - delay_secs;
    if since_start < 0.0 || scroll_secs <= 0.0 {
        return None;
    }

    let travel = f64::from(viewport_width) + f64::from(text_width);
    let moved = since_start.rem_euclid(scroll_secs) * travel / scroll_secs;
    Some((f64::from(viewport_width) - moved).floor() as i32)
}

/// Row for a stored `top`, or `None` when it falls below the drawable area
pub fn overlay_row(top: f64, area_height: u16) -> Option<u16> {
    if !top.is_finite() || top < 0.0 {
        return None;
    }
    let row = top.floor();
    if row >= f64::from(area_height) {
        return None;
    }
    Some(row as u16)
}
