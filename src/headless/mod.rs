//! Headless mode - JSON event output
//!
//! Runs the same engine as the TUI without a terminal and writes every
//! [`EngineEvent`] to stdout as NDJSON (one JSON object per line).
//!
//! # Example Output
//!
//! ```json
//! {"event":"famousLoaded","movies":[{"id":1891,"title":"帝国の逆襲","poster_path":null}]}
//! {"event":"feedStatus","status":"live"}
//! {"event":"commentsUpdated","comments":[{"id":"r1","movieId":11,"text":"最高","rating":5.0,"timestamp":1704700001000,"top":12.4,"delaySecs":3.1}]}
//! ```

pub mod runner;

use std::io::{self, Write};

use tracing::error;

use eiga_app::EngineEvent;

/// Serialize one event to a JSON line
pub fn to_json_line(event: &EngineEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Failed to serialize headless event: {}", e);
            None
        }
    }
}

/// Write one event to stdout and flush
pub fn emit(event: &EngineEvent) {
    let Some(json) = to_json_line(event) else {
        return;
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", json) {
        error!("Failed to write headless event to stdout: {}", e);
        return;
    }
    if let Err(e) = stdout.flush() {
        error!("Failed to flush stdout: {}", e);
    }
}
