//! Application error types with rich context

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    // ─────────────────────────────────────────────────────────────
    // Process Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Signal handler error: {message}")]
    Signal { message: String },

    #[error("Logging setup failed: {message}")]
    Logging { message: String },

    // ─────────────────────────────────────────────────────────────
    // Catalog API Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Catalog request failed: {message}")]
    Catalog { message: String },

    #[error("Catalog API error ({status}): {body}")]
    CatalogStatus { status: u16, body: String },

    #[error("No catalog access token. Set TMDB_ACCESS_TOKEN or [catalog].access_token.")]
    MissingAccessToken,

    // ─────────────────────────────────────────────────────────────
    // Review Feed Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Review feed error: {message}")]
    ReviewFeed { message: String },

    // ─────────────────────────────────────────────────────────────
    // Navigation Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Unrecognized route: {route}")]
    InvalidRoute { route: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn signal(message: impl Into<String>) -> Self {
        Self::Signal {
            message: message.into(),
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    pub fn catalog_status(status: u16, body: impl Into<String>) -> Self {
        Self::CatalogStatus {
            status,
            body: body.into(),
        }
    }

    pub fn review_feed(message: impl Into<String>) -> Self {
        Self::ReviewFeed {
            message: message.into(),
        }
    }

    pub fn invalid_route(route: impl Into<String>) -> Self {
        Self::InvalidRoute {
            route: route.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
