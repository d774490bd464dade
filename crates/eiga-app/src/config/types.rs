//! Configuration types (`config.toml`)

use serde::{Deserialize, Serialize};

use eiga_catalog::{DEFAULT_BASE_URL, DEFAULT_COLLECTION, DEFAULT_FEED_URL, DEFAULT_LANGUAGE};

/// Application settings
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub reviews: ReviewSettings,

    #[serde(default)]
    pub danmaku: DanmakuSettings,

    #[serde(default)]
    pub navigation: NavigationSettings,
}

/// Movie catalog connection
#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Display locale sent with every request
    #[serde(default = "default_language")]
    pub language: String,

    /// Bearer token; `TMDB_ACCESS_TOKEN` takes precedence
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            access_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for CatalogSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogSettings")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Live review feed
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReviewSettings {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,

    /// Per-attempt bound on connecting to the feed
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            collection: default_collection(),
            max_reconnect_attempts: default_max_reconnect_attempts(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Comment overlay animation
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DanmakuSettings {
    /// Seconds for one right-to-left pass
    #[serde(default = "default_scroll_secs")]
    pub scroll_secs: f64,

    /// Upper bound (exclusive) of the random start delay
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f64,
}

impl Default for DanmakuSettings {
    fn default() -> Self {
        Self {
            scroll_secs: default_scroll_secs(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}

/// Where detail routes are opened
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct NavigationSettings {
    /// Prefix joined with `/movie/<id>`
    #[serde(default = "default_detail_base_url")]
    pub detail_base_url: String,

    /// Browser command (empty = system default)
    #[serde(default)]
    pub browser: String,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            detail_base_url: default_detail_base_url(),
            browser: String::new(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_max_reconnect_attempts() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_scroll_secs() -> f64 {
    15.0
}

fn default_max_delay_secs() -> f64 {
    5.0
}

fn default_detail_base_url() -> String {
    "https://www.themoviedb.org".to_string()
}
