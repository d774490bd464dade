//! Settings loading and credential resolution

use std::path::{Path, PathBuf};
use std::time::Duration;

use eiga_catalog::{TmdbConfig, WsReviewFeedConfig};
use eiga_core::prelude::*;

use super::types::Settings;

/// Environment variable holding the catalog bearer token
pub const TOKEN_ENV_VAR: &str = "TMDB_ACCESS_TOKEN";

const CONFIG_DIR: &str = "eiga";
const CONFIG_FILENAME: &str = "config.toml";

/// `<config_dir>/eiga/config.toml`, when the platform has a config directory
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILENAME))
}

/// Load settings from `path`, or from the default location when `None`.
///
/// A missing file yields defaults; an unreadable or malformed file is logged and
/// also yields defaults.
pub fn load_settings(path: Option<&Path>) -> Settings {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) => path,
            None => {
                debug!("No config directory on this platform, using defaults");
                return Settings::default();
            }
        },
    };

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Pick the catalog token: the environment wins over the config file.
///
/// Blank values count as absent. No token at all is fatal.
pub fn resolve_access_token(settings: &Settings, env_token: Option<String>) -> Result<String> {
    env_token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            settings
                .catalog
                .access_token
                .clone()
                .filter(|t| !t.trim().is_empty())
        })
        .ok_or(Error::MissingAccessToken)
}

/// Read [`TOKEN_ENV_VAR`] from the process environment
pub fn access_token_from_env() -> Option<String> {
    std::env::var(TOKEN_ENV_VAR).ok()
}

/// Catalog client configuration for a resolved token
pub fn tmdb_config(settings: &Settings, access_token: String) -> TmdbConfig {
    let mut config = TmdbConfig::new(access_token);
    config.base_url = settings.catalog.base_url.clone();
    config.language = settings.catalog.language.clone();
    config.timeout = Duration::from_secs(settings.catalog.request_timeout_secs.max(1));
    config
}

pub fn feed_config(settings: &Settings) -> WsReviewFeedConfig {
    WsReviewFeedConfig {
        url: settings.reviews.feed_url.clone(),
        collection: settings.reviews.collection.clone(),
        max_reconnect_attempts: settings.reviews.max_reconnect_attempts,
        connect_timeout: Duration::from_secs(settings.reviews.connect_timeout_secs.max(1)),
    }
}
