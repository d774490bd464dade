//! Configuration for eiga
//!
//! Settings live in `<config_dir>/eiga/config.toml` unless `--config` points
//! elsewhere. Every key is optional.

pub mod settings;
pub mod types;

pub use settings::{
    access_token_from_env, default_config_path, feed_config, load_settings,
    resolve_access_token, tmdb_config, TOKEN_ENV_VAR,
};
pub use types::*;
