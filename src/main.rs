//! eiga - terminal movie discovery with a live review overlay
//!
//! This is the binary entry point. It resolves the start location and
//! configuration, then hands an Engine to the TUI or the headless runner.

mod headless;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{bail, Result, WrapErr};
use tracing::info;

use eiga_app::config::{
    access_token_from_env, default_config_path, feed_config, load_settings, resolve_access_token,
    tmdb_config,
};
use eiga_app::{AppState, Engine};
use eiga_catalog::{TmdbClient, WsReviewFeed};
use eiga_core::logging::LogSink;
use eiga_core::{GenreSelection, Route};

/// eiga - browse popular, famous and per-genre movies with live reviews scrolling by
#[derive(Parser, Debug)]
#[command(name = "eiga")]
#[command(about = "Terminal movie discovery with a live review overlay", long_about = None)]
struct Args {
    /// Genre id to open (for example 28)
    #[arg(long, value_name = "ID")]
    genre: Option<String>,

    /// Display name of the genre
    #[arg(long, value_name = "LABEL", requires = "genre")]
    name: Option<String>,

    /// Start location, e.g. "/?genre=28&name=Action"
    #[arg(long, value_name = "PATH", conflicts_with_all = ["genre", "name"])]
    location: Option<String>,

    /// Config file (defaults to <config dir>/eiga/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Review feed WebSocket URL, overriding the config file
    #[arg(long, value_name = "URL")]
    feed_url: Option<String>,

    /// Run in headless mode (JSON lines, no TUI)
    #[arg(long)]
    headless: bool,
}

impl Args {
    /// Genre selection of the start location (`/` when nothing was given)
    fn start_genre(&self) -> Result<GenreSelection> {
        match &self.location {
            Some(location) => match Route::parse(location)? {
                Route::Home(selection) => Ok(selection),
                Route::MovieDetail(_) => {
                    bail!("start location must be the home view, got {location}")
                }
            },
            None => Ok(GenreSelection::new(self.genre.clone(), self.name.clone())),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    // Headless stdout carries the JSON event stream
    let log_sink = if args.headless {
        LogSink::Stderr
    } else {
        LogSink::default_file()
    };
    eiga_core::logging::init(&log_sink).wrap_err("failed to initialize logging")?;

    let genre = args.start_genre()?;

    let config_path = args.config.clone().or_else(default_config_path);
    let mut settings = load_settings(config_path.as_deref());
    if let Some(url) = &args.feed_url {
        settings.reviews.feed_url = url.clone();
    }
    info!("Loaded settings: {:?}", settings);

    let token = resolve_access_token(&settings, access_token_from_env())
        .wrap_err("set TMDB_ACCESS_TOKEN or [catalog].access_token in the config file")?;

    let catalog = TmdbClient::new(tmdb_config(&settings, token))?;
    let feed = WsReviewFeed::new(feed_config(&settings));

    let state = AppState::new(settings, genre);
    let engine = Engine::new(state, catalog, feed);

    if args.headless {
        headless::runner::run_headless(engine).await?;
    } else {
        eiga_tui::run(engine).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_start_is_home() {
        let args = Args::parse_from(["eiga"]);
        assert_eq!(args.start_genre().unwrap(), GenreSelection::none());
    }

    #[test]
    fn test_genre_flags() {
        let args = Args::parse_from(["eiga", "--genre", "28", "--name", "Action"]);
        assert_eq!(
            args.start_genre().unwrap(),
            GenreSelection::genre("28", "Action")
        );
    }

    #[test]
    fn test_location_flag() {
        let args = Args::parse_from(["eiga", "--location", "/?genre=35&name=Comedy"]);
        assert_eq!(
            args.start_genre().unwrap(),
            GenreSelection::genre("35", "Comedy")
        );
    }

    #[test]
    fn test_detail_location_is_rejected() {
        let args = Args::parse_from(["eiga", "--location", "/movie/550"]);
        assert!(args.start_genre().is_err());
    }

    #[test]
    fn test_location_conflicts_with_genre() {
        let result = Args::try_parse_from(["eiga", "--genre", "28", "--location", "/"]);
        assert!(result.is_err());
    }
}
