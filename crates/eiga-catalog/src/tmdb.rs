//! REST client for the movie catalog (TMDB v3).
//!
//! Wraps the three list/by-id endpoints the view consumes:
//!
//! - `GET /movie/popular?language=<locale>&page=<n>`
//! - `GET /discover/movie?with_genres=<id>&language=<locale>&page=<n>`
//! - `GET /movie/<id>?language=<locale>`
//!
//! Every request carries `Authorization: Bearer <token>` and
//! `Accept: application/json`. The token is handed in explicitly through
//! [`TmdbConfig`]; nothing here reads the environment.

use std::time::Duration;

use futures_util::future::join_all;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use url::Url;

use eiga_core::prelude::*;
use eiga_core::{MovieId, MoviePage, MovieSummary};

/// Default TMDB v3 API root
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Display locale requested from the catalog
pub const DEFAULT_LANGUAGE: &str = "ja-JP";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Catalog operations used by the loaders.
///
/// Both the TMDB client and the test stub implement this trait.
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// One page of the popularity-ranked feed
    async fn popular(&self, page: u32) -> Result<MoviePage>;

    /// One page of movies attributed to `genre_id`
    async fn discover_by_genre(&self, genre_id: &str, page: u32) -> Result<MoviePage>;

    /// A single movie by id
    async fn movie(&self, id: MovieId) -> Result<MovieSummary>;
}

/// Fetch several movies by id concurrently.
///
/// Waits for every request to settle before returning. The result keeps the
/// order of `ids` regardless of completion order, and fails as a whole when any
/// single request fails.
pub async fn fetch_movies_in_order<C>(catalog: &C, ids: &[MovieId]) -> Result<Vec<MovieSummary>>
where
    C: CatalogApi + Sync,
{
    let results = join_all(ids.iter().map(|&id| catalog.movie(id))).await;
    results.into_iter().collect()
}

/// Connection settings for [`TmdbClient`]
#[derive(Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub language: String,
    pub access_token: String,
    pub timeout: Duration,
}

impl TmdbConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            access_token: access_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl std::fmt::Debug for TmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbConfig")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the TMDB catalog
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: Url,
    language: String,
    access_token: String,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url.as_str())
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl TmdbClient {
    /// Create a client. Fails on an unparsable base URL or an empty token.
    pub fn new(config: TmdbConfig) -> Result<Self> {
        if config.access_token.trim().is_empty() {
            return Err(Error::MissingAccessToken);
        }

        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!(
                "catalog base_url is not a base URL: {}",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::catalog(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            language: config.language,
            access_token: config.access_token,
        })
    }

    pub fn popular_url(&self, page: u32) -> Result<Url> {
        let page = page.to_string();
        self.endpoint(
            &["movie", "popular"],
            &[("language", self.language.as_str()), ("page", page.as_str())],
        )
    }

    pub fn discover_url(&self, genre_id: &str, page: u32) -> Result<Url> {
        let page = page.to_string();
        self.endpoint(
            &["discover", "movie"],
            &[
                ("with_genres", genre_id),
                ("language", self.language.as_str()),
                ("page", page.as_str()),
            ],
        )
    }

    pub fn movie_url(&self, id: MovieId) -> Result<Url> {
        let id = id.to_string();
        self.endpoint(
            &["movie", id.as_str()],
            &[("language", self.language.as_str())],
        )
    }

    /// Build `<base>/<segments..>?<params..>`
    fn endpoint(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config("catalog base_url cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::catalog(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Catalog returned {} for {}", status, url);
            return Err(Error::catalog_status(status.as_u16(), body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::catalog(format!("Invalid catalog response from {url}: {e}")))
    }
}

impl CatalogApi for TmdbClient {
    async fn popular(&self, page: u32) -> Result<MoviePage> {
        let url = self.popular_url(page)?;
        self.get_json(url).await
    }

    async fn discover_by_genre(&self, genre_id: &str, page: u32) -> Result<MoviePage> {
        let url = self.discover_url(genre_id, page)?;
        self.get_json(url).await
    }

    async fn movie(&self, id: MovieId) -> Result<MovieSummary> {
        let url = self.movie_url(id)?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StubCatalog;

    fn client() -> TmdbClient {
        TmdbClient::new(TmdbConfig::new("secret-token")).unwrap()
    }

    #[test]
    fn test_popular_url() {
        let url = client().popular_url(1).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/popular?language=ja-JP&page=1"
        );
    }

    #[test]
    fn test_discover_url() {
        let url = client().discover_url("28", 3).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/discover/movie?with_genres=28&language=ja-JP&page=3"
        );
    }

    #[test]
    fn test_movie_url() {
        let url = client().movie_url(1891).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.themoviedb.org/3/movie/1891?language=ja-JP"
        );
    }

    #[test]
    fn test_base_url_with_trailing_slash() {
        let mut config = TmdbConfig::new("t");
        config.base_url = "http://localhost:9000/3/".to_string();
        config.language = "en-US".to_string();
        let client = TmdbClient::new(config).unwrap();
        assert_eq!(
            client.movie_url(11).unwrap().as_str(),
            "http://localhost:9000/3/movie/11?language=en-US"
        );
    }

    #[test]
    fn test_genre_id_is_query_encoded() {
        let url = client().discover_url("28|12", 1).unwrap();
        assert!(url.as_str().contains("with_genres=28%7C12"));
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let err = TmdbClient::new(TmdbConfig::new("  ")).unwrap_err();
        assert!(matches!(err, Error::MissingAccessToken));
    }

    #[test]
    fn test_debug_output_redacts_token() {
        let config = TmdbConfig::new("secret-token");
        assert!(!format!("{config:?}").contains("secret-token"));
        assert!(!format!("{:?}", client()).contains("secret-token"));
    }

    #[tokio::test]
    async fn test_fetch_movies_in_order_ignores_completion_order() {
        let catalog = StubCatalog::new()
            .with_movie(MovieSummary::new(1891, "The Empire Strikes Back"))
            .with_movie(MovieSummary::new(11, "Star Wars"))
            .with_movie(MovieSummary::new(238, "The Godfather"))
            .with_delay(1891, Duration::from_millis(40))
            .with_delay(11, Duration::from_millis(20));

        let movies = fetch_movies_in_order(&catalog, &[1891, 11, 238])
            .await
            .unwrap();

        let ids: Vec<MovieId> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1891, 11, 238]);
    }

    #[tokio::test]
    async fn test_fetch_movies_in_order_fails_as_a_whole() {
        let catalog = StubCatalog::new()
            .with_movie(MovieSummary::new(11, "Star Wars"))
            .with_movie(MovieSummary::new(238, "The Godfather"));

        let result = fetch_movies_in_order(&catalog, &[11, 404, 238]).await;
        assert!(result.is_err());
        assert_eq!(catalog.movie_requests(), 3);
    }
}
