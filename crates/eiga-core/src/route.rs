//! Navigation routes
//!
//! The view reads its genre filter from the location query (`/?genre=28&name=Action`)
//! and links every movie to `/movie/<id>`.

use url::Url;

use crate::error::{Error, Result};
use crate::movies::{GenreSelection, MovieId};

/// Base used to resolve relative locations; never shown to the user
const LOCATION_BASE: &str = "http://eiga.local/";

/// A location inside the app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Landing view, optionally filtered by genre
    Home(GenreSelection),
    /// Per-movie detail page
    MovieDetail(MovieId),
}

impl Route {
    /// Parse a location such as `/`, `/?genre=28&name=Action` or `/movie/550`
    pub fn parse(location: &str) -> Result<Self> {
        let base = Url::parse(LOCATION_BASE)?;
        let url = base.join(location.trim())?;

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        match segments.as_slice() {
            [] => {
                let mut genre = None;
                let mut name = None;
                for (key, value) in url.query_pairs() {
                    match key.as_ref() {
                        "genre" => genre = Some(value.into_owned()),
                        "name" => name = Some(value.into_owned()),
                        _ => {}
                    }
                }
                Ok(Route::Home(GenreSelection::new(genre, name)))
            }
            ["movie", id] => id
                .parse::<MovieId>()
                .map(Route::MovieDetail)
                .map_err(|_| Error::invalid_route(location)),
            _ => Err(Error::invalid_route(location)),
        }
    }

    /// Home route for a genre selection
    pub fn home(selection: GenreSelection) -> Self {
        Route::Home(selection)
    }

    /// Render back to a location string
    pub fn to_location(&self) -> String {
        match self {
            Route::Home(selection) if selection.is_selected() => {
                let mut query = url::form_urlencoded::Serializer::new(String::new());
                if let Some(id) = &selection.genre_id {
                    query.append_pair("genre", id);
                }
                if let Some(name) = &selection.genre_name {
                    query.append_pair("name", name);
                }
                format!("/?{}", query.finish())
            }
            Route::Home(_) => "/".to_string(),
            Route::MovieDetail(id) => format!("/movie/{id}"),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_location())
    }
}
