use serde::{Deserialize, Serialize};
use crate::movie_id::MovieId;

/// A movie record as returned by the browse and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    #[serde(default)]
    pub year: Option<u32>,
    /// Poster path relative to the image host (e.g. "/abc123.jpg")
    #[serde(default)]
    pub poster: Option<String>,
}

impl Movie {
    /// Join the poster path onto an image base URL
    pub fn poster_url(&self, base: &str) -> Option<String> {
        let poster = self.poster.as_deref().filter(|p| !p.is_empty())?;
        if poster.starts_with("http://") || poster.starts_with("https://") {
            return Some(poster.to_string());
        }
        let base = base.trim_end_matches('/');
        if poster.starts_with('/') {
            Some(format!("{}{}", base, poster))
        } else {
            Some(format!("{}/{}", base, poster))
        }
    }

    /// "Name (Year)" or just the name when the year is unknown
    pub fn display_title(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({})", self.name, year),
            None => self.name.clone(),
        }
    }
}

/// Envelope used by both `GET /movies` and `POST /search/movies`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MovieList {
    #[serde(default)]
    pub movies: Vec<Movie>,
}
