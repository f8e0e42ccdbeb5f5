use std::fmt;

use serde::Deserialize;

use cinefav_core::models::{Genre, MovieDetail, ProductionCountry, DEFAULT_POPULARITY};

// ── Movie detail response ───────────────────────────────────────

/// TMDB ids are numbers on the wire; accept strings too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TmdbId {
    Number(u64),
    Text(String),
}

impl fmt::Display for TmdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovieDetail {
    pub id: TmdbId,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub vote_count: Option<u64>,
    pub popularity: Option<f64>,
    pub genres: Option<Vec<TmdbGenre>>,
    pub production_countries: Option<Vec<TmdbProductionCountry>>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: TmdbId,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TmdbProductionCountry {
    pub iso_3166_1: String,
    pub name: String,
}

/// Error body TMDB sends with non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct TmdbStatusBody {
    pub status_code: Option<u32>,
    pub status_message: Option<String>,
}

// ── Conversions to core types ───────────────────────────────────

impl TmdbMovieDetail {
    pub fn into_movie_detail(self) -> MovieDetail {
        MovieDetail {
            id: self.id.to_string(),
            title: self.title,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path.unwrap_or_default(),
            vote_count: self.vote_count.unwrap_or(0),
            popularity: self.popularity.unwrap_or(DEFAULT_POPULARITY),
            genres: self
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|g| Genre {
                    id: g.id.to_string(),
                    name: g.name,
                })
                .collect(),
            production_countries: self
                .production_countries
                .unwrap_or_default()
                .into_iter()
                .map(|c| ProductionCountry {
                    code: c.iso_3166_1,
                    name: c.name,
                })
                .collect(),
        }
    }
}
