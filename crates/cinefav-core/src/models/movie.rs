use serde::{Deserialize, Serialize};

/// Popularity reported for a movie when the catalog omits the field.
///
/// This is a fill-in value, not a measured statistic.
pub const DEFAULT_POPULARITY: f64 = 100.0;

/// A genre tag attached to a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

/// A country that took part in producing a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCountry {
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    pub name: String,
}

/// Full record for one catalog entry.
///
/// An empty `id` marks the placeholder shown before any real data has
/// loaded. Placeholders never enter the favorites collection.
///
/// `poster_path` is empty when the catalog has no image. The presentation
/// layer resolves a non-empty path against its image base URL and
/// substitutes a fixed placeholder image URL otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub overview: String,
    pub poster_path: String,
    pub vote_count: u64,
    pub popularity: f64,
    pub genres: Vec<Genre>,
    pub production_countries: Vec<ProductionCountry>,
}

impl MovieDetail {
    /// The "not yet loaded" value: every field empty or zero, popularity at
    /// [`DEFAULT_POPULARITY`].
    pub fn placeholder() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            overview: String::new(),
            poster_path: String::new(),
            vote_count: 0,
            popularity: DEFAULT_POPULARITY,
            genres: Vec::new(),
            production_countries: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }

    pub fn has_poster(&self) -> bool {
        !self.poster_path.is_empty()
    }
}

impl Default for MovieDetail {
    fn default() -> Self {
        Self::placeholder()
    }
}
