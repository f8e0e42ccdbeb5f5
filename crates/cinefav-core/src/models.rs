mod movie;

pub use movie::{Genre, MovieDetail, ProductionCountry, DEFAULT_POPULARITY};
