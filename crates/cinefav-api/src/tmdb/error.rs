use cinefav_core::catalog::FetchError;
use thiserror::Error;

/// Errors from the TMDB API client.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("base URL cannot have path segments: {0}")]
    BaseUrl(String),
}

impl From<TmdbError> for FetchError {
    fn from(err: TmdbError) -> Self {
        match err {
            TmdbError::Http(e) => FetchError::Transport(e.to_string()),
            TmdbError::Api { status, message } => FetchError::Status { status, message },
            TmdbError::Parse(msg) => FetchError::Protocol(msg),
            TmdbError::Url(e) => FetchError::Transport(e.to_string()),
            TmdbError::BaseUrl(url) => FetchError::Transport(format!("invalid base URL: {url}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_fetch_error() {
        let api: FetchError = TmdbError::Api {
            status: 401,
            message: "Invalid API key".into(),
        }
        .into();
        assert_eq!(api.status_text(), "401");

        let parse: FetchError = TmdbError::Parse("missing field `id`".into()).into();
        assert!(matches!(parse, FetchError::Protocol(_)));

        let base: FetchError = TmdbError::BaseUrl("mailto:x@example.com".into()).into();
        assert!(matches!(base, FetchError::Transport(_)));
    }
}
