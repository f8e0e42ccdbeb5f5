use reqwest::Client;
use url::Url;

use cinefav_core::catalog::MovieCatalog;
use cinefav_core::config::ApiConfig;
use cinefav_core::models::MovieDetail;

use super::error::TmdbError;
use super::types::{TmdbMovieDetail, TmdbStatusBody};

/// The Movie Database (TMDB) v3 REST client.
pub struct TmdbClient {
    base_url: String,
    language: String,
    access_token: Option<String>,
    api_key: Option<String>,
    http: Client,
}

impl TmdbClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            language: config.language.clone(),
            access_token: config.access_token.clone(),
            api_key: config.api_key.clone(),
            http: Client::new(),
        }
    }

    /// `{base_url}/movie/{id}`, with `id` escaped as a single path segment.
    fn movie_url(&self, id: &str) -> Result<Url, TmdbError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| TmdbError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("movie")
            .push(id);
        Ok(url)
    }

    /// Check the HTTP response for errors and return the status message on failure.
    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TmdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbStatusBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .unwrap_or(body);
            tracing::warn!(status, %message, "TMDB API error");
            Err(TmdbError::Api { status, message })
        }
    }

    /// Fetch the raw TMDB movie record.
    pub async fn get_movie(&self, id: &str) -> Result<TmdbMovieDetail, TmdbError> {
        let mut req = self
            .http
            .get(self.movie_url(id)?)
            .query(&[("language", self.language.as_str())]);
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            req = req.query(&[("api_key", key.as_str())]);
        }

        let resp = Self::check_response(req.send().await?).await?;
        resp.json()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))
    }
}

impl MovieCatalog for TmdbClient {
    type Error = TmdbError;

    async fn get_movie_detail(&self, id: &str) -> Result<MovieDetail, TmdbError> {
        Ok(self.get_movie(id).await?.into_movie_detail())
    }
}

#[cfg(test)]
mod tests {
    use cinefav_core::config::AppConfig;

    use super::*;

    fn client_for(base_url: &str) -> TmdbClient {
        let mut config = AppConfig::default().api;
        config.base_url = base_url.into();
        TmdbClient::new(&config)
    }

    #[test]
    fn test_movie_url() {
        let client = client_for("https://api.themoviedb.org/3");
        assert_eq!(
            client.movie_url("550").unwrap().as_str(),
            "https://api.themoviedb.org/3/movie/550"
        );
    }

    #[test]
    fn test_movie_url_trailing_slash_and_escaping() {
        let client = client_for("https://api.themoviedb.org/3/");
        assert_eq!(
            client.movie_url("1/../2").unwrap().as_str(),
            "https://api.themoviedb.org/3/movie/1%2F..%2F2"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let client = client_for("not a url");
        assert!(matches!(client.movie_url("550"), Err(TmdbError::Url(_))));
    }

    #[test]
    fn test_cannot_be_a_base_url() {
        let client = client_for("mailto:someone@example.com");
        match client.movie_url("550") {
            Err(TmdbError::BaseUrl(url)) => assert_eq!(url, "mailto:someone@example.com"),
            other => panic!("Expected BaseUrl error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        use cinefav_core::catalog::FetchError;

        // Bind an ephemeral port and release it so nothing is listening there.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = client_for(&format!("http://127.0.0.1:{port}/3"));
        let err: FetchError = client.get_movie_detail("550").await.unwrap_err().into();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
