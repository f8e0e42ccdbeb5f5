//! The seam between the fetcher and a remote movie catalog.
//!
//! Concrete clients (TMDB) live in `cinefav-api` and implement
//! [`MovieCatalog`]; tests drive the fetcher with in-memory fakes.

use std::future::Future;

use thiserror::Error;

use crate::models::MovieDetail;

/// A remote catalog that can look up one movie by id.
///
/// Lookups must be idempotent: the fetcher may call again for the same id
/// after an explicit refetch.
pub trait MovieCatalog: Send + Sync {
    type Error: std::error::Error + Into<FetchError> + Send + Sync + 'static;

    /// Get the detail record for a movie.
    fn get_movie_detail(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<MovieDetail, Self::Error>> + Send;
}

/// Why a detail lookup failed.
///
/// Kept `Clone` so one failure can be handed to every caller that was
/// waiting on the same lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl FetchError {
    /// Whether the remote itself reported an error status.
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// Text shown to the user: the status code for remote errors, a generic
    /// message for everything else.
    pub fn status_text(&self) -> String {
        match self {
            Self::Status { status, .. } => status.to_string(),
            Self::Transport(_) | Self::Protocol(_) => "Something went wrong".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_text() {
        let status = FetchError::Status {
            status: 404,
            message: "not found".into(),
        };
        assert!(status.is_status());
        assert_eq!(status.status_text(), "404");

        let transport = FetchError::Transport("connection reset".into());
        assert!(!transport.is_status());
        assert_eq!(transport.status_text(), "Something went wrong");
        assert_eq!(
            FetchError::Protocol("bad json".into()).status_text(),
            transport.status_text()
        );
    }
}
