use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::watch;

use crate::catalog::{FetchError, MovieCatalog};
use crate::models::MovieDetail;

/// Scripted in-memory catalog that counts calls.
///
/// When closed, lookups park until `open()` so tests can observe the
/// `Loading` state.
pub(crate) struct FakeCatalog {
    responses: Mutex<HashMap<String, Result<MovieDetail, FetchError>>>,
    calls: AtomicUsize,
    gate: watch::Sender<bool>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            gate: watch::Sender::new(true),
        }
    }

    pub fn closed() -> Self {
        let catalog = Self::new();
        catalog.gate.send_replace(false);
        catalog
    }

    pub fn with_movie(self, detail: MovieDetail) -> Self {
        self.set(detail.id.clone(), Ok(detail));
        self
    }

    pub fn with_error(self, id: &str, error: FetchError) -> Self {
        self.set(id.to_string(), Err(error));
        self
    }

    pub fn set(&self, id: String, response: Result<MovieDetail, FetchError>) {
        self.responses.lock().unwrap().insert(id, response);
    }

    pub fn open(&self) {
        self.gate.send_replace(true);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MovieCatalog for FakeCatalog {
    type Error = FetchError;

    async fn get_movie_detail(&self, id: &str) -> Result<MovieDetail, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;

        self.responses
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Status {
                    status: 404,
                    message: format!("movie {id} not found"),
                })
            })
    }
}

pub(crate) fn movie(id: &str, title: &str) -> MovieDetail {
    MovieDetail {
        id: id.into(),
        title: title.into(),
        ..MovieDetail::placeholder()
    }
}
