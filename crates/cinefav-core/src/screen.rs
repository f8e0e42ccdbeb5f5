//! Per-screen reconciliation of a movie's fetch state with the favorites
//! collection.
//!
//! A [`DetailScreen`] shows one movie at a time. Fetches are split into a
//! ticket ([`DetailScreen::view`]), the async lookup
//! ([`DetailScreen::fetch_task`]) and the completion
//! ([`DetailScreen::complete`]) so the host decides where the lookup runs.
//! Completions for a movie the screen no longer shows are dropped.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::MovieCatalog;
use crate::favorites::FavoritesStore;
use crate::fetcher::{DetailFetcher, FetchState};
use crate::models::MovieDetail;

/// Text of the banner shown after a movie is added.
pub const CONFIRMATION_MESSAGE: &str = "Movie added to your Favorite list!";

/// Identifies one fetch issued by a screen. A ticket completes at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct FetchTicket {
    movie_id: String,
    generation: u64,
}

impl FetchTicket {
    pub fn movie_id(&self) -> &str {
        &self.movie_id
    }
}

/// Result of pressing "add to favorites".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The movie was inserted and the confirmation is showing.
    Added,
    /// The movie was already a favorite; nothing changed.
    AlreadyFavorite,
    /// No successfully loaded detail to add.
    Unavailable,
}

/// Everything the presentation layer reads from a screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenSnapshot {
    pub movie_id: String,
    pub detail: MovieDetail,
    pub loading: bool,
    pub is_favorite: bool,
    pub confirmation_visible: bool,
    pub error: Option<String>,
}

/// Detail screen state for one active movie.
pub struct DetailScreen<C> {
    fetcher: Arc<DetailFetcher<C>>,
    favorites: FavoritesStore,
    movie_id: String,
    state: FetchState<MovieDetail>,
    generation: u64,
    pending: Option<u64>,
    confirmation_visible: bool,
}

impl<C: MovieCatalog> DetailScreen<C> {
    pub fn new(fetcher: Arc<DetailFetcher<C>>, favorites: FavoritesStore) -> Self {
        Self {
            fetcher,
            favorites,
            movie_id: String::new(),
            state: FetchState::Idle,
            generation: 0,
            pending: None,
            confirmation_visible: false,
        }
    }

    /// Switch the screen to `id`.
    ///
    /// Any fetch still running for the previous movie is superseded. A
    /// result the fetcher already holds is shown right away; the returned
    /// ticket then completes from the cache. An empty id leaves the screen
    /// idle and returns `None`.
    pub fn view(&mut self, id: impl Into<String>) -> Option<FetchTicket> {
        let id = id.into();
        self.generation += 1;
        self.confirmation_visible = false;

        if id.is_empty() {
            tracing::warn!("Detail screen opened without a movie id");
            self.movie_id.clear();
            self.state = FetchState::Idle;
            self.pending = None;
            return None;
        }

        self.state = match self.fetcher.state(&id) {
            cached if cached.is_terminal() => cached,
            _ => FetchState::Loading,
        };
        tracing::debug!(movie_id = %id, generation = self.generation, "Viewing movie");
        self.movie_id = id;
        self.pending = Some(self.generation);

        Some(FetchTicket {
            movie_id: self.movie_id.clone(),
            generation: self.generation,
        })
    }

    /// Apply a finished fetch. Returns `false` and leaves the screen untouched
    /// if the ticket was superseded by a later `view` or `close`, or was
    /// already completed.
    pub fn complete(&mut self, ticket: FetchTicket, state: FetchState<MovieDetail>) -> bool {
        if self.pending != Some(ticket.generation) || ticket.movie_id != self.movie_id {
            tracing::debug!(
                movie_id = %ticket.movie_id,
                generation = ticket.generation,
                current = self.generation,
                "Discarding stale fetch result"
            );
            return false;
        }
        self.pending = None;
        self.state = state;
        true
    }

    /// Fetch future for `ticket`, detached from the screen so it can be
    /// spawned.
    pub fn fetch_task(
        &self,
        ticket: FetchTicket,
    ) -> impl Future<Output = (FetchTicket, FetchState<MovieDetail>)> + Send + 'static
    where
        C: 'static,
    {
        let fetcher = Arc::clone(&self.fetcher);
        async move {
            let state = fetcher.fetch(&ticket.movie_id).await;
            (ticket, state)
        }
    }

    /// `view` followed by the fetch and its completion.
    pub async fn open(&mut self, id: impl Into<String>) -> &FetchState<MovieDetail> {
        if let Some(ticket) = self.view(id) {
            let state = self.fetcher.fetch(&ticket.movie_id).await;
            self.complete(ticket, state);
        }
        &self.state
    }

    /// Unmount the screen. Pending fetches will be discarded.
    pub fn close(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.movie_id.clear();
        self.state = FetchState::Idle;
        self.confirmation_visible = false;
    }

    /// Mark the current movie as favorite.
    ///
    /// Only a successfully loaded detail is ever added. Repeated presses after
    /// the first add change nothing and do not show the confirmation again.
    pub fn on_add_favorite(&mut self) -> AddOutcome {
        let detail = match &self.state {
            FetchState::Success(detail) if detail.id == self.movie_id => detail,
            _ => {
                tracing::debug!(movie_id = %self.movie_id, "Add to favorites ignored, detail not loaded");
                return AddOutcome::Unavailable;
            }
        };

        if self.favorites.contains(&self.movie_id) || !self.favorites.add(detail.clone()) {
            return AddOutcome::AlreadyFavorite;
        }
        self.confirmation_visible = true;
        AddOutcome::Added
    }

    /// Re-derived from the store on every call, so adds made through other
    /// screens show up immediately.
    pub fn is_favorite(&self) -> bool {
        !self.movie_id.is_empty() && self.favorites.contains(&self.movie_id)
    }

    pub fn confirmation_visible(&self) -> bool {
        self.confirmation_visible
    }

    pub fn confirmation_message(&self) -> Option<&'static str> {
        self.confirmation_visible.then_some(CONFIRMATION_MESSAGE)
    }

    pub fn dismiss_confirmation(&mut self) {
        self.confirmation_visible = false;
    }

    pub fn movie_id(&self) -> &str {
        &self.movie_id
    }

    pub fn fetch_state(&self) -> &FetchState<MovieDetail> {
        &self.state
    }

    /// Loaded detail, or the placeholder while loading or after a failure.
    pub fn detail(&self) -> &MovieDetail {
        self.state.current()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Read-only failure text, if the fetch failed.
    pub fn status_message(&self) -> Option<String> {
        self.state.error().map(|e| e.status_text())
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        ScreenSnapshot {
            movie_id: self.movie_id.clone(),
            detail: self.detail().clone(),
            loading: self.is_loading(),
            is_favorite: self.is_favorite(),
            confirmation_visible: self.confirmation_visible,
            error: self.status_message(),
        }
    }
}
