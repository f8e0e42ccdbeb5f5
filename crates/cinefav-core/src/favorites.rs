use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::models::MovieDetail;

/// A movie in the favorites collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteEntry {
    pub detail: MovieDetail,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Favorites {
    entries: Vec<FavoriteEntry>,
    ids: HashSet<String>,
}

#[derive(Debug)]
struct Shared {
    favorites: Mutex<Favorites>,
    revision: watch::Sender<u64>,
}

/// Process-wide favorites collection, unique by movie id and kept in
/// insertion order.
///
/// Cloning yields another handle to the same collection. The id check and
/// the insert happen under one lock, so concurrent adds of the same movie
/// produce a single entry.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    shared: Arc<Shared>,
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FavoritesStore {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                favorites: Mutex::new(Favorites::default()),
                revision: watch::Sender::new(0),
            }),
        }
    }

    /// Add a movie. Returns `false` without touching the collection if the id
    /// is already present or the detail is the placeholder.
    pub fn add(&self, detail: MovieDetail) -> bool {
        if detail.is_placeholder() {
            tracing::warn!("Ignoring attempt to favorite the placeholder detail");
            return false;
        }

        {
            let mut favorites = self.lock();
            if !favorites.ids.insert(detail.id.clone()) {
                tracing::debug!(movie_id = %detail.id, "Movie already in favorites");
                return false;
            }
            tracing::info!(movie_id = %detail.id, title = %detail.title, "Added movie to favorites");
            favorites.entries.push(FavoriteEntry {
                detail,
                added_at: Utc::now(),
            });
        }

        self.shared.revision.send_modify(|rev| *rev += 1);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().ids.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<FavoriteEntry> {
        self.lock()
            .entries
            .iter()
            .find(|e| e.detail.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All favorites, oldest first.
    pub fn snapshot(&self) -> Vec<FavoriteEntry> {
        self.lock().entries.clone()
    }

    /// Number of successful adds so far.
    pub fn revision(&self) -> u64 {
        *self.shared.revision.borrow()
    }

    /// Receiver that is marked changed after every successful add.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Favorites> {
        self.shared
            .favorites
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}
