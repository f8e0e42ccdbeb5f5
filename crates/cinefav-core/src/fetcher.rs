use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::OnceCell;

use crate::catalog::{FetchError, MovieCatalog};
use crate::models::MovieDetail;

static PLACEHOLDER: LazyLock<MovieDetail> = LazyLock::new(MovieDetail::placeholder);

/// Lifecycle of a single remote lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading,
    Success(T),
    Failure(FetchError),
}

impl<T> FetchState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Success or failure; no further transition without a refetch.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failure(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failure(error) => Some(error),
            _ => None,
        }
    }
}

impl<T> From<Result<T, FetchError>> for FetchState<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl FetchState<MovieDetail> {
    /// The record to display: the loaded detail, or the placeholder in every
    /// other state.
    pub fn current(&self) -> &MovieDetail {
        self.value().unwrap_or(&PLACEHOLDER)
    }
}

/// Fetch counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchStats {
    pub remote_calls: u64,
    pub cache_hits: u64,
}

type Slot = Arc<OnceCell<Result<MovieDetail, FetchError>>>;
type SlotMap = Mutex<HashMap<String, Slot>>;

/// Cached, re-entrant movie detail lookups keyed by id.
///
/// The first request for an id issues one catalog call; requests that arrive
/// while it is in flight wait for the same result, and later requests are
/// served from the cache. Failures are cached too and only a
/// [`refetch`](Self::refetch) goes back to the catalog.
pub struct DetailFetcher<C> {
    catalog: C,
    slots: SlotMap,
    remote_calls: AtomicU64,
    cache_hits: AtomicU64,
}

impl<C: MovieCatalog> DetailFetcher<C> {
    pub fn new(catalog: C) -> Self {
        Self {
            catalog,
            slots: Mutex::new(HashMap::new()),
            remote_calls: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Fetch the detail for `id`, going to the catalog only on a cache miss.
    ///
    /// An empty id is never sent to the catalog and yields `Idle`.
    #[tracing::instrument(name = "fetch_detail", skip(self), fields(movie_id = %id))]
    pub async fn fetch(&self, id: &str) -> FetchState<MovieDetail> {
        if id.is_empty() {
            tracing::warn!("Refusing to fetch detail for an empty id");
            return FetchState::Idle;
        }

        let slot = self.slot(id);
        if let Some(result) = slot.get() {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Detail cache hit");
            return result.clone().into();
        }

        let guard = PendingSlot {
            slots: &self.slots,
            id,
            slot,
        };
        let mut issued = false;
        let result = guard
            .slot
            .get_or_init(|| {
                issued = true;
                self.lookup(id)
            })
            .await;

        if issued {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Detail fetch failed");
            }
        } else {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Joined in-flight detail fetch");
        }
        result.clone().into()
    }

    /// Forget any cached outcome for `id` and fetch it again.
    pub async fn refetch(&self, id: &str) -> FetchState<MovieDetail> {
        self.invalidate(id);
        self.fetch(id).await
    }

    /// Forget any cached outcome for `id`. Callers already waiting on an
    /// in-flight lookup still receive its result.
    pub fn invalidate(&self, id: &str) {
        if self.lock_slots().remove(id).is_some() {
            tracing::debug!(movie_id = %id, "Detail cache entry invalidated");
        }
    }

    /// Current state for `id` without triggering a lookup.
    pub fn state(&self, id: &str) -> FetchState<MovieDetail> {
        match self.lock_slots().get(id) {
            None => FetchState::Idle,
            Some(slot) => match slot.get() {
                Some(result) => result.clone().into(),
                None => FetchState::Loading,
            },
        }
    }

    pub fn stats(&self) -> FetchStats {
        FetchStats {
            remote_calls: self.remote_calls.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }

    fn slot(&self, id: &str) -> Slot {
        Arc::clone(
            self.lock_slots()
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn lookup(&self, id: &str) -> Result<MovieDetail, FetchError> {
        self.remote_calls.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Detail cache miss, querying catalog");

        let result: Result<MovieDetail, FetchError> =
            self.catalog.get_movie_detail(id).await.map_err(Into::into);
        let detail = result?;

        // Also rejects an empty id, so a placeholder can never be a success.
        if detail.id != id {
            return Err(FetchError::Protocol(format!(
                "requested movie {id}, catalog returned {:?}",
                detail.id
            )));
        }
        Ok(detail)
    }
}

/// Removes a slot whose lookup was abandoned before completing, so `state()`
/// does not report a lookup nobody is running. Slots still shared with other
/// waiters are left alone.
struct PendingSlot<'a> {
    slots: &'a SlotMap,
    id: &'a str,
    slot: Slot,
}

impl Drop for PendingSlot<'_> {
    fn drop(&mut self) {
        if self.slot.initialized() {
            return;
        }
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        let abandoned = slots
            .get(self.id)
            .is_some_and(|s| Arc::ptr_eq(s, &self.slot) && Arc::strong_count(s) == 2);
        if abandoned {
            slots.remove(self.id);
        }
    }
}
