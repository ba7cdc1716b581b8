//! Session memo cache for items.
//!
//! Entries are never evicted or refreshed. Stored entities live in a map behind a
//! read-write lock, so hits and [`EntityCache::peek`] only ever take a read lock.
//! A miss goes through the in-flight map: the first caller for an id becomes the
//! leader and runs the fetch, later callers for that id wait on the same flight
//! and receive its outcome, success or error alike. Once the flight lands it is
//! removed, so a failed id is fetched again by the next caller that arrives
//! afterwards. Callers for other ids are not held up.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock};
use tracing::trace;

use crate::error::FetchError;
use crate::models::{Comment, ItemId, Story};

type Outcome<T, E> = Result<Arc<T>, E>;

enum FlightState<T, E> {
    Pending,
    Landed(Outcome<T, E>),
    /// The leader unwound before producing an outcome.
    Abandoned,
}

struct Flight<T, E> {
    state: Mutex<FlightState<T, E>>,
    landed: Condvar,
}

impl<T, E: Clone> Flight<T, E> {
    fn new() -> Self {
        Self {
            state: Mutex::new(FlightState::Pending),
            landed: Condvar::new(),
        }
    }

    fn finish(&self, state: FlightState<T, E>) {
        let mut current = self.state.lock();
        if matches!(*current, FlightState::Pending) {
            *current = state;
            self.landed.notify_all();
        }
    }

    /// Block until the leader finishes. `None` means the flight was abandoned.
    fn wait(&self) -> Option<Outcome<T, E>> {
        let mut state = self.state.lock();
        while matches!(*state, FlightState::Pending) {
            self.landed.wait(&mut state);
        }
        match &*state {
            FlightState::Landed(outcome) => Some(outcome.clone()),
            _ => None,
        }
    }
}

// Clears the in-flight entry when the leader is done, even if `fetch` panics.
struct Leader<'a, T, E: Clone> {
    cache: &'a EntityCache<T, E>,
    id: ItemId,
    flight: Arc<Flight<T, E>>,
}

impl<T, E: Clone> Drop for Leader<'_, T, E> {
    fn drop(&mut self) {
        self.flight.finish(FlightState::Abandoned);
        self.cache.inflight.lock().remove(&self.id);
    }
}

pub struct EntityCache<T, E = FetchError> {
    entries: RwLock<HashMap<ItemId, Arc<T>>>,
    inflight: Mutex<HashMap<ItemId, Arc<Flight<T, E>>>>,
}

impl<T, E> Default for EntityCache<T, E> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
        }
    }
}

impl<T, E: Clone> EntityCache<T, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached entity for `id`, fetching and storing it on a miss.
    ///
    /// Concurrent callers for the same uncached id share a single call to
    /// `fetch` and all receive its outcome. Errors are handed to those waiters
    /// but never stored.
    pub fn get_or_fetch(
        &self,
        id: ItemId,
        fetch: impl FnOnce(ItemId) -> Result<T, E>,
    ) -> Outcome<T, E> {
        loop {
            if let Some(entity) = self.peek(id) {
                trace!(id, "cache hit");
                return Ok(entity);
            }

            let (flight, leading) = {
                let mut inflight = self.inflight.lock();
                // A leader stores its entity before clearing its flight, so this
                // second look cannot miss a fetch that just landed.
                if let Some(entity) = self.peek(id) {
                    trace!(id, "cache hit");
                    return Ok(entity);
                }
                match inflight.get(&id) {
                    Some(flight) => (Arc::clone(flight), false),
                    None => {
                        let flight = Arc::new(Flight::new());
                        inflight.insert(id, Arc::clone(&flight));
                        (flight, true)
                    }
                }
            };

            if leading {
                let leader = Leader {
                    cache: self,
                    id,
                    flight,
                };
                let outcome = fetch(id).map(Arc::new);
                if let Ok(entity) = &outcome {
                    self.entries.write().insert(id, Arc::clone(entity));
                }
                leader.flight.finish(FlightState::Landed(outcome.clone()));
                drop(leader);
                return outcome;
            }

            trace!(id, "waiting on in-flight fetch");
            if let Some(outcome) = flight.wait() {
                return outcome;
            }
        }
    }

    /// Look without fetching. Does not wait for an in-flight fetch.
    pub fn peek(&self, id: ItemId) -> Option<Arc<T>> {
        self.entries.read().get(&id).cloned()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.read().contains_key(&id)
    }

    /// Number of ids holding a stored entity.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The two item maps a client session reads through.
#[derive(Default)]
pub struct ItemCache {
    pub stories: EntityCache<Story>,
    pub comments: EntityCache<Comment>,
}

impl ItemCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}
