//! In-flight request registry.
//!
//! While a request for an entity is outstanding its control is disabled: a
//! second request for the same entity is refused rather than queued. Guards
//! release their entity when dropped, including when the owning future is
//! cancelled.
//!
//! Whole-cart replacements instead wait for the registry to drain, see
//! [`InFlight::acquire_exclusive`].

use std::{
    fmt,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use rustc_hash::FxHashSet;
use tokio::sync::Notify;

#[derive(Debug)]
struct Busy<K> {
    keys: FxHashSet<K>,
    exclusive: bool,
}

impl<K> Default for Busy<K> {
    fn default() -> Self {
        Self {
            keys: FxHashSet::default(),
            exclusive: false,
        }
    }
}

struct Shared<K> {
    busy: Mutex<Busy<K>>,
    released: Notify,
}

impl<K> Default for Shared<K> {
    fn default() -> Self {
        Self {
            busy: Mutex::new(Busy::default()),
            released: Notify::new(),
        }
    }
}

/// Tracks which entities have a request in flight.
pub struct InFlight<K> {
    shared: Arc<Shared<K>>,
}

impl<K> Clone for InFlight<K> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<K> Default for InFlight<K> {
    fn default() -> Self {
        Self {
            shared: Arc::default(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for InFlight<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlight")
            .field("busy", &*lock(&self.shared))
            .finish()
    }
}

impl<K: Eq + Hash + Clone> InFlight<K> {
    /// A registry with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` busy, unless it or the whole registry already is.
    pub fn try_acquire(&self, key: K) -> Option<InFlightGuard<K>> {
        let mut busy = lock(&self.shared);

        if busy.exclusive || !busy.keys.insert(key.clone()) {
            return None;
        }

        Some(InFlightGuard {
            shared: Arc::clone(&self.shared),
            key: Some(key),
        })
    }

    /// Mark the whole registry busy. Fails if anything is in flight.
    pub fn try_acquire_exclusive(&self) -> Option<InFlightGuard<K>> {
        let mut busy = lock(&self.shared);

        if busy.exclusive || !busy.keys.is_empty() {
            return None;
        }

        busy.exclusive = true;

        Some(InFlightGuard {
            shared: Arc::clone(&self.shared),
            key: None,
        })
    }

    /// Mark the whole registry busy once everything in flight has finished.
    pub async fn acquire_exclusive(&self) -> InFlightGuard<K> {
        loop {
            // Registered before checking, so a release in between is not lost.
            let released = self.shared.released.notified();

            if let Some(guard) = self.try_acquire_exclusive() {
                return guard;
            }

            released.await;
        }
    }

    /// Whether a request touching `key` is in flight.
    pub fn is_busy(&self, key: &K) -> bool {
        let busy = lock(&self.shared);

        busy.exclusive || busy.keys.contains(key)
    }

    /// Whether nothing is in flight.
    pub fn is_idle(&self) -> bool {
        let busy = lock(&self.shared);

        !busy.exclusive && busy.keys.is_empty()
    }
}

/// Releases its entity on drop.
#[must_use = "the entity is released as soon as the guard is dropped"]
pub struct InFlightGuard<K: Eq + Hash> {
    shared: Arc<Shared<K>>,
    key: Option<K>,
}

impl<K: Eq + Hash + fmt::Debug> fmt::Debug for InFlightGuard<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InFlightGuard")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<K: Eq + Hash> Drop for InFlightGuard<K> {
    fn drop(&mut self) {
        {
            let mut busy = lock(&self.shared);

            match self.key.take() {
                Some(key) => {
                    busy.keys.remove(&key);
                }
                None => busy.exclusive = false,
            }
        }

        self.shared.released.notify_waiters();
    }
}

// A panic while holding the lock cannot leave the set half-updated, so a
// poisoned lock is still usable.
fn lock<K>(shared: &Shared<K>) -> MutexGuard<'_, Busy<K>> {
    shared.busy.lock().unwrap_or_else(PoisonError::into_inner)
}
