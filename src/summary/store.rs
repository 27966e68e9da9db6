use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Bounded map of jobs that expire a fixed time after insertion.
///
/// Expired entries are purged on every access. Inserting into a full store
/// evicts the oldest entry first.
pub struct JobStore<V> {
    entries: HashMap<Uuid, Entry<V>>,
    capacity: usize,
    ttl: Duration,
}

impl<V: Clone> JobStore<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn insert(&mut self, id: Uuid, value: V) {
        self.insert_at(id, value, Instant::now());
    }

    pub fn get(&mut self, id: &Uuid) -> Option<V> {
        self.get_at(id, Instant::now())
    }

    /// Apply `f` to a live entry. Returns false if the entry is gone.
    pub fn update(&mut self, id: &Uuid, f: impl FnOnce(&mut V)) -> bool {
        self.purge_expired(Instant::now());
        match self.entries.get_mut(id) {
            Some(entry) => {
                f(&mut entry.value);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_at(&mut self, id: Uuid, value: V, now: Instant) {
        self.purge_expired(now);
        while self.entries.len() >= self.capacity && !self.entries.contains_key(&id) {
            if !self.evict_oldest() {
                break;
            }
        }
        self.entries.insert(
            id,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    fn get_at(&mut self, id: &Uuid, now: Instant) -> Option<V> {
        self.purge_expired(now);
        self.entries.get(id).map(|e| e.value.clone())
    }

    fn purge_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.inserted_at) < ttl);
    }

    fn evict_oldest(&mut self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.inserted_at)
            .map(|(id, _)| *id);
        match oldest {
            Some(id) => {
                tracing::debug!("Job store full, evicting {id}");
                self.entries.remove(&id);
                true
            }
            None => false,
        }
    }
}
