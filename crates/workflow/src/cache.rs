//! Explicit record cache owned by the workflow controller.
//!
//! Entries expire after a fixed TTL and the cache holds at most
//! `capacity` records, evicting the oldest insertion when full. The cache
//! is plain owned state passed by handle; nothing module-level.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use medanon_core::{DbId, ReviewRecord};

#[derive(Debug)]
struct CacheEntry {
    record: ReviewRecord,
    inserted_at: Instant,
}

/// TTL + capacity bounded cache of recently fetched records.
#[derive(Debug)]
pub struct RecordCache {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<DbId, CacheEntry>,
}

impl RecordCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: HashMap::new(),
        }
    }

    /// Insert a record, evicting expired entries first and then the
    /// oldest insertion if still at capacity.
    pub fn insert(&mut self, record: ReviewRecord) {
        self.evict_expired();
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&record.id) {
            if let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(id, _)| *id)
            {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(
            record.id,
            CacheEntry {
                record,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Look a record up, dropping it if its TTL has passed.
    pub fn get(&mut self, id: DbId) -> Option<&ReviewRecord> {
        let expired = self
            .entries
            .get(&id)
            .is_some_and(|e| e.inserted_at.elapsed() > self.ttl);
        if expired {
            self.entries.remove(&id);
        }
        self.entries.get(&id).map(|e| &e.record)
    }

    pub fn remove(&mut self, id: DbId) {
        self.entries.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, e| e.inserted_at.elapsed() <= ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medanon_core::MediaKind;

    fn record(id: DbId) -> ReviewRecord {
        ReviewRecord::new(id, MediaKind::Document)
    }

    #[test]
    fn insert_then_get() {
        let mut cache = RecordCache::new(Duration::from_secs(60), 4);
        cache.insert(record(1));
        assert_eq!(cache.get(1).map(|r| r.id), Some(1));
        assert_eq!(cache.get(2), None);
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let mut cache = RecordCache::new(Duration::ZERO, 4);
        cache.insert(record(1));
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(cache.get(1), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_evicts_oldest_insertion() {
        let mut cache = RecordCache::new(Duration::from_secs(60), 2);
        cache.insert(record(1));
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(record(2));
        std::thread::sleep(Duration::from_millis(2));
        cache.insert(record(3));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(1), None);
        assert!(cache.get(2).is_some());
        assert!(cache.get(3).is_some());
    }

    #[test]
    fn reinsert_does_not_evict_at_capacity() {
        let mut cache = RecordCache::new(Duration::from_secs(60), 2);
        cache.insert(record(1));
        cache.insert(record(2));
        cache.insert(record(2));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(1).is_some());
    }

    #[test]
    fn remove_is_explicit() {
        let mut cache = RecordCache::new(Duration::from_secs(60), 4);
        cache.insert(record(1));
        cache.remove(1);
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_caches_nothing() {
        let mut cache = RecordCache::new(Duration::from_secs(60), 0);
        cache.insert(record(1));
        assert!(cache.is_empty());
    }
}
