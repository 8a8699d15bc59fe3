use std::collections::HashMap;
use std::hash::Hash;

/// Fixed-capacity memo cache for per-word lookup results.
///
/// When the map reaches capacity the next insert of a new key clears the
/// whole map instead of evicting entries one at a time. The correction
/// indices only ever see a working set of recently typed words, so a full
/// clear keeps the hit rate acceptable without any bookkeeping.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    map: HashMap<K, V>,
    capacity: usize,
}

impl<K: Eq + Hash, V> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "cache capacity must be non-zero");
        Self {
            map: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            self.map.clear();
        }
        self.map.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss() {
        let mut cache = BoundedCache::new(4);
        cache.insert("teh", 1);
        assert_eq!(cache.get(&"teh"), Some(&1));
        assert_eq!(cache.get(&"the"), None);
    }

    #[test]
    fn test_full_clear_at_capacity() {
        let mut cache = BoundedCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert_eq!(cache.len(), 3);

        // Inserting a fourth key wipes everything, then stores the new entry.
        cache.insert("d", 4);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"d"), Some(&4));
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn test_overwrite_existing_key_does_not_clear() {
        let mut cache = BoundedCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(&10));
        assert_eq!(cache.get(&"b"), Some(&2));
    }
}
