//! Query result caching with LRU eviction
//!
//! The store never changes after loading, so the filtered match positions
//! for a `(collection, search)` pair stay valid for the process lifetime.
//! Pagination is applied on top of the cached positions.

use crate::models::Hadith;
use crate::store::{paginate, HadithQuery, HadithStore};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Default query cache capacity (number of distinct filters)
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct QueryKey {
    pub collection_id: Option<String>,
    pub search: Option<String>,
}

impl QueryKey {
    pub fn from_query(query: &HadithQuery) -> Self {
        Self {
            collection_id: query.collection_filter().map(str::to_string),
            search: query.search_filter().map(str::to_string),
        }
    }
}

pub struct CachedStore {
    store: Arc<HadithStore>,
    cache: Mutex<LruCache<QueryKey, Arc<Vec<usize>>>>,
}

impl CachedStore {
    pub fn new(store: Arc<HadithStore>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            store,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn store(&self) -> &HadithStore {
        &self.store
    }

    fn positions(&self, key: QueryKey) -> Arc<Vec<usize>> {
        {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(positions) = cache.get(&key) {
                return Arc::clone(positions);
            }
        }

        let positions = Arc::new(
            self.store
                .matching_positions(key.collection_id.as_deref(), key.search.as_deref()),
        );
        {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            cache.put(key, Arc::clone(&positions));
        }
        positions
    }

    pub fn list(&self, query: &HadithQuery) -> Vec<Hadith> {
        let positions = self.positions(QueryKey::from_query(query));
        paginate(&positions, query.offset, query.limit)
            .iter()
            .filter_map(|&pos| self.store.at(pos).cloned())
            .collect()
    }

    pub fn search(&self, term: &str, collection_id: Option<&str>) -> Vec<Hadith> {
        self.list(&HadithQuery::search(term, collection_id))
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// `(cached filters, capacity)`
    pub fn stats(&self) -> (usize, usize) {
        let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        (cache.len(), cache.cap().get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::sample_store;

    #[test]
    fn test_cached_matches_uncached() {
        let store = Arc::new(sample_store());
        let cached = CachedStore::new(Arc::clone(&store), 8);

        let queries = [
            HadithQuery::default(),
            HadithQuery::search("faith", None),
            HadithQuery::search("faith", Some("muslim")),
            HadithQuery {
                offset: Some(1),
                limit: Some(2),
                ..Default::default()
            },
        ];
        for query in &queries {
            let expected: Vec<Hadith> = store.list(query).into_iter().cloned().collect();
            assert_eq!(cached.list(query), expected);
            // second call is served from the cache
            assert_eq!(cached.list(query), expected);
        }
    }

    #[test]
    fn test_pages_share_one_entry() {
        let cached = CachedStore::new(Arc::new(sample_store()), 8);
        for offset in 0..3 {
            cached.list(&HadithQuery {
                offset: Some(offset),
                limit: Some(1),
                ..Default::default()
            });
        }
        assert_eq!(cached.stats(), (1, 8));
    }

    #[test]
    fn test_eviction_and_clear() {
        let cached = CachedStore::new(Arc::new(sample_store()), 2);
        cached.search("faith", None);
        cached.search("prayer", None);
        cached.search("worship", None);
        assert_eq!(cached.stats(), (2, 2));

        cached.clear();
        assert_eq!(cached.stats().0, 0);
        assert_eq!(cached.search("worship", None).len(), 1);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_one() {
        let cached = CachedStore::new(Arc::new(sample_store()), 0);
        assert_eq!(cached.stats().1, 1);
    }
}
