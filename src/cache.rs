//! In-memory caching using moka
//!
//! Caches validated calculation listings per market. Listings change only
//! when a calculation is archived or deleted, and both writes invalidate the
//! affected market, so the TTL only bounds staleness from other writers
//! sharing the same database.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::pricing::models::{Calculation, StoredCalculation, UkCalculation};
use crate::pricing::store::Collection;

/// Application cache holding recent calculation listings
#[derive(Clone)]
pub struct AppCache {
    /// International listings (limit -> records)
    pub calculations: Cache<i64, Arc<Vec<Calculation>>>,
    /// UK listings (limit -> records)
    pub uk_calculations: Cache<i64, Arc<Vec<UkCalculation>>>,
}

impl AppCache {
    /// Create a new cache instance with the given listing TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            calculations: Cache::builder()
                .max_capacity(16)
                .time_to_live(ttl)
                .build(),

            uk_calculations: Cache::builder()
                .max_capacity(16)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            calculations_size: self.calculations.entry_count(),
            uk_calculations_size: self.uk_calculations.entry_count(),
        }
    }

    /// Drop every cached listing for a collection
    pub fn invalidate(&self, collection: Collection) {
        match collection {
            Collection::International => self.calculations.invalidate_all(),
            Collection::Uk => self.uk_calculations.invalidate_all(),
        }
        info!("Listing cache invalidated for {}", collection.as_str());
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub calculations_size: u64,
    pub uk_calculations_size: u64,
}

/// A record type with a listing cache of its own
pub trait CachedListing: StoredCalculation {
    fn listings(cache: &AppCache) -> &Cache<i64, Arc<Vec<Self>>>;
}

impl CachedListing for Calculation {
    fn listings(cache: &AppCache) -> &Cache<i64, Arc<Vec<Self>>> {
        &cache.calculations
    }
}

impl CachedListing for UkCalculation {
    fn listings(cache: &AppCache) -> &Cache<i64, Arc<Vec<Self>>> {
        &cache.uk_calculations
    }
}
