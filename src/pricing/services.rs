//! Archive, listing and delete operations over the record store.
//!
//! Calculations are archived exactly as the caller supplies them; nothing is
//! recomputed. Listings upgrade older documents, skip anything that still
//! fails validation, and are cached until the next write.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{AppCache, CachedListing};

use super::models::StoredCalculation;
use super::store::{RecordStore, StoreError};

/// Effective listing size: positive requests are capped at `max`, anything
/// else gets `max`.
pub fn listing_limit(requested: Option<i64>, max: i64) -> i64 {
    requested
        .filter(|limit| *limit > 0)
        .map(|limit| limit.min(max))
        .unwrap_or(max)
}

/// Archive a calculation unchanged, returning the stored record.
pub async fn archive<T: CachedListing>(
    store: &dyn RecordStore,
    cache: &AppCache,
    mut calculation: T,
) -> Result<T, StoreError> {
    calculation.prepare_for_archive();
    let document = serde_json::to_value(&calculation)?;

    let id = store
        .archive(
            T::COLLECTION,
            calculation.id(),
            calculation.recorded_at(),
            document,
        )
        .await?;

    cache.invalidate(T::COLLECTION);
    info!("Archived calculation {} in {}", id, T::COLLECTION.as_str());

    Ok(calculation)
}

/// Most recent valid calculations, newest first.
pub async fn list_recent<T: CachedListing>(
    store: &dyn RecordStore,
    cache: &AppCache,
    limit: i64,
) -> Result<Arc<Vec<T>>, StoreError> {
    let listings = T::listings(cache);

    if let Some(cached) = listings.get(&limit).await {
        debug!("Cache HIT for {} listing", T::COLLECTION.as_str());
        return Ok(cached);
    }
    debug!("Cache MISS for {} listing", T::COLLECTION.as_str());

    let documents = store.list_recent(T::COLLECTION, limit).await?;
    let records = Arc::new(validate_documents::<T>(documents));

    listings.insert(limit, records.clone()).await;
    Ok(records)
}

/// Delete calculations by id, returning how many were removed.
pub async fn delete<T: CachedListing>(
    store: &dyn RecordStore,
    cache: &AppCache,
    ids: &[String],
) -> Result<u64, StoreError> {
    let deleted = store.delete_by_ids(T::COLLECTION, ids).await?;

    cache.invalidate(T::COLLECTION);
    info!(
        "Deleted {} of {} requested calculations from {}",
        deleted,
        ids.len(),
        T::COLLECTION.as_str()
    );

    Ok(deleted)
}

/// Upgrade and validate stored documents, skipping invalid ones.
pub fn validate_documents<T: StoredCalculation>(documents: Vec<Value>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|mut document| {
            T::upgrade_document(&mut document);
            match serde_json::from_value::<T>(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping invalid calculation in {}: {}", T::COLLECTION.as_str(), e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::pricing::engine::PricingEngine;
    use crate::pricing::international::InternationalEngine;
    use crate::pricing::models::{Calculation, GroundFixingMethod, UkCalculation};
    use crate::pricing::reference::ReferenceData;
    use crate::pricing::requests::{CalculationRequest, UkCalculationRequest};
    use crate::pricing::store::{Collection, MemoryRecordStore};
    use crate::pricing::uk::UkEngine;

    fn international(meters: Decimal) -> Calculation {
        let reference = ReferenceData::standard();
        InternationalEngine::new(&reference)
            .calculate(&CalculationRequest {
                user_name: "Sam".to_string(),
                project_name: "Doncaster".to_string(),
                country: "United Kingdom".to_string(),
                fence_type: "PR".to_string(),
                meters,
                gates: 4,
                ground_fixing_method: GroundFixingMethod::AngleSteel,
                custom_daily_rate: None,
                manual_daily_labor_rate: None,
            })
            .unwrap()
    }

    fn uk() -> UkCalculation {
        let reference = ReferenceData::standard();
        UkEngine::new(&reference)
            .calculate(&UkCalculationRequest {
                user_name: "Alex".to_string(),
                project_name: "Aintree".to_string(),
                fence_type: "OR".to_string(),
                meters: dec!(100),
                gates: 0,
                is_time_sensitive: false,
                days_available: None,
                num_labourers: None,
                delivery_lead: None,
                delivery_copilot: None,
                custom_daily_rate: None,
            })
            .unwrap()
    }

    #[test]
    fn test_listing_limit() {
        assert_eq!(listing_limit(None, 100), 100);
        assert_eq!(listing_limit(Some(10), 100), 10);
        assert_eq!(listing_limit(Some(500), 100), 100);
        assert_eq!(listing_limit(Some(0), 100), 100);
        assert_eq!(listing_limit(Some(-3), 100), 100);
    }

    #[tokio::test]
    async fn test_archive_then_list_roundtrip() {
        let store = MemoryRecordStore::new();
        let cache = AppCache::default();
        let calc = international(dec!(500));

        let archived = archive(&store, &cache, calc.clone()).await.unwrap();
        assert_eq!(archived, calc);

        let listed = list_recent::<Calculation>(&store, &cache, 100).await.unwrap();
        assert_eq!(listed.as_slice(), &[calc]);
    }

    #[tokio::test]
    async fn test_archive_stores_verbatim() {
        let store = MemoryRecordStore::new();
        let cache = AppCache::default();
        let mut calc = international(dec!(500));
        calc.breakdown.raw_total = dec!(1.23);

        archive(&store, &cache, calc).await.unwrap();

        let listed = list_recent::<Calculation>(&store, &cache, 100).await.unwrap();
        assert_eq!(listed[0].breakdown.raw_total, dec!(1.23));
        assert_eq!(listed[0].breakdown.labor_cost, dec!(6251.52));
    }

    #[tokio::test]
    async fn test_archive_tags_uk_records() {
        let store = MemoryRecordStore::new();
        let cache = AppCache::default();
        let mut calc = uk();
        calc.calculator_type = "something-else".to_string();

        let archived = archive(&store, &cache, calc).await.unwrap();
        assert_eq!(archived.calculator_type, "uk");

        let docs = store.list_recent(Collection::Uk, 10).await.unwrap();
        assert_eq!(docs[0]["calculator_type"], json!("uk"));
    }

    #[tokio::test]
    async fn test_listing_skips_invalid_and_upgrades_legacy() {
        let store = MemoryRecordStore::new();
        let cache = AppCache::default();
        let now = Utc::now();

        let mut legacy = serde_json::to_value(international(dec!(240))).unwrap();
        legacy["breakdown"]
            .as_object_mut()
            .unwrap()
            .remove("daily_rate_per_man");
        legacy.as_object_mut().unwrap().remove("ground_fixing_method");
        store
            .archive(Collection::International, "legacy", now, legacy)
            .await
            .unwrap();

        store
            .archive(
                Collection::International,
                "broken",
                now + Duration::seconds(1),
                json!({"id": "broken", "user_name": "nobody"}),
            )
            .await
            .unwrap();

        let listed = list_recent::<Calculation>(&store, &cache, 100).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].breakdown.daily_rate_per_man, Decimal::ZERO);
        assert_eq!(listed[0].ground_fixing_method, GroundFixingMethod::AngleSteel);
    }

    #[tokio::test]
    async fn test_writes_invalidate_cached_listing() {
        let store = MemoryRecordStore::new();
        let cache = AppCache::default();

        let empty = list_recent::<Calculation>(&store, &cache, 100).await.unwrap();
        assert!(empty.is_empty());

        let calc = international(dec!(100));
        archive(&store, &cache, calc.clone()).await.unwrap();
        let listed = list_recent::<Calculation>(&store, &cache, 100).await.unwrap();
        assert_eq!(listed.len(), 1);

        let deleted = delete::<Calculation>(&store, &cache, &[calc.id.clone()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        let listed = list_recent::<Calculation>(&store, &cache, 100).await.unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_delete_only_touches_own_collection() {
        let store = MemoryRecordStore::new();
        let cache = AppCache::default();
        let calc = uk();

        archive(&store, &cache, calc.clone()).await.unwrap();

        let deleted = delete::<Calculation>(&store, &cache, &[calc.id.clone()])
            .await
            .unwrap();
        assert_eq!(deleted, 0);

        let deleted = delete::<UkCalculation>(&store, &cache, &[calc.id.clone()])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
    }

    #[tokio::test]
    async fn test_listing_respects_limit_and_order() {
        let store = MemoryRecordStore::new();
        let cache = AppCache::default();

        let mut older = international(dec!(100));
        older.timestamp = Utc::now() - Duration::days(1);
        let newer = international(dec!(200));

        archive(&store, &cache, older.clone()).await.unwrap();
        archive(&store, &cache, newer.clone()).await.unwrap();

        let listed = list_recent::<Calculation>(&store, &cache, 100).await.unwrap();
        assert_eq!(listed[0].id, newer.id);
        assert_eq!(listed[1].id, older.id);

        let listed = list_recent::<Calculation>(&store, &cache, 1).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, newer.id);
    }
}
