//! Banner selection engine.
//!
//! Computes the authoritative, placement-resolved banner list for a page
//! and owns the cache key scheme plus the invalidation hook every
//! mutation path must call.

use std::sync::Arc;

use marquee_common::AppResult;
use marquee_db::repositories::BannerRepository;
use tracing::{debug, info, warn};

use crate::banner::ResolvedBanner;
use crate::cache::{self, BannerCache};
use crate::clock::Clock;
use crate::page::PageRef;
use crate::placement::resolve_placements;
use crate::status::{BannerStatus, resolve_status};
use crate::targeting::matches_page;

/// Default TTL for cached page lists: 1 hour.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 3600;

/// Service computing the banners to display for a page.
#[derive(Clone)]
pub struct SelectionEngine {
    banner_repo: BannerRepository,
    cache: Arc<dyn BannerCache>,
    clock: Arc<dyn Clock>,
    cache_ttl_secs: i64,
}

impl SelectionEngine {
    /// Create a new selection engine with the default cache TTL.
    pub fn new(
        banner_repo: BannerRepository,
        cache: Arc<dyn BannerCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            banner_repo,
            cache,
            clock,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }

    /// Override the cache TTL.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl_secs: i64) -> Self {
        self.cache_ttl_secs = ttl_secs;
        self
    }

    /// The ordered, deduplicated, schedule-filtered banner list for a page.
    ///
    /// Served from cache when possible. A cache hit is returned verbatim:
    /// the stored list is already fully resolved. On a miss the list is a
    /// pure function of repository state and the injected clock, so
    /// concurrent recomputation is harmless and the cache write is
    /// last-writer-wins.
    ///
    /// Repository failures propagate (the page renders zero banners);
    /// cache failures degrade to uncached operation.
    pub async fn get_active_banners(&self, page: PageRef) -> AppResult<Vec<ResolvedBanner>> {
        let key = cache::active_page_key(page);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => match serde_json::from_str::<Vec<ResolvedBanner>>(&cached) {
                Ok(banners) => {
                    debug!(page = %page, count = banners.len(), "Banner cache hit");
                    return Ok(banners);
                }
                Err(e) => {
                    warn!(page = %page, error = %e, "Discarding undecodable banner cache entry");
                }
            },
            Ok(None) => debug!(page = %page, "Banner cache miss"),
            Err(e) => warn!(page = %page, error = %e, "Banner cache read failed, recomputing"),
        }

        let now = self.clock.now();
        let published = self.banner_repo.find_published().await?;

        // Newest-first order from the repository carries through filtering
        // into the placement resolver, where it decides slot winners.
        let eligible: Vec<ResolvedBanner> = published
            .iter()
            .filter(|model| matches_page(model, page))
            .filter(|model| resolve_status(model, now) == BannerStatus::Active)
            .map(ResolvedBanner::from_model)
            .collect();

        let banners = resolve_placements(eligible);

        // The cache write happens only once the full list is resolved, so
        // an abandoned request never leaves a partial entry behind.
        match serde_json::to_string(&banners) {
            Ok(payload) => {
                if let Err(e) = self.cache.set(&key, &payload, self.cache_ttl_secs).await {
                    warn!(page = %page, error = %e, "Banner cache write failed");
                }
            }
            Err(e) => warn!(page = %page, error = %e, "Failed to serialize banner list"),
        }

        Ok(banners)
    }

    /// Invalidate every page-scoped cache entry.
    ///
    /// Called by every mutation path (create, update, delete, publish
    /// changes, bulk actions, purge) after the write commits and before
    /// the mutation response completes. Targeting may have changed, so
    /// there is no per-page invalidation — correctness over hit rate.
    pub async fn invalidate_all(&self) -> AppResult<()> {
        let removed = self
            .cache
            .delete_by_prefix(&cache::namespace_prefix())
            .await?;

        info!(entries = removed, "Invalidated banner caches");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::Placement;
    use crate::cache::{CacheError, MemoryCache};
    use crate::clock::FixedClock;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use marquee_db::entities::banner::{
        self, PlacementKind, PublishState, SideMode, TargetingMode,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).single().unwrap()
    }

    fn published(id: &str, created_secs: i64) -> banner::Model {
        banner::Model {
            id: id.to_string(),
            title: id.to_string(),
            publish_state: PublishState::Published,
            content: "content".to_string(),
            cta_text: None,
            cta_url: None,
            cta_new_tab: false,
            placement: PlacementKind::TopBar,
            floating_corner: None,
            side_mode: None,
            modal_delay_secs: None,
            targeting_mode: TargetingMode::AllPages,
            target_pages: serde_json::json!([]),
            starts_at: None,
            ends_at: None,
            is_recurring: false,
            recurring_year: None,
            is_dismissible: true,
            bg_color: None,
            text_color: None,
            cta_bg_color: None,
            cta_text_color: None,
            animation: None,
            created_at: Utc.timestamp_opt(created_secs, 0).single().unwrap(),
            updated_at: None,
        }
    }

    fn engine_with(
        rows: Vec<Vec<banner::Model>>,
        cache: Arc<MemoryCache>,
    ) -> SelectionEngine {
        let mut db = MockDatabase::new(DatabaseBackend::Postgres);
        for result in rows {
            db = db.append_query_results([result]);
        }
        let repo = BannerRepository::new(Arc::new(db.into_connection()));

        SelectionEngine::new(repo, cache, Arc::new(FixedClock(now())))
    }

    #[tokio::test]
    async fn test_repeat_calls_are_idempotent() {
        let cache = Arc::new(MemoryCache::new());
        // Only one repository result is queued: the second call must be
        // served from cache or it would error.
        let engine = engine_with(vec![vec![published("bn1", 100)]], cache);

        let first = engine.get_active_banners(PageRef::Page(7)).await.unwrap();
        let second = engine.get_active_banners(PageRef::Page(7)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "bn1");
    }

    #[tokio::test]
    async fn test_newest_wins_for_shared_slot() {
        let cache = Arc::new(MemoryCache::new());
        // Repository order is newest-first: bn3 created at T3 > T2 > T1.
        let engine = engine_with(
            vec![vec![
                published("bn3", 300),
                published("bn2", 200),
                published("bn1", 100),
            ]],
            cache,
        );

        let banners = engine.get_active_banners(PageRef::Page(1)).await.unwrap();

        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].id, "bn3");
        assert_eq!(banners[0].placement, Placement::TopBar);
    }

    #[tokio::test]
    async fn test_draft_rows_are_excluded() {
        let cache = Arc::new(MemoryCache::new());
        let mut draft = published("draft", 200);
        draft.publish_state = PublishState::Draft;

        let engine = engine_with(vec![vec![draft, published("live", 100)]], cache);

        let banners = engine.get_active_banners(PageRef::Page(1)).await.unwrap();

        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].id, "live");
    }

    #[tokio::test]
    async fn test_schedule_filters_out_of_window_banners() {
        let cache = Arc::new(MemoryCache::new());

        let mut scheduled = published("future", 400);
        scheduled.starts_at = Some(now() + chrono::Duration::hours(1));

        let mut expired = published("past", 300);
        expired.ends_at = Some(now() - chrono::Duration::hours(1));

        let mut at_boundary = published("boundary", 200);
        at_boundary.starts_at = Some(now());
        at_boundary.ends_at = Some(now());

        let engine = engine_with(vec![vec![scheduled, expired, at_boundary]], cache);

        let banners = engine.get_active_banners(PageRef::Page(1)).await.unwrap();

        // Both schedule bounds are inclusive: only the boundary banner shows.
        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].id, "boundary");
    }

    #[tokio::test]
    async fn test_specific_pages_targeting() {
        let cache = Arc::new(MemoryCache::new());

        let mut targeted = published("targeted", 100);
        targeted.targeting_mode = TargetingMode::SpecificPages;
        targeted.target_pages = serde_json::json!([42]);

        // One repository result per page lookup.
        let engine = engine_with(
            vec![vec![targeted.clone()], vec![targeted]],
            cache,
        );

        let on_42 = engine.get_active_banners(PageRef::Page(42)).await.unwrap();
        let on_7 = engine.get_active_banners(PageRef::Page(7)).await.unwrap();

        assert_eq!(on_42.len(), 1);
        assert!(on_7.is_empty());
    }

    #[tokio::test]
    async fn test_side_both_appears_once_in_output() {
        let cache = Arc::new(MemoryCache::new());

        let mut both = published("both", 200);
        both.placement = PlacementKind::Side;
        both.side_mode = Some(SideMode::Both);

        let engine = engine_with(vec![vec![both, published("top", 100)]], cache);

        let banners = engine.get_active_banners(PageRef::Page(1)).await.unwrap();

        // The side/both banner is listed once; expansion into two render
        // instances happens in the render adapter, after selection.
        assert_eq!(banners.len(), 2);
        assert_eq!(banners[0].id, "both");
        assert_eq!(banners[1].id, "top");
    }

    #[tokio::test]
    async fn test_mutation_invalidation_forces_recompute() {
        let cache = Arc::new(MemoryCache::new());
        let engine = engine_with(
            vec![
                vec![published("old", 100)],
                vec![published("new", 200)],
            ],
            Arc::clone(&cache),
        );

        let before = engine.get_active_banners(PageRef::Page(1)).await.unwrap();
        assert_eq!(before[0].id, "old");

        engine.invalidate_all().await.unwrap();
        assert!(cache.is_empty());

        let after = engine.get_active_banners(PageRef::Page(1)).await.unwrap();
        assert_eq!(after[0].id, "new");
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let cache = Arc::new(MemoryCache::new());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([sea_orm::DbErr::Custom("connection lost".to_string())]);
        let repo = BannerRepository::new(Arc::new(db.into_connection()));
        let engine = SelectionEngine::new(repo, cache, Arc::new(FixedClock(now())));

        let result = engine.get_active_banners(PageRef::Page(1)).await;

        assert!(result.is_err());
    }

    struct FailingCache;

    #[async_trait]
    impl BannerCache for FailingCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Redis("down".to_string()))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: i64) -> Result<(), CacheError> {
            Err(CacheError::Redis("down".to_string()))
        }

        async fn delete_by_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
            Err(CacheError::Redis("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_cache_failure_degrades_to_recompute() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[published("bn1", 100)]]);
        let repo = BannerRepository::new(Arc::new(db.into_connection()));
        let engine =
            SelectionEngine::new(repo, Arc::new(FailingCache), Arc::new(FixedClock(now())));

        let banners = engine.get_active_banners(PageRef::Page(1)).await.unwrap();

        assert_eq!(banners.len(), 1);
    }

    #[tokio::test]
    async fn test_invalidation_failure_surfaces() {
        let db = MockDatabase::new(DatabaseBackend::Postgres);
        let repo = BannerRepository::new(Arc::new(db.into_connection()));
        let engine =
            SelectionEngine::new(repo, Arc::new(FailingCache), Arc::new(FixedClock(now())));

        assert!(engine.invalidate_all().await.is_err());
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_recomputed() {
        let cache = Arc::new(MemoryCache::new());
        cache
            .set(&cache::active_page_key(PageRef::Page(1)), "not json", 60)
            .await
            .unwrap();

        let engine = engine_with(vec![vec![published("bn1", 100)]], Arc::clone(&cache));

        let banners = engine.get_active_banners(PageRef::Page(1)).await.unwrap();

        assert_eq!(banners.len(), 1);
        assert_eq!(banners[0].id, "bn1");
    }
}
