//! Banner repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use marquee_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{
    Banner,
    banner::{
        self, Animation, FloatingCorner, PlacementKind, PublishState, SideMode, TargetingMode,
    },
};

/// Fields for a new banner row.
///
/// All defaulting and validation happens in the service layer; the
/// repository persists exactly what it is given. The creation timestamp
/// is passed in rather than read ambiently so callers control time.
#[derive(Debug, Clone)]
pub struct CreateBannerRecord {
    pub id: String,
    pub title: String,
    pub publish_state: PublishState,
    pub content: String,
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    pub cta_new_tab: bool,
    pub placement: PlacementKind,
    pub floating_corner: Option<FloatingCorner>,
    pub side_mode: Option<SideMode>,
    pub modal_delay_secs: Option<i32>,
    pub targeting_mode: TargetingMode,
    pub target_pages: Vec<u64>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub is_recurring: bool,
    pub recurring_year: Option<i32>,
    pub is_dismissible: bool,
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub cta_bg_color: Option<String>,
    pub cta_text_color: Option<String>,
    pub animation: Option<Animation>,
    pub created_at: DateTime<Utc>,
}

/// Partial update for an existing banner row.
///
/// Outer `None` leaves a column untouched; for nullable columns the
/// inner `Option` distinguishes "set to value" from "clear".
#[derive(Debug, Clone, Default)]
pub struct UpdateBannerPatch {
    pub title: Option<String>,
    pub publish_state: Option<PublishState>,
    pub content: Option<String>,
    pub cta_text: Option<Option<String>>,
    pub cta_url: Option<Option<String>>,
    pub cta_new_tab: Option<bool>,
    pub placement: Option<PlacementKind>,
    pub floating_corner: Option<Option<FloatingCorner>>,
    pub side_mode: Option<Option<SideMode>>,
    pub modal_delay_secs: Option<Option<i32>>,
    pub targeting_mode: Option<TargetingMode>,
    pub target_pages: Option<Vec<u64>>,
    pub starts_at: Option<Option<DateTime<Utc>>>,
    pub ends_at: Option<Option<DateTime<Utc>>>,
    pub is_recurring: Option<bool>,
    pub recurring_year: Option<Option<i32>>,
    pub is_dismissible: Option<bool>,
    pub bg_color: Option<Option<String>>,
    pub text_color: Option<Option<String>>,
    pub cta_bg_color: Option<Option<String>>,
    pub cta_text_color: Option<Option<String>>,
    pub animation: Option<Option<Animation>>,
}

/// Repository for banner operations.
#[derive(Clone)]
pub struct BannerRepository {
    db: Arc<DatabaseConnection>,
}

impl BannerRepository {
    /// Create a new banner repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find banner by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<banner::Model>> {
        Banner::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all published banners, newest first.
    ///
    /// The ordering (creation date descending, ID as tiebreaker) is
    /// load-bearing: the placement resolver keeps the first banner it
    /// sees per slot.
    pub async fn find_published(&self) -> AppResult<Vec<banner::Model>> {
        Banner::find()
            .filter(banner::Column::PublishState.eq(PublishState::Published))
            .order_by(banner::Column::CreatedAt, Order::Desc)
            .order_by(banner::Column::Id, Order::Desc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find all banners (for admin listing), newest first.
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<Vec<banner::Model>> {
        Banner::find()
            .order_by(banner::Column::CreatedAt, Order::Desc)
            .order_by(banner::Column::Id, Order::Desc)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all banners.
    pub async fn count(&self) -> AppResult<u64> {
        Banner::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find published recurring banners whose end date has passed.
    ///
    /// These are the banners eligible for the "create next year" action.
    pub async fn find_expired_recurring(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<banner::Model>> {
        Banner::find()
            .filter(banner::Column::PublishState.eq(PublishState::Published))
            .filter(banner::Column::IsRecurring.eq(true))
            .filter(banner::Column::EndsAt.lt(now))
            .order_by(banner::Column::EndsAt, Order::Asc)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a new banner row.
    pub async fn create(&self, record: CreateBannerRecord) -> AppResult<banner::Model> {
        let active_model = banner::ActiveModel {
            id: Set(record.id),
            title: Set(record.title),
            publish_state: Set(record.publish_state),
            content: Set(record.content),
            cta_text: Set(record.cta_text),
            cta_url: Set(record.cta_url),
            cta_new_tab: Set(record.cta_new_tab),
            placement: Set(record.placement),
            floating_corner: Set(record.floating_corner),
            side_mode: Set(record.side_mode),
            modal_delay_secs: Set(record.modal_delay_secs),
            targeting_mode: Set(record.targeting_mode),
            target_pages: Set(serde_json::Value::from(record.target_pages)),
            starts_at: Set(record.starts_at),
            ends_at: Set(record.ends_at),
            is_recurring: Set(record.is_recurring),
            recurring_year: Set(record.recurring_year),
            is_dismissible: Set(record.is_dismissible),
            bg_color: Set(record.bg_color),
            text_color: Set(record.text_color),
            cta_bg_color: Set(record.cta_bg_color),
            cta_text_color: Set(record.cta_text_color),
            animation: Set(record.animation),
            created_at: Set(record.created_at),
            updated_at: Set(None),
        };

        active_model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Apply a partial update to a banner row.
    pub async fn update(
        &self,
        id: &str,
        patch: UpdateBannerPatch,
        updated_at: DateTime<Utc>,
    ) -> AppResult<banner::Model> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BannerNotFound(id.to_string()))?;

        let mut active: banner::ActiveModel = existing.into();

        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(state) = patch.publish_state {
            active.publish_state = Set(state);
        }
        if let Some(content) = patch.content {
            active.content = Set(content);
        }
        if let Some(cta_text) = patch.cta_text {
            active.cta_text = Set(cta_text);
        }
        if let Some(cta_url) = patch.cta_url {
            active.cta_url = Set(cta_url);
        }
        if let Some(cta_new_tab) = patch.cta_new_tab {
            active.cta_new_tab = Set(cta_new_tab);
        }
        if let Some(placement) = patch.placement {
            active.placement = Set(placement);
        }
        if let Some(corner) = patch.floating_corner {
            active.floating_corner = Set(corner);
        }
        if let Some(side) = patch.side_mode {
            active.side_mode = Set(side);
        }
        if let Some(delay) = patch.modal_delay_secs {
            active.modal_delay_secs = Set(delay);
        }
        if let Some(mode) = patch.targeting_mode {
            active.targeting_mode = Set(mode);
        }
        if let Some(pages) = patch.target_pages {
            active.target_pages = Set(serde_json::Value::from(pages));
        }
        if let Some(starts) = patch.starts_at {
            active.starts_at = Set(starts);
        }
        if let Some(ends) = patch.ends_at {
            active.ends_at = Set(ends);
        }
        if let Some(recurring) = patch.is_recurring {
            active.is_recurring = Set(recurring);
        }
        if let Some(year) = patch.recurring_year {
            active.recurring_year = Set(year);
        }
        if let Some(dismissible) = patch.is_dismissible {
            active.is_dismissible = Set(dismissible);
        }
        if let Some(bg) = patch.bg_color {
            active.bg_color = Set(bg);
        }
        if let Some(text) = patch.text_color {
            active.text_color = Set(text);
        }
        if let Some(cta_bg) = patch.cta_bg_color {
            active.cta_bg_color = Set(cta_bg);
        }
        if let Some(cta_text) = patch.cta_text_color {
            active.cta_text_color = Set(cta_text);
        }
        if let Some(animation) = patch.animation {
            active.animation = Set(animation);
        }

        active.updated_at = Set(Some(updated_at));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Change only the publish state of a banner.
    pub async fn set_publish_state(
        &self,
        id: &str,
        state: PublishState,
        updated_at: DateTime<Utc>,
    ) -> AppResult<banner::Model> {
        let patch = UpdateBannerPatch {
            publish_state: Some(state),
            ..UpdateBannerPatch::default()
        };
        self.update(id, patch, updated_at).await
    }

    /// Hard-delete a banner.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Banner::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Hard-delete every banner row. Used by the uninstall/purge path.
    pub async fn delete_all(&self) -> AppResult<u64> {
        let result = Banner::delete_many()
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(result.rows_affected)
    }
}
