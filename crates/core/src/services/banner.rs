//! Banner authoring and administrative operations.
//!
//! All mutations are validated up front, rejected atomically on bad
//! input, and finish by invalidating the page-scoped cache through the
//! selection engine's hook.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, Utc};
use marquee_common::{AppError, AppResult, IdGenerator, validation};
use marquee_db::entities::banner::{
    self, Animation, FloatingCorner, PlacementKind, PublishState, SideMode, TargetingMode,
};
use marquee_db::repositories::{BannerRepository, CreateBannerRecord, UpdateBannerPatch};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::banner::{MAX_MODAL_DELAY_SECS, ResolvedBanner};
use crate::clock::Clock;
use crate::placement::{SlotConflict, detect_conflicts};
use crate::services::selection::SelectionEngine;
use crate::status::{BannerStatus, resolve_status};

/// Input for creating a banner.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBannerInput {
    #[validate(length(min = 1, max = 256))]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_publish_state")]
    pub publish_state: PublishState,
    #[validate(length(max = 128))]
    pub cta_text: Option<String>,
    pub cta_url: Option<String>,
    #[serde(default)]
    pub cta_new_tab: bool,
    #[serde(default = "default_placement")]
    pub placement: PlacementKind,
    pub floating_corner: Option<FloatingCorner>,
    pub side_mode: Option<SideMode>,
    pub modal_delay_secs: Option<i32>,
    #[serde(default = "default_targeting_mode")]
    pub targeting_mode: TargetingMode,
    #[serde(default)]
    pub target_pages: Vec<u64>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurring_year: Option<i32>,
    #[serde(default = "default_true")]
    pub is_dismissible: bool,
    pub bg_color: Option<String>,
    pub text_color: Option<String>,
    pub cta_bg_color: Option<String>,
    pub cta_text_color: Option<String>,
    pub animation: Option<Animation>,
}

/// Input for updating a banner.
///
/// Outer `None` leaves a field untouched; the inner `Option` on nullable
/// fields distinguishes "set" from "clear".
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBannerInput {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,
    pub content: Option<String>,
    pub publish_state: Option<PublishState>,
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

const fn default_publish_state() -> PublishState {
    PublishState::Draft
}

const fn default_placement() -> PlacementKind {
    PlacementKind::TopBar
}

const fn default_targeting_mode() -> TargetingMode {
    TargetingMode::AllPages
}

const fn default_true() -> bool {
    true
}

/// Service for managing banners.
#[derive(Clone)]
pub struct BannerService {
    banner_repo: BannerRepository,
    engine: SelectionEngine,
    id_gen: IdGenerator,
    clock: Arc<dyn Clock>,
}

impl BannerService {
    /// Create a new banner service.
    pub fn new(
        banner_repo: BannerRepository,
        engine: SelectionEngine,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            banner_repo,
            engine,
            id_gen: IdGenerator::new(),
            clock,
        }
    }

    /// Get a banner by ID.
    pub async fn get_by_id(&self, id: &str) -> AppResult<Option<banner::Model>> {
        self.banner_repo.find_by_id(id).await
    }

    /// List all banners (for admin), newest first.
    pub async fn list_all(&self, limit: u64, offset: u64) -> AppResult<Vec<banner::Model>> {
        self.banner_repo.find_all(limit, offset).await
    }

    /// Count all banners.
    pub async fn count(&self) -> AppResult<u64> {
        self.banner_repo.count().await
    }

    /// Derived lifecycle status of a banner at the current time.
    #[must_use]
    pub fn status_of(&self, model: &banner::Model) -> BannerStatus {
        resolve_status(model, self.clock.now())
    }

    /// Create a new banner.
    pub async fn create(&self, input: CreateBannerInput) -> AppResult<banner::Model> {
        input.validate()?;

        let now = self.clock.now();
        let record = Self::build_create_record(input, self.id_gen.generate(), now)?;

        let model = self.banner_repo.create(record).await?;
        info!(banner_id = %model.id, title = %model.title, "Created banner");

        self.engine.invalidate_all().await?;
        Ok(model)
    }

    /// Update a banner.
    pub async fn update(&self, id: &str, input: UpdateBannerInput) -> AppResult<banner::Model> {
        input.validate()?;

        let existing = self
            .banner_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BannerNotFound(id.to_string()))?;

        let patch = Self::build_update_patch(&existing, input)?;

        let model = self.banner_repo.update(id, patch, self.clock.now()).await?;
        info!(banner_id = %model.id, "Updated banner");

        self.engine.invalidate_all().await?;
        Ok(model)
    }

    /// Change the publish state of a banner.
    pub async fn set_publish_state(
        &self,
        id: &str,
        state: PublishState,
    ) -> AppResult<banner::Model> {
        let model = self
            .banner_repo
            .set_publish_state(id, state, self.clock.now())
            .await?;
        info!(banner_id = %model.id, state = ?state, "Changed banner publish state");

        self.engine.invalidate_all().await?;
        Ok(model)
    }

    /// Bulk activate or deactivate banners. Missing IDs are skipped.
    ///
    /// Returns the number of banners changed. The cache is invalidated
    /// once, after every row is written, and even when a later row fails.
    pub async fn bulk_set_publish_state(
        &self,
        ids: &[String],
        state: PublishState,
    ) -> AppResult<u64> {
        let now = self.clock.now();
        let mut changed: u64 = 0;
        let mut failure: Option<AppError> = None;

        for id in ids {
            match self.banner_repo.set_publish_state(id, state, now).await {
                Ok(_) => changed += 1,
                Err(AppError::BannerNotFound(_)) => {}
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if changed > 0 {
            self.engine.invalidate_all().await?;
        }

        match failure {
            Some(e) => Err(e),
            None => {
                info!(changed, state = ?state, "Bulk publish-state change");
                Ok(changed)
            }
        }
    }

    /// Duplicate a banner as a draft copy.
    pub async fn duplicate(&self, id: &str) -> AppResult<banner::Model> {
        let source = self
            .banner_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BannerNotFound(id.to_string()))?;

        let record = Self::duplicate_record(&source, self.id_gen.generate(), self.clock.now());

        let model = self.banner_repo.create(record).await?;
        info!(source_id = %id, banner_id = %model.id, "Duplicated banner");

        self.engine.invalidate_all().await?;
        Ok(model)
    }

    /// Duplicate several banners. Missing IDs are skipped.
    pub async fn bulk_duplicate(&self, ids: &[String]) -> AppResult<u64> {
        let now = self.clock.now();
        let mut changed: u64 = 0;
        let mut failure: Option<AppError> = None;

        for id in ids {
            match self.banner_repo.find_by_id(id).await {
                Ok(Some(source)) => {
                    let record = Self::duplicate_record(&source, self.id_gen.generate(), now);
                    match self.banner_repo.create(record).await {
                        Ok(_) => changed += 1,
                        Err(e) => {
                            failure = Some(e);
                            break;
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        if changed > 0 {
            self.engine.invalidate_all().await?;
        }

        match failure {
            Some(e) => Err(e),
            None => {
                info!(changed, "Bulk duplicated banners");
                Ok(changed)
            }
        }
    }

    /// Derive next year's edition of an expired recurring banner.
    ///
    /// Only offered for recurring banners whose end date has passed; the
    /// new banner is a draft with the schedule shifted one calendar year
    /// forward and the campaign year incremented.
    pub async fn create_next_year(&self, id: &str) -> AppResult<banner::Model> {
        let source = self
            .banner_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::BannerNotFound(id.to_string()))?;

        let now = self.clock.now();

        if !source.is_recurring {
            return Err(AppError::Conflict(
                "Banner is not a recurring campaign".to_string(),
            ));
        }
        let Some(ends_at) = source.ends_at else {
            return Err(AppError::Conflict(
                "Recurring banner has no end date".to_string(),
            ));
        };
        if ends_at >= now {
            return Err(AppError::Conflict(
                "Recurring banner has not expired yet".to_string(),
            ));
        }

        let record = Self::next_year_record(&source, self.id_gen.generate(), now)?;

        let model = self.banner_repo.create(record).await?;
        info!(source_id = %id, banner_id = %model.id, "Created next-year banner");

        self.engine.invalidate_all().await?;
        Ok(model)
    }

    /// Hard-delete a banner.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.banner_repo.delete(id).await?;
        info!(banner_id = %id, "Deleted banner");

        self.engine.invalidate_all().await?;
        Ok(())
    }

    /// Delete every banner and cache entry. The uninstall path.
    pub async fn purge_all(&self) -> AppResult<u64> {
        let deleted = self.banner_repo.delete_all().await?;
        info!(deleted, "Purged all banners");

        self.engine.invalidate_all().await?;
        Ok(deleted)
    }

    /// Slots currently contested by more than one active banner.
    ///
    /// Informational only: selection always resolves conflicts by
    /// newest-wins; this report backs the editors' warning notice.
    pub async fn find_conflicts(&self) -> AppResult<Vec<SlotConflict>> {
        let now = self.clock.now();
        let published = self.banner_repo.find_published().await?;

        let active: Vec<ResolvedBanner> = published
            .iter()
            .filter(|model| resolve_status(model, now) == BannerStatus::Active)
            .map(ResolvedBanner::from_model)
            .collect();

        Ok(detect_conflicts(&active))
    }

    /// Published recurring banners whose end date has passed.
    pub async fn expired_recurring(&self) -> AppResult<Vec<banner::Model>> {
        self.banner_repo.find_expired_recurring(self.clock.now()).await
    }

    // === Record construction (pure, validated) ===

    fn build_create_record(
        input: CreateBannerInput,
        id: String,
        now: DateTime<Utc>,
    ) -> AppResult<CreateBannerRecord> {
        if let Some(url) = input.cta_url.as_deref() {
            if !url.is_empty() && !validation::is_safe_url(url) {
                return Err(AppError::Validation(
                    "ctaUrl must be a valid http(s) or site-relative URL".to_string(),
                ));
            }
        }

        if !validation::validate_date_range(input.starts_at, input.ends_at) {
            return Err(AppError::Validation(
                "endsAt must be on or after startsAt".to_string(),
            ));
        }

        let placement = input.placement;

        // Placement detail must match the placement; anything else is
        // cleared rather than stored.
        let floating_corner = (placement == PlacementKind::Floating)
            .then_some(input.floating_corner)
            .flatten();
        let side_mode = (placement == PlacementKind::Side)
            .then_some(input.side_mode)
            .flatten();
        let modal_delay_secs = (placement == PlacementKind::Modal)
            .then_some(input.modal_delay_secs)
            .flatten()
            .map(|delay| delay.clamp(0, MAX_MODAL_DELAY_SECS));

        let target_pages = if input.targeting_mode == TargetingMode::SpecificPages {
            input.target_pages
        } else {
            Vec::new()
        };

        let is_dismissible = input.is_dismissible || placement == PlacementKind::Modal;
        let recurring_year = Some(input.recurring_year.unwrap_or_else(|| now.year()));

        Ok(CreateBannerRecord {
            id,
            title: input.title,
            publish_state: input.publish_state,
            content: input.content,
            cta_text: none_if_empty(input.cta_text),
            cta_url: none_if_empty(input.cta_url),
            cta_new_tab: input.cta_new_tab,
            placement,
            floating_corner,
            side_mode,
            modal_delay_secs,
            targeting_mode: input.targeting_mode,
            target_pages,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            is_recurring: input.is_recurring,
            recurring_year,
            is_dismissible,
            bg_color: checked_color("bgColor", input.bg_color)?,
            text_color: checked_color("textColor", input.text_color)?,
            cta_bg_color: checked_color("ctaBgColor", input.cta_bg_color)?,
            cta_text_color: checked_color("ctaTextColor", input.cta_text_color)?,
            animation: input.animation,
            created_at: now,
        })
    }

    fn build_update_patch(
        existing: &banner::Model,
        input: UpdateBannerInput,
    ) -> AppResult<UpdateBannerPatch> {
        if let Some(Some(url)) = input.cta_url.as_ref() {
            if !url.is_empty() && !validation::is_safe_url(url) {
                return Err(AppError::Validation(
                    "ctaUrl must be a valid http(s) or site-relative URL".to_string(),
                ));
            }
        }

        // The range rule applies to the schedule as it will be stored,
        // merging unchanged bounds from the existing row.
        let merged_starts = input.starts_at.unwrap_or(existing.starts_at);
        let merged_ends = input.ends_at.unwrap_or(existing.ends_at);
        if !validation::validate_date_range(merged_starts, merged_ends) {
            return Err(AppError::Validation(
                "endsAt must be on or after startsAt".to_string(),
            ));
        }

        let merged_placement = input.placement.unwrap_or(existing.placement);
        let merged_targeting = input.targeting_mode.unwrap_or(existing.targeting_mode);

        let mut patch = UpdateBannerPatch {
            title: input.title,
            publish_state: input.publish_state,
            content: input.content,
            cta_text: input.cta_text,
            cta_url: input.cta_url,
            cta_new_tab: input.cta_new_tab,
            placement: input.placement,
            floating_corner: input.floating_corner,
            side_mode: input.side_mode,
            modal_delay_secs: input
                .modal_delay_secs
                .map(|delay| delay.map(|d| d.clamp(0, MAX_MODAL_DELAY_SECS))),
            targeting_mode: input.targeting_mode,
            target_pages: input.target_pages,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            is_recurring: input.is_recurring,
            recurring_year: input.recurring_year,
            is_dismissible: input.is_dismissible,
            bg_color: checked_color_patch("bgColor", input.bg_color)?,
            text_color: checked_color_patch("textColor", input.text_color)?,
            cta_bg_color: checked_color_patch("ctaBgColor", input.cta_bg_color)?,
            cta_text_color: checked_color_patch("ctaTextColor", input.cta_text_color)?,
            animation: input.animation,
        };

        // Keep detail columns coherent with the (possibly new) placement.
        if merged_placement != PlacementKind::Floating {
            patch.floating_corner = Some(None);
        }
        if merged_placement != PlacementKind::Side {
            patch.side_mode = Some(None);
        }
        if merged_placement != PlacementKind::Modal {
            patch.modal_delay_secs = Some(None);
        }
        if merged_placement == PlacementKind::Modal {
            patch.is_dismissible = Some(true);
        }

        if merged_targeting != TargetingMode::SpecificPages {
            patch.target_pages = Some(Vec::new());
        }

        Ok(patch)
    }

    fn duplicate_record(
        source: &banner::Model,
        id: String,
        now: DateTime<Utc>,
    ) -> CreateBannerRecord {
        CreateBannerRecord {
            id,
            title: format!("{} (Copy)", source.title),
            publish_state: PublishState::Draft,
            content: source.content.clone(),
            cta_text: source.cta_text.clone(),
            cta_url: source.cta_url.clone(),
            cta_new_tab: source.cta_new_tab,
            placement: source.placement,
            floating_corner: source.floating_corner,
            side_mode: source.side_mode,
            modal_delay_secs: source.modal_delay_secs,
            targeting_mode: source.targeting_mode,
            target_pages: source.target_page_ids(),
            starts_at: source.starts_at,
            ends_at: source.ends_at,
            is_recurring: source.is_recurring,
            recurring_year: source.recurring_year,
            is_dismissible: source.is_dismissible,
            bg_color: source.bg_color.clone(),
            text_color: source.text_color.clone(),
            cta_bg_color: source.cta_bg_color.clone(),
            cta_text_color: source.cta_text_color.clone(),
            animation: source.animation,
            created_at: now,
        }
    }

    fn next_year_record(
        source: &banner::Model,
        id: String,
        now: DateTime<Utc>,
    ) -> AppResult<CreateBannerRecord> {
        let shift = |date: DateTime<Utc>| {
            date.checked_add_months(Months::new(12))
                .ok_or_else(|| AppError::Internal("Schedule date out of range".to_string()))
        };

        let starts_at = source.starts_at.map(shift).transpose()?;
        let ends_at = source.ends_at.map(shift).transpose()?;

        // Campaign year: stored year when present, otherwise derived from
        // the end date (legacy rows predating the field).
        let base_year = source
            .recurring_year
            .unwrap_or_else(|| source.ends_at.map_or_else(|| now.year(), |date| date.year()));

        let mut record = Self::duplicate_record(source, id, now);
        record.title = source.title.clone();
        record.starts_at = starts_at;
        record.ends_at = ends_at;
        record.recurring_year = Some(base_year + 1);

        Ok(record)
    }
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn checked_color(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    match value {
        Some(color) if !color.is_empty() => validation::normalize_hex_color(&color)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("{field} must be a valid hex color"))),
        _ => Ok(None),
    }
}

fn checked_color_patch(
    field: &str,
    value: Option<Option<String>>,
) -> AppResult<Option<Option<String>>> {
    match value {
        Some(Some(color)) if !color.is_empty() => validation::normalize_hex_color(&color)
            .map(|normalized| Some(Some(normalized)))
            .ok_or_else(|| AppError::Validation(format!("{field} must be a valid hex color"))),
        Some(_) => Ok(Some(None)),
        None => Ok(None),
    }
}
