//! Admin banner endpoints.
//!
//! CRUD plus the administrative operations: duplicate, bulk
//! activate/deactivate/duplicate, create-next-year, and the editor
//! notices (slot conflicts, expired recurring campaigns).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use chrono::{DateTime, Utc};
use marquee_common::AppResult;
use marquee_core::{BannerStatus, CreateBannerInput, UpdateBannerInput};
use marquee_db::entities::banner::{
    self, Animation, FloatingCorner, PlacementKind, PublishState, SideMode, TargetingMode,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{middleware::AppState, response::ApiResponse};

/// Create the admin banner router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_banners))
        .route("/", post(create_banner))
        .route("/bulk", post(bulk_action))
        .route("/notices", get(get_notices))
        .route("/{id}", get(get_banner))
        .route("/{id}", put(update_banner))
        .route("/{id}", delete(delete_banner))
        .route("/{id}/duplicate", post(duplicate_banner))
        .route("/{id}/create-next-year", post(create_next_year))
}

/// Banner response for the admin surface.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerResponse {
    pub id: String,
    pub title: String,
    pub publish_state: PublishState,
    /// Derived lifecycle status (the list-table "Status" column).
    pub status: BannerStatus,
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
    pub updated_at: Option<DateTime<Utc>>,
}

impl BannerResponse {
    fn from_model(model: banner::Model, status: BannerStatus) -> Self {
        let target_pages = model.target_page_ids();

        Self {
            id: model.id,
            title: model.title,
            publish_state: model.publish_state,
            status,
            content: model.content,
            cta_text: model.cta_text,
            cta_url: model.cta_url,
            cta_new_tab: model.cta_new_tab,
            placement: model.placement,
            floating_corner: model.floating_corner,
            side_mode: model.side_mode,
            modal_delay_secs: model.modal_delay_secs,
            targeting_mode: model.targeting_mode,
            target_pages,
            starts_at: model.starts_at,
            ends_at: model.ends_at,
            is_recurring: model.is_recurring,
            recurring_year: model.recurring_year,
            is_dismissible: model.is_dismissible,
            bg_color: model.bg_color,
            text_color: model.text_color,
            cta_bg_color: model.cta_bg_color,
            cta_text_color: model.cta_text_color,
            animation: model.animation,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn with_status(state: &AppState, model: banner::Model) -> BannerResponse {
    let status = state.banner_service.status_of(&model);
    BannerResponse::from_model(model, status)
}

/// Banner list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerListResponse {
    pub banners: Vec<BannerResponse>,
    pub total: u64,
}

/// List banners query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBannersQuery {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

const fn default_limit() -> u64 {
    20
}

/// List all banners with their derived status.
async fn list_banners(
    State(state): State<AppState>,
    Query(query): Query<ListBannersQuery>,
) -> AppResult<ApiResponse<BannerListResponse>> {
    let banners = state
        .banner_service
        .list_all(query.limit, query.offset)
        .await?;
    let total = state.banner_service.count().await?;

    let responses: Vec<BannerResponse> = banners
        .into_iter()
        .map(|model| with_status(&state, model))
        .collect();

    Ok(ApiResponse::ok(BannerListResponse {
        banners: responses,
        total,
    }))
}

/// Get a single banner.
async fn get_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BannerResponse>> {
    let banner = state
        .banner_service
        .get_by_id(&id)
        .await?
        .ok_or_else(|| marquee_common::AppError::BannerNotFound(id))?;

    Ok(ApiResponse::ok(with_status(&state, banner)))
}

/// Create a banner.
async fn create_banner(
    State(state): State<AppState>,
    Json(input): Json<CreateBannerInput>,
) -> AppResult<ApiResponse<BannerResponse>> {
    info!(title = %input.title, "Creating banner");

    let banner = state.banner_service.create(input).await?;

    Ok(ApiResponse::ok(with_status(&state, banner)))
}

/// Update a banner.
async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateBannerInput>,
) -> AppResult<ApiResponse<BannerResponse>> {
    info!(banner_id = %id, "Updating banner");

    let banner = state.banner_service.update(&id, input).await?;

    Ok(ApiResponse::ok(with_status(&state, banner)))
}

/// Delete a banner.
async fn delete_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    info!(banner_id = %id, "Deleting banner");

    state.banner_service.delete(&id).await?;

    Ok(ApiResponse::ok(()))
}

/// Duplicate a banner as a draft copy.
async fn duplicate_banner(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BannerResponse>> {
    info!(banner_id = %id, "Duplicating banner");

    let banner = state.banner_service.duplicate(&id).await?;

    Ok(ApiResponse::ok(with_status(&state, banner)))
}

/// Derive next year's edition of an expired recurring banner.
async fn create_next_year(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<BannerResponse>> {
    info!(banner_id = %id, "Creating next-year banner");

    let banner = state.banner_service.create_next_year(&id).await?;

    Ok(ApiResponse::ok(with_status(&state, banner)))
}

/// Bulk action kind.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Activate,
    Deactivate,
    Duplicate,
}

/// Bulk action request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkActionRequest {
    pub action: BulkAction,
    pub ids: Vec<String>,
}

/// Bulk action response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkActionResponse {
    pub changed: u64,
}

/// Apply a bulk action to a set of banners.
async fn bulk_action(
    State(state): State<AppState>,
    Json(req): Json<BulkActionRequest>,
) -> AppResult<ApiResponse<BulkActionResponse>> {
    info!(action = ?req.action, count = req.ids.len(), "Applying bulk banner action");

    let changed = match req.action {
        BulkAction::Activate => {
            state
                .banner_service
                .bulk_set_publish_state(&req.ids, PublishState::Published)
                .await?
        }
        BulkAction::Deactivate => {
            state
                .banner_service
                .bulk_set_publish_state(&req.ids, PublishState::Draft)
                .await?
        }
        BulkAction::Duplicate => state.banner_service.bulk_duplicate(&req.ids).await?,
    };

    Ok(ApiResponse::ok(BulkActionResponse { changed }))
}

/// A slot contested by more than one active banner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub slot: String,
    /// Contenders, newest first; only the first one displays.
    pub banner_ids: Vec<String>,
}

/// Editor notices response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticesResponse {
    pub conflicts: Vec<ConflictResponse>,
    pub expired_recurring: Vec<BannerResponse>,
}

/// Editor notices: contested slots and recurring banners ready for next year.
async fn get_notices(State(state): State<AppState>) -> AppResult<ApiResponse<NoticesResponse>> {
    let conflicts = state
        .banner_service
        .find_conflicts()
        .await?
        .into_iter()
        .map(|conflict| ConflictResponse {
            slot: conflict.slot.to_string(),
            banner_ids: conflict.banner_ids,
        })
        .collect();

    let expired_recurring = state
        .banner_service
        .expired_recurring()
        .await?
        .into_iter()
        .map(|model| with_status(&state, model))
        .collect();

    Ok(ApiResponse::ok(NoticesResponse {
        conflicts,
        expired_recurring,
    }))
}
