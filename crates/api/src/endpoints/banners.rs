//! Public banner endpoints.
//!
//! The render-data interface: the resolved banner list for a page,
//! expanded into per-slot render instances.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use marquee_common::AppResult;
use marquee_core::{Appearance, Cta, PageRef, Placement, RenderInstance, expand_for_render};
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

/// Create the public banner router.
pub fn router() -> Router<AppState> {
    Router::new().route("/active", get(list_active_banners))
}

/// Query for the active banner list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBannersQuery {
    /// Page ID; 0 or omitted means the front page.
    #[serde(default)]
    pub page: u64,
}

/// One render instance of a banner.
///
/// The editorial title is deliberately absent: it is never shown to
/// visitors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInstanceResponse {
    pub id: String,
    pub content: String,
    pub cta: Option<Cta>,
    pub placement: Placement,
    pub dismissible: bool,
    pub appearance: Appearance,
    pub css_classes: String,
    pub inline_style: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modal_delay_secs: Option<u32>,
}

impl From<RenderInstance> for RenderInstanceResponse {
    fn from(instance: RenderInstance) -> Self {
        let css_classes = instance.css_classes();
        let inline_style = instance.inline_style();
        let modal_delay_secs = instance.modal_delay_secs();

        Self {
            id: instance.banner.id,
            content: instance.banner.content,
            cta: instance.banner.cta,
            placement: instance.placement,
            dismissible: instance.banner.dismissible,
            appearance: instance.banner.appearance,
            css_classes,
            inline_style,
            modal_delay_secs,
        }
    }
}

/// Active banner list response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBannersResponse {
    pub banners: Vec<RenderInstanceResponse>,
    pub total: u64,
}

/// List the banners to render for a page.
async fn list_active_banners(
    State(state): State<AppState>,
    Query(query): Query<ActiveBannersQuery>,
) -> AppResult<ApiResponse<ActiveBannersResponse>> {
    let page = PageRef::from_id(query.page);

    let banners = state.selection_engine.get_active_banners(page).await?;
    let instances = expand_for_render(&banners);

    let responses: Vec<RenderInstanceResponse> = instances
        .into_iter()
        .map(RenderInstanceResponse::from)
        .collect();

    Ok(ApiResponse::ok(ActiveBannersResponse {
        total: responses.len() as u64,
        banners: responses,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use marquee_core::ResolvedBanner;
    use marquee_db::entities::banner::{Animation, SideMode};

    fn resolved(id: &str, placement: Placement) -> ResolvedBanner {
        ResolvedBanner {
            id: id.to_string(),
            title: "Editorial title".to_string(),
            content: "Visible content".to_string(),
            cta: None,
            placement,
            dismissible: true,
            appearance: Appearance {
                bg_color: "#000000".to_string(),
                text_color: "#ffffff".to_string(),
                cta_bg_color: "#ffffff".to_string(),
                cta_text_color: "#000000".to_string(),
                animation: Animation::Fade,
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_response_omits_editorial_title() {
        let instances = expand_for_render(&[resolved("bn1", Placement::TopBar)]);
        let response = RenderInstanceResponse::from(instances[0].clone());

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("Editorial title"));
        assert!(json.contains("Visible content"));
        assert!(json.contains("mq-banner--top-bar"));
    }

    #[test]
    fn test_side_both_yields_two_responses() {
        let instances = expand_for_render(&[resolved(
            "bn1",
            Placement::Side {
                side: SideMode::Both,
            },
        )]);

        let responses: Vec<RenderInstanceResponse> = instances
            .into_iter()
            .map(RenderInstanceResponse::from)
            .collect();

        assert_eq!(responses.len(), 2);
        let json = serde_json::to_string(&responses[0]).unwrap();
        assert!(json.contains("mq-banner--side-left"));
    }
}
