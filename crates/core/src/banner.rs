//! Resolved banner domain types.
//!
//! The database row stores optional, placement-specific detail columns;
//! [`ResolvedBanner::from_model`] is the single defaulting step that turns
//! a stored row into a fully-populated value. Nothing past this boundary
//! ever treats an empty field as "use the default".

use chrono::{DateTime, Utc};
use marquee_db::entities::banner::{
    self, Animation, FloatingCorner, PlacementKind, SideMode,
};
use serde::{Deserialize, Serialize};

/// Default modal open delay in seconds.
pub const DEFAULT_MODAL_DELAY_SECS: u32 = 3;
/// Maximum modal open delay in seconds.
pub const MAX_MODAL_DELAY_SECS: i32 = 60;
/// Default banner background color.
pub const DEFAULT_BG_COLOR: &str = "#000000";
/// Default banner text color.
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
/// Default CTA background color.
pub const DEFAULT_CTA_BG_COLOR: &str = "#ffffff";
/// Default CTA text color.
pub const DEFAULT_CTA_TEXT_COLOR: &str = "#000000";

/// Placement with its resolved placement-specific detail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Bar pinned to the top of the viewport.
    TopBar,
    /// Bar pinned to the bottom of the viewport.
    BottomBar,
    /// Floating card in one screen corner.
    Floating {
        /// Which corner the banner floats in.
        corner: FloatingCorner,
    },
    /// Modal dialog with a delayed open.
    Modal {
        /// Seconds to wait before opening, within [0, 60].
        delay_secs: u32,
    },
    /// Vertical banner on one or both page sides.
    Side {
        /// Which side(s) the banner occupies.
        side: SideMode,
    },
}

impl Placement {
    /// The placement discriminant without its detail payload.
    #[must_use]
    pub const fn kind(&self) -> PlacementKind {
        match self {
            Self::TopBar => PlacementKind::TopBar,
            Self::BottomBar => PlacementKind::BottomBar,
            Self::Floating { .. } => PlacementKind::Floating,
            Self::Modal { .. } => PlacementKind::Modal,
            Self::Side { .. } => PlacementKind::Side,
        }
    }

    /// Kebab-case slug used in CSS class names.
    #[must_use]
    pub const fn css_slug(&self) -> &'static str {
        match self {
            Self::TopBar => "top-bar",
            Self::BottomBar => "bottom-bar",
            Self::Floating { .. } => "floating",
            Self::Modal { .. } => "modal",
            Self::Side { .. } => "side",
        }
    }
}

/// Call-to-action button. Present only when both text and URL are set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cta {
    /// Button label.
    pub text: String,
    /// Button target URL.
    pub url: String,
    /// Whether the target opens in a new tab.
    pub opens_new_tab: bool,
}

/// Resolved visual configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    /// Banner background color (hex).
    pub bg_color: String,
    /// Banner text color (hex).
    pub text_color: String,
    /// CTA background color (hex).
    pub cta_bg_color: String,
    /// CTA text color (hex).
    pub cta_text_color: String,
    /// Entry animation.
    pub animation: Animation,
}

/// A banner with every default applied, ready for selection and render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBanner {
    /// Banner ID.
    pub id: String,
    /// Editorial title (not shown to visitors).
    pub title: String,
    /// Rich-text content.
    pub content: String,
    /// Optional call-to-action.
    pub cta: Option<Cta>,
    /// Placement with resolved detail.
    pub placement: Placement,
    /// Whether visitors can dismiss the banner.
    pub dismissible: bool,
    /// Visual configuration.
    pub appearance: Appearance,
    /// Creation time (drives newest-wins conflict resolution).
    pub created_at: DateTime<Utc>,
}

impl ResolvedBanner {
    /// Resolve a stored row into a fully-populated banner.
    #[must_use]
    pub fn from_model(model: &banner::Model) -> Self {
        let placement = match model.placement {
            PlacementKind::TopBar => Placement::TopBar,
            PlacementKind::BottomBar => Placement::BottomBar,
            PlacementKind::Floating => Placement::Floating {
                corner: model.floating_corner.unwrap_or(FloatingCorner::BottomRight),
            },
            PlacementKind::Modal => Placement::Modal {
                delay_secs: model.modal_delay_secs.map_or(DEFAULT_MODAL_DELAY_SECS, |d| {
                    u32::try_from(d.clamp(0, MAX_MODAL_DELAY_SECS))
                        .unwrap_or(DEFAULT_MODAL_DELAY_SECS)
                }),
            },
            PlacementKind::Side => Placement::Side {
                side: model.side_mode.unwrap_or(SideMode::Right),
            },
        };

        // Modals are always dismissible, even for rows written before
        // that rule existed.
        let dismissible = model.is_dismissible || model.placement == PlacementKind::Modal;

        let cta = match (model.cta_text.as_deref(), model.cta_url.as_deref()) {
            (Some(text), Some(url)) if !text.is_empty() && !url.is_empty() => Some(Cta {
                text: text.to_string(),
                url: url.to_string(),
                opens_new_tab: model.cta_new_tab,
            }),
            _ => None,
        };

        Self {
            id: model.id.clone(),
            title: model.title.clone(),
            content: model.content.clone(),
            cta,
            placement,
            dismissible,
            appearance: Appearance {
                bg_color: resolved_color(model.bg_color.as_deref(), DEFAULT_BG_COLOR),
                text_color: resolved_color(model.text_color.as_deref(), DEFAULT_TEXT_COLOR),
                cta_bg_color: resolved_color(model.cta_bg_color.as_deref(), DEFAULT_CTA_BG_COLOR),
                cta_text_color: resolved_color(
                    model.cta_text_color.as_deref(),
                    DEFAULT_CTA_TEXT_COLOR,
                ),
                animation: model.animation.unwrap_or(Animation::Fade),
            },
            created_at: model.created_at,
        }
    }
}

fn resolved_color(stored: Option<&str>, default: &str) -> String {
    match stored {
        Some(color) if !color.is_empty() => color.to_string(),
        _ => default.to_string(),
    }
}
