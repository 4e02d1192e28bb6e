//! Banner entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Publish state of a banner.
///
/// Draft banners are never eligible for display regardless of schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "published")]
    Published,
}

/// Structural slot on the page where a banner renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    #[sea_orm(string_value = "top_bar")]
    TopBar,
    #[sea_orm(string_value = "bottom_bar")]
    BottomBar,
    #[sea_orm(string_value = "floating")]
    Floating,
    #[sea_orm(string_value = "modal")]
    Modal,
    #[sea_orm(string_value = "side")]
    Side,
}

/// Screen corner for floating banners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum FloatingCorner {
    #[sea_orm(string_value = "top_left")]
    TopLeft,
    #[sea_orm(string_value = "top_right")]
    TopRight,
    #[sea_orm(string_value = "bottom_left")]
    BottomLeft,
    #[sea_orm(string_value = "bottom_right")]
    BottomRight,
}

/// Side selection for side banners.
///
/// `Both` renders into the left and right slots simultaneously and is
/// exempt from placement uniqueness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum SideMode {
    #[sea_orm(string_value = "left")]
    Left,
    #[sea_orm(string_value = "right")]
    Right,
    #[sea_orm(string_value = "both")]
    Both,
}

/// Page targeting mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TargetingMode {
    #[sea_orm(string_value = "all_pages")]
    AllPages,
    #[sea_orm(string_value = "homepage_only")]
    HomepageOnly,
    #[sea_orm(string_value = "specific_pages")]
    SpecificPages,
}

/// Entry animation for a banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    #[sea_orm(string_value = "fade")]
    Fade,
    #[sea_orm(string_value = "slide")]
    Slide,
    #[sea_orm(string_value = "none")]
    None,
}

/// Banner model for scheduled promotional banners.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "banner")]
pub struct Model {
    /// Unique banner ID (ULID).
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Editorial display name (not shown to visitors).
    pub title: String,

    /// Publish state (draft/published).
    pub publish_state: PublishState,

    /// Sanitized rich-text content shown inside the banner.
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Call-to-action button label.
    #[sea_orm(nullable)]
    pub cta_text: Option<String>,

    /// Call-to-action target URL.
    #[sea_orm(nullable)]
    pub cta_url: Option<String>,

    /// Whether the CTA opens in a new tab.
    pub cta_new_tab: bool,

    /// Placement slot.
    pub placement: PlacementKind,

    /// Corner for floating placement.
    #[sea_orm(nullable)]
    pub floating_corner: Option<FloatingCorner>,

    /// Side selection for side placement.
    #[sea_orm(nullable)]
    pub side_mode: Option<SideMode>,

    /// Modal open delay in whole seconds, clamped to [0, 60] at write time.
    #[sea_orm(nullable)]
    pub modal_delay_secs: Option<i32>,

    /// Page targeting mode.
    pub targeting_mode: TargetingMode,

    /// Targeted page IDs (JSON array; empty unless mode is `specific_pages`).
    pub target_pages: Json,

    /// When to start showing the banner (inclusive, optional).
    #[sea_orm(nullable)]
    pub starts_at: Option<DateTime<Utc>>,

    /// When to stop showing the banner (inclusive, optional).
    #[sea_orm(nullable)]
    pub ends_at: Option<DateTime<Utc>>,

    /// Whether this is an annual recurring campaign.
    pub is_recurring: bool,

    /// Campaign year for recurring banners; set once, never auto-updated.
    #[sea_orm(nullable)]
    pub recurring_year: Option<i32>,

    /// Whether visitors can dismiss the banner. Always true for modals.
    pub is_dismissible: bool,

    /// Background color (hex).
    #[sea_orm(nullable)]
    pub bg_color: Option<String>,

    /// Text color (hex).
    #[sea_orm(nullable)]
    pub text_color: Option<String>,

    /// CTA background color (hex).
    #[sea_orm(nullable)]
    pub cta_bg_color: Option<String>,

    /// CTA text color (hex).
    #[sea_orm(nullable)]
    pub cta_text_color: Option<String>,

    /// Entry animation.
    #[sea_orm(nullable)]
    pub animation: Option<Animation>,

    /// When the banner was created.
    pub created_at: DateTime<Utc>,

    /// When the banner was last updated.
    #[sea_orm(nullable)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Targeted page IDs as a typed list.
    ///
    /// Non-numeric entries (which cannot be produced by the write path)
    /// are skipped rather than failing the read.
    #[must_use]
    pub fn target_page_ids(&self) -> Vec<u64> {
        self.target_pages
            .as_array()
            .map(|pages| pages.iter().filter_map(serde_json::Value::as_u64).collect())
            .unwrap_or_default()
    }
}

/// Relationships.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
