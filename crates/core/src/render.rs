//! Render expansion and the render-data contract.
//!
//! The selection engine returns each banner once; a side banner spanning
//! both sides becomes two render instances here, strictly after slot
//! resolution so the expansion never affects uniqueness accounting.

use marquee_db::entities::banner::{Animation, FloatingCorner, SideMode};
use serde::Serialize;

use crate::banner::{Placement, ResolvedBanner};

/// One rendered occurrence of a banner.
///
/// Identical to the resolved banner except that `placement` is the
/// per-instance placement: a side/both banner yields a left instance and
/// a right instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInstance {
    /// The banner being rendered.
    pub banner: ResolvedBanner,
    /// Placement for this instance.
    pub placement: Placement,
}

/// Expand resolved banners into render instances.
pub fn expand_for_render(banners: &[ResolvedBanner]) -> Vec<RenderInstance> {
    let mut instances = Vec::with_capacity(banners.len());

    for banner in banners {
        if let Placement::Side {
            side: SideMode::Both,
        } = banner.placement
        {
            instances.push(RenderInstance {
                banner: banner.clone(),
                placement: Placement::Side {
                    side: SideMode::Left,
                },
            });
            instances.push(RenderInstance {
                banner: banner.clone(),
                placement: Placement::Side {
                    side: SideMode::Right,
                },
            });
        } else {
            instances.push(RenderInstance {
                banner: banner.clone(),
                placement: banner.placement.clone(),
            });
        }
    }

    instances
}

impl RenderInstance {
    /// Space-separated CSS class list for this instance.
    #[must_use]
    pub fn css_classes(&self) -> String {
        let mut classes = vec![
            "mq-banner".to_string(),
            format!("mq-banner--{}", self.placement.css_slug()),
        ];

        match self.banner.appearance.animation {
            Animation::Fade => classes.push("mq-banner--fade".to_string()),
            Animation::Slide => classes.push("mq-banner--slide".to_string()),
            Animation::None => {}
        }

        if self.banner.dismissible {
            classes.push("mq-banner--dismissible".to_string());
        }

        match self.placement {
            Placement::Floating { corner } => {
                classes.push(format!("mq-banner--floating-{}", corner_slug(corner)));
            }
            Placement::Side { side } => {
                classes.push(format!("mq-banner--side-{}", side_slug(side)));
            }
            _ => {}
        }

        classes.join(" ")
    }

    /// Inline style string (colors, and corner offsets for floating).
    #[must_use]
    pub fn inline_style(&self) -> String {
        let mut styles = vec![
            format!("background-color: {}", self.banner.appearance.bg_color),
            format!("color: {}", self.banner.appearance.text_color),
        ];

        if let Placement::Floating { corner } = self.placement {
            styles.push(corner_offsets(corner).to_string());
        }

        styles.join("; ")
    }

    /// Modal open delay, when this instance is a modal.
    #[must_use]
    pub const fn modal_delay_secs(&self) -> Option<u32> {
        match self.placement {
            Placement::Modal { delay_secs } => Some(delay_secs),
            _ => None,
        }
    }
}

const fn corner_slug(corner: FloatingCorner) -> &'static str {
    match corner {
        FloatingCorner::TopLeft => "top-left",
        FloatingCorner::TopRight => "top-right",
        FloatingCorner::BottomLeft => "bottom-left",
        FloatingCorner::BottomRight => "bottom-right",
    }
}

const fn side_slug(side: SideMode) -> &'static str {
    match side {
        SideMode::Left => "left",
        SideMode::Right => "right",
        SideMode::Both => "both",
    }
}

const fn corner_offsets(corner: FloatingCorner) -> &'static str {
    match corner {
        FloatingCorner::TopLeft => "top: 20px; left: 20px",
        FloatingCorner::TopRight => "top: 20px; right: 20px",
        FloatingCorner::BottomLeft => "bottom: 20px; left: 20px",
        FloatingCorner::BottomRight => "bottom: 20px; right: 20px",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::Appearance;
    use chrono::Utc;

    fn resolved(id: &str, placement: Placement) -> ResolvedBanner {
        ResolvedBanner {
            id: id.to_string(),
            title: id.to_string(),
            content: String::new(),
            cta: None,
            placement,
            dismissible: true,
            appearance: Appearance {
                bg_color: "#112233".to_string(),
                text_color: "#ffffff".to_string(),
                cta_bg_color: "#ffffff".to_string(),
                cta_text_color: "#000000".to_string(),
                animation: Animation::Fade,
            },
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_side_both_expands_to_two_instances() {
        let banners = vec![resolved(
            "both",
            Placement::Side {
                side: SideMode::Both,
            },
        )];

        let instances = expand_for_render(&banners);

        assert_eq!(instances.len(), 2);
        assert_eq!(
            instances[0].placement,
            Placement::Side {
                side: SideMode::Left
            }
        );
        assert_eq!(
            instances[1].placement,
            Placement::Side {
                side: SideMode::Right
            }
        );
        // Both instances render the same underlying banner.
        assert_eq!(instances[0].banner.id, "both");
        assert_eq!(instances[1].banner.id, "both");
    }

    #[test]
    fn test_other_placements_map_one_to_one() {
        let banners = vec![
            resolved("top", Placement::TopBar),
            resolved("modal", Placement::Modal { delay_secs: 5 }),
        ];

        let instances = expand_for_render(&banners);

        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].placement, Placement::TopBar);
        assert_eq!(instances[1].placement, Placement::Modal { delay_secs: 5 });
    }

    #[test]
    fn test_css_classes_for_floating() {
        let instance = &expand_for_render(&[resolved(
            "fl",
            Placement::Floating {
                corner: FloatingCorner::TopRight,
            },
        )])[0];

        let classes = instance.css_classes();
        assert!(classes.contains("mq-banner--floating"));
        assert!(classes.contains("mq-banner--floating-top-right"));
        assert!(classes.contains("mq-banner--fade"));
        assert!(classes.contains("mq-banner--dismissible"));
    }

    #[test]
    fn test_inline_style_includes_colors_and_offsets() {
        let instance = &expand_for_render(&[resolved(
            "fl",
            Placement::Floating {
                corner: FloatingCorner::BottomLeft,
            },
        )])[0];

        let style = instance.inline_style();
        assert!(style.contains("background-color: #112233"));
        assert!(style.contains("color: #ffffff"));
        assert!(style.contains("bottom: 20px; left: 20px"));
    }

    #[test]
    fn test_modal_delay_exposed() {
        let instance = &expand_for_render(&[resolved("m", Placement::Modal { delay_secs: 7 })])[0];
        assert_eq!(instance.modal_delay_secs(), Some(7));

        let instance = &expand_for_render(&[resolved("t", Placement::TopBar)])[0];
        assert_eq!(instance.modal_delay_secs(), None);
    }
}
