//! Placement slot resolution.
//!
//! Enforces "at most one banner per slot" over a newest-first list. The
//! slot is the placement kind, except floating banners which are unique
//! per corner, and side banners spanning both sides which bypass
//! uniqueness entirely.

use std::collections::{HashMap, HashSet};
use std::fmt;

use marquee_db::entities::banner::{FloatingCorner, PlacementKind, SideMode};

use crate::banner::{Placement, ResolvedBanner};

/// Uniqueness unit tracked by the placement resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKey {
    /// A whole placement (top bar, bottom bar, modal, plain side).
    Placement(PlacementKind),
    /// One corner of the floating placement.
    FloatingCorner(FloatingCorner),
}

impl SlotKey {
    /// The slot a banner competes for, or `None` for side/both banners
    /// which are never tracked.
    #[must_use]
    pub fn for_banner(banner: &ResolvedBanner) -> Option<Self> {
        match banner.placement {
            Placement::Side {
                side: SideMode::Both,
            } => None,
            Placement::Floating { corner } => Some(Self::FloatingCorner(corner)),
            Placement::TopBar => Some(Self::Placement(PlacementKind::TopBar)),
            Placement::BottomBar => Some(Self::Placement(PlacementKind::BottomBar)),
            Placement::Modal { .. } => Some(Self::Placement(PlacementKind::Modal)),
            Placement::Side { .. } => Some(Self::Placement(PlacementKind::Side)),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placement(kind) => {
                let label = match kind {
                    PlacementKind::TopBar => "top_bar",
                    PlacementKind::BottomBar => "bottom_bar",
                    PlacementKind::Floating => "floating",
                    PlacementKind::Modal => "modal",
                    PlacementKind::Side => "side",
                };
                f.write_str(label)
            }
            Self::FloatingCorner(corner) => {
                let label = match corner {
                    FloatingCorner::TopLeft => "floating:top_left",
                    FloatingCorner::TopRight => "floating:top_right",
                    FloatingCorner::BottomLeft => "floating:bottom_left",
                    FloatingCorner::BottomRight => "floating:bottom_right",
                };
                f.write_str(label)
            }
        }
    }
}

/// Resolve placement conflicts over a newest-first list.
///
/// A single pass keeps the first banner seen for each slot and silently
/// drops the rest; side/both banners are always kept. Dropping is the
/// documented conflict policy, not an error — editors are warned via
/// [`detect_conflicts`].
#[must_use]
pub fn resolve_placements(banners: Vec<ResolvedBanner>) -> Vec<ResolvedBanner> {
    let mut filled: HashSet<SlotKey> = HashSet::new();
    let mut kept = Vec::with_capacity(banners.len());

    for banner in banners {
        match SlotKey::for_banner(&banner) {
            None => kept.push(banner),
            Some(key) => {
                if filled.insert(key) {
                    kept.push(banner);
                }
            }
        }
    }

    kept
}

/// Slot contested by more than one active banner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotConflict {
    /// The contested slot.
    pub slot: SlotKey,
    /// IDs of all contenders, newest first; only the first displays.
    pub banner_ids: Vec<String>,
}

/// Find every slot with more than one active contender.
///
/// Input order is preserved in the report so the displayed (newest)
/// banner is always first.
#[must_use]
pub fn detect_conflicts(banners: &[ResolvedBanner]) -> Vec<SlotConflict> {
    let mut order: Vec<SlotKey> = Vec::new();
    let mut by_slot: HashMap<SlotKey, Vec<String>> = HashMap::new();

    for banner in banners {
        if let Some(key) = SlotKey::for_banner(banner) {
            let contenders = by_slot.entry(key).or_default();
            if contenders.is_empty() {
                order.push(key);
            }
            contenders.push(banner.id.clone());
        }
    }

    order
        .into_iter()
        .filter_map(|slot| {
            let banner_ids = by_slot.remove(&slot)?;
            (banner_ids.len() > 1).then(|| SlotConflict { slot, banner_ids })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::{Appearance, Placement};
    use chrono::Utc;
    use marquee_db::entities::banner::Animation;

    fn resolved(id: &str, placement: Placement) -> ResolvedBanner {
        ResolvedBanner {
            id: id.to_string(),
            title: id.to_string(),
            content: String::new(),
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
    fn test_newest_wins_per_placement() {
        // Newest-first input: bn3 was created last.
        let banners = vec![
            resolved("bn3", Placement::TopBar),
            resolved("bn2", Placement::TopBar),
            resolved("bn1", Placement::TopBar),
        ];

        let kept = resolve_placements(banners);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "bn3");
    }

    #[test]
    fn test_distinct_placements_coexist() {
        let banners = vec![
            resolved("top", Placement::TopBar),
            resolved("bottom", Placement::BottomBar),
            resolved("modal", Placement::Modal { delay_secs: 3 }),
        ];

        let kept = resolve_placements(banners);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_floating_is_unique_per_corner() {
        let banners = vec![
            resolved(
                "tl",
                Placement::Floating {
                    corner: FloatingCorner::TopLeft,
                },
            ),
            resolved(
                "br",
                Placement::Floating {
                    corner: FloatingCorner::BottomRight,
                },
            ),
            resolved(
                "br2",
                Placement::Floating {
                    corner: FloatingCorner::BottomRight,
                },
            ),
        ];

        let kept = resolve_placements(banners);

        assert_eq!(kept.len(), 2);
        assert!(kept.iter().any(|b| b.id == "tl"));
        assert!(kept.iter().any(|b| b.id == "br"));
    }

    #[test]
    fn test_side_both_bypasses_uniqueness() {
        let banners = vec![
            resolved(
                "both1",
                Placement::Side {
                    side: SideMode::Both,
                },
            ),
            resolved(
                "both2",
                Placement::Side {
                    side: SideMode::Both,
                },
            ),
            resolved(
                "left",
                Placement::Side {
                    side: SideMode::Left,
                },
            ),
        ];

        let kept = resolve_placements(banners);

        // Both side/both banners survive, plus the first plain side banner.
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_plain_side_shares_one_slot() {
        let banners = vec![
            resolved(
                "left",
                Placement::Side {
                    side: SideMode::Left,
                },
            ),
            resolved(
                "right",
                Placement::Side {
                    side: SideMode::Right,
                },
            ),
        ];

        // Left and right compete for the single side slot; newest wins.
        let kept = resolve_placements(banners);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "left");
    }

    #[test]
    fn test_detect_conflicts_reports_contested_slots() {
        let banners = vec![
            resolved("bn3", Placement::TopBar),
            resolved("bn2", Placement::TopBar),
            resolved("solo", Placement::BottomBar),
        ];

        let conflicts = detect_conflicts(&banners);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].slot, SlotKey::Placement(PlacementKind::TopBar));
        assert_eq!(conflicts[0].banner_ids, vec!["bn3", "bn2"]);
    }

    #[test]
    fn test_detect_conflicts_ignores_side_both() {
        let banners = vec![
            resolved(
                "both1",
                Placement::Side {
                    side: SideMode::Both,
                },
            ),
            resolved(
                "both2",
                Placement::Side {
                    side: SideMode::Both,
                },
            ),
        ];

        assert!(detect_conflicts(&banners).is_empty());
    }

    #[test]
    fn test_slot_key_display() {
        assert_eq!(SlotKey::Placement(PlacementKind::TopBar).to_string(), "top_bar");
        assert_eq!(
            SlotKey::FloatingCorner(FloatingCorner::BottomRight).to_string(),
            "floating:bottom_right"
        );
    }
}
