//! Banner lifecycle status resolution.

use chrono::{DateTime, Utc};
use marquee_db::entities::banner::{self, PublishState};
use serde::{Deserialize, Serialize};

/// Derived lifecycle status of a banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerStatus {
    /// Published and inside its schedule window.
    Active,
    /// Published with a start date in the future.
    Scheduled,
    /// Published with an end date in the past.
    Expired,
    /// Not published.
    Draft,
}

/// Derive a banner's status from its publish state and schedule.
///
/// Both schedule bounds are inclusive: a banner whose window starts or
/// ends exactly at `now` is active. This single function backs both
/// selection filtering and admin status reporting; the two must never
/// diverge.
#[must_use]
pub fn resolve_status(model: &banner::Model, now: DateTime<Utc>) -> BannerStatus {
    if model.publish_state != PublishState::Published {
        return BannerStatus::Draft;
    }

    if let Some(starts_at) = model.starts_at {
        if now < starts_at {
            return BannerStatus::Scheduled;
        }
    }

    if let Some(ends_at) = model.ends_at {
        if now > ends_at {
            return BannerStatus::Expired;
        }
    }

    BannerStatus::Active
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use marquee_db::entities::banner::{PlacementKind, TargetingMode};

    fn model(
        state: PublishState,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> banner::Model {
        banner::Model {
            id: "bn1".to_string(),
            title: "Test".to_string(),
            publish_state: state,
            content: String::new(),
            cta_text: None,
            cta_url: None,
            cta_new_tab: false,
            placement: PlacementKind::TopBar,
            floating_corner: None,
            side_mode: None,
            modal_delay_secs: None,
            targeting_mode: TargetingMode::AllPages,
            target_pages: serde_json::json!([]),
            starts_at,
            ends_at,
            is_recurring: false,
            recurring_year: None,
            is_dismissible: true,
            bg_color: None,
            text_color: None,
            cta_bg_color: None,
            cta_text_color: None,
            animation: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn test_draft_regardless_of_schedule() {
        let now = at(1_000);
        let m = model(PublishState::Draft, Some(at(0)), Some(at(2_000)));
        assert_eq!(resolve_status(&m, now), BannerStatus::Draft);
    }

    #[test]
    fn test_no_schedule_is_always_active() {
        let m = model(PublishState::Published, None, None);
        assert_eq!(resolve_status(&m, at(0)), BannerStatus::Active);
    }

    #[test]
    fn test_future_start_is_scheduled() {
        let now = at(1_000);
        let m = model(PublishState::Published, Some(at(2_000)), None);
        assert_eq!(resolve_status(&m, now), BannerStatus::Scheduled);
    }

    #[test]
    fn test_past_end_is_expired() {
        let now = at(3_000);
        let m = model(PublishState::Published, None, Some(at(2_000)));
        assert_eq!(resolve_status(&m, now), BannerStatus::Expired);
    }

    #[test]
    fn test_start_boundary_is_inclusive() {
        let now = at(1_000);
        let m = model(PublishState::Published, Some(now), None);
        assert_eq!(resolve_status(&m, now), BannerStatus::Active);
    }

    #[test]
    fn test_end_boundary_is_inclusive() {
        let now = at(1_000);
        let m = model(PublishState::Published, None, Some(now));
        assert_eq!(resolve_status(&m, now), BannerStatus::Active);

        // One nanosecond past the end the banner is expired.
        let m = model(
            PublishState::Published,
            None,
            Some(now - Duration::nanoseconds(1)),
        );
        assert_eq!(resolve_status(&m, now), BannerStatus::Expired);
    }

    #[test]
    fn test_inside_window_is_active() {
        let now = at(1_500);
        let m = model(PublishState::Published, Some(at(1_000)), Some(at(2_000)));
        assert_eq!(resolve_status(&m, now), BannerStatus::Active);
    }
}
