//! Page targeting filter.

use marquee_db::entities::banner::{self, TargetingMode};

use crate::page::PageRef;

/// Check whether a banner is eligible for the given page.
///
/// `specific_pages` is exact membership with no inheritance; a stored
/// page ID of 0 matches the front page.
#[must_use]
pub fn matches_page(model: &banner::Model, page: PageRef) -> bool {
    match model.targeting_mode {
        TargetingMode::AllPages => true,
        TargetingMode::HomepageOnly => page == PageRef::FrontPage,
        TargetingMode::SpecificPages => model.target_page_ids().contains(&page.id()),
    }
}
