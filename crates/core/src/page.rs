//! Page identity for banner targeting and cache keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference to the page a visitor is viewing.
///
/// The site front page is a distinct case rather than a magic number:
/// `from_id(0)` normalizes the legacy sentinel to [`PageRef::FrontPage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageRef {
    /// The site's front page.
    FrontPage,
    /// A regular page, identified by its non-zero ID.
    Page(u64),
}

impl PageRef {
    /// Build a page reference from a raw page ID (0 means front page).
    #[must_use]
    pub const fn from_id(id: u64) -> Self {
        if id == 0 { Self::FrontPage } else { Self::Page(id) }
    }

    /// The raw page ID (0 for the front page).
    #[must_use]
    pub const fn id(self) -> u64 {
        match self {
            Self::FrontPage => 0,
            Self::Page(id) => id,
        }
    }
}

impl fmt::Display for PageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_normalizes_front_page() {
        assert_eq!(PageRef::from_id(0), PageRef::FrontPage);
        assert_eq!(PageRef::from_id(42), PageRef::Page(42));
    }

    #[test]
    fn test_display_uses_raw_id() {
        assert_eq!(PageRef::FrontPage.to_string(), "0");
        assert_eq!(PageRef::Page(42).to_string(), "42");
    }
}
