//! Shared application state for the API.

#![allow(missing_docs)]

use marquee_core::{BannerService, SelectionEngine};

/// Application state.
///
/// Authentication is handled upstream of this service; the admin routes
/// trust their caller the way an internal surface behind a gateway does.
#[derive(Clone)]
pub struct AppState {
    pub banner_service: BannerService,
    pub selection_engine: SelectionEngine,
}
