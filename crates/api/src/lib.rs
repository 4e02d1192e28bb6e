//! HTTP API layer for marquee.
//!
//! - **Public**: the render-data interface (`/banners/active`)
//! - **Admin**: banner CRUD, bulk actions, duplication, next-year
//!   derivation, and editor notices (`/admin/banners/...`)
//!
//! Built on Axum 0.8 with the Tower middleware stack.

pub mod endpoints;
pub mod middleware;
pub mod response;

pub use endpoints::router;
