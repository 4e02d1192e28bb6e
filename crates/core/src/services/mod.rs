//! Business logic services.

#![allow(missing_docs)]

pub mod banner;
pub mod selection;

pub use banner::{BannerService, CreateBannerInput, UpdateBannerInput};
pub use selection::{DEFAULT_CACHE_TTL_SECS, SelectionEngine};
