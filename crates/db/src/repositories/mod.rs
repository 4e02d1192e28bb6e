//! Database repositories.

pub mod banner;

pub use banner::{BannerRepository, CreateBannerRecord, UpdateBannerPatch};
