//! Database entities.

pub mod banner;

pub use banner::Entity as Banner;
