//! Common utilities and shared types for marquee.
//!
//! This crate provides foundational components used across all marquee
//! crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Validation**: Pure field validators shared by write paths

pub mod config;
pub mod error;
pub mod id;
pub mod validation;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
