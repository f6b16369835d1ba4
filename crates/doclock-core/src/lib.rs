//! # doclock-core
//!
//! Core crate for DocLock. Contains configuration schemas, domain events,
//! shared types, the blob-store trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other DocLock crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
