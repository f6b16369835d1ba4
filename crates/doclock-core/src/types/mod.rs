//! Shared types used across DocLock crates.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
