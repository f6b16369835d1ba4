//! Share grant domain entities.

pub mod model;

pub use model::{CreateShareGrant, ItemKind, ShareGrant};
