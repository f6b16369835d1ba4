//! # doclock-entity
//!
//! Domain entity models for DocLock. Every struct in this crate represents
//! a database table row or a domain value object. All entities derive
//! `Debug`, `Clone`, `Serialize`, `Deserialize`, and database entities
//! additionally derive `sqlx::FromRow`.

pub mod card;
pub mod document;
pub mod folder;
pub mod notification;
pub mod secure_qr;
pub mod share;
pub mod shareable;
pub mod user;

pub use shareable::ShareableItem;
