//! Concrete repository implementations, one per entity.

pub mod card;
pub mod document;
pub mod folder;
pub mod notification;
pub mod secure_qr;
pub mod share;
pub mod usage;
pub mod user;
