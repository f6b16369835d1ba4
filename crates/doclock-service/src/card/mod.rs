//! Stored payment cards.

pub mod service;

pub use service::{AddCardRequest, CardService};
