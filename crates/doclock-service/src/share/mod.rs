//! Cross-user sharing of documents and cards.

pub mod service;

pub use service::ShareService;
