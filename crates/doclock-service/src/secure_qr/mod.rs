//! Secure QR bundles: named, scannable collections of documents.

pub mod render;
pub mod service;

pub use service::SecureQrService;
