//! Secure QR bundle domain entities.

pub mod model;

pub use model::{CreateSecureQr, SecureQr, SecureQrBundle};
