//! Document upload, listing, search, and download.

pub mod service;

pub use service::{DocumentService, UploadRequest};
