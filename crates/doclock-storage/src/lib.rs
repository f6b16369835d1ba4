//! # doclock-storage
//!
//! Binary object storage for document payloads: a local-filesystem
//! [`BlobStore`](doclock_core::traits::BlobStore) implementation plus
//! magic-byte content sniffing for upload type enforcement.

pub mod local;
pub mod sniff;

pub use local::LocalBlobStore;
