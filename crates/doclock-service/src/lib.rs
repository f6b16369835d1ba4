//! # doclock-service
//!
//! Business logic for DocLock. Each service owns the validation, ownership
//! checks, and event publication for one area of the domain; persistence is
//! delegated to the repositories in `doclock-database` and binaries to the
//! blob store in `doclock-storage`.
//!
//! Services publish domain events only after the corresponding database
//! write has committed, so a live subscription observes changes in write
//! order.

pub mod auth;
pub mod card;
pub mod context;
pub mod document;
pub mod folder;
pub mod notification;
pub mod secure_qr;
pub mod share;

pub use auth::AuthService;
pub use card::CardService;
pub use context::RequestContext;
pub use document::DocumentService;
pub use folder::FolderService;
pub use notification::NotificationService;
pub use secure_qr::SecureQrService;
pub use share::ShareService;
