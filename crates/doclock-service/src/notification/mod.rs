//! Notification append and read tracking.

pub mod service;

pub use service::NotificationService;
