//! Registration, login, and token verification.

pub mod service;

pub use service::{AuthService, AuthToken, LoginRequest, RegisterRequest};
