//! # doclock-auth
//!
//! Authentication building blocks for DocLock: Argon2id MPIN hashing,
//! JWT access tokens, and the two-step entry/confirmation flow used
//! when a user sets or changes their MPIN.

pub mod jwt;
pub mod mpin;
pub mod pin_flow;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use mpin::MpinHasher;
pub use pin_flow::{PinConfirmation, PinOutcome};
