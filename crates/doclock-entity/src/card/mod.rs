//! Payment card domain entities.

pub mod model;

pub use model::{Card, CreateCard};
