//! Folder domain entities.

pub mod depth;
pub mod model;
pub mod name;

pub use model::{CreateFolder, Folder, RootListing, SharedFolder, SHARED_FOLDER_NAME};
