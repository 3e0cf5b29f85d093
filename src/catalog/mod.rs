//! Item catalog: template types, collaborator traits and the in-memory database.

pub mod database;
pub mod traits;
pub mod types;

pub use database::*;
pub use traits::*;
pub use types::*;
