//! Item records: flat parent-linked hierarchies, id allocation, tree helpers.

pub mod ids;
pub mod tree;
pub mod types;

pub use ids::*;
pub use tree::*;
pub use types::*;
