//! Loot engine: samplers, spawn limits, container packing, item hierarchies
//! and the two placers, tied together by `LootGenerator`.

pub mod generator;
pub mod hierarchy;
pub mod ledger;
pub mod loose_loot;
pub mod pass;
pub mod rolls;
pub mod space_map;
pub mod static_loot;
pub mod types;
pub mod weighted;

pub use generator::*;
pub use hierarchy::*;
pub use ledger::*;
pub use loose_loot::*;
pub use pass::*;
pub use space_map::*;
pub use static_loot::*;
pub use types::*;
pub use weighted::*;
