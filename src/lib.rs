//! Lootgen - procedural loot distribution for raid locations
//!
//! Decides which static containers and loose loot points spawn, builds
//! complete item hierarchies for them, and packs container contents into
//! their grids. `loot::LootGenerator` is the entry point.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod items;
pub mod loot;
pub mod simulator;
pub mod utils;

pub use error::{LootError, Result};
