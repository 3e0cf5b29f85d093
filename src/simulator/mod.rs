//! Loot balance simulator for Monte Carlo analysis.
//!
//! Runs many seeded generation passes over one location to analyze:
//! - How many containers spawn and how many stay empty
//! - Container item and loose point counts
//! - Which templates dominate the output
//!
//! The simulator drives `LootGenerator` directly, so its numbers match what a
//! raid start would produce for the same tables and config.

mod config;
mod report;
mod runner;

pub use config::{LootFixture, SimConfig};
pub use report::SimReport;
pub use runner::{collect_stats, run_simulation, RunStats};
