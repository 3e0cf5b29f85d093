//! Simulation configuration and the fixture bundle it runs against.

use crate::catalog::ItemDatabase;
use crate::config::LocationLootConfig;
use crate::error::Result;
use crate::utils::persistence::load_json;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Location to generate
    pub location_id: String,

    /// Number of generation passes
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// How many of the most frequent templates the report lists
    pub top_templates: usize,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            location_id: String::new(),
            num_runs: 100,
            seed: None,
            top_templates: 10,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for a reproducible batch on one location
    pub fn seeded(location_id: impl Into<String>, num_runs: u32, seed: u64) -> Self {
        Self {
            location_id: location_id.into(),
            num_runs,
            seed: Some(seed),
            ..Default::default()
        }
    }
}

/// Everything a headless pass needs in one JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LootFixture {
    pub database: ItemDatabase,
    pub config: LocationLootConfig,
}

impl LootFixture {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
