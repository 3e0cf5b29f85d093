//! Per-location loot generation settings.

use crate::constants::{
    DEFAULT_FIT_ATTEMPTS, DEFAULT_GROUP_MAX_MULTIPLIER, DEFAULT_GROUP_MIN_MULTIPLIER,
    DEFAULT_LOOSE_MAGAZINE_AMMO_CHANCE, DEFAULT_MIN_FILL_LOOSE_MAGAZINE,
    DEFAULT_MIN_FILL_STATIC_MAGAZINE, DEFAULT_STATIC_MAGAZINE_AMMO_CHANCE,
    WEAPON_MAGAZINE_MIN_FILL,
};
use crate::error::Result;
use crate::utils::persistence::load_json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerRandomisationSettings {
    /// Global switch; when off every container is populated.
    pub enabled: bool,
    /// Per-map switch, checked after `enabled`. Maps not listed are not randomised.
    pub maps: IndexMap<String, bool>,
    pub container_group_min_size_multiplier: f64,
    pub container_group_max_size_multiplier: f64,
    /// Container templates that are always populated when present.
    pub container_types_to_not_randomise: Vec<String>,
}

impl Default for ContainerRandomisationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            maps: IndexMap::new(),
            container_group_min_size_multiplier: DEFAULT_GROUP_MIN_MULTIPLIER,
            container_group_max_size_multiplier: DEFAULT_GROUP_MAX_MULTIPLIER,
            container_types_to_not_randomise: Vec::new(),
        }
    }
}

/// Configuration for loot generation across all locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationLootConfig {
    /// Map id -> multiplier applied to drawn static container item counts
    pub static_loot_multiplier: IndexMap<String, f64>,

    /// Map id -> multiplier applied to the desired loose point count
    pub loose_loot_multiplier: IndexMap<String, f64>,

    /// Map id -> template -> maximum spawns per pass
    pub loot_max_spawn_limits: IndexMap<String, IndexMap<String, u32>>,

    pub container_randomisation: ContainerRandomisationSettings,

    /// Consecutive failed placements before a container stops taking items
    pub fit_loot_into_container_attempts: u32,

    /// Percent chance a magazine found in a static container has ammo
    pub static_magazine_loot_has_ammo_chance_percent: f64,

    /// Percent chance a loose magazine has ammo
    pub magazine_loot_has_ammo_chance_percent: f64,

    pub min_fill_static_magazine_percent: f64,
    pub min_fill_loose_magazine_percent: f64,

    /// Minimum fill of the magazine inside a spawned weapon
    pub weapon_magazine_min_fill_percent: f64,

    /// Templates that always spawn as a bare root item
    pub tpls_to_strip_child_items_from: Vec<String>,

    /// Map id -> loose spawn point ids that never spawn
    pub loose_loot_blacklist: IndexMap<String, Vec<String>>,

    /// Slot name -> percent chance for procedurally built armor
    pub mod_spawn_chance_percent: IndexMap<String, f64>,

    /// Draw static container items with replacement
    pub allow_duplicate_items_in_static_containers: bool,

    /// Whether money and other locked templates still count against spawn limits
    pub locked_templates_respect_spawn_limits: bool,
}

impl Default for LocationLootConfig {
    fn default() -> Self {
        Self {
            static_loot_multiplier: IndexMap::new(),
            loose_loot_multiplier: IndexMap::new(),
            loot_max_spawn_limits: IndexMap::new(),
            container_randomisation: ContainerRandomisationSettings::default(),
            fit_loot_into_container_attempts: DEFAULT_FIT_ATTEMPTS,
            static_magazine_loot_has_ammo_chance_percent: DEFAULT_STATIC_MAGAZINE_AMMO_CHANCE,
            magazine_loot_has_ammo_chance_percent: DEFAULT_LOOSE_MAGAZINE_AMMO_CHANCE,
            min_fill_static_magazine_percent: DEFAULT_MIN_FILL_STATIC_MAGAZINE,
            min_fill_loose_magazine_percent: DEFAULT_MIN_FILL_LOOSE_MAGAZINE,
            weapon_magazine_min_fill_percent: WEAPON_MAGAZINE_MIN_FILL,
            tpls_to_strip_child_items_from: Vec::new(),
            loose_loot_blacklist: IndexMap::new(),
            mod_spawn_chance_percent: IndexMap::new(),
            allow_duplicate_items_in_static_containers: false,
            locked_templates_respect_spawn_limits: true,
        }
    }
}

impl LocationLootConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path)
    }

    /// Config with container randomisation switched on for `map_id`.
    pub fn randomised_for(map_id: &str) -> Self {
        let mut config = Self::default();
        config.container_randomisation.enabled = true;
        config
            .container_randomisation
            .maps
            .insert(map_id.to_string(), true);
        config
    }

    pub fn static_multiplier(&self, map_id: &str) -> f64 {
        self.static_loot_multiplier
            .get(map_id)
            .copied()
            .unwrap_or(1.0)
    }

    pub fn loose_multiplier(&self, map_id: &str) -> f64 {
        self.loose_loot_multiplier.get(map_id).copied().unwrap_or(1.0)
    }

    pub fn spawn_limits(&self, map_id: &str) -> IndexMap<String, u32> {
        self.loot_max_spawn_limits
            .get(map_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn randomisation_enabled(&self, map_id: &str) -> bool {
        self.container_randomisation.enabled
            && self
                .container_randomisation
                .maps
                .get(map_id)
                .copied()
                .unwrap_or(false)
    }

    pub fn is_non_randomisable_type(&self, container_tpl: &str) -> bool {
        self.container_randomisation
            .container_types_to_not_randomise
            .iter()
            .any(|t| t == container_tpl)
    }

    pub fn loose_point_blacklist(&self, map_id: &str) -> &[String] {
        self.loose_loot_blacklist
            .get(map_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn strips_children(&self, tpl: &str) -> bool {
        self.tpls_to_strip_child_items_from.iter().any(|t| t == tpl)
    }

    /// Slot names match case-insensitively on both sides.
    pub fn mod_spawn_chance(&self, slot_name: &str) -> Option<f64> {
        self.mod_spawn_chance_percent
            .iter()
            .find(|(slot, _)| slot.eq_ignore_ascii_case(slot_name))
            .map(|(_, chance)| *chance)
    }
}
