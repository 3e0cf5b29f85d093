//! In-memory catalog loaded from JSON.
//!
//! Implements every collaborator seam so tests, the simulator and simple
//! hosts can run the generator from a single file.

use super::traits::{ItemCatalog, LocationSource, LootBlacklist, PresetTable, SeasonalFilter};
use super::types::ItemTemplate;
use crate::error::Result;
use crate::items::ItemRecord;
use crate::loot::LocationLootTables;
use crate::utils::persistence::load_json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemDatabase {
    pub templates: IndexMap<String, ItemTemplate>,
    /// Template id -> default preset tree (root first)
    pub presets: IndexMap<String, Vec<ItemRecord>>,
    pub seasonal_event_active: bool,
    /// Templates that only spawn while the seasonal event runs
    pub seasonal_templates: HashSet<String>,
    pub loot_blacklist: HashSet<String>,
    pub locations: IndexMap<String, LocationLootTables>,
}

impl ItemDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path)
    }

    pub fn add_template(&mut self, template: ItemTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn add_preset(&mut self, tpl: impl Into<String>, items: Vec<ItemRecord>) {
        self.presets.insert(tpl.into(), items);
    }

    pub fn add_location(&mut self, location_id: impl Into<String>, tables: LocationLootTables) {
        self.locations.insert(location_id.into(), tables);
    }
}

impl ItemCatalog for ItemDatabase {
    fn template(&self, tpl: &str) -> Option<&ItemTemplate> {
        self.templates.get(tpl)
    }
}

impl PresetTable for ItemDatabase {
    fn default_preset(&self, tpl: &str) -> Option<&[ItemRecord]> {
        self.presets.get(tpl).map(Vec::as_slice)
    }
}

impl SeasonalFilter for ItemDatabase {
    fn is_seasonal_event_active(&self) -> bool {
        self.seasonal_event_active
    }

    fn inactive_seasonal_templates(&self) -> HashSet<String> {
        if self.seasonal_event_active {
            HashSet::new()
        } else {
            self.seasonal_templates.clone()
        }
    }
}

impl LootBlacklist for ItemDatabase {
    fn is_loot_blacklisted(&self, tpl: &str) -> bool {
        self.loot_blacklist.contains(tpl)
    }
}

impl LocationSource for ItemDatabase {
    fn location(&self, location_id: &str) -> Option<&LocationLootTables> {
        self.locations.get(location_id)
    }
}
