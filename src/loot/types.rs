//! Location loot tables (inputs) and spawn point records (output).

use super::weighted::WeightedEntry;
use crate::items::ItemRecord;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A populated static container or loose loot point. Items are root first.
///
/// For loose points read from a location table, `items` holds the authored
/// candidate trees and `item_distribution` weights their root ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnPointRecord {
    pub location_id: String,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub always_spawn: bool,
    #[serde(default)]
    pub items: Vec<ItemRecord>,
    #[serde(default)]
    pub item_distribution: Vec<WeightedEntry<String>>,
}

impl SpawnPointRecord {
    pub fn root(&self) -> Option<&ItemRecord> {
        self.items.first()
    }
}

/// A map-authored static container. `items[0]` is the container itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInstance {
    pub location_id: String,
    #[serde(default)]
    pub probability: f64,
    #[serde(default)]
    pub always_spawn: bool,
    /// Randomisation group; empty means ungrouped.
    #[serde(default)]
    pub group_id: String,
    pub items: Vec<ItemRecord>,
}

impl ContainerInstance {
    pub fn template_id(&self) -> Option<&str> {
        self.items.first().map(|i| i.tpl.as_str())
    }

    pub fn root_id(&self) -> Option<&str> {
        self.items.first().map(|i| i.id.as_str())
    }
}

/// How many containers of a randomisation group may be picked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerGroup {
    pub min_containers: u32,
    pub max_containers: u32,
}

/// A template that always goes into one specific container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticForcedItem {
    pub container_id: String,
    pub tpl: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticContainerDetails {
    pub static_weapons: Vec<SpawnPointRecord>,
    pub static_containers: Vec<ContainerInstance>,
    pub static_forced: Vec<StaticForcedItem>,
    pub container_groups: IndexMap<String, ContainerGroup>,
}

/// Loot table for one container template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerLootTable {
    pub item_count_distribution: Vec<WeightedEntry<u32>>,
    pub item_distribution: Vec<WeightedEntry<String>>,
}

/// Container template id -> loot table.
pub type StaticLootDistribution = IndexMap<String, ContainerLootTable>;

/// Ammo caliber -> weighted cartridge templates.
pub type StaticAmmoDistribution = IndexMap<String, Vec<WeightedEntry<String>>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnPointCount {
    pub mean: f64,
    pub std: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LooseLootTable {
    pub spawnpoint_count: SpawnPointCount,
    pub spawnpoints_forced: Vec<SpawnPointRecord>,
    pub spawnpoints: Vec<SpawnPointRecord>,
}

/// Everything the generator reads for one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationLootTables {
    pub static_details: StaticContainerDetails,
    pub static_loot: StaticLootDistribution,
    pub static_ammo: StaticAmmoDistribution,
    pub loose_loot: LooseLootTable,
}

/// The containers chosen from one randomisation group.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerGroupSelection {
    pub group_id: String,
    pub chosen_count: u32,
    pub candidates: Vec<WeightedEntry<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_instance_ids() {
        let container = ContainerInstance {
            location_id: "c1".to_string(),
            probability: 0.5,
            always_spawn: false,
            group_id: String::new(),
            items: vec![ItemRecord::root("root_1", "tpl_crate")],
        };
        assert_eq!(container.template_id(), Some("tpl_crate"));
        assert_eq!(container.root_id(), Some("root_1"));
    }

    #[test]
    fn test_location_tables_parse_with_defaults() {
        let json = r#"{
            "staticLoot": {
                "tpl_crate": {
                    "itemCountDistribution": [{"key": 2, "weight": 1.0}],
                    "itemDistribution": [{"key": "tpl_bolts", "weight": 5.0}]
                }
            },
            "looseLoot": {"spawnpointCount": {"mean": 10.0, "std": 2.0}}
        }"#;
        let tables: LocationLootTables = serde_json::from_str(json).unwrap();
        assert_eq!(tables.static_loot["tpl_crate"].item_count_distribution[0].key, 2);
        assert!(tables.static_details.static_containers.is_empty());
        assert!((tables.loose_loot.spawnpoint_count.mean - 10.0).abs() < f64::EPSILON);
    }
}
