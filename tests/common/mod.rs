//! Shared fixture: a small location with every kind of loot the engine handles.

#![allow(dead_code)]

use indexmap::IndexMap;
use lootgen::catalog::{BaseClass, CartridgeSlot, GridDef, ItemDatabase, ItemTemplate};
use lootgen::config::LocationLootConfig;
use lootgen::items::ItemRecord;
use lootgen::loot::{
    ContainerGroup, ContainerInstance, ContainerLootTable, LocationLootTables, SpawnPointCount,
    SpawnPointRecord, StaticForcedItem, WeightedEntry,
};

pub const MAP: &str = "bigmap";
pub const CRATE_SIZE: u32 = 4;

fn container_template(id: &str, width: u32, height: u32) -> ItemTemplate {
    let mut tpl = ItemTemplate::new(id, BaseClass::Container);
    tpl.grids = vec![GridDef {
        name: "main".to_string(),
        width,
        height,
    }];
    tpl
}

pub fn templates() -> Vec<ItemTemplate> {
    let mut roubles = ItemTemplate::new("roubles", BaseClass::Money);
    roubles.stack_max_size = 500_000;
    roubles.stack_min_random = 100;
    roubles.stack_max_random = 5_000;

    let mut ammo = ItemTemplate::new("ammo_545", BaseClass::Ammo);
    ammo.stack_max_size = 60;
    ammo.stack_min_random = 10;
    ammo.stack_max_random = 60;
    ammo.ammo_caliber = Some("545".to_string());

    let mut magazine = ItemTemplate::new("mag30", BaseClass::Magazine);
    magazine.height = 2;
    magazine.cartridges = vec![CartridgeSlot {
        name: "cartridges".to_string(),
        max_count: 30,
        filter: vec!["ammo_545".to_string()],
    }];

    let mut ammo_box = ItemTemplate::new("ammo_box", BaseClass::AmmoBox);
    ammo_box.cartridges = vec![CartridgeSlot {
        name: "cartridges".to_string(),
        max_count: 120,
        filter: vec!["ammo_545".to_string()],
    }];

    let mut rifle = ItemTemplate::new("rifle", BaseClass::Weapon);
    rifle.width = 4;
    rifle.ammo_caliber = Some("545".to_string());
    rifle.default_ammo = Some("ammo_545".to_string());

    let mut pistol = ItemTemplate::new("pistol", BaseClass::Weapon);
    pistol.width = 2;

    vec![
        container_template("crate", CRATE_SIZE, CRATE_SIZE),
        container_template("empty_crate", 2, 2),
        container_template("backpack", 3, 3),
        roubles,
        ammo,
        magazine,
        ammo_box,
        rifle,
        pistol,
        ItemTemplate::new("bolts", BaseClass::Barter),
        ItemTemplate::new("nuts", BaseClass::Barter),
        ItemTemplate::new("strap", BaseClass::Mod),
    ]
}

pub fn rifle_preset() -> Vec<ItemRecord> {
    vec![
        ItemRecord::root("preset_rifle", "rifle"),
        ItemRecord::child("preset_rifle_mag", "mag30", "preset_rifle", "mod_magazine"),
    ]
}

fn container(id: &str, tpl: &str, probability: f64, group: &str) -> ContainerInstance {
    ContainerInstance {
        location_id: id.to_string(),
        probability,
        always_spawn: false,
        group_id: group.to_string(),
        items: vec![ItemRecord::root(format!("{id}_root"), tpl)],
    }
}

fn loose_point(id: &str, probability: f64, tpls: &[&str]) -> SpawnPointRecord {
    let items: Vec<ItemRecord> = tpls
        .iter()
        .enumerate()
        .map(|(i, tpl)| ItemRecord::root(format!("{id}_{i}"), *tpl))
        .collect();
    let item_distribution = items
        .iter()
        .map(|i| WeightedEntry::new(i.id.clone(), 1.0))
        .collect();
    SpawnPointRecord {
        location_id: id.to_string(),
        probability,
        always_spawn: false,
        items,
        item_distribution,
    }
}

pub fn location_tables() -> LocationLootTables {
    let mut tables = LocationLootTables::default();

    let details = &mut tables.static_details;
    details.static_weapons.push(SpawnPointRecord {
        location_id: "mounted_gun".to_string(),
        probability: 1.0,
        always_spawn: true,
        items: vec![ItemRecord::root("mounted_gun_root", "rifle")],
        item_distribution: Vec::new(),
    });
    details.static_containers = vec![
        container("guaranteed_crate", "crate", 1.0, ""),
        container("group_crate_a", "crate", 0.5, "warehouse"),
        container("group_crate_b", "crate", 0.5, "warehouse"),
        container("group_crate_c", "crate", 0.5, "warehouse"),
        container("rare_crate", "crate", 0.2, ""),
        container("empty_box", "empty_crate", 1.0, ""),
    ];
    details.static_forced.push(StaticForcedItem {
        container_id: "guaranteed_crate".to_string(),
        tpl: "nuts".to_string(),
    });
    details.container_groups.insert(
        "warehouse".to_string(),
        ContainerGroup {
            min_containers: 1,
            max_containers: 2,
        },
    );

    tables.static_loot.insert(
        "crate".to_string(),
        ContainerLootTable {
            item_count_distribution: vec![WeightedEntry::new(3, 1.0), WeightedEntry::new(6, 1.0)],
            item_distribution: vec![
                WeightedEntry::new("roubles".to_string(), 5.0),
                WeightedEntry::new("bolts".to_string(), 3.0),
                WeightedEntry::new("rifle".to_string(), 1.0),
                WeightedEntry::new("pistol".to_string(), 1.0),
                WeightedEntry::new("ammo_box".to_string(), 1.0),
                WeightedEntry::new("mag30".to_string(), 1.0),
                WeightedEntry::new("ammo_545".to_string(), 2.0),
            ],
        },
    );
    tables.static_loot.insert(
        "empty_crate".to_string(),
        ContainerLootTable {
            item_count_distribution: vec![WeightedEntry::new(0, 1.0)],
            item_distribution: vec![WeightedEntry::new("bolts".to_string(), 1.0)],
        },
    );
    tables.static_ammo.insert(
        "545".to_string(),
        vec![WeightedEntry::new("ammo_545".to_string(), 1.0)],
    );

    let loose = &mut tables.loose_loot;
    loose.spawnpoint_count = SpawnPointCount {
        mean: 4.0,
        std: 1.0,
    };
    loose.spawnpoints_forced.push(loose_point("forced_point", 0.0, &["bolts"]));

    let mut always = loose_point("always_point", 0.05, &["backpack"]);
    always.always_spawn = true;
    always
        .items
        .push(ItemRecord::child("always_strap", "strap", "always_point_0", "mod_strap"));
    loose.spawnpoints.push(always);
    loose.spawnpoints.push(loose_point("certain_point", 1.0, &["roubles"]));
    let pools: [&[&str]; 5] = [
        &["bolts", "nuts"],
        &["mag30"],
        &["pistol", "rifle"],
        &["ammo_545"],
        &["nuts"],
    ];
    for (i, tpls) in pools.iter().enumerate() {
        loose
            .spawnpoints
            .push(loose_point(&format!("point_{i}"), 0.4, tpls));
    }

    tables
}

pub fn database() -> ItemDatabase {
    let mut db = ItemDatabase::new();
    for template in templates() {
        db.add_template(template);
    }
    db.add_preset("rifle", rifle_preset());
    db.add_location(MAP, location_tables());
    db
}

pub fn config() -> LocationLootConfig {
    LocationLootConfig::randomised_for(MAP)
}

pub fn spawn_limits(limits: &[(&str, u32)]) -> IndexMap<String, IndexMap<String, u32>> {
    let mut per_map = IndexMap::new();
    per_map.insert(
        MAP.to_string(),
        limits.iter().map(|(tpl, max)| (tpl.to_string(), *max)).collect(),
    );
    per_map
}
