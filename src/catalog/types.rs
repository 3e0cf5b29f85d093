use serde::{Deserialize, Serialize};

/// Catalog category used to pick how an item hierarchy is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseClass {
    Money,
    Ammo,
    AmmoBox,
    Magazine,
    Weapon,
    Armor,
    ArmoredRig,
    Headwear,
    ArmorPlate,
    Mod,
    Container,
    Key,
    Barter,
    Other,
}

impl BaseClass {
    /// Equipment that carries plate or soft-armor slots.
    pub const ARMORED: [BaseClass; 3] = [BaseClass::Armor, BaseClass::ArmoredRig, BaseClass::Headwear];
}

/// A named attachment slot with its allowed templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDef {
    pub name: String,
    #[serde(default)]
    pub filter: Vec<String>,
    #[serde(default)]
    pub required: bool,
    /// Percent chance (0-100) this slot is populated when built procedurally.
    #[serde(default)]
    pub spawn_chance: Option<f64>,
}

/// Cartridge storage of a magazine or ammo box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartridgeSlot {
    pub name: String,
    pub max_count: u32,
    #[serde(default)]
    pub filter: Vec<String>,
}

/// An inner grid of a container template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDef {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// How much an attached child grows its parent's footprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraSize {
    pub left: u32,
    pub right: u32,
    pub up: u32,
    pub down: u32,
    /// Added on top of other children instead of merged by maximum.
    pub force_add: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemTemplate {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub base_class: BaseClass,
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default = "default_size")]
    pub height: u32,
    #[serde(default)]
    pub extra_size: ExtraSize,
    #[serde(default = "default_size")]
    pub stack_max_size: u32,
    #[serde(default = "default_size")]
    pub stack_min_random: u32,
    #[serde(default = "default_size")]
    pub stack_max_random: u32,
    #[serde(default)]
    pub slots: Vec<SlotDef>,
    #[serde(default)]
    pub cartridges: Vec<CartridgeSlot>,
    #[serde(default)]
    pub grids: Vec<GridDef>,
    #[serde(default)]
    pub ammo_caliber: Option<String>,
    #[serde(default)]
    pub default_ammo: Option<String>,
}

fn default_size() -> u32 {
    1
}

impl ItemTemplate {
    /// A 1x1 template of the given class with no slots; callers adjust fields from here.
    pub fn new(id: impl Into<String>, base_class: BaseClass) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            base_class,
            width: 1,
            height: 1,
            extra_size: ExtraSize::default(),
            stack_max_size: 1,
            stack_min_random: 1,
            stack_max_random: 1,
            slots: Vec::new(),
            cartridges: Vec::new(),
            grids: Vec::new(),
            ammo_caliber: None,
            default_ammo: None,
        }
    }

    /// Total cartridge capacity across all cartridge slots.
    pub fn cartridge_capacity(&self) -> u32 {
        self.cartridges.iter().map(|c| c.max_count).sum()
    }

    /// The grid loot is placed into; containers use their first grid.
    pub fn main_grid(&self) -> Option<&GridDef> {
        self.grids.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_defaults_from_json() {
        let json = r#"{"id":"mag_1","baseClass":"Magazine","cartridges":[{"name":"cartridges","maxCount":30,"filter":["ammo_545"]}]}"#;
        let tpl: ItemTemplate = serde_json::from_str(json).unwrap();
        assert_eq!(tpl.width, 1);
        assert_eq!(tpl.height, 1);
        assert_eq!(tpl.stack_max_size, 1);
        assert_eq!(tpl.cartridge_capacity(), 30);
        assert!(tpl.main_grid().is_none());
    }

    #[test]
    fn test_armored_classes() {
        assert!(BaseClass::ARMORED.contains(&BaseClass::Headwear));
        assert!(!BaseClass::ARMORED.contains(&BaseClass::Weapon));
    }
}
