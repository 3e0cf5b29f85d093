//! Read-only collaborator seams consumed by the generator.
//!
//! Everything behind these traits is shared between concurrent passes and
//! must never be mutated while a pass is running.

use super::types::{BaseClass, ItemTemplate};
use crate::items::ItemRecord;
use crate::loot::LocationLootTables;
use std::collections::HashSet;

pub trait ItemCatalog: Send + Sync {
    fn template(&self, tpl: &str) -> Option<&ItemTemplate>;

    fn is_of_base_class(&self, tpl: &str, class: BaseClass) -> bool {
        self.template(tpl).is_some_and(|t| t.base_class == class)
    }

    fn is_of_any_base_class(&self, tpl: &str, classes: &[BaseClass]) -> bool {
        self.template(tpl)
            .is_some_and(|t| classes.contains(&t.base_class))
    }

    /// Bounding footprint of the tree rooted at `root_id`.
    ///
    /// Children grow the root by their extra size. Growth in each direction is
    /// the maximum over children, plus the sum of any child that forces
    /// additive growth. Cartridges never change the footprint.
    fn item_size(&self, items: &[ItemRecord], root_id: &str) -> Option<(u32, u32)> {
        let root = items.iter().find(|i| i.id == root_id)?;
        let root_tpl = self.template(&root.tpl)?;

        let tree = crate::items::collect_with_descendants(items, root_id);
        let (mut left, mut right, mut up, mut down) = (0, 0, 0, 0);
        let (mut forced_left, mut forced_right, mut forced_up, mut forced_down) = (0, 0, 0, 0);

        for child in tree.iter().skip(1) {
            let Some(tpl) = self.template(&child.tpl) else {
                continue;
            };
            if tpl.base_class == BaseClass::Ammo {
                continue;
            }
            let extra = tpl.extra_size;
            if extra.force_add {
                forced_left += extra.left;
                forced_right += extra.right;
                forced_up += extra.up;
                forced_down += extra.down;
            } else {
                left = left.max(extra.left);
                right = right.max(extra.right);
                up = up.max(extra.up);
                down = down.max(extra.down);
            }
        }

        Some((
            root_tpl.width + left + right + forced_left + forced_right,
            root_tpl.height + up + down + forced_up + forced_down,
        ))
    }
}

pub trait PresetTable: Send + Sync {
    /// The default assembled tree for `tpl`, as authored (ids not yet regenerated).
    fn default_preset(&self, tpl: &str) -> Option<&[ItemRecord]>;
}

pub trait SeasonalFilter: Send + Sync {
    fn is_seasonal_event_active(&self) -> bool;

    /// Templates that must not spawn because their event is not running.
    fn inactive_seasonal_templates(&self) -> HashSet<String>;
}

pub trait LootBlacklist: Send + Sync {
    fn is_loot_blacklisted(&self, tpl: &str) -> bool;
}

pub trait LocationSource: Send + Sync {
    fn location(&self, location_id: &str) -> Option<&LocationLootTables>;
}

/// The read-only collaborators one pass consults.
#[derive(Clone, Copy)]
pub struct LootContext<'a> {
    pub catalog: &'a dyn ItemCatalog,
    pub presets: &'a dyn PresetTable,
    pub seasonal: &'a dyn SeasonalFilter,
    pub blacklist: &'a dyn LootBlacklist,
}

impl<'a> LootContext<'a> {
    /// Builds a context where one value serves every seam, e.g. an `ItemDatabase`.
    pub fn from_source<S>(source: &'a S) -> Self
    where
        S: ItemCatalog + PresetTable + SeasonalFilter + LootBlacklist,
    {
        Self {
            catalog: source,
            presets: source,
            seasonal: source,
            blacklist: source,
        }
    }

    /// Templates that can never spawn in this pass: inactive seasonal items.
    /// Blacklisted templates are checked per template through `is_excluded`.
    pub fn seasonal_exclusions(&self) -> HashSet<String> {
        if self.seasonal.is_seasonal_event_active() {
            HashSet::new()
        } else {
            self.seasonal.inactive_seasonal_templates()
        }
    }

    pub fn is_excluded(&self, tpl: &str, seasonal: &HashSet<String>) -> bool {
        seasonal.contains(tpl) || self.blacklist.is_loot_blacklisted(tpl)
    }
}
