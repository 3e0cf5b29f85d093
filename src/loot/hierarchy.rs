//! Builds complete item hierarchies from a chosen template id.
//!
//! Dispatch is by catalog base class:
//! - money and ammo get a rolled stack size
//! - ammo boxes are filled to capacity
//! - magazines may be filled with compatible cartridges
//! - weapons come from their default preset with a loaded magazine
//! - armor comes from its preset, or gets slot children rolled one by one
//! - anything else copies its authored children, if any

use super::pass::LootPass;
use super::rolls::{roll_percent, uniform_int};
use super::types::StaticAmmoDistribution;
use super::weighted::WeightedSampler;
use crate::catalog::{BaseClass, ItemTemplate, LootContext};
use crate::config::LocationLootConfig;
use crate::constants::{CARTRIDGE_SLOT, MAGAZINE_SLOT};
use crate::error::{LootError, Result};
use crate::items::{regenerate_ids, ItemLocation, ItemRecord};
use rand::seq::SliceRandom;
use rand::Rng;

/// Which generator asked for the item; magazines fill differently per source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LootSource {
    StaticContainer,
    LooseLoot,
}

/// A generated hierarchy, root first, with its bounding footprint.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltItem {
    pub items: Vec<ItemRecord>,
    pub width: u32,
    pub height: u32,
}

impl BuiltItem {
    pub fn root(&self) -> &ItemRecord {
        &self.items[0]
    }
}

pub struct ItemHierarchyBuilder<'a> {
    ctx: LootContext<'a>,
    config: &'a LocationLootConfig,
    ammo: &'a StaticAmmoDistribution,
}

impl<'a> ItemHierarchyBuilder<'a> {
    pub fn new(
        ctx: LootContext<'a>,
        config: &'a LocationLootConfig,
        ammo: &'a StaticAmmoDistribution,
    ) -> Self {
        Self { ctx, config, ammo }
    }

    /// Builds `tpl` with fresh ids.
    ///
    /// `authored` is the map-authored tree for this item (root first), used
    /// only for generic items. A missing template is an item-level error; a
    /// corrupt preset is fatal to the pass.
    pub fn build<R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        tpl: &str,
        source: LootSource,
        authored: Option<&[ItemRecord]>,
    ) -> Result<BuiltItem> {
        let template = self
            .ctx
            .catalog
            .template(tpl)
            .ok_or_else(|| LootError::MissingTemplate(tpl.to_string()))?;

        let items = match template.base_class {
            BaseClass::Money | BaseClass::Ammo => {
                let stack = self.roll_stack_count(template, pass.rng);
                vec![ItemRecord::root(pass.next_id(), tpl).with_stack(stack)]
            }
            BaseClass::AmmoBox => self.build_ammo_box(template, pass),
            BaseClass::Magazine => self.build_magazine(template, source, pass),
            BaseClass::Weapon => self.build_weapon(template, pass)?,
            class if BaseClass::ARMORED.contains(&class) && !template.slots.is_empty() => {
                self.build_armor(template, pass)?
            }
            _ => self.build_generic(template, authored, pass),
        };

        let (width, height) = self
            .ctx
            .catalog
            .item_size(&items, &items[0].id)
            .unwrap_or((template.width, template.height));

        Ok(BuiltItem {
            items,
            width,
            height,
        })
    }

    fn roll_stack_count(&self, template: &ItemTemplate, rng: &mut impl Rng) -> u32 {
        if template.stack_max_size <= 1 {
            return 1;
        }
        let max = template.stack_max_random.min(template.stack_max_size);
        uniform_int(rng, template.stack_min_random, max).max(1)
    }

    fn build_ammo_box<R: Rng>(
        &self,
        template: &ItemTemplate,
        pass: &mut LootPass<'_, R>,
    ) -> Vec<ItemRecord> {
        let root_id = pass.next_id();
        let mut items = vec![ItemRecord::root(root_id.clone(), &template.id)];

        for slot in &template.cartridges {
            let Some(ammo_tpl) = slot.filter.first() else {
                log::warn!("Ammo box {} slot {} has no cartridge filter", template.id, slot.name);
                continue;
            };
            if self.ctx.catalog.template(ammo_tpl).is_none() {
                log::error!("Ammo box {} references missing cartridge {}", template.id, ammo_tpl);
                continue;
            }
            self.push_cartridges(&mut items, &root_id, ammo_tpl, slot.max_count, pass);
        }
        items
    }

    fn build_magazine<R: Rng>(
        &self,
        template: &ItemTemplate,
        source: LootSource,
        pass: &mut LootPass<'_, R>,
    ) -> Vec<ItemRecord> {
        let root_id = pass.next_id();
        let mut items = vec![ItemRecord::root(root_id.clone(), &template.id)];

        let (chance, min_fill) = match source {
            LootSource::StaticContainer => (
                self.config.static_magazine_loot_has_ammo_chance_percent,
                self.config.min_fill_static_magazine_percent,
            ),
            LootSource::LooseLoot => (
                self.config.magazine_loot_has_ammo_chance_percent,
                self.config.min_fill_loose_magazine_percent,
            ),
        };
        if roll_percent(pass.rng, chance) {
            self.fill_magazine(&mut items, &root_id, template, None, None, min_fill, pass);
        }
        items
    }

    fn build_weapon<R: Rng>(
        &self,
        template: &ItemTemplate,
        pass: &mut LootPass<'_, R>,
    ) -> Result<Vec<ItemRecord>> {
        let Some(mut items) = self.preset_tree(template, pass)? else {
            log::warn!("No default preset for weapon {}, spawning bare weapon", template.id);
            return Ok(vec![ItemRecord::root(pass.next_id(), &template.id)]);
        };

        let magazine = items
            .iter()
            .find(|i| i.slot_id.as_deref() == Some(MAGAZINE_SLOT))
            .map(|m| (m.id.clone(), m.tpl.clone()));
        if let Some((mag_id, mag_tpl)) = magazine {
            match self.ctx.catalog.template(&mag_tpl) {
                Some(mag_template) => self.fill_magazine(
                    &mut items,
                    &mag_id,
                    mag_template,
                    template.ammo_caliber.as_deref(),
                    template.default_ammo.as_deref(),
                    self.config.weapon_magazine_min_fill_percent,
                    pass,
                ),
                None => log::error!("Weapon {} preset has unknown magazine {}", template.id, mag_tpl),
            }
        }
        Ok(items)
    }

    fn build_armor<R: Rng>(
        &self,
        template: &ItemTemplate,
        pass: &mut LootPass<'_, R>,
    ) -> Result<Vec<ItemRecord>> {
        if let Some(items) = self.preset_tree(template, pass)? {
            return Ok(items);
        }

        let root_id = pass.next_id();
        let mut items = vec![ItemRecord::root(root_id.clone(), &template.id)];
        for slot in &template.slots {
            let chance = if slot.required {
                100.0
            } else {
                self.config
                    .mod_spawn_chance(&slot.name)
                    .or(slot.spawn_chance)
                    .unwrap_or(0.0)
            };
            if !roll_percent(pass.rng, chance) {
                continue;
            }

            let candidates: Vec<&String> = slot
                .filter
                .iter()
                .filter(|tpl| self.ctx.catalog.template(tpl).is_some())
                .collect();
            let Some(child_tpl) = candidates.choose(pass.rng) else {
                continue;
            };
            let child_id = pass.next_id();
            items.push(ItemRecord::child(child_id, child_tpl.as_str(), &root_id, &slot.name));
        }
        Ok(items)
    }

    fn build_generic<R: Rng>(
        &self,
        template: &ItemTemplate,
        authored: Option<&[ItemRecord]>,
        pass: &mut LootPass<'_, R>,
    ) -> Vec<ItemRecord> {
        let authored = authored.filter(|tree| tree.len() > 1 && tree[0].tpl == template.id);
        match authored {
            Some(tree) if !self.config.strips_children(&template.id) => {
                match regenerate_ids(tree, &template.id, &mut pass.ids, pass.rng) {
                    Ok(items) => items,
                    Err(e) => {
                        log::warn!("Dropping children of {}: {}", template.id, e);
                        vec![ItemRecord::root(pass.next_id(), &template.id)]
                    }
                }
            }
            _ => vec![ItemRecord::root(pass.next_id(), &template.id)],
        }
    }

    /// The template's default preset copied onto fresh ids, if it has one.
    fn preset_tree<R: Rng>(
        &self,
        template: &ItemTemplate,
        pass: &mut LootPass<'_, R>,
    ) -> Result<Option<Vec<ItemRecord>>> {
        let Some(preset) = self.ctx.presets.default_preset(&template.id) else {
            return Ok(None);
        };
        let items = regenerate_ids(preset, &template.id, &mut pass.ids, pass.rng)?;
        if items[0].tpl != template.id {
            return Err(LootError::CorruptPreset {
                tpl: template.id.clone(),
                reason: format!("preset root is {}", items[0].tpl),
            });
        }
        Ok(Some(items))
    }

    /// Loads `magazine` with between `min_fill_percent` and 100% of its capacity.
    #[allow(clippy::too_many_arguments)]
    fn fill_magazine<R: Rng>(
        &self,
        items: &mut Vec<ItemRecord>,
        magazine_id: &str,
        magazine: &ItemTemplate,
        caliber: Option<&str>,
        fallback_ammo: Option<&str>,
        min_fill_percent: f64,
        pass: &mut LootPass<'_, R>,
    ) {
        let capacity = magazine.cartridge_capacity();
        if capacity == 0 {
            return;
        }

        let filter: Vec<&str> = magazine
            .cartridges
            .iter()
            .flat_map(|c| c.filter.iter().map(String::as_str))
            .collect();
        let caliber = caliber.map(str::to_string).or_else(|| {
            filter
                .iter()
                .find_map(|tpl| self.ctx.catalog.template(tpl))
                .and_then(|t| t.ammo_caliber.clone())
        });

        let Some(ammo_tpl) = self.choose_cartridge(caliber.as_deref(), &filter, fallback_ammo, pass.rng)
        else {
            log::warn!("No cartridge found for magazine {}", magazine.id);
            return;
        };

        let min = ((capacity as f64 * min_fill_percent / 100.0).ceil() as u32).clamp(1, capacity);
        let count = uniform_int(pass.rng, min, capacity);
        // Preset magazines may arrive loaded
        items.retain(|i| !(i.is_child_of(magazine_id) && i.slot_id.as_deref() == Some(CARTRIDGE_SLOT)));
        self.push_cartridges(items, magazine_id, &ammo_tpl, count, pass);
    }

    /// Weighted pick from the caliber's ammo distribution restricted to the
    /// magazine filter, then the weapon's default ammo, then the first filter entry.
    fn choose_cartridge(
        &self,
        caliber: Option<&str>,
        filter: &[&str],
        fallback_ammo: Option<&str>,
        rng: &mut impl Rng,
    ) -> Option<String> {
        if let Some(distribution) = caliber.and_then(|c| self.ammo.get(c)) {
            let sampler = WeightedSampler::new(
                distribution
                    .iter()
                    .filter(|e| filter.is_empty() || filter.contains(&e.key.as_str()))
                    .filter(|e| self.template_exists(&e.key))
                    .cloned(),
            );
            if let Some(tpl) = sampler.draw_one(rng) {
                return Some(tpl);
            }
        }

        fallback_ammo
            .filter(|tpl| self.template_exists(tpl))
            .or_else(|| filter.iter().copied().find(|tpl| self.template_exists(tpl)))
            .map(str::to_string)
    }

    fn template_exists(&self, tpl: &str) -> bool {
        self.ctx.catalog.template(tpl).is_some()
    }

    /// Appends `count` cartridges of `ammo_tpl` under `parent_id`, split into
    /// stacks no larger than the cartridge's max stack size.
    fn push_cartridges<R: Rng>(
        &self,
        items: &mut Vec<ItemRecord>,
        parent_id: &str,
        ammo_tpl: &str,
        count: u32,
        pass: &mut LootPass<'_, R>,
    ) {
        let stack_max = self
            .ctx
            .catalog
            .template(ammo_tpl)
            .map_or(count, |t| t.stack_max_size)
            .max(1);

        let mut remaining = count;
        let mut index = 0;
        while remaining > 0 {
            let stack = remaining.min(stack_max);
            let id = pass.next_id();
            items.push(
                ItemRecord::child(id, ammo_tpl, parent_id, CARTRIDGE_SLOT)
                    .with_stack(stack)
                    .with_location(ItemLocation::Index(index)),
            );
            remaining -= stack;
            index += 1;
        }
    }
}
