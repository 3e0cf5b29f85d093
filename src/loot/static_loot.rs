//! Static container population.
//!
//! Containers are split into guaranteed and randomisable sets. Guaranteed
//! containers always get loot. Randomisable ones are either all populated
//! (randomisation off for the map) or picked per group: ungrouped containers
//! roll their own probability, real groups draw a container count and then
//! that many containers weighted by probability.

use super::hierarchy::{ItemHierarchyBuilder, LootSource};
use super::pass::LootPass;
use super::space_map::ContainerSpaceMap;
use super::types::{
    ContainerGroup, ContainerGroupSelection, ContainerInstance, ContainerLootTable,
    SpawnPointRecord, StaticAmmoDistribution, StaticContainerDetails, StaticLootDistribution,
};
use super::rolls::uniform_int;
use super::weighted::{WeightedEntry, WeightedSampler};
use crate::catalog::{BaseClass, LootContext};
use crate::config::LocationLootConfig;
use crate::constants::CONTAINER_GRID_SLOT;
use crate::error::Result;
use crate::items::{ItemLocation, ItemRecord, Rotation};
use indexmap::IndexMap;
use rand::Rng;
use std::collections::HashSet;

pub struct StaticLootPlacer<'a> {
    ctx: LootContext<'a>,
    config: &'a LocationLootConfig,
    builder: ItemHierarchyBuilder<'a>,
}

impl<'a> StaticLootPlacer<'a> {
    pub fn new(
        ctx: LootContext<'a>,
        config: &'a LocationLootConfig,
        ammo: &'a StaticAmmoDistribution,
    ) -> Self {
        Self {
            ctx,
            config,
            builder: ItemHierarchyBuilder::new(ctx, config, ammo),
        }
    }

    /// Populates the static weapons and containers of `map_id`.
    ///
    /// Only a corrupt preset aborts; bad templates and full containers only
    /// cost the item or container they affect.
    pub fn place<R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        map_id: &str,
        details: &StaticContainerDetails,
        loot: &StaticLootDistribution,
    ) -> Result<Vec<SpawnPointRecord>> {
        let mut result = details.static_weapons.clone();
        log::debug!("Added {} static weapons on {}", result.len(), map_id);

        let seasonal = self.ctx.seasonal_exclusions();
        let mut forced: IndexMap<&str, Vec<String>> = IndexMap::new();
        for entry in &details.static_forced {
            forced
                .entry(entry.container_id.as_str())
                .or_default()
                .push(entry.tpl.clone());
        }

        let (guaranteed, randomisable): (Vec<&ContainerInstance>, Vec<&ContainerInstance>) = details
            .static_containers
            .iter()
            .partition(|c| self.is_guaranteed(c));

        let mut selected: Vec<&ContainerInstance> = guaranteed;
        if !self.config.randomisation_enabled(map_id) {
            selected.extend(randomisable);
        } else {
            let chosen = self.choose_randomisable(pass, &randomisable, &details.container_groups);
            selected.extend(
                randomisable
                    .into_iter()
                    .filter(|c| chosen.contains(&c.location_id)),
            );
        }

        for container in selected {
            let forced_tpls = forced
                .get(container.location_id.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            if let Some(record) =
                self.populate_container(pass, map_id, container, loot, forced_tpls, &seasonal)?
            {
                result.push(record);
            }
        }

        Ok(result)
    }

    /// Probability 1, always-spawn, or a container type exempt from randomisation.
    pub fn is_guaranteed(&self, container: &ContainerInstance) -> bool {
        container.probability >= 1.0
            || container.always_spawn
            || container
                .template_id()
                .is_some_and(|tpl| self.config.is_non_randomisable_type(tpl))
    }

    /// Draws each real group's container count. Ungrouped containers are not included.
    pub fn group_selections<R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        containers: &[&ContainerInstance],
        groups: &IndexMap<String, ContainerGroup>,
    ) -> Vec<ContainerGroupSelection> {
        let mut by_group: IndexMap<&str, Vec<&ContainerInstance>> = IndexMap::new();
        for container in containers.iter().filter(|c| !c.group_id.is_empty()) {
            by_group
                .entry(container.group_id.as_str())
                .or_default()
                .push(container);
        }

        let settings = &self.config.container_randomisation;
        let mut selections = Vec::with_capacity(by_group.len());
        for (group_id, members) in by_group {
            let Some(group) = groups.get(group_id) else {
                log::warn!("Container group {} has no size data, skipping", group_id);
                continue;
            };
            let min = (group.min_containers as f64 * settings.container_group_min_size_multiplier).round();
            let max = (group.max_containers as f64 * settings.container_group_max_size_multiplier).round();
            let chosen_count = uniform_int(pass.rng, min.max(0.0) as u32, max.max(0.0) as u32);

            selections.push(ContainerGroupSelection {
                group_id: group_id.to_string(),
                chosen_count,
                candidates: members
                    .iter()
                    .map(|c| WeightedEntry::new(c.location_id.clone(), c.probability))
                    .collect(),
            });
        }
        selections
    }

    fn choose_randomisable<R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        containers: &[&ContainerInstance],
        groups: &IndexMap<String, ContainerGroup>,
    ) -> HashSet<String> {
        let mut chosen = HashSet::new();

        for container in containers.iter().filter(|c| c.group_id.is_empty()) {
            if pass.rng.gen::<f64>() < container.probability {
                chosen.insert(container.location_id.clone());
            }
        }

        for selection in self.group_selections(pass, containers, groups) {
            let sampler = WeightedSampler::new(selection.candidates);
            let wanted = selection.chosen_count as usize;
            if wanted > sampler.len() {
                log::warn!(
                    "Group {} wants {} containers but only {} are eligible, taking all",
                    selection.group_id,
                    wanted,
                    sampler.len()
                );
            }
            chosen.extend(sampler.draw(pass.rng, wanted, false, &HashSet::new()));
        }
        chosen
    }

    /// Fills one container. Returns `None` when the container has no root item.
    pub fn populate_container<R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        map_id: &str,
        container: &ContainerInstance,
        loot: &StaticLootDistribution,
        forced_tpls: &[String],
        seasonal: &HashSet<String>,
    ) -> Result<Option<SpawnPointRecord>> {
        let Some(root) = container.items.first() else {
            log::warn!("Static container {} has no items, skipping", container.location_id);
            return Ok(None);
        };
        let mut record = SpawnPointRecord {
            location_id: container.location_id.clone(),
            probability: container.probability,
            always_spawn: container.always_spawn,
            items: vec![root.clone()],
            item_distribution: Vec::new(),
        };

        let Some(grid) = self
            .ctx
            .catalog
            .template(&root.tpl)
            .and_then(|t| t.main_grid())
        else {
            log::error!("Container template {} is missing or has no grid", root.tpl);
            return Ok(Some(record));
        };
        let mut space = ContainerSpaceMap::new(grid.width, grid.height);

        let drawn = match loot.get(&root.tpl) {
            Some(table) => {
                let count = self.draw_item_count(pass, map_id, table);
                if count > 0 {
                    self.draw_item_templates(pass, table, count, seasonal)
                } else {
                    Vec::new()
                }
            }
            None => {
                log::warn!("No loot distribution for container type {}", root.tpl);
                Vec::new()
            }
        };
        // Forced items go in first and ignore spawn caps and the fit-attempt limit.
        let tpls = forced_tpls
            .iter()
            .map(|tpl| (tpl.clone(), true))
            .chain(drawn.into_iter().map(|tpl| (tpl, false)));

        let mut failed_fits = 0;
        let mut dropped: HashSet<String> = HashSet::new();
        for (tpl, forced) in tpls {
            if dropped.contains(&tpl) {
                continue;
            }
            let counts_toward_limit = self.counts_toward_limit(&tpl);
            if !forced && counts_toward_limit && !pass.ledger.can_spawn(&tpl) {
                log::debug!("Spawn limit reached for {}, skipping", tpl);
                continue;
            }

            let built = match self.builder.build(pass, &tpl, LootSource::StaticContainer, None) {
                Ok(built) => built,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    log::error!("Failed to build {} for container {}: {}", tpl, container.location_id, e);
                    dropped.insert(tpl);
                    continue;
                }
            };

            let Some(slot) = space.find_slot(built.width, built.height) else {
                if forced {
                    log::warn!(
                        "Forced item {} does not fit container {}",
                        tpl,
                        container.location_id
                    );
                    continue;
                }
                failed_fits += 1;
                if failed_fits >= self.config.fit_loot_into_container_attempts {
                    log::debug!(
                        "Container {} full after {} failed placements",
                        container.location_id,
                        failed_fits
                    );
                    break;
                }
                continue;
            };
            if let Err(e) = space.fill(slot.x, slot.y, built.width, built.height, slot.rotated) {
                log::error!("Placement of {} in {} failed: {}", tpl, container.location_id, e);
                continue;
            }
            if forced {
                pass.ledger.record(&tpl);
            } else {
                failed_fits = 0;
                if counts_toward_limit {
                    pass.ledger.try_record(&tpl);
                }
            }
            let mut items = built.items;
            attach_to_container(
                &mut items[0],
                &root.id,
                ItemLocation::Grid {
                    x: slot.x,
                    y: slot.y,
                    r: Rotation::from_rotated(slot.rotated),
                },
            );
            record.items.extend(items);
        }

        Ok(Some(record))
    }

    /// Draws the item count for a container, scaled by the map multiplier.
    pub fn draw_item_count<R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        map_id: &str,
        table: &ContainerLootTable,
    ) -> usize {
        let sampler = WeightedSampler::new(table.item_count_distribution.iter().cloned());
        let drawn = sampler.draw_one(pass.rng).unwrap_or(0);
        (drawn as f64 * self.config.static_multiplier(map_id)).round() as usize
    }

    /// Draws `count` templates from the container's pool. Money is locked so it
    /// may repeat; seasonal, blacklisted and capped templates are excluded.
    pub fn draw_item_templates<R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        table: &ContainerLootTable,
        count: usize,
        seasonal: &HashSet<String>,
    ) -> Vec<String> {
        let mut excluded: HashSet<String> = table
            .item_distribution
            .iter()
            .map(|e| e.key.clone())
            .filter(|tpl| self.ctx.is_excluded(tpl, seasonal))
            .collect();
        excluded.extend(
            pass.ledger
                .capped_templates()
                .into_iter()
                .filter(|tpl| self.counts_toward_limit(tpl)),
        );

        let locked: Vec<String> = table
            .item_distribution
            .iter()
            .filter(|e| self.is_locked(&e.key))
            .map(|e| e.key.clone())
            .collect();
        let sampler = WeightedSampler::new(table.item_distribution.iter().cloned()).with_locked(locked);

        sampler.draw(
            pass.rng,
            count,
            self.config.allow_duplicate_items_in_static_containers,
            &excluded,
        )
    }

    fn is_locked(&self, tpl: &str) -> bool {
        self.ctx.catalog.is_of_base_class(tpl, BaseClass::Money)
    }

    fn counts_toward_limit(&self, tpl: &str) -> bool {
        !self.is_locked(tpl) || self.config.locked_templates_respect_spawn_limits
    }
}

fn attach_to_container(item: &mut ItemRecord, container_id: &str, location: ItemLocation) {
    item.parent_id = Some(container_id.to_string());
    item.slot_id = Some(CONTAINER_GRID_SLOT.to_string());
    item.location = Some(location);
}
