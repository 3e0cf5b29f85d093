//! One generation pass over a location: static containers, then loose loot.
//!
//! Every piece of mutable state (tables, ledger, issued ids) lives inside the
//! call, so a single `LootGenerator` can serve concurrent raids as long as each
//! caller brings its own RNG.

use super::ledger::SpawnCountLedger;
use super::loose_loot::DynamicLootPlacer;
use super::pass::LootPass;
use super::static_loot::StaticLootPlacer;
use super::types::{LocationLootTables, SpawnPointRecord};
use crate::catalog::{LocationSource, LootContext};
use crate::config::LocationLootConfig;
use crate::error::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Counts from one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    pub location_id: String,
    pub static_weapons: usize,
    pub static_containers: usize,
    /// Items placed inside containers, children included
    pub static_items: usize,
    pub loose_points: usize,
    pub loose_items: usize,
}

impl GenerationSummary {
    pub fn total_records(&self) -> usize {
        self.static_weapons + self.static_containers + self.loose_points
    }
}

pub struct LootGenerator<'a> {
    ctx: LootContext<'a>,
    locations: &'a dyn LocationSource,
    config: &'a LocationLootConfig,
}

impl<'a> LootGenerator<'a> {
    pub fn new(
        ctx: LootContext<'a>,
        locations: &'a dyn LocationSource,
        config: &'a LocationLootConfig,
    ) -> Self {
        Self {
            ctx,
            locations,
            config,
        }
    }

    /// Generates the loot for `location_id`: static records first, then loose points.
    ///
    /// An unknown location yields an empty list. Only a corrupt preset fails the pass.
    pub fn generate<R: Rng>(&self, location_id: &str, rng: &mut R) -> Result<Vec<SpawnPointRecord>> {
        self.generate_with_summary(location_id, rng)
            .map(|(records, _)| records)
    }

    pub fn generate_with_summary<R: Rng>(
        &self,
        location_id: &str,
        rng: &mut R,
    ) -> Result<(Vec<SpawnPointRecord>, GenerationSummary)> {
        let mut summary = GenerationSummary {
            location_id: location_id.to_string(),
            ..GenerationSummary::default()
        };
        let Some(tables) = self.locations.location(location_id) else {
            log::warn!("No loot tables for location {}", location_id);
            return Ok((Vec::new(), summary));
        };
        // Working copy; the shared tables are never touched during a pass
        let tables: LocationLootTables = tables.clone();

        let ledger = SpawnCountLedger::with_limits(&self.config.spawn_limits(location_id));
        let mut pass = LootPass::new(rng, ledger);
        reserve_authored_ids(&mut pass, &tables);

        let static_placer = StaticLootPlacer::new(self.ctx, self.config, &tables.static_ammo);
        let mut records = static_placer.place(
            &mut pass,
            location_id,
            &tables.static_details,
            &tables.static_loot,
        )?;
        summary.static_weapons = tables.static_details.static_weapons.len();
        summary.static_containers = records.len() - summary.static_weapons;
        summary.static_items = records[summary.static_weapons..]
            .iter()
            .map(|r| r.items.len().saturating_sub(1))
            .sum();

        let loose_placer = DynamicLootPlacer::new(self.ctx, self.config, &tables.static_ammo);
        let loose = loose_placer.place(&mut pass, location_id, &tables.loose_loot)?;
        summary.loose_points = loose.len();
        summary.loose_items = loose.iter().map(|r| r.items.len()).sum();
        records.extend(loose);

        log::debug!("{} item ids in use on {}", pass.ids.issued_count(), location_id);
        pass.ledger.clear();
        log::info!(
            "Generated {} on {}: {} static containers holding {} items, {} loose loot points",
            summary.total_records(),
            location_id,
            summary.static_containers,
            summary.static_items,
            summary.loose_points
        );
        Ok((records, summary))
    }
}

/// Container roots and static weapons keep their authored ids; new ids must not collide.
fn reserve_authored_ids<R: Rng>(pass: &mut LootPass<'_, R>, tables: &LocationLootTables) {
    let details = &tables.static_details;
    let weapon_items = details.static_weapons.iter().flat_map(|w| w.items.iter());
    let container_items = details.static_containers.iter().flat_map(|c| c.items.iter());
    for item in weapon_items.chain(container_items) {
        pass.ids.reserve(&item.id);
    }
}
