//! Loose loot: picks spawn points and gives each one a single item hierarchy.

use super::hierarchy::{ItemHierarchyBuilder, LootSource};
use super::pass::LootPass;
use super::rolls::normally_distributed_count;
use super::types::{LooseLootTable, SpawnPointRecord, StaticAmmoDistribution};
use super::weighted::{WeightedEntry, WeightedSampler};
use crate::catalog::LootContext;
use crate::config::LocationLootConfig;
use crate::error::Result;
use crate::items::collect_with_descendants;
use rand::Rng;
use std::collections::HashSet;

pub struct DynamicLootPlacer<'a> {
    ctx: LootContext<'a>,
    config: &'a LocationLootConfig,
    builder: ItemHierarchyBuilder<'a>,
}

impl<'a> DynamicLootPlacer<'a> {
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

    /// Chooses and fills the loose loot points of `map_id`. Forced points come first.
    pub fn place<R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        map_id: &str,
        table: &LooseLootTable,
    ) -> Result<Vec<SpawnPointRecord>> {
        let points = self.choose_points(pass, map_id, table);
        let seasonal = self.ctx.seasonal_exclusions();
        let forced_ids: HashSet<&str> = table
            .spawnpoints_forced
            .iter()
            .map(|p| p.location_id.as_str())
            .collect();

        let mut result = Vec::with_capacity(points.len());
        for point in points {
            let forced = point.always_spawn || forced_ids.contains(point.location_id.as_str());
            if let Some(record) = self.populate_point(pass, point, forced, &seasonal)? {
                result.push(record);
            }
        }
        log::debug!("Placed {} loose loot points on {}", result.len(), map_id);
        Ok(result)
    }

    /// Forced and always-spawn points, then probability 1 points, then a
    /// weighted draw for whatever the rolled count still asks for.
    pub fn choose_points<'t, R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        map_id: &str,
        table: &'t LooseLootTable,
    ) -> Vec<&'t SpawnPointRecord> {
        let mut chosen: Vec<&SpawnPointRecord> = table
            .spawnpoints_forced
            .iter()
            .chain(table.spawnpoints.iter().filter(|p| p.always_spawn))
            .collect();
        let forced_count = chosen.len();

        let mut candidates: Vec<WeightedEntry<usize>> = Vec::new();
        for (index, point) in table.spawnpoints.iter().enumerate() {
            if point.always_spawn {
                continue;
            }
            if point.probability >= 1.0 {
                chosen.push(point);
            } else {
                candidates.push(WeightedEntry::new(index, point.probability));
            }
        }
        let guaranteed = chosen.len() - forced_count;

        let rolled = normally_distributed_count(
            pass.rng,
            table.spawnpoint_count.mean,
            table.spawnpoint_count.std,
        );
        let desired = (self.config.loose_multiplier(map_id) * rolled).round().max(0.0) as usize;
        let remaining = desired.saturating_sub(guaranteed);

        let mut requested = chosen.len();
        if remaining > 0 {
            let blacklist = self.config.loose_point_blacklist(map_id);
            let excluded: HashSet<usize> = table
                .spawnpoints
                .iter()
                .enumerate()
                .filter(|(_, p)| blacklist.contains(&p.location_id))
                .map(|(i, _)| i)
                .collect();
            let sampler = WeightedSampler::new(candidates);
            requested += remaining;
            chosen.extend(
                sampler
                    .draw(pass.rng, remaining, false, &excluded)
                    .into_iter()
                    .map(|i| &table.spawnpoints[i]),
            );
        }

        let mut seen = HashSet::new();
        chosen.retain(|p| seen.insert(p.location_id.as_str()));
        if chosen.len() < requested {
            log::warn!(
                "Wanted {} loose loot points on {} but found {}",
                requested,
                map_id,
                chosen.len()
            );
        }
        chosen
    }

    /// Draws one authored item for the point and rebuilds it with fresh ids.
    /// A `forced` point with no usable distribution entry falls back to its
    /// first authored item. Returns `None` when the point ends up with nothing to spawn.
    pub fn populate_point<R: Rng>(
        &self,
        pass: &mut LootPass<'_, R>,
        point: &SpawnPointRecord,
        forced: bool,
        seasonal: &HashSet<String>,
    ) -> Result<Option<SpawnPointRecord>> {
        let tpl_of = |item_id: &str| {
            point
                .items
                .iter()
                .find(|i| i.id == item_id)
                .map(|i| i.tpl.as_str())
        };

        let eligible: Vec<WeightedEntry<String>> = point
            .item_distribution
            .iter()
            .filter(|e| tpl_of(&e.key).is_some_and(|tpl| !self.ctx.is_excluded(tpl, seasonal)))
            .cloned()
            .collect();
        let drawn = WeightedSampler::new(eligible).draw_one(pass.rng);
        let fallback = || {
            point
                .items
                .first()
                .filter(|root| forced && !self.ctx.is_excluded(&root.tpl, seasonal))
                .map(|root| root.id.clone())
        };
        let Some(root_id) = drawn.or_else(fallback) else {
            log::warn!("Loose loot point {} has no eligible items", point.location_id);
            return Ok(None);
        };
        let Some(tpl) = tpl_of(&root_id) else {
            return Ok(None);
        };

        if !pass.ledger.can_spawn(tpl) {
            log::debug!("Spawn limit reached for {}, skipping point {}", tpl, point.location_id);
            return Ok(None);
        }

        let authored = collect_with_descendants(&point.items, &root_id);
        let built = match self
            .builder
            .build(pass, tpl, LootSource::LooseLoot, Some(authored.as_slice()))
        {
            Ok(built) => built,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                log::error!("Failed to build {} for point {}: {}", tpl, point.location_id, e);
                return Ok(None);
            }
        };
        pass.ledger.try_record(tpl);

        Ok(Some(SpawnPointRecord {
            location_id: point.location_id.clone(),
            probability: point.probability,
            always_spawn: point.always_spawn,
            items: built.items,
            item_distribution: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BaseClass, ItemDatabase, ItemTemplate};
    use crate::items::{is_well_formed, ItemRecord};
    use crate::loot::{SpawnCountLedger, SpawnPointCount};
    use indexmap::IndexMap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn database() -> ItemDatabase {
        let mut db = ItemDatabase::new();
        db.add_template(ItemTemplate::new("bolts", BaseClass::Barter));
        db.add_template(ItemTemplate::new("nuts", BaseClass::Barter));
        db.add_template(ItemTemplate::new("ornament", BaseClass::Barter));
        db.add_template(ItemTemplate::new("backpack", BaseClass::Container));
        db.add_template(ItemTemplate::new("strap", BaseClass::Mod));
        db.seasonal_templates.insert("ornament".to_string());
        db
    }

    fn point(id: &str, probability: f64, tpl: &str) -> SpawnPointRecord {
        let item_id = format!("{id}_item");
        SpawnPointRecord {
            location_id: id.to_string(),
            probability,
            always_spawn: false,
            items: vec![ItemRecord::root(item_id.clone(), tpl)],
            item_distribution: vec![WeightedEntry::new(item_id, 1.0)],
        }
    }

    fn table(mean: f64, spawnpoints: Vec<SpawnPointRecord>) -> LooseLootTable {
        LooseLootTable {
            spawnpoint_count: SpawnPointCount { mean, std: 0.0 },
            spawnpoints_forced: Vec::new(),
            spawnpoints,
        }
    }

    #[test]
    fn test_all_certain_points_returned() {
        let db = database();
        let config = LocationLootConfig::default();
        let ammo = StaticAmmoDistribution::new();
        let placer = DynamicLootPlacer::new(LootContext::from_source(&db), &config, &ammo);
        let table = table(
            3.0,
            vec![point("a", 1.0, "bolts"), point("b", 1.0, "nuts"), point("c", 1.0, "bolts")],
        );

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pass = LootPass::new(&mut rng, SpawnCountLedger::new());
        let chosen = placer.choose_points(&mut pass, "bigmap", &table);
        let ids: Vec<&str> = chosen.iter().map(|p| p.location_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_forced_and_always_spawn_points_first() {
        let db = database();
        let config = LocationLootConfig::default();
        let ammo = StaticAmmoDistribution::new();
        let placer = DynamicLootPlacer::new(LootContext::from_source(&db), &config, &ammo);

        let mut always = point("always", 0.01, "nuts");
        always.always_spawn = true;
        let mut table = table(0.0, vec![point("rare", 0.01, "bolts"), always]);
        table.spawnpoints_forced.push(point("forced", 0.0, "bolts"));

        for seed in 0..10 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut pass = LootPass::new(&mut rng, SpawnCountLedger::new());
            let chosen = placer.choose_points(&mut pass, "bigmap", &table);
            assert_eq!(chosen[0].location_id, "forced");
            assert_eq!(chosen[1].location_id, "always");
        }
    }

    #[test]
    fn test_blacklisted_points_never_drawn() {
        let db = database();
        let mut config = LocationLootConfig::default();
        config
            .loose_loot_blacklist
            .insert("bigmap".to_string(), vec!["bad".to_string()]);
        let ammo = StaticAmmoDistribution::new();
        let placer = DynamicLootPlacer::new(LootContext::from_source(&db), &config, &ammo);
        let table = table(5.0, vec![point("bad", 0.9, "bolts"), point("good", 0.1, "nuts")]);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut pass = LootPass::new(&mut rng, SpawnCountLedger::new());
        let chosen = placer.choose_points(&mut pass, "bigmap", &table);
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].location_id, "good");
    }

    #[test]
    fn test_loose_multiplier_scales_point_count() {
        let db = database();
        let ammo = StaticAmmoDistribution::new();
        let points: Vec<SpawnPointRecord> = (0..6)
            .map(|i| point(&format!("p{i}"), 0.5, "bolts"))
            .collect();
        let table = table(2.0, points);

        let plain = LocationLootConfig::default();
        let mut doubled = LocationLootConfig::default();
        doubled.loose_loot_multiplier.insert("bigmap".to_string(), 2.0);

        for (config, expected) in [(&plain, 2), (&doubled, 4)] {
            let placer = DynamicLootPlacer::new(LootContext::from_source(&db), config, &ammo);
            let mut rng = ChaCha8Rng::seed_from_u64(9);
            let mut pass = LootPass::new(&mut rng, SpawnCountLedger::new());
            let chosen = placer.choose_points(&mut pass, "bigmap", &table);
            assert_eq!(chosen.len(), expected);
        }
    }

    #[test]
    fn test_duplicate_location_ids_collapse() {
        let db = database();
        let config = LocationLootConfig::default();
        let ammo = StaticAmmoDistribution::new();
        let placer = DynamicLootPlacer::new(LootContext::from_source(&db), &config, &ammo);
        let table = table(2.0, vec![point("same", 1.0, "bolts"), point("same", 1.0, "nuts")]);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut pass = LootPass::new(&mut rng, SpawnCountLedger::new());
        let chosen = placer.choose_points(&mut pass, "bigmap", &table);
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].items[0].tpl, "bolts");
    }

    #[test]
    fn test_point_rebuilt_with_authored_children() {
        let db = database();
        let config = LocationLootConfig::default();
        let ammo = StaticAmmoDistribution::new();
        let placer = DynamicLootPlacer::new(LootContext::from_source(&db), &config, &ammo);

        let mut source = point("p", 1.0, "backpack");
        source.items.push(ItemRecord::child("strap_1", "strap", "p_item", "mod_strap"));
        source.items.push(ItemRecord::root("other", "bolts"));

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut pass = LootPass::new(&mut rng, SpawnCountLedger::new());
        let record = placer
            .populate_point(&mut pass, &source, false, &HashSet::new())
            .unwrap()
            .unwrap();
        assert_eq!(record.items.len(), 2);
        assert_eq!(record.items[0].tpl, "backpack");
        assert_ne!(record.items[0].id, "p_item");
        assert!(record.item_distribution.is_empty());
        assert!(is_well_formed(&record.items));
    }

    #[test]
    fn test_point_with_only_seasonal_items_skipped() {
        let db = database();
        let config = LocationLootConfig::default();
        let ammo = StaticAmmoDistribution::new();
        let ctx = LootContext::from_source(&db);
        let placer = DynamicLootPlacer::new(ctx, &config, &ammo);

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut pass = LootPass::new(&mut rng, SpawnCountLedger::new());
        let record = placer
            .populate_point(&mut pass, &point("p", 1.0, "ornament"), true, &ctx.seasonal_exclusions())
            .unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_forced_point_without_distribution_spawns_authored_root() {
        let db = database();
        let config = LocationLootConfig::default();
        let ammo = StaticAmmoDistribution::new();
        let placer = DynamicLootPlacer::new(LootContext::from_source(&db), &config, &ammo);

        let mut forced = point("forced", 0.0, "backpack");
        forced.item_distribution.clear();
        forced.items.push(ItemRecord::child("strap_1", "strap", "forced_item", "mod_strap"));
        let mut unforced = point("plain", 1.0, "bolts");
        unforced.item_distribution.clear();
        let mut table = table(0.0, vec![unforced]);
        table.spawnpoints_forced.push(forced);

        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut pass = LootPass::new(&mut rng, SpawnCountLedger::new());
        let placed = placer.place(&mut pass, "bigmap", &table).unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].location_id, "forced");
        assert_eq!(placed[0].items.len(), 2);
        assert_eq!(placed[0].items[0].tpl, "backpack");
        assert!(is_well_formed(&placed[0].items));
    }

    #[test]
    fn test_forced_fallback_still_skips_seasonal_root() {
        let db = database();
        let config = LocationLootConfig::default();
        let ammo = StaticAmmoDistribution::new();
        let ctx = LootContext::from_source(&db);
        let placer = DynamicLootPlacer::new(ctx, &config, &ammo);

        let mut forced = point("forced", 0.0, "ornament");
        forced.item_distribution.clear();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut pass = LootPass::new(&mut rng, SpawnCountLedger::new());
        let record = placer
            .populate_point(&mut pass, &forced, true, &ctx.seasonal_exclusions())
            .unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_capped_template_skips_point() {
        let db = database();
        let config = LocationLootConfig::default();
        let ammo = StaticAmmoDistribution::new();
        let placer = DynamicLootPlacer::new(LootContext::from_source(&db), &config, &ammo);
        let table = table(0.0, vec![point("a", 1.0, "bolts"), point("b", 1.0, "bolts")]);

        let mut limits = IndexMap::new();
        limits.insert("bolts".to_string(), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut pass = LootPass::new(&mut rng, SpawnCountLedger::with_limits(&limits));
        let placed = placer.place(&mut pass, "bigmap", &table).unwrap();
        assert_eq!(placed.len(), 1);
        assert_eq!(pass.ledger.count("bolts"), 1);
    }
}
