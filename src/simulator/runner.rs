//! Runs seeded generation passes and collects per-run statistics.

use super::config::{LootFixture, SimConfig};
use super::report::SimReport;
use crate::catalog::{LocationSource, LootContext};
use crate::error::{LootError, Result};
use crate::loot::{GenerationSummary, LootGenerator, SpawnPointRecord};
use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Statistics for one generation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub seed: Option<u64>,
    pub summary: GenerationSummary,
    /// Populated containers that received nothing
    pub empty_containers: usize,
    /// Placed root items per template (container contents and loose points)
    pub template_counts: IndexMap<String, u32>,
}

/// Run the full simulation and return a report.
pub fn run_simulation(fixture: &LootFixture, config: &SimConfig) -> Result<SimReport> {
    let database = &fixture.database;
    if database.location(&config.location_id).is_none() {
        return Err(LootError::UnknownLocation(config.location_id.clone()));
    }
    let generator = LootGenerator::new(LootContext::from_source(database), database, &fixture.config);

    let mut all_runs = Vec::with_capacity(config.num_runs as usize);
    for run_idx in 0..config.num_runs {
        let seed = config.seed.map(|s| s.wrapping_add(run_idx as u64));
        let mut rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let (records, summary) = generator.generate_with_summary(&config.location_id, &mut rng)?;
        let stats = collect_stats(seed, summary, &records);

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - {} containers ({} empty), {} static items, {} loose points",
                run_idx + 1,
                config.num_runs,
                stats.summary.static_containers,
                stats.empty_containers,
                stats.summary.static_items,
                stats.summary.loose_points
            );
        }
        all_runs.push(stats);
    }

    Ok(SimReport::from_runs(
        &config.location_id,
        all_runs,
        config.top_templates,
    ))
}

/// Static weapons come first in `records` and are not counted as containers.
pub fn collect_stats(
    seed: Option<u64>,
    summary: GenerationSummary,
    records: &[SpawnPointRecord],
) -> RunStats {
    let mut template_counts: IndexMap<String, u32> = IndexMap::new();
    let mut empty_containers = 0;

    let containers_end = summary.static_weapons + summary.static_containers;
    let containers = records.get(summary.static_weapons..containers_end).unwrap_or(&[]);
    for record in containers {
        let Some(root) = record.root() else {
            continue;
        };
        let mut placed = 0;
        for item in record.items.iter().filter(|i| i.is_child_of(&root.id)) {
            *template_counts.entry(item.tpl.clone()).or_insert(0) += 1;
            placed += 1;
        }
        if placed == 0 {
            empty_containers += 1;
        }
    }

    for record in records.get(containers_end..).unwrap_or(&[]) {
        if let Some(root) = record.root() {
            *template_counts.entry(root.tpl.clone()).or_insert(0) += 1;
        }
    }

    RunStats {
        seed,
        summary,
        empty_containers,
        template_counts,
    }
}
