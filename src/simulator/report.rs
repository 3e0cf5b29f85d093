//! Simulation report generation.

use super::runner::RunStats;
use indexmap::IndexMap;

/// Aggregated results from multiple generation passes.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub location_id: String,
    pub num_runs: u32,

    // Aggregated stats
    pub avg_static_weapons: f64,
    pub avg_static_containers: f64,
    pub avg_empty_containers: f64,
    pub avg_static_items: f64,
    pub avg_loose_points: f64,
    pub avg_loose_items: f64,

    // Spread of the total record count
    pub min_records: usize,
    pub max_records: usize,

    /// Most frequent templates with their average count per run
    pub top_templates: Vec<(String, f64)>,

    // Individual run stats for detailed analysis
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(location_id: &str, runs: Vec<RunStats>, top_n: usize) -> Self {
        let num_runs = runs.len() as u32;
        let divisor = num_runs.max(1) as f64;
        let avg = |f: fn(&RunStats) -> usize| -> f64 {
            runs.iter().map(|r| f(r) as f64).sum::<f64>() / divisor
        };

        let avg_static_weapons = avg(|r| r.summary.static_weapons);
        let avg_static_containers = avg(|r| r.summary.static_containers);
        let avg_empty_containers = avg(|r| r.empty_containers);
        let avg_static_items = avg(|r| r.summary.static_items);
        let avg_loose_points = avg(|r| r.summary.loose_points);
        let avg_loose_items = avg(|r| r.summary.loose_items);

        let totals: Vec<usize> = runs.iter().map(|r| r.summary.total_records()).collect();
        let min_records = totals.iter().min().copied().unwrap_or(0);
        let max_records = totals.iter().max().copied().unwrap_or(0);

        // Template frequency
        let mut template_totals: IndexMap<String, u32> = IndexMap::new();
        for run in &runs {
            for (tpl, count) in &run.template_counts {
                *template_totals.entry(tpl.clone()).or_insert(0) += count;
            }
        }
        // Stable sort keeps first-seen order among ties
        let mut ranked: Vec<(String, u32)> = template_totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        let top_templates = ranked
            .into_iter()
            .take(top_n)
            .map(|(tpl, total)| (tpl, total as f64 / divisor))
            .collect();

        Self {
            location_id: location_id.to_string(),
            num_runs,
            avg_static_weapons,
            avg_static_containers,
            avg_empty_containers,
            avg_static_items,
            avg_loose_points,
            avg_loose_items,
            min_records,
            max_records,
            top_templates,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    LOOT SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Location: {}, {} runs\n\n",
            self.location_id, self.num_runs
        ));

        report.push_str("── STATIC LOOT ──────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Static Weapons:    {:.1}\n",
            self.avg_static_weapons
        ));
        report.push_str(&format!(
            "  Avg Containers:        {:.1}\n",
            self.avg_static_containers
        ));
        report.push_str(&format!(
            "  Avg Empty Containers:  {:.1}\n",
            self.avg_empty_containers
        ));
        report.push_str(&format!(
            "  Avg Container Items:   {:.1}\n\n",
            self.avg_static_items
        ));

        report.push_str("── LOOSE LOOT ───────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Points:            {:.1}\n",
            self.avg_loose_points
        ));
        report.push_str(&format!(
            "  Avg Items:             {:.1}\n\n",
            self.avg_loose_items
        ));

        report.push_str("── RECORDS PER RUN ──────────────────────────────────────────────\n");
        report.push_str(&format!("  Min Records:   {}\n", self.min_records));
        report.push_str(&format!("  Max Records:   {}\n\n", self.max_records));

        if !self.top_templates.is_empty() {
            report.push_str("── TOP TEMPLATES ────────────────────────────────────────────────\n");
            let widest = self
                .top_templates
                .iter()
                .map(|(_, avg)| *avg)
                .fold(0.0_f64, f64::max);
            for (tpl, avg) in &self.top_templates {
                let bar_len = if widest > 0.0 { (avg / widest * 20.0) as usize } else { 0 };
                let bar: String = "█".repeat(bar_len);
                report.push_str(&format!("  {:<32} {:>6.2} {}\n", tpl, avg, bar));
            }
            report.push('\n');
        }

        if self.avg_static_containers > 0.0
            && self.avg_empty_containers / self.avg_static_containers > 0.5
        {
            report.push_str("  ⚠️  Most containers spawn empty - item count tables too low?\n");
        }

        report.push_str("═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// Implement Serialize for JSON output
impl serde::Serialize for SimReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let top: IndexMap<&str, f64> = self
            .top_templates
            .iter()
            .map(|(tpl, avg)| (tpl.as_str(), *avg))
            .collect();

        let mut state = serializer.serialize_struct("SimReport", 11)?;
        state.serialize_field("location_id", &self.location_id)?;
        state.serialize_field("num_runs", &self.num_runs)?;
        state.serialize_field("avg_static_weapons", &self.avg_static_weapons)?;
        state.serialize_field("avg_static_containers", &self.avg_static_containers)?;
        state.serialize_field("avg_empty_containers", &self.avg_empty_containers)?;
        state.serialize_field("avg_static_items", &self.avg_static_items)?;
        state.serialize_field("avg_loose_points", &self.avg_loose_points)?;
        state.serialize_field("avg_loose_items", &self.avg_loose_items)?;
        state.serialize_field("min_records", &self.min_records)?;
        state.serialize_field("max_records", &self.max_records)?;
        state.serialize_field("top_templates", &top)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loot::GenerationSummary;

    fn run(containers: usize, empty: usize, counts: &[(&str, u32)]) -> RunStats {
        RunStats {
            seed: Some(1),
            summary: GenerationSummary {
                location_id: "bigmap".to_string(),
                static_containers: containers,
                static_items: counts.iter().map(|(_, c)| *c as usize).sum(),
                ..GenerationSummary::default()
            },
            empty_containers: empty,
            template_counts: counts.iter().map(|(t, c)| (t.to_string(), *c)).collect(),
        }
    }

    #[test]
    fn test_report_generation() {
        let runs = vec![
            run(4, 1, &[("bolts", 3), ("nuts", 1)]),
            run(2, 0, &[("bolts", 1), ("screws", 4)]),
        ];

        let report = SimReport::from_runs("bigmap", runs, 2);
        assert_eq!(report.num_runs, 2);
        assert!((report.avg_static_containers - 3.0).abs() < 1e-9);
        assert!((report.avg_empty_containers - 0.5).abs() < 1e-9);
        assert_eq!(report.min_records, 2);
        assert_eq!(report.max_records, 4);
        assert_eq!(report.top_templates.len(), 2);
        assert_eq!(report.top_templates[0].0, "bolts");
        assert!((report.top_templates[0].1 - 2.0).abs() < 1e-9);
        assert!(report.to_text().contains("bigmap"));
    }

    #[test]
    fn test_empty_report() {
        let report = SimReport::from_runs("bigmap", Vec::new(), 5);
        assert_eq!(report.num_runs, 0);
        assert_eq!(report.avg_loose_points, 0.0);
        assert!(report.top_templates.is_empty());
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["location_id"], "bigmap");
    }
}
