//! Per-pass spawn counters enforcing per-template maximums.
//!
//! A ledger is built by the orchestrator for one pass and dropped with it;
//! it is never shared between passes.

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerEntry {
    pub count: u32,
    pub max: Option<u32>,
}

impl LedgerEntry {
    pub fn is_capped(&self) -> bool {
        self.max.is_some_and(|max| self.count >= max)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpawnCountLedger {
    entries: HashMap<String, LedgerEntry>,
}

impl SpawnCountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the ledger with location-specific maximums.
    pub fn with_limits(limits: &IndexMap<String, u32>) -> Self {
        let entries = limits
            .iter()
            .map(|(tpl, max)| {
                (
                    tpl.clone(),
                    LedgerEntry {
                        count: 0,
                        max: Some(*max),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    pub fn has_limit(&self, tpl: &str) -> bool {
        self.entries.get(tpl).is_some_and(|e| e.max.is_some())
    }

    /// True while another `tpl` may still spawn.
    pub fn can_spawn(&self, tpl: &str) -> bool {
        !self.entries.get(tpl).is_some_and(LedgerEntry::is_capped)
    }

    /// Counts one spawn of `tpl`. Returns false, without counting, once the cap is reached.
    pub fn try_record(&mut self, tpl: &str) -> bool {
        let entry = self.entries.entry(tpl.to_string()).or_default();
        if entry.is_capped() {
            return false;
        }
        entry.count += 1;
        true
    }

    /// Counts one spawn of `tpl` even past its cap. Used for forced items.
    pub fn record(&mut self, tpl: &str) {
        self.entries.entry(tpl.to_string()).or_default().count += 1;
    }

    pub fn count(&self, tpl: &str) -> u32 {
        self.entries.get(tpl).map_or(0, |e| e.count)
    }

    /// Templates that have reached their maximum.
    pub fn capped_templates(&self) -> HashSet<String> {
        self.entries
            .iter()
            .filter(|(_, e)| e.is_capped())
            .map(|(tpl, _)| tpl.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> IndexMap<String, u32> {
        let mut limits = IndexMap::new();
        limits.insert("tpl_ledx".to_string(), 2);
        limits.insert("tpl_never".to_string(), 0);
        limits
    }

    #[test]
    fn test_cap_is_enforced() {
        let mut ledger = SpawnCountLedger::with_limits(&limits());
        assert!(ledger.try_record("tpl_ledx"));
        assert!(ledger.try_record("tpl_ledx"));
        assert!(!ledger.try_record("tpl_ledx"));
        assert_eq!(ledger.count("tpl_ledx"), 2);
        assert!(!ledger.can_spawn("tpl_ledx"));
    }

    #[test]
    fn test_zero_limit_is_capped_immediately() {
        let ledger = SpawnCountLedger::with_limits(&limits());
        assert!(!ledger.can_spawn("tpl_never"));
        assert!(ledger.capped_templates().contains("tpl_never"));
    }

    #[test]
    fn test_unlimited_templates_always_spawn() {
        let mut ledger = SpawnCountLedger::with_limits(&limits());
        for _ in 0..100 {
            assert!(ledger.try_record("tpl_bolts"));
        }
        assert_eq!(ledger.count("tpl_bolts"), 100);
        assert!(!ledger.has_limit("tpl_bolts"));
        assert!(ledger.has_limit("tpl_ledx"));
    }

    #[test]
    fn test_record_counts_past_cap() {
        let mut ledger = SpawnCountLedger::with_limits(&limits());
        ledger.record("tpl_never");
        assert_eq!(ledger.count("tpl_never"), 1);
        assert!(!ledger.can_spawn("tpl_never"));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut ledger = SpawnCountLedger::with_limits(&limits());
        ledger.try_record("tpl_ledx");
        ledger.clear();
        assert_eq!(ledger.count("tpl_ledx"), 0);
        assert!(ledger.can_spawn("tpl_never"));
    }
}
