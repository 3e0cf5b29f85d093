//! Weighted draws with and without replacement.
//!
//! Every draw in the generator goes through `WeightedSampler`: container item
//! counts, container item templates, group container picks, loose spawn points,
//! per-point item keys and magazine cartridge choice.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// A key with its relative weight and an optional payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntry<K, P = ()> {
    pub key: K,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<P>,
}

impl<K, P> WeightedEntry<K, P> {
    pub fn new(key: K, weight: f64) -> Self {
        Self {
            key,
            weight,
            payload: None,
        }
    }

    pub fn with_payload(key: K, weight: f64, payload: P) -> Self {
        Self {
            key,
            weight,
            payload: Some(payload),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeightedSampler<K, P = ()> {
    entries: Vec<WeightedEntry<K, P>>,
    locked: HashSet<K>,
}

impl<K: Clone + Eq + Hash, P> WeightedSampler<K, P> {
    /// Builds a sampler, keeping the first entry for a repeated key and
    /// dropping entries whose weight is zero, negative or not finite.
    pub fn new(entries: impl IntoIterator<Item = WeightedEntry<K, P>>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|e| e.weight.is_finite() && e.weight > 0.0)
            .filter(|e| seen.insert(e.key.clone()))
            .collect();
        Self {
            entries,
            locked: HashSet::new(),
        }
    }

    /// Exempts `keys` from removal in draws without replacement, so they can
    /// be picked any number of times.
    pub fn with_locked(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.locked.extend(keys);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.iter().any(|e| &e.key == key)
    }

    pub fn payload(&self, key: &K) -> Option<&P> {
        self.entries
            .iter()
            .find(|e| &e.key == key)
            .and_then(|e| e.payload.as_ref())
    }

    /// Draws a single key, or `None` from an empty pool.
    pub fn draw_one(&self, rng: &mut impl Rng) -> Option<K> {
        self.draw(rng, 1, true, &HashSet::new()).pop()
    }

    /// Draws up to `count` keys from the pool minus `excluded`.
    ///
    /// Without replacement each drawn key leaves the pool unless it is locked.
    /// Asking for at least as many keys as an unlocked pool holds returns the
    /// whole pool in order without consuming randomness.
    pub fn draw(
        &self,
        rng: &mut impl Rng,
        count: usize,
        with_replacement: bool,
        excluded: &HashSet<K>,
    ) -> Vec<K> {
        let mut pool: Vec<(&K, f64)> = self
            .entries
            .iter()
            .filter(|e| !excluded.contains(&e.key))
            .map(|e| (&e.key, e.weight))
            .collect();
        if pool.is_empty() || count == 0 {
            return Vec::new();
        }

        if with_replacement {
            let cumulative = cumulative_weights(&pool);
            return (0..count)
                .map(|_| pool[pick_index(rng, &cumulative)].0.clone())
                .collect();
        }

        let any_locked = pool.iter().any(|(k, _)| self.locked.contains(*k));
        if !any_locked && count >= pool.len() {
            return pool.into_iter().map(|(k, _)| k.clone()).collect();
        }

        let mut result = Vec::with_capacity(count);
        let mut cumulative = cumulative_weights(&pool);
        while result.len() < count && !pool.is_empty() {
            let idx = pick_index(rng, &cumulative);
            let key = pool[idx].0;
            result.push(key.clone());
            if !self.locked.contains(key) {
                pool.remove(idx);
                cumulative = cumulative_weights(&pool);
            }
        }
        result
    }
}

impl<K: Clone + Eq + Hash> WeightedSampler<K, ()> {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        Self::new(pairs.into_iter().map(|(k, w)| WeightedEntry::new(k, w)))
    }
}

fn cumulative_weights<K>(pool: &[(K, f64)]) -> Vec<f64> {
    pool.iter()
        .scan(0.0, |acc, (_, w)| {
            *acc += w;
            Some(*acc)
        })
        .collect()
}

fn pick_index(rng: &mut impl Rng, cumulative: &[f64]) -> usize {
    let total = cumulative.last().copied().unwrap_or(0.0);
    let roll = rng.gen::<f64>() * total;
    cumulative
        .partition_point(|&c| c <= roll)
        .min(cumulative.len() - 1)
}
