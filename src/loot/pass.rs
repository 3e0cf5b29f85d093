//! Mutable state owned by exactly one generation pass.

use super::ledger::SpawnCountLedger;
use crate::items::IdAllocator;
use rand::Rng;

pub struct LootPass<'r, R: Rng> {
    pub rng: &'r mut R,
    pub ledger: SpawnCountLedger,
    pub ids: IdAllocator,
}

impl<'r, R: Rng> LootPass<'r, R> {
    pub fn new(rng: &'r mut R, ledger: SpawnCountLedger) -> Self {
        Self {
            rng,
            ledger,
            ids: IdAllocator::new(),
        }
    }

    pub fn next_id(&mut self) -> String {
        self.ids.next_id(self.rng)
    }
}
