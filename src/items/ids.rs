//! Per-pass item id allocation.
//!
//! Ids are drawn from the pass RNG so a seeded pass always produces the
//! same ids, and every id handed out is remembered so none is issued twice.

use rand::Rng;
use std::collections::HashSet;
use uuid::Builder;

#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh 32-hex-digit id that has not been issued or reserved in this pass.
    pub fn next_id(&mut self, rng: &mut impl Rng) -> String {
        loop {
            let bytes: [u8; 16] = rng.gen();
            let id = Builder::from_random_bytes(bytes)
                .into_uuid()
                .simple()
                .to_string();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Marks a map-authored id as taken. Returns false if it was already known.
    pub fn reserve(&mut self, id: &str) -> bool {
        self.issued.insert(id.to_string())
    }

    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}
