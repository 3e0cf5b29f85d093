//! Helpers over flat parent-linked item arrays.

use super::ids::IdAllocator;
use super::types::ItemRecord;
use crate::error::{LootError, Result};
use rand::Rng;
use std::collections::{HashMap, HashSet, VecDeque};

/// Returns `root_id` and every item below it, root first, breadth-first.
pub fn collect_with_descendants(items: &[ItemRecord], root_id: &str) -> Vec<ItemRecord> {
    let Some(root) = items.iter().find(|i| i.id == root_id) else {
        return Vec::new();
    };

    let mut result = vec![root.clone()];
    let mut queue = VecDeque::from([root.id.as_str()]);
    while let Some(parent) = queue.pop_front() {
        for child in items.iter().filter(|i| i.is_child_of(parent)) {
            result.push(child.clone());
            queue.push_back(child.id.as_str());
        }
    }
    result
}

/// Checks the two hierarchy invariants: ids are unique and every
/// non-root item points at another item in the same array.
pub fn is_well_formed(items: &[ItemRecord]) -> bool {
    let mut ids = HashSet::new();
    if !items.iter().all(|i| ids.insert(i.id.as_str())) {
        return false;
    }
    items
        .iter()
        .skip(1)
        .all(|i| i.parent_id.as_deref().is_some_and(|p| ids.contains(p)))
}

/// Copies a tree onto freshly allocated ids.
///
/// The root is the single item whose parent is absent or outside the set; it
/// comes back first with its parent, slot and location cleared. Any other
/// item whose parent cannot be resolved makes the tree corrupt.
pub fn regenerate_ids(
    items: &[ItemRecord],
    tpl: &str,
    ids: &mut IdAllocator,
    rng: &mut impl Rng,
) -> Result<Vec<ItemRecord>> {
    let corrupt = |reason: String| LootError::CorruptPreset {
        tpl: tpl.to_string(),
        reason,
    };

    let known: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
    if known.len() != items.len() {
        return Err(corrupt("duplicate item ids".to_string()));
    }

    let roots: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, i)| {
            i.parent_id
                .as_deref()
                .map_or(true, |p| !known.contains(p))
        })
        .map(|(idx, _)| idx)
        .collect();
    let root_idx = match roots.as_slice() {
        [idx] => *idx,
        [] => return Err(corrupt("no root item".to_string())),
        _ => return Err(corrupt(format!("{} root items", roots.len()))),
    };

    let mut remap: HashMap<&str, String> = HashMap::with_capacity(items.len());
    for item in items {
        remap.insert(item.id.as_str(), ids.next_id(rng));
    }

    let mut result = Vec::with_capacity(items.len());
    let mut root = items[root_idx].clone();
    root.id = remap[root.id.as_str()].clone();
    root.parent_id = None;
    root.slot_id = None;
    root.location = None;
    result.push(root);

    for (idx, item) in items.iter().enumerate() {
        if idx == root_idx {
            continue;
        }
        let mut copy = item.clone();
        copy.id = remap[item.id.as_str()].clone();
        let parent = item
            .parent_id
            .as_deref()
            .and_then(|p| remap.get(p))
            .ok_or_else(|| corrupt(format!("item {} has no resolvable parent", item.id)))?;
        copy.parent_id = Some(parent.clone());
        result.push(copy);
    }

    // A cycle leaves items unreachable from the root even though every parent resolves.
    let reachable = collect_with_descendants(&result, &result[0].id).len();
    if reachable != result.len() {
        return Err(corrupt("items unreachable from root".to_string()));
    }

    Ok(result)
}
