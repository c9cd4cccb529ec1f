use hashbrown::HashMap as FastHashMap;

use crate::radix::{NodeId, RadixResult, Tree};

/// Number of fixed dispatch slots, one more than the 9 standard methods leaves
/// headroom in the hash range so the perfect hash has somewhere to land.
pub(crate) const SLOT_COUNT: usize = 11;

pub(crate) const STANDARD_METHODS: [&str; 9] = [
    "GET", "POST", "PUT", "HEAD", "DELETE", "CONNECT", "OPTIONS", "PATCH", "TRACE",
];

/// `h(s) = ((131 * s[0]) + s[1]) mod 11`, computed the same way the source does: as
/// wrapping byte arithmetic (`byte` in the source is `uint8`), not widened to avoid
/// overflow. Missing bytes (methods shorter than 2 characters) are treated as `0`.
const fn slot_hash(method_bytes: &[u8]) -> usize {
    let b0 = if !method_bytes.is_empty() {
        method_bytes[0]
    } else {
        0
    };
    let b1 = if method_bytes.len() > 1 {
        method_bytes[1]
    } else {
        0
    };
    let h = (131u8).wrapping_mul(b0).wrapping_add(b1);
    (h % SLOT_COUNT as u8) as usize
}

const fn standard_methods_collision_free() -> bool {
    let mut seen = [false; SLOT_COUNT];
    let mut i = 0;
    while i < STANDARD_METHODS.len() {
        let slot = slot_hash(STANDARD_METHODS[i].as_bytes());
        if seen[slot] {
            return false;
        }
        seen[slot] = true;
        i += 1;
    }
    true
}

const _: () = assert!(
    standard_methods_collision_free(),
    "hmap: standard HTTP methods collide under the (131*b0+b1) mod 11 perfect hash; pick new constants"
);

struct Slot<V> {
    method: Box<str>,
    tree: Tree<V>,
}

/// Fixed-size fanout over the 9 standard HTTP methods (O(1) dispatch via `slot_hash`),
/// with a side map for arbitrary user-defined method tokens (spec.md §4.2).
pub(crate) struct HMap<V> {
    slots: [Option<Slot<V>>; SLOT_COUNT],
    extend: FastHashMap<Box<str>, Tree<V>>,
}

impl<V> HMap<V> {
    pub(crate) fn new() -> Self {
        let mut slots: [Option<Slot<V>>; SLOT_COUNT] = std::array::from_fn(|_| None);
        for &method in &STANDARD_METHODS {
            let slot = slot_hash(method.as_bytes());
            debug_assert!(
                slots[slot].is_none(),
                "hmap slot {slot} double-assigned to {method}"
            );
            slots[slot] = Some(Slot {
                method: method.into(),
                tree: Tree::new(),
            });
        }
        HMap {
            slots,
            extend: FastHashMap::new(),
        }
    }

    fn slot_for(&self, method: &str) -> Option<usize> {
        let slot = slot_hash(method.as_bytes());
        match &self.slots[slot] {
            Some(s) if s.method.as_ref() == method => Some(slot),
            _ => None,
        }
    }

    pub(crate) fn get(&self, method: &str) -> Option<&Tree<V>> {
        if let Some(slot) = self.slot_for(method) {
            return self.slots[slot].as_ref().map(|s| &s.tree);
        }
        self.extend.get(method)
    }

    /// Returns the tree for `method`, creating a fresh one in the extended fallback map
    /// the first time an unrecognized method token is registered.
    pub(crate) fn get_or_insert_mut(&mut self, method: &str) -> &mut Tree<V> {
        if let Some(slot) = self.slot_for(method) {
            return &mut self.slots[slot].as_mut().unwrap().tree;
        }
        if !self.extend.contains_key(method) {
            self.extend.insert(method.into(), Tree::new());
        }
        self.extend.get_mut(method).expect("just inserted")
    }

    /// Runs `Tree::optimize` over every populated tree (standard slots and extended
    /// methods alike), returning each tree's `(method, remap)` pair so the caller can
    /// fix up any table it keeps keyed by that tree's `NodeId`s.
    pub(crate) fn optimize_all(&mut self) -> RadixResult<Vec<(Box<str>, Vec<NodeId>)>> {
        let mut remaps = Vec::new();
        for slot in self.slots.iter_mut().flatten() {
            let remap = slot.tree.optimize()?;
            remaps.push((slot.method.clone(), remap));
        }
        for (method, tree) in self.extend.iter_mut() {
            let remap = tree.optimize()?;
            remaps.push((method.clone(), remap));
        }
        Ok(remaps)
    }

    /// Iterates every `(method, tree)` pair currently populated, standard and extended.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Tree<V>)> {
        self.slots
            .iter()
            .flatten()
            .map(|s| (s.method.as_ref(), &s.tree))
            .chain(self.extend.iter().map(|(m, t)| (m.as_ref(), t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_methods_land_in_distinct_slots() {
        let mut seen = [false; SLOT_COUNT];
        for &m in &STANDARD_METHODS {
            let slot = slot_hash(m.as_bytes());
            assert!(!seen[slot], "method {m} collided in slot {slot}");
            seen[slot] = true;
        }
    }

    #[test]
    fn get_or_insert_creates_extended_tree_for_custom_method() {
        let mut hmap: HMap<u32> = HMap::new();
        assert!(hmap.get("DIY").is_none());
        hmap.get_or_insert_mut("DIY");
        assert!(hmap.get("DIY").is_some());
    }

    #[test]
    fn standard_method_slots_are_preallocated() {
        let hmap: HMap<u32> = HMap::new();
        for &m in &STANDARD_METHODS {
            assert!(hmap.get(m).is_some());
        }
    }
}
