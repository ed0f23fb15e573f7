//! Uniform sampling over a changing set of identifiers
//!
//! Randomized workloads need to pick "some live element" repeatedly while
//! elements come and go. [`RandomIdPool`] keeps the identifiers in a dense
//! vector plus a position index, so insert, remove and uniform choice are all
//! O(1): removal swaps the last identifier into the vacated slot.

use crate::element::Id;
use rand::Rng;
use rustc_hash::FxHashMap;

/// Set of identifiers supporting O(1) uniform random choice
#[derive(Debug, Default, Clone)]
pub struct RandomIdPool {
    ids: Vec<Id>,
    positions: FxHashMap<Id, usize>,
}

impl RandomIdPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: Id) -> bool {
        self.positions.contains_key(&id)
    }

    /// Adds `id`; returns false if it was already present
    pub fn insert(&mut self, id: Id) -> bool {
        if self.positions.contains_key(&id) {
            return false;
        }
        self.positions.insert(id, self.ids.len());
        self.ids.push(id);
        true
    }

    /// Removes `id`; returns false if it was not present
    pub fn remove(&mut self, id: Id) -> bool {
        let Some(position) = self.positions.remove(&id) else {
            return false;
        };
        self.ids.swap_remove(position);
        if let Some(&moved) = self.ids.get(position) {
            self.positions.insert(moved, position);
        }
        true
    }

    /// Picks a present identifier uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Id> {
        if self.ids.is_empty() {
            return None;
        }
        Some(self.ids[rng.gen_range(0..self.ids.len())])
    }

    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        self.ids.iter().copied()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.positions.clear();
    }
}

impl Extend<Id> for RandomIdPool {
    fn extend<I: IntoIterator<Item = Id>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}
