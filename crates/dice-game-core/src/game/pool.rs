//! Unclaimed dice and the two claim slots.

use crate::protocol::{DiceId, Party};
use rand::Rng;
use std::collections::BTreeSet;

/// Dice not yet claimed by either party, by identity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DicePool {
    available: BTreeSet<DiceId>,
}

impl DicePool {
    /// A pool holding ids `0..count`
    pub fn full(count: usize) -> Self {
        Self {
            available: (0..count).map(DiceId).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.available.len()
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    pub fn contains(&self, id: DiceId) -> bool {
        self.available.contains(&id)
    }

    /// Remaining ids in configuration order
    pub fn iter(&self) -> impl Iterator<Item = DiceId> + '_ {
        self.available.iter().copied()
    }

    /// The `index`-th remaining id, as listed to the external party
    pub fn nth(&self, index: usize) -> Option<DiceId> {
        self.available.iter().nth(index).copied()
    }

    /// The pool left after `id` is claimed; `None` if `id` is not available
    pub fn claim(&self, id: DiceId) -> Option<DicePool> {
        if !self.contains(id) {
            return None;
        }
        let mut available = self.available.clone();
        available.remove(&id);
        Some(Self { available })
    }

    /// Claim a uniformly random remaining id
    pub fn claim_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(DicePool, DiceId)> {
        if self.is_empty() {
            return None;
        }
        let id = self.nth(rng.gen_range(0..self.len()))?;
        Some((self.claim(id)?, id))
    }
}

/// Dice held by each party
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Claims {
    pub host: Option<DiceId>,
    pub external: Option<DiceId>,
}

impl Claims {
    pub fn of(&self, party: Party) -> Option<DiceId> {
        match party {
            Party::Host => self.host,
            Party::External => self.external,
        }
    }

    pub(crate) fn set(&mut self, party: Party, id: DiceId) {
        match party {
            Party::Host => self.host = Some(id),
            Party::External => self.external = Some(id),
        }
    }
}
