/*!
Occurrence lists: for each literal, the clauses containing it.

Each bucket carries an *active size* alongside its index list: the count of member clauses not (yet) removed.
The list itself may hold stale entries for removed clauses; a compaction pass collects the survivors and replaces the list wholesale, so no traversal ever erases behind its own iterator.
*/

use crate::structures::{ClauseId, Lit, Var};

/// The clauses containing one literal.
#[derive(Clone, Debug, Default)]
pub struct OccBucket {
    clauses: Vec<ClauseId>,
    active: usize,
}

impl OccBucket {
    /// The member clause ids, possibly including removed clauses.
    pub fn clauses(&self) -> &[ClauseId] {
        &self.clauses
    }

    /// The count of not-removed member clauses.
    pub fn active_size(&self) -> usize {
        self.active
    }
}

/// Occurrence lists for every literal up to some maximum variable.
#[derive(Clone, Debug, Default)]
pub struct OccsList {
    buckets: Vec<OccBucket>,
}

impl OccsList {
    /// Grows the table to cover literals of `max_var`.
    pub fn ensure_var(&mut self, max_var: Var) {
        let needed = ((max_var as usize) + 1) << 1;
        if self.buckets.len() < needed {
            self.buckets.resize(needed, OccBucket::default());
        }
    }

    /// Registers a (not-removed) clause under `lit`.
    pub fn add(&mut self, lit: Lit, cid: ClauseId) {
        self.ensure_var(lit.var());
        let bucket = &mut self.buckets[lit.index()];
        bucket.clauses.push(cid);
        bucket.active += 1;
    }

    /// The bucket of `lit`, if any literal of that variable was ever added.
    pub fn bucket(&self, lit: Lit) -> Option<&OccBucket> {
        self.buckets.get(lit.index())
    }

    /// The member clause ids of `lit`, possibly including removed clauses.
    pub fn clauses(&self, lit: Lit) -> &[ClauseId] {
        match self.buckets.get(lit.index()) {
            Some(bucket) => &bucket.clauses,
            None => &[],
        }
    }

    /// The count of not-removed clauses containing `lit`.
    pub fn active_size(&self, lit: Lit) -> usize {
        match self.buckets.get(lit.index()) {
            Some(bucket) => bucket.active,
            None => 0,
        }
    }

    /// Notes the removal of a clause containing `lit`.
    pub fn note_removed(&mut self, lit: Lit) {
        if let Some(bucket) = self.buckets.get_mut(lit.index()) {
            bucket.active = bucket.active.saturating_sub(1);
        }
    }

    /// Notes the restoration of a clause containing `lit`.
    pub fn note_restored(&mut self, lit: Lit) {
        self.ensure_var(lit.var());
        let bucket = &mut self.buckets[lit.index()];
        bucket.active += 1;
    }

    /// Replaces the bucket of `lit` with the survivors of `keep`, leaving the active count untouched.
    pub fn compact(&mut self, lit: Lit, keep: impl Fn(ClauseId) -> bool) {
        if let Some(bucket) = self.buckets.get_mut(lit.index()) {
            let survivors: Vec<ClauseId> =
                bucket.clauses.iter().copied().filter(|cid| keep(*cid)).collect();
            bucket.clauses = survivors;
        }
    }
}

#[cfg(test)]
mod occs_tests {
    use super::*;

    #[test]
    fn active_counts_track_removal() {
        let mut occs = OccsList::default();
        let lit = Lit::from_int(-3);
        occs.add(lit, 1);
        occs.add(lit, 2);
        assert_eq!(occs.active_size(lit), 2);
        occs.note_removed(lit);
        assert_eq!(occs.active_size(lit), 1);
        assert_eq!(occs.clauses(lit).len(), 2);
        occs.compact(lit, |cid| cid != 1);
        assert_eq!(occs.clauses(lit), &[2]);
        assert_eq!(occs.active_size(lit), 1);
    }
}
