/*!
The extraction state: the authoritative classification of every group.

Every group starts *untested*.
The only transitions are untested → necessary and untested → removed, both terminal, so at any quiescent point the three buckets partition the groups.
Removals increment a monotonic version counter; work items record the version their inputs were read at and results computed against an older version are discarded.

The `r_list` / `f_list` logs record removals and finalisations most-recent-first.
The oracle synchronisation walks them from the head and stops at the first entry it has already applied; single-threaded strategies may instead clear them once consumed.

The reader-writer lock of the multi-threaded variant is advisory; the canonical single-threaded build carries the version counter only.
*/

use std::collections::{BTreeSet, VecDeque};

use crate::{
    db::group_set::GroupSet,
    structures::Gid,
};

/// Classification of groups over a group set.
#[derive(Debug)]
pub struct MusState {
    gset: GroupSet,

    /// Groups proved necessary: the growing MUS.
    nec: BTreeSet<Gid>,

    /// Groups proved unnecessary and discarded.
    removed: BTreeSet<Gid>,

    /// Groups hypothesised necessary by an approximation policy; disjoint from `nec`.
    pot_nec: BTreeSet<Gid>,

    /// Groups hypothesised unnecessary by an approximation policy.
    pot_removed: BTreeSet<Gid>,

    /// Most-recent-first log of removals, consumed by oracle sync.
    r_list: VecDeque<Gid>,

    /// Most-recent-first log of finalisations, consumed by oracle sync.
    f_list: VecDeque<Gid>,

    /// Incremented whenever groups are removed.
    version: u64,

    /// Classification ranges over variable groups instead of clause groups.
    var_mode: bool,
}

impl MusState {
    pub fn new(gset: GroupSet) -> Self {
        let var_mode = gset.var_mode();
        MusState {
            gset,
            nec: BTreeSet::new(),
            removed: BTreeSet::new(),
            pot_nec: BTreeSet::new(),
            pot_removed: BTreeSet::new(),
            r_list: VecDeque::new(),
            f_list: VecDeque::new(),
            version: 0,
            var_mode,
        }
    }

    pub fn gset(&self) -> &GroupSet {
        &self.gset
    }

    pub fn gset_mut(&mut self) -> &mut GroupSet {
        &mut self.gset
    }

    pub fn var_mode(&self) -> bool {
        self.var_mode
    }

    // Predicates.

    /// True if the group is known necessary.
    pub fn nec(&self, gid: Gid) -> bool {
        self.nec.contains(&gid)
    }

    /// True if the group has been removed.
    pub fn r(&self, gid: Gid) -> bool {
        self.removed.contains(&gid)
    }

    /// True if the status of the group is unknown.
    pub fn untested(&self, gid: Gid) -> bool {
        !self.nec(gid) && !self.r(gid)
    }

    /// True if the group was classified by an approximation rather than a proof.
    pub fn fake(&self, gid: Gid) -> bool {
        self.pot_nec.contains(&gid) || self.pot_removed.contains(&gid)
    }

    // Transitions.

    /// Marks a group necessary and logs the finalisation.
    pub fn mark_necessary(&mut self, gid: Gid) {
        if self.nec.insert(gid) {
            self.f_list.push_front(gid);
        }
    }

    /// Marks a group necessary on the strength of an undetermined outcome.
    pub fn mark_necessary_fake(&mut self, gid: Gid) {
        self.pot_nec.insert(gid);
        self.mark_necessary(gid);
    }

    /// Marks a group removed, logs the removal, and marks its clauses removed.
    pub fn mark_removed(&mut self, gid: Gid) {
        if self.removed.insert(gid) {
            self.r_list.push_front(gid);
            if self.var_mode {
                self.remove_vgroup_clauses(gid);
            } else {
                self.gset.remove_group(gid);
            }
        }
    }

    /// Marks a group removed on the strength of an undetermined outcome.
    pub fn mark_removed_fake(&mut self, gid: Gid) {
        self.pot_removed.insert(gid);
        self.mark_removed(gid);
    }

    /// Removes every clause containing a variable of the variable group.
    fn remove_vgroup_clauses(&mut self, vgid: Gid) {
        let vars: Vec<_> = self.gset.vgvars(vgid).to_vec();
        for var in vars {
            for polarity in [true, false] {
                let lit = crate::structures::Lit::new(var, polarity);
                let members: Vec<_> = self.gset.occs().clauses(lit).to_vec();
                for cid in members {
                    if !self.gset.clause(cid).removed() {
                        self.gset.remove_clause(cid);
                    }
                }
            }
        }
    }

    /// Marks every candidate group removed; the background alone is the result.
    pub fn make_empty_mus(&mut self) {
        let gids: Vec<Gid> = self.candidate_gids().collect();
        for gid in gids {
            self.mark_removed(gid);
        }
        self.incr_version();
    }

    // Iteration.

    /// The candidate group ids: every group except the background, classified or not.
    pub fn candidate_gids(&self) -> Box<dyn Iterator<Item = Gid> + '_> {
        match self.var_mode {
            false => Box::new(self.gset.gids().filter(|gid| *gid != 0)),
            true => Box::new(self.gset.vgroup_gids().filter(|gid| *gid != 0)),
        }
    }

    /// Group ids with unknown status.
    pub fn untested_gids(&self) -> impl Iterator<Item = Gid> + '_ {
        self.candidate_gids().filter(|gid| self.untested(*gid))
    }

    pub fn num_untested(&self) -> usize {
        self.untested_gids().count()
    }

    /// Group ids proved (or hypothesised) necessary, in increasing order.
    pub fn necessary_gids(&self) -> impl Iterator<Item = Gid> + '_ {
        self.nec.iter().copied()
    }

    pub fn removed_gids(&self) -> impl Iterator<Item = Gid> + '_ {
        self.removed.iter().copied()
    }

    pub fn num_necessary(&self) -> usize {
        self.nec.len()
    }

    pub fn num_removed(&self) -> usize {
        self.removed.len()
    }

    pub fn num_fake(&self) -> usize {
        self.pot_nec.len() + self.pot_removed.len()
    }

    /// The count of groups still in the instance, the background included.
    pub fn real_gsize(&self) -> usize {
        match self.var_mode {
            false => self.gset.gsize() - self.removed.len(),
            true => self.gset.vgsize() - self.removed.len(),
        }
    }

    // Version and sync logs.

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn incr_version(&mut self) {
        self.version += 1;
    }

    pub fn r_list(&self) -> &VecDeque<Gid> {
        &self.r_list
    }

    pub fn f_list(&self) -> &VecDeque<Gid> {
        &self.f_list
    }

    /// Clears both logs; for single-threaded strategies which sync eagerly.
    pub fn clear_lists(&mut self) {
        self.r_list.clear();
        self.f_list.clear();
    }
}

#[cfg(test)]
mod state_tests {
    use super::*;
    use crate::structures::Lit;

    fn two_group_state() -> MusState {
        let mut gs = GroupSet::new();
        gs.add_clause(0, vec![Lit::from_int(1)]);
        gs.add_clause(1, vec![Lit::from_int(-1), Lit::from_int(2)]);
        gs.add_clause(2, vec![Lit::from_int(-2)]);
        gs.seal();
        MusState::new(gs)
    }

    #[test]
    fn transitions_are_terminal_and_logged() {
        let mut state = two_group_state();
        assert!(state.untested(1) && state.untested(2));

        state.mark_necessary(1);
        state.mark_removed(2);
        assert!(state.nec(1));
        assert!(state.r(2));
        assert_eq!(state.f_list().front(), Some(&1));
        assert_eq!(state.r_list().front(), Some(&2));

        // Removal took the clause with it.
        assert_eq!(state.gset().active_count(2), 0);
        assert_eq!(state.num_untested(), 0);
    }

    #[test]
    fn version_moves_forward_only() {
        let mut state = two_group_state();
        let v = state.version();
        state.incr_version();
        assert!(state.version() > v);
    }

    #[test]
    fn empty_mus_removes_all_candidates() {
        let mut state = two_group_state();
        state.make_empty_mus();
        assert_eq!(state.num_necessary(), 0);
        assert_eq!(state.num_untested(), 0);
        assert_eq!(state.real_gsize(), 1); // the background stays
    }
}
