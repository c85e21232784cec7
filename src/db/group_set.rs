/*!
The group set: a partition of the clauses of a formula into labelled groups.

The set owns every clause in a dense arena keyed by clause id; groups, occurrence lists, and the duplicate-detection index all store clause ids.
Group 0 is the background group.

In variable-group mode the set additionally carries the assignment of variables to variable groups; the clause groups are then singletons and variable groups are driven through the occurrence lists.
*/

use std::collections::{BTreeMap, HashMap};

use crate::{
    db::occurrence::OccsList,
    structures::{Clause, ClauseId, Gid, Lit, Var},
};

/// The member clauses of a group, with a count of those not removed.
#[derive(Clone, Debug, Default)]
pub struct GroupEntry {
    members: Vec<ClauseId>,
    active: usize,
}

impl GroupEntry {
    pub fn members(&self) -> &[ClauseId] {
        &self.members
    }

    pub fn active_count(&self) -> usize {
        self.active
    }
}

/// A partition of clauses into labelled groups.
#[derive(Clone, Debug, Default)]
pub struct GroupSet {
    /// The clause arena; clause id `i` lives at index `i - 1`.
    clauses: Vec<Clause>,

    /// Group membership, ordered by group id.
    groups: BTreeMap<Gid, GroupEntry>,

    /// Occurrence lists over the active clauses.
    occs: OccsList,

    /// Content hash to clause ids, for duplicate detection within a group.
    dedup: HashMap<u64, Vec<ClauseId>>,

    /// Clause ids of unit clauses, for seeding propagation.
    units: Vec<ClauseId>,

    max_var: Var,
    max_gid: Gid,

    /// Sizes at the end of parsing.
    init_size: usize,
    init_gsize: usize,

    /// Variable-group assignment; empty unless variable-group mode.
    var_gid: Vec<Gid>,

    /// Variable groups, ordered by group id.
    vgroups: BTreeMap<Gid, Vec<Var>>,
}

impl GroupSet {
    pub fn new() -> Self {
        GroupSet::default()
    }

    /// Adds a clause to `gid` and returns its id.
    ///
    /// An identical clause already present *in the same group* is not duplicated; the existing id is returned.
    /// Identical clauses in distinct groups are tracked independently.
    pub fn add_clause(&mut self, gid: Gid, lits: Vec<Lit>) -> ClauseId {
        let candidate = Clause::new((self.clauses.len() + 1) as ClauseId, gid, lits);
        let hash = candidate.content_hash();

        if let Some(cids) = self.dedup.get(&hash) {
            for cid in cids {
                let held = self.clause(*cid);
                if held.gid() == gid && held.lits() == candidate.lits() {
                    return *cid;
                }
            }
        }

        let cid = candidate.id();
        for lit in candidate.lits() {
            self.occs.add(*lit, cid);
            if lit.var() > self.max_var {
                self.max_var = lit.var();
            }
        }
        if candidate.asize() == 1 {
            self.units.push(cid);
        }
        if gid > self.max_gid {
            self.max_gid = gid;
        }

        let entry = self.groups.entry(gid).or_default();
        entry.members.push(cid);
        entry.active += 1;

        self.dedup.entry(hash).or_default().push(cid);
        self.clauses.push(candidate);
        cid
    }

    /// Freezes the parse-time sizes; called once after loading.
    pub fn seal(&mut self) {
        self.init_size = self.clauses.len();
        self.init_gsize = self.groups.len();
        self.occs.ensure_var(self.max_var);
    }

    pub fn clause(&self, cid: ClauseId) -> &Clause {
        &self.clauses[(cid - 1) as usize]
    }

    pub fn clause_mut(&mut self, cid: ClauseId) -> &mut Clause {
        &mut self.clauses[(cid - 1) as usize]
    }

    /// All clauses, in input order, removed ones included.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn size(&self) -> usize {
        self.clauses.len()
    }

    pub fn init_size(&self) -> usize {
        self.init_size
    }

    pub fn init_gsize(&self) -> usize {
        self.init_gsize
    }

    pub fn max_var(&self) -> Var {
        self.max_var
    }

    pub fn max_gid(&self) -> Gid {
        self.max_gid
    }

    /// Registers a variable index without any clause; keeps `max_var` honest for models.
    pub fn register_var(&mut self, var: Var) {
        if var > self.max_var {
            self.max_var = var;
        }
    }

    // Group access.

    pub fn gexists(&self, gid: Gid) -> bool {
        self.groups.contains_key(&gid)
    }

    pub fn has_g0(&self) -> bool {
        self.gexists(0)
    }

    /// The group ids, in increasing order.
    pub fn gids(&self) -> impl Iterator<Item = Gid> + '_ {
        self.groups.keys().copied()
    }

    pub fn gsize(&self) -> usize {
        self.groups.len()
    }

    /// The member clause ids of a group.
    pub fn gclauses(&self, gid: Gid) -> &[ClauseId] {
        match self.groups.get(&gid) {
            Some(entry) => &entry.members,
            None => &[],
        }
    }

    /// The count of not-removed clauses in a group.
    pub fn active_count(&self, gid: Gid) -> usize {
        match self.groups.get(&gid) {
            Some(entry) => entry.active,
            None => 0,
        }
    }

    /// The summed active literal count over a group, for scheduling orders.
    pub fn group_length(&self, gid: Gid) -> usize {
        self.gclauses(gid)
            .iter()
            .map(|cid| self.clause(*cid))
            .filter(|cl| !cl.removed())
            .map(|cl| cl.asize())
            .sum()
    }

    // Removal bookkeeping.

    /// Marks one clause removed, updating group and occurrence active counts.
    ///
    /// Returns true if the group's last active clause went with it.
    pub fn remove_clause(&mut self, cid: ClauseId) -> bool {
        let (gid, lits): (Gid, Vec<Lit>) = {
            let clause = self.clause(cid);
            if clause.removed() {
                return false;
            }
            (clause.gid(), clause.lits().to_vec())
        };
        self.clause_mut(cid).mark_removed();
        for lit in lits {
            self.occs.note_removed(lit);
        }
        let entry = self.groups.get_mut(&gid).expect("member of a known group");
        entry.active -= 1;
        entry.active == 0
    }

    /// Marks every clause of `gid` removed. Returns the number of clauses newly removed.
    pub fn remove_group(&mut self, gid: Gid) -> usize {
        let members: Vec<ClauseId> = self.gclauses(gid).to_vec();
        let mut count = 0;
        for cid in members {
            if !self.clause(cid).removed() {
                self.remove_clause(cid);
                count += 1;
            }
        }
        count
    }

    /// Moves a clause into another group, updating both membership entries.
    pub fn move_clause_to_group(&mut self, cid: ClauseId, new_gid: Gid) {
        let (old_gid, active) = {
            let clause = self.clause(cid);
            (clause.gid(), !clause.removed())
        };
        if old_gid == new_gid {
            return;
        }
        let old_entry = self.groups.get_mut(&old_gid).expect("member of a known group");
        old_entry.members.retain(|member| *member != cid);
        if active {
            old_entry.active -= 1;
        }
        let new_entry = self.groups.entry(new_gid).or_default();
        new_entry.members.push(cid);
        if active {
            new_entry.active += 1;
        }
        if new_gid > self.max_gid {
            self.max_gid = new_gid;
        }
        self.clause_mut(cid).set_gid(new_gid);
    }

    /// Restores a removed clause, updating the counts; used by solution reconstruction.
    pub fn restore_clause(&mut self, cid: ClauseId) {
        let (gid, lits): (Gid, Vec<Lit>) = {
            let clause = self.clause(cid);
            if !clause.removed() {
                return;
            }
            (clause.gid(), clause.lits().to_vec())
        };
        self.clause_mut(cid).unmark_removed();
        for lit in lits {
            self.occs.note_restored(lit);
        }
        let entry = self.groups.get_mut(&gid).expect("member of a known group");
        entry.active += 1;
    }

    // Occurrence lists.

    pub fn occs(&self) -> &OccsList {
        &self.occs
    }

    /// Compacts the occurrence bucket of `lit`, dropping entries of removed clauses.
    pub fn compact_occs(&mut self, lit: Lit) {
        let removed: Vec<ClauseId> = self
            .occs
            .clauses(lit)
            .iter()
            .copied()
            .filter(|cid| self.clause(*cid).removed())
            .collect();
        if !removed.is_empty() {
            self.occs.compact(lit, |cid| !removed.contains(&cid));
        }
    }

    /// Clause ids of the unit clauses recorded at parse time.
    pub fn units(&self) -> &[ClauseId] {
        &self.units
    }

    // Variable groups.

    /// Assigns `var` to variable group `vgid`.
    pub fn assign_var_group(&mut self, var: Var, vgid: Gid) {
        self.register_var(var);
        if self.var_gid.len() <= var as usize {
            self.var_gid.resize(var as usize + 1, 0);
        }
        self.var_gid[var as usize] = vgid;
        self.vgroups.entry(vgid).or_default().push(var);
        if vgid > self.max_gid {
            self.max_gid = vgid;
        }
    }

    /// The variable group of `var`; 0 when unassigned.
    pub fn var_group(&self, var: Var) -> Gid {
        match self.var_gid.get(var as usize) {
            Some(gid) => *gid,
            None => 0,
        }
    }

    pub fn vgroup_gids(&self) -> impl Iterator<Item = Gid> + '_ {
        self.vgroups.keys().copied()
    }

    pub fn vgsize(&self) -> usize {
        self.vgroups.len()
    }

    /// The variables of a variable group.
    pub fn vgvars(&self, vgid: Gid) -> &[Var] {
        match self.vgroups.get(&vgid) {
            Some(vars) => vars,
            None => &[],
        }
    }

    /// True when a variable-group assignment has been loaded.
    pub fn var_mode(&self) -> bool {
        !self.vgroups.is_empty()
    }
}

#[cfg(test)]
mod group_set_tests {
    use super::*;

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|i| Lit::from_int(*i)).collect()
    }

    #[test]
    fn duplicate_detection_is_per_group() {
        let mut gs = GroupSet::new();
        let a = gs.add_clause(1, lits(&[1, 2]));
        let b = gs.add_clause(1, lits(&[2, 1]));
        let c = gs.add_clause(2, lits(&[1, 2]));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(gs.size(), 2);
    }

    #[test]
    fn removal_updates_counts() {
        let mut gs = GroupSet::new();
        gs.add_clause(0, lits(&[1]));
        let cid = gs.add_clause(1, lits(&[-1, 2]));
        gs.seal();

        assert_eq!(gs.active_count(1), 1);
        assert_eq!(gs.occs().active_size(Lit::from_int(-1)), 1);

        assert!(gs.remove_clause(cid));
        assert_eq!(gs.active_count(1), 0);
        assert_eq!(gs.occs().active_size(Lit::from_int(-1)), 0);
        // The stale entry survives until compaction.
        assert_eq!(gs.occs().clauses(Lit::from_int(-1)).len(), 1);
        gs.compact_occs(Lit::from_int(-1));
        assert!(gs.occs().clauses(Lit::from_int(-1)).is_empty());
    }

    #[test]
    fn max_indices_track_input() {
        let mut gs = GroupSet::new();
        gs.add_clause(3, lits(&[4, -7]));
        assert_eq!(gs.max_var(), 7);
        assert_eq!(gs.max_gid(), 3);
    }
}
