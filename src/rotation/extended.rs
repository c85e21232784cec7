/*!
Extended model rotation over sets of falsified groups.

Where the recursive rotator abandons a flip as soon as two groups are falsified, the extended rotator keeps going: queue entries carry a whole group set, bounded by the *width* knob, and a set is a rotation success exactly when it is a singleton.

Revisits are suppressed through a map from group sets to the hashes of the assignments they were processed at.
The hash is an xor fold over the assignment, maintained incrementally: flipping a variable toggles one contribution.
The *depth* knob bounds how many distinguishing assignments are processed per group set.

The visited map is owned by the rotator instance; when the item asks for call-local state the map is cleared at the end of the call.
*/

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::{
    db::state::MusState,
    misc::log::targets,
    rotation::ModelRotator,
    structures::{Assignment, Gid, Lit, Var},
    work::{RotateModel, WorkItem},
};

/// Hash contribution of one variable; toggled into the fold when the variable is true.
fn var_mix(var: Var) -> u64 {
    let mut x = var as u64;
    x = x.wrapping_mul(0x9E3779B97F4A7C15);
    x ^= x >> 31;
    x.wrapping_mul(0xBF58476D1CE4E5B9)
}

/// The xor fold of an assignment.
fn ass_hash(ass: &Assignment) -> u64 {
    let mut hash = 0;
    for var in 1..=ass.max_var() {
        if ass.value_of(var) > 0 {
            hash ^= var_mix(var);
        }
    }
    hash
}

/// The extended rotator.
#[derive(Default)]
pub struct ExtendedRotator {
    /// Group set to the hashes of its processed distinguishing assignments.
    visited: HashMap<Vec<Gid>, HashSet<u64>>,

    num_points: u64,
}

impl ExtendedRotator {
    /// Whether rotation may proceed through `gids` at the assignment hashed as `hash`.
    fn allow_to_rotate(&self, gids: &[Gid], hash: u64, depth: u32, width: u32) -> bool {
        if width > 0 && gids.len() > width as usize {
            return false;
        }
        match self.visited.get(gids) {
            None => true,
            Some(hashes) => {
                if hashes.contains(&hash) {
                    return false;
                }
                !(depth > 0 && hashes.len() > (depth as usize - 1))
            }
        }
    }
}

impl ModelRotator for ExtendedRotator {
    fn process(&mut self, item: &mut RotateModel, state: &MusState) -> bool {
        let gset = state.gset();
        let depth = item.rot_depth;
        let width = item.rot_width;
        log::debug!(target: targets::ROTATION, "Extended rotation of group {} (d, w) = ({depth}, {width})", item.gid);

        let mut queue: VecDeque<(Vec<Gid>, Vec<Var>)> = VecDeque::new();
        queue.push_back((vec![item.gid], Vec::new()));

        let mut curr = item.model.clone();
        let mut curr_hash = ass_hash(&curr);

        while let Some((gids, delta)) = queue.pop_front() {
            for var in &delta {
                curr.flip(*var);
                curr_hash ^= var_mix(*var);
            }

            if self.allow_to_rotate(&gids, curr_hash, depth, width) {
                // The falsified clauses of the set, and their variables as flip candidates.
                let mut cand_vars: BTreeSet<Var> = BTreeSet::new();
                let mut f_clauses: Vec<crate::structures::ClauseId> = Vec::new();
                for gid in &gids {
                    for cid in gset.gclauses(*gid) {
                        let clause = gset.clause(*cid);
                        if clause.removed() {
                            continue;
                        }
                        if curr.tv_clause(clause) == -1 {
                            f_clauses.push(*cid);
                            cand_vars.extend(clause.vars());
                        }
                    }
                }

                for var in cand_vars {
                    let true_lit = Lit::new(var, curr.value_of(var) > 0);
                    curr.flip(var);
                    curr_hash ^= var_mix(var);

                    let mut new_gids: BTreeSet<Gid> = BTreeSet::new();
                    for cid in &f_clauses {
                        let clause = gset.clause(*cid);
                        if curr.tv_clause(clause) == -1 {
                            new_gids.insert(clause.gid());
                        }
                    }
                    // No point scanning further once the set cannot shrink under the width.
                    if width == 0 || new_gids.len() <= width as usize {
                        'occ_scan: for cid in gset.occs().clauses(true_lit) {
                            let clause = gset.clause(*cid);
                            if clause.removed() {
                                continue;
                            }
                            if curr.tv_clause(clause) == -1 {
                                let cand_gid = clause.gid();
                                if cand_gid != 0 || !item.ignore_g0 {
                                    new_gids.insert(cand_gid);
                                }
                                if width > 0 && new_gids.len() > width as usize {
                                    break 'occ_scan;
                                }
                            }
                        }
                    }

                    let new_set: Vec<Gid> = new_gids.iter().copied().collect();
                    if !new_set.is_empty()
                        && self.allow_to_rotate(&new_set, curr_hash, depth, width)
                    {
                        let mut next_delta = delta.clone();
                        next_delta.push(var);
                        queue.push_back((new_set, next_delta));
                    }

                    curr.flip(var);
                    curr_hash ^= var_mix(var);
                }

                // The set is processed at this assignment; a singleton is a necessary group.
                self.visited.entry(gids.clone()).or_default().insert(curr_hash);
                if gids.len() == 1 && gids[0] != 0 {
                    item.nec_gids.insert(gids[0]);
                }
            }

            for var in &delta {
                curr.flip(*var);
                curr_hash ^= var_mix(*var);
            }
            self.num_points += 1;
        }

        item.set_completed();
        if item.ignore_global {
            self.visited.clear();
        }
        log::debug!(target: targets::ROTATION, "Extended rotation found {} necessary groups", item.nec_gids.len());
        item.completed()
    }

    fn num_points(&self) -> u64 {
        self.num_points
    }
}

#[cfg(test)]
mod emr_tests {
    use super::*;
    use crate::db::group_set::GroupSet;

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|i| Lit::from_int(*i)).collect()
    }

    #[test]
    fn hash_flip_is_incremental() {
        let mut ass = Assignment::new(5);
        for v in 1..=5 {
            ass.set(v, if v % 2 == 0 { 1 } else { -1 });
        }
        let mut hash = ass_hash(&ass);
        hash ^= var_mix(3);
        ass.flip(3);
        assert_eq!(hash, ass_hash(&ass));
    }

    #[test]
    fn singleton_sets_become_necessary() {
        let mut gs = GroupSet::new();
        gs.add_clause(1, lits(&[1]));
        gs.add_clause(2, lits(&[-1, 2]));
        gs.add_clause(3, lits(&[-2]));
        gs.seal();
        let state = MusState::new(gs);

        let mut model = Assignment::new(2);
        model.set(1, -1);
        model.set(2, -1);

        let mut item = RotateModel::new(1, model);
        item.rot_depth = 1;
        item.rot_width = 1;

        let mut rotator = ExtendedRotator::default();
        assert!(rotator.process(&mut item, &state));
        assert!(item.nec_gids.contains(&2));
        assert!(item.nec_gids.contains(&3));
    }
}
