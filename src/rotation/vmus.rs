/*!
Model rotation for variable groups.

The witnessing assignment of a necessary variable group falsifies only clauses touching that group's variables.
After a flip, any variable group with a variable in *every* falsified clause covers the falsified set: removing it would remove all those clauses, so the flipped assignment witnesses its necessity.
The delta extends by the flipped variable, and rotation continues from each newly necessary group.
*/

use std::collections::{BTreeSet, VecDeque};

use crate::{
    db::state::MusState,
    misc::log::targets,
    rotation::ModelRotator,
    structures::{ClauseId, Gid, Lit, Var},
    work::{RotateModel, WorkItem},
};

/// The variable-group rotator.
#[derive(Default)]
pub struct VmusRotator {
    num_points: u64,
}

impl ModelRotator for VmusRotator {
    fn process(&mut self, item: &mut RotateModel, state: &MusState) -> bool {
        let gset = state.gset();
        log::debug!(target: targets::ROTATION, "Rotating variable group {}", item.gid);

        let mut queue: VecDeque<(Gid, Vec<Var>)> = VecDeque::new();
        queue.push_back((item.gid, Vec::new()));

        let mut curr = item.model.clone();

        while let Some((vgid, delta)) = queue.pop_front() {
            curr.multiflip(&delta);

            // The falsified clauses all touch the group's variables.
            let mut falsified: BTreeSet<ClauseId> = BTreeSet::new();
            for var in gset.vgvars(vgid) {
                for polarity in [true, false] {
                    for cid in gset.occs().clauses(Lit::new(*var, polarity)) {
                        let clause = gset.clause(*cid);
                        if !clause.removed() && curr.tv_clause(clause) == -1 {
                            falsified.insert(*cid);
                        }
                    }
                }
            }

            let mut cand_vars: BTreeSet<Var> = BTreeSet::new();
            for cid in &falsified {
                cand_vars.extend(gset.clause(*cid).vars());
            }

            for var in cand_vars {
                let true_lit = Lit::new(var, curr.value_of(var) > 0);
                curr.flip(var);

                // Falsified clauses after the flip: survivors plus the newly falsified.
                let mut now_falsified: Vec<ClauseId> = falsified
                    .iter()
                    .copied()
                    .filter(|cid| curr.tv_clause(gset.clause(*cid)) == -1)
                    .collect();
                for cid in gset.occs().clauses(true_lit) {
                    let clause = gset.clause(*cid);
                    if !clause.removed() && curr.tv_clause(clause) == -1 {
                        now_falsified.push(*cid);
                    }
                }

                if !now_falsified.is_empty() {
                    // Variable groups covering every falsified clause.
                    let mut common: BTreeSet<Gid> = gset
                        .clause(now_falsified[0])
                        .vars()
                        .map(|v| gset.var_group(v))
                        .collect();
                    for cid in &now_falsified[1..] {
                        let groups: BTreeSet<Gid> =
                            gset.clause(*cid).vars().map(|v| gset.var_group(v)).collect();
                        common.retain(|g| groups.contains(g));
                    }

                    for vg in common {
                        if vg != 0
                            && !state.nec(vg)
                            && !item.nec_gids.contains(&vg)
                        {
                            item.nec_gids.insert(vg);
                            let mut next_delta = delta.clone();
                            next_delta.push(var);
                            queue.push_back((vg, next_delta));
                        }
                    }
                }

                curr.flip(var);
            }

            curr.multiflip(&delta);
            self.num_points += 1;
        }

        item.set_completed();
        log::debug!(target: targets::ROTATION, "Variable-group rotation found {} necessary groups", item.nec_gids.len());
        item.completed()
    }

    fn num_points(&self) -> u64 {
        self.num_points
    }
}

#[cfg(test)]
mod vmr_tests {
    use super::*;
    use crate::db::group_set::GroupSet;
    use crate::structures::Assignment;

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|i| Lit::from_int(*i)).collect()
    }

    /// Variables 1 and 2 in their own groups; (1), (-1 2), (-2) is UNSAT.
    /// A witness against group {1} rotates into the necessity of group {2}.
    #[test]
    fn rotation_reaches_covering_groups() {
        let mut gs = GroupSet::new();
        gs.add_clause(1, lits(&[1]));
        gs.add_clause(2, lits(&[-1, 2]));
        gs.add_clause(3, lits(&[-2]));
        gs.assign_var_group(1, 1);
        gs.assign_var_group(2, 2);
        gs.seal();
        let state = MusState::new(gs);

        let mut model = Assignment::new(2);
        model.set(1, -1);
        model.set(2, -1);

        let mut item = RotateModel::new(1, model);
        let mut rotator = VmusRotator::default();
        assert!(rotator.process(&mut item, &state));
        assert!(item.nec_gids.contains(&2));
    }
}
