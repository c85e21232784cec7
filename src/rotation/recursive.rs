/*!
Recursive model rotation through single falsified groups.

A queue of (group, delta) entries is seeded with the just-proved group and the empty delta.
For each entry the working assignment is reconstructed, the variables of the group's falsified clauses are the flip candidates, and any flip whose falsified set is exactly one group yields a new necessary group and a new queue entry.
Flips falsifying several groups can be recorded for scheduler fast-tracking instead.

Whether to rotate *through* a group a second time is delegated to a [decider](RotationDecider): the plain decider visits each group once, the visit-capped decider admits revisits up to a bound per (group, literal) pair.
*/

use std::collections::{BTreeSet, HashMap};

use crate::{
    db::state::MusState,
    misc::log::targets,
    rotation::ModelRotator,
    structures::{Gid, Lit, Var},
    work::{RotateModel, WorkItem},
};

/// Decides whether rotation proceeds through a newly falsified group.
pub trait RotationDecider {
    /// True if the rotation should enqueue `gid`, reached by flipping to `lit`.
    fn rotate_through(&mut self, item: &RotateModel, state: &MusState, gid: Gid, lit: Lit) -> bool;

    /// Drops any accumulated decision state.
    fn clear(&mut self);
}

/// Rotate through a group iff it is not already known necessary.
#[derive(Debug, Default)]
pub struct PlainDecider {}

impl RotationDecider for PlainDecider {
    fn rotate_through(&mut self, item: &RotateModel, state: &MusState, gid: Gid, _lit: Lit) -> bool {
        (item.ignore_global || !state.nec(gid)) && !item.nec_gids.contains(&gid)
    }

    fn clear(&mut self) {}
}

/// Admit revisits of a group through distinct literals, up to a cap per (group, literal) pair.
#[derive(Debug)]
pub struct VisitCapDecider {
    depth: u32,
    visits: HashMap<(Gid, Lit), u32>,
}

impl VisitCapDecider {
    pub fn new(depth: u32) -> Self {
        VisitCapDecider {
            depth,
            visits: HashMap::new(),
        }
    }
}

impl RotationDecider for VisitCapDecider {
    fn rotate_through(&mut self, _item: &RotateModel, _state: &MusState, gid: Gid, lit: Lit) -> bool {
        let count = self.visits.entry((gid, lit)).or_insert(0);
        *count += 1;
        *count <= self.depth
    }

    fn clear(&mut self) {
        self.visits.clear();
    }
}

/// The recursive rotator, parameterised by a decider.
pub struct RecursiveRotator<D: RotationDecider> {
    decider: D,
    num_points: u64,
}

impl<D: RotationDecider> RecursiveRotator<D> {
    pub fn new(decider: D) -> Self {
        RecursiveRotator {
            decider,
            num_points: 0,
        }
    }
}

impl<D: RotationDecider> ModelRotator for RecursiveRotator<D> {
    fn process(&mut self, item: &mut RotateModel, state: &MusState) -> bool {
        let gset = state.gset();
        log::debug!(target: targets::ROTATION, "Rotating group {}", item.gid);

        // Queue entries pair a falsified group with the delta reaching its witness.
        let mut queue: std::collections::VecDeque<(Gid, Vec<Var>)> =
            std::collections::VecDeque::new();
        queue.push_back((item.gid, Vec::new()));

        let mut curr = item.model.clone();

        'queue_loop: while let Some((gid, delta)) = queue.pop_front() {
            curr.multiflip(&delta);

            // Candidate variables: those of the currently falsified clauses of the group.
            let mut cand_vars: BTreeSet<Var> = BTreeSet::new();
            for cid in gset.gclauses(gid) {
                let clause = gset.clause(*cid);
                if clause.removed() {
                    continue;
                }
                if curr.tv_clause(clause) == -1 {
                    if clause.asize() == 0 {
                        // An empty clause admits no rotation at all.
                        curr.multiflip(&delta);
                        break 'queue_loop;
                    }
                    cand_vars.extend(clause.vars());
                }
            }
            debug_assert!(!cand_vars.is_empty(), "the group must be falsified here");

            for var in cand_vars {
                // Clauses holding the currently true literal of `var` may become falsified.
                let true_lit = Lit::new(var, curr.value_of(var) > 0);
                curr.flip(var);

                let mut new_gids: BTreeSet<Gid> = BTreeSet::new();
                for cid in gset.gclauses(gid) {
                    let clause = gset.clause(*cid);
                    if !clause.removed() && curr.tv_clause(clause) == -1 {
                        new_gids.insert(gid);
                        break;
                    }
                }

                if new_gids.is_empty() {
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
                            if new_gids.len() > 1 {
                                break 'occ_scan;
                            }
                        }
                    }

                    if new_gids.len() == 1 {
                        let new_gid = *new_gids.iter().next().unwrap();
                        if new_gid != 0
                            && self.decider.rotate_through(item, state, new_gid, true_lit)
                        {
                            item.nec_gids.insert(new_gid);
                            let mut next_delta = delta.clone();
                            next_delta.push(var);
                            queue.push_back((new_gid, next_delta));
                        }
                    } else if item.collect_ft_gids {
                        item.ft_gids
                            .extend(new_gids.iter().copied().filter(|g| *g != 0));
                    }
                }

                curr.flip(var);
            }

            curr.multiflip(&delta);
            self.num_points += 1;
        }

        item.set_completed();
        if item.ignore_global {
            self.decider.clear();
        }
        log::debug!(target: targets::ROTATION, "Rotation found {} necessary groups", item.nec_gids.len());
        item.completed()
    }

    fn num_points(&self) -> u64 {
        self.num_points
    }
}

#[cfg(test)]
mod rmr_tests {
    use super::*;
    use crate::db::group_set::GroupSet;
    use crate::structures::Assignment;

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|i| Lit::from_int(*i)).collect()
    }

    /// (x), (¬x ∨ y), (¬y): any single flip of a witness against one group
    /// falsifies exactly one other, so rotation discovers the rest for free.
    #[test]
    fn chain_rotates_to_every_group() {
        let mut gs = GroupSet::new();
        gs.add_clause(1, lits(&[1]));
        gs.add_clause(2, lits(&[-1, 2]));
        gs.add_clause(3, lits(&[-2]));
        gs.seal();
        let state = MusState::new(gs);

        // Witness for group 1 necessary: x false, y false satisfies groups 2 and 3.
        let mut model = Assignment::new(2);
        model.set(1, -1);
        model.set(2, -1);

        let mut item = RotateModel::new(1, model);
        let mut rotator = RecursiveRotator::new(PlainDecider::default());
        assert!(rotator.process(&mut item, &state));

        assert!(item.nec_gids.contains(&2));
        assert!(item.nec_gids.contains(&3));
    }

    #[test]
    fn visit_cap_limits_revisits() {
        let mut decider = VisitCapDecider::new(2);
        let state = MusState::new(GroupSet::new());
        let item = RotateModel::default();
        let lit = Lit::from_int(5);
        assert!(decider.rotate_through(&item, &state, 7, lit));
        assert!(decider.rotate_through(&item, &state, 7, lit));
        assert!(!decider.rotate_through(&item, &state, 7, lit));
        // A distinct literal reopens the group.
        assert!(decider.rotate_through(&item, &state, 7, Lit::from_int(6)));
    }
}
