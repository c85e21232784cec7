/*!
Blocked-clause elimination.

A clause `C` is blocked on a literal `l ∈ C` when every resolvent of `C` on `l` is tautological.
Dropping a blocked clause preserves satisfiability, and removals only ever unblock further clauses, so elimination iterates until a fixpoint.

The tautology test runs over the occurrence lists of `¬l`, with the clause abstraction as a prefilter.
Background clauses may be left untouched, and blocked clauses of other groups may be moved into the background instead of removed.
*/

use std::collections::VecDeque;

use crate::{
    db::state::MusState,
    misc::log::targets,
    structures::{clause::taut_resolvent, ClauseId},
    work::{SimplifyBce, WorkItem},
};

/// The BCE simplifier.
#[derive(Debug, Default)]
pub struct BceSimplifier {}

impl BceSimplifier {
    /// Handles the [SimplifyBce] work item.
    pub fn process(&mut self, item: &mut SimplifyBce, state: &mut MusState) -> bool {
        log::debug!(target: targets::PREPROCESSING, "BCE simplification started");

        // Work queue of candidate clauses; a removal re-queues the resolution
        // partners of the dropped clause, as they may have become blocked.
        let mut queue: VecDeque<ClauseId> =
            state.gset().clauses().iter().map(|cl| cl.id()).collect();
        let mut queued: Vec<bool> = vec![true; state.gset().size() + 1];

        while let Some(cid) = queue.pop_front() {
            queued[cid as usize] = false;
            let (removed, gid) = {
                let clause = state.gset().clause(cid);
                (clause.removed(), clause.gid())
            };
            if removed {
                continue;
            }
            if item.ignore_g0 && gid == 0 {
                continue;
            }

            let Some(blocking) = self.blocking_literal(state, cid) else {
                continue;
            };
            log::trace!(target: targets::PREPROCESSING, "Clause {cid} blocked on {blocking}");

            // Partners of every literal of the dropped clause may now be blocked.
            let partners: Vec<ClauseId> = {
                let gset = state.gset();
                let clause = gset.clause(cid);
                clause
                    .lits()
                    .iter()
                    .flat_map(|lit| gset.occs().clauses(lit.negate()).iter().copied())
                    .collect()
            };

            if item.blocked_to_g0 && gid != 0 {
                state.gset_mut().move_clause_to_group(cid, 0);
                item.rcl_count += 1;
                if state.gset().active_count(gid) == 0 {
                    state.mark_removed(gid);
                    item.rg_count += 1;
                }
            } else {
                let group_gone = state.gset_mut().remove_clause(cid);
                item.rcl_count += 1;
                if group_gone && gid != 0 {
                    state.mark_removed(gid);
                    item.rg_count += 1;
                }
            }

            for partner in partners {
                if !state.gset().clause(partner).removed() && !queued[partner as usize] {
                    queued[partner as usize] = true;
                    queue.push_back(partner);
                }
            }
        }

        log::debug!(target: targets::PREPROCESSING, "BCE removed {} clauses, {} groups", item.rcl_count, item.rg_count);
        item.set_completed();
        item.completed()
    }

    /// A literal the clause is blocked on, if any.
    fn blocking_literal(
        &self,
        state: &MusState,
        cid: ClauseId,
    ) -> Option<crate::structures::Lit> {
        let gset = state.gset();
        let clause = gset.clause(cid);

        'literal_scan: for lit in clause.lits() {
            for partner_cid in gset.occs().clauses(lit.negate()) {
                let partner = gset.clause(*partner_cid);
                if partner.removed() || partner.id() == cid {
                    continue;
                }
                if !taut_resolvent(clause, partner, *lit) {
                    continue 'literal_scan;
                }
            }
            return Some(*lit);
        }
        None
    }
}

#[cfg(test)]
mod bce_tests {
    use super::*;
    use crate::db::group_set::GroupSet;
    use crate::structures::Lit;

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|i| Lit::from_int(*i)).collect()
    }

    #[test]
    fn blocked_clause_is_removed() {
        // (1 2) is blocked on 1: its only partner on -1 is (-1 -2), and the
        // resolvent clashes on 2.
        let mut gs = GroupSet::new();
        let blocked = gs.add_clause(1, lits(&[1, 2]));
        gs.add_clause(2, lits(&[-1, -2]));
        gs.seal();
        let mut state = MusState::new(gs);

        let mut item = SimplifyBce::default();
        let mut simplifier = BceSimplifier::default();
        assert!(simplifier.process(&mut item, &mut state));

        assert!(state.gset().clause(blocked).removed());
        assert!(item.rcl_count >= 1);
    }

    #[test]
    fn unsatisfiable_square_has_no_blocked_clauses() {
        // Every resolvent in the full two-variable square is non-tautological
        // against some partner, so nothing may be eliminated.
        let mut gs = GroupSet::new();
        gs.add_clause(1, lits(&[1, 2]));
        gs.add_clause(2, lits(&[1, -2]));
        gs.add_clause(3, lits(&[-1, 2]));
        gs.add_clause(4, lits(&[-1, -2]));
        gs.seal();
        let mut state = MusState::new(gs);

        let mut item = SimplifyBce::default();
        let mut simplifier = BceSimplifier::default();
        assert!(simplifier.process(&mut item, &mut state));
        assert_eq!(item.rcl_count, 0);
        assert!(state.gset().clauses().iter().all(|cl| !cl.removed()));
    }
}
