/*!
Top-level unit propagation over the occurrence lists.

In group mode only background units seed the propagation: a unit of another group says nothing about that group's necessity.

Shrinking moves the falsified literal to the end of the clause's active prefix and cuts it off, so reconstruction is a matter of restoring full sizes.
A clause shrunk to size zero is the recorded conflict clause --- the empty clause in the output documents the conflict.
*/

use std::collections::VecDeque;

use crate::{
    db::state::MusState,
    misc::log::targets,
    structures::{ClauseId, Lit},
    work::{SimplifyBcp, WorkItem},
};

/// Outcome of enqueueing a literal.
enum Enqueue {
    Fresh,
    Known,
    Conflict,
}

/// The BCP simplifier.
#[derive(Debug, Default)]
pub struct BcpSimplifier {}

impl BcpSimplifier {
    /// Handles the [SimplifyBcp] work item.
    pub fn process(&mut self, item: &mut SimplifyBcp, state: &mut MusState) -> bool {
        log::debug!(target: targets::PREPROCESSING, "BCP simplification started");
        item.ensure_var(state.gset().max_var());

        let mut queue: VecDeque<Lit> = VecDeque::new();

        // Seed with the input units.
        let units: Vec<ClauseId> = state.gset().units().to_vec();
        for cid in units {
            let clause = state.gset().clause(cid);
            if clause.removed() || clause.asize() != 1 {
                continue;
            }
            if item.group_mode && clause.gid() != 0 {
                continue;
            }
            let lit = clause.lits()[0];
            if let Enqueue::Conflict = enqueue_lit(item, &mut queue, cid, lit) {
                log::debug!(target: targets::PREPROCESSING, "Conflict among the input units");
                record_conflict(item, state, cid);
                return item.completed();
            }
        }

        while let Some(lit) = queue.pop_front() {
            // Clauses holding the literal are satisfied: remove them.
            let satisfied: Vec<ClauseId> = state.gset().occs().clauses(lit).to_vec();
            for cid in satisfied {
                if state.gset().clause(cid).removed() {
                    continue;
                }
                let gid = state.gset().clause(cid).gid();
                let group_gone = state.gset_mut().remove_clause(cid);
                item.rcl_count += 1;
                item.removed_satisfied.push(cid);
                if group_gone && gid != 0 {
                    state.mark_removed(gid);
                    item.rg_count += 1;
                }
            }
            state.gset_mut().compact_occs(lit);

            // Clauses holding the negation shrink by one literal.
            let falsified = lit.negate();
            let touched: Vec<ClauseId> = state.gset().occs().clauses(falsified).to_vec();
            for cid in touched {
                let (removed, asize, gid) = {
                    let clause = state.gset().clause(cid);
                    (clause.removed(), clause.asize(), clause.gid())
                };
                if removed {
                    continue;
                }
                // An active unit here is a clash between the background and a
                // group unit; the clause shrinks to the empty clause, and the
                // group's necessity is left for extraction to determine.
                debug_assert!(asize != 1 || (item.group_mode && gid != 0));

                state.gset_mut().clause_mut(cid).shrink_literal(falsified);
                item.shrunk.push(cid);

                let now_unit = state.gset().clause(cid).asize() == 1;
                if now_unit && (!item.group_mode || gid == 0) {
                    let unit_lit = state.gset().clause(cid).lits()[0];
                    if let Enqueue::Conflict = enqueue_lit(item, &mut queue, cid, unit_lit) {
                        log::debug!(target: targets::PREPROCESSING, "Top-level conflict during propagation");
                        record_conflict(item, state, cid);
                        return item.completed();
                    }
                }
            }
            state.gset_mut().compact_occs(falsified);
        }

        log::debug!(target: targets::PREPROCESSING, "BCP removed {} clauses, {} groups", item.rcl_count, item.rg_count);
        item.set_completed();
        item.completed()
    }

    /// Restores the instance for output: shrunk clauses regain their full size and
    /// satisfied clauses return to whichever groups survived extraction.
    pub fn reconstruct(&mut self, item: &SimplifyBcp, state: &mut MusState) {
        for cid in &item.shrunk {
            if Some(*cid) == item.conflict {
                continue;
            }
            state.gset_mut().clause_mut(*cid).unshrink();
        }
        for cid in &item.removed_satisfied {
            let gid = state.gset().clause(*cid).gid();
            let keep = gid == 0 || state.nec(gid) || state.untested(gid);
            if keep {
                state.gset_mut().restore_clause(*cid);
                state.gset_mut().clause_mut(*cid).unshrink();
            }
        }
        log::debug!(target: targets::PREPROCESSING, "Reconstructed the instance after BCP");
    }
}

/// Checks a literal against the top-level assignment, assigning and queueing it when fresh.
fn enqueue_lit(
    item: &mut SimplifyBcp,
    queue: &mut VecDeque<Lit>,
    cid: ClauseId,
    lit: Lit,
) -> Enqueue {
    let data = &mut item.var_data[lit.var() as usize];
    if data.value != 0 {
        let agrees = (data.value > 0) == lit.polarity();
        match agrees {
            true => Enqueue::Known,
            false => Enqueue::Conflict,
        }
    } else {
        data.value = if lit.polarity() { 1 } else { -1 };
        data.reason = Some(cid);
        queue.push_back(lit);
        item.ua_count += 1;
        Enqueue::Fresh
    }
}

/// Records a top-level conflict on `cid`: the clause shrinks to the empty clause.
fn record_conflict(item: &mut SimplifyBcp, state: &mut MusState, cid: ClauseId) {
    item.conflict = Some(cid);
    state.gset_mut().clause_mut(cid).shrink_all();
    item.set_completed();
}

#[cfg(test)]
mod bcp_tests {
    use super::*;
    use crate::db::group_set::GroupSet;

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|i| Lit::from_int(*i)).collect()
    }

    #[test]
    fn propagation_removes_and_shrinks() {
        let mut gs = GroupSet::new();
        gs.add_clause(0, lits(&[1]));
        let satisfied = gs.add_clause(1, lits(&[1, 2]));
        let shrunk = gs.add_clause(2, lits(&[-1, 3]));
        gs.seal();
        let mut state = MusState::new(gs);

        let mut item = SimplifyBcp::new(false);
        let mut simplifier = BcpSimplifier::default();
        assert!(simplifier.process(&mut item, &mut state));
        assert!(!item.conflict());

        assert!(state.gset().clause(satisfied).removed());
        // (-1 3) lost its false literal and propagated 3.
        assert_eq!(state.gset().clause(shrunk).asize(), 1);
        assert_eq!(item.var_data[3].value, 1);
        assert!(state.r(1));

        simplifier.reconstruct(&item, &mut state);
        assert!(!state.gset().clause(satisfied).removed());
        assert_eq!(state.gset().clause(shrunk).asize(), 2);
    }

    #[test]
    fn conflicting_units_record_the_conflict() {
        let mut gs = GroupSet::new();
        gs.add_clause(1, lits(&[4]));
        let negative = gs.add_clause(2, lits(&[-4]));
        gs.seal();
        let mut state = MusState::new(gs);

        let mut item = SimplifyBcp::new(false);
        let mut simplifier = BcpSimplifier::default();
        assert!(simplifier.process(&mut item, &mut state));
        assert!(item.conflict());
        assert_eq!(item.conflict, Some(negative));
        assert_eq!(state.gset().clause(negative).asize(), 0);
    }
}
