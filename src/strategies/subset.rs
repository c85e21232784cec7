/*!
Subset-based deletion.

Groups are scheduled in subsets: one UNSAT call can reject a whole subset (plus refinement), while a SAT outcome identifies the falsified members through the witness --- a singleton is a necessary group found at subset price, anything larger drops to per-group checks.

Subsets come either from the scheduling order or from the 1-neighbourhood of a seed group in the resolution graph (clauses connected through complementary literals).
An optional limit on UNSAT outcomes falls the strategy back to plain deletion once subsets stop paying off.
*/

use std::collections::BTreeSet;

use crate::{
    config::SubsetPick,
    db::state::MusState,
    misc::log::targets,
    strategies::Extraction,
    structures::Gid,
    types::err::ErrorKind,
    work::{CheckSubsetStatus, WorkItem},
};

impl Extraction<'_> {
    pub(crate) fn run_subset(&mut self, state: &mut MusState) -> Result<(), ErrorKind> {
        let subset_size = self.config.subset_size.value;
        let unsat_limit = self.config.subset_unsat_limit.value;
        let mut unsat_outcomes = 0usize;

        loop {
            let subset = match self.config.subset_pick {
                SubsetPick::Order => self.make_order_subset(state, subset_size),
                SubsetPick::RGraphHood => self.make_rgraph_subset(state, subset_size),
            };
            if subset.is_empty() {
                break;
            }
            log::debug!(target: targets::STRATEGY, "Checking subset of {} groups", subset.len());

            let mut item = CheckSubsetStatus::new(subset);
            item.refine = self.config.refine;
            item.need_model = true;

            let completed = self.checker.process_subset(&mut item, state)?;
            if !completed {
                // Undetermined as a whole; fall back to singles for these groups.
                for gid in item.subset {
                    if state.untested(gid) {
                        self.scheduler.reschedule(gid);
                    }
                }
                break;
            }

            if item.status {
                self.stats.sat_outcomes += 1;
                let falsified = self.falsified_members(state, &item);
                if falsified.len() == 1 {
                    let gid = falsified[0];
                    state.mark_necessary(gid);
                    self.scheduler.update_classified(gid);
                    if self.config.rotating() {
                        let model = std::mem::take(&mut item.model);
                        self.rotate_and_mark(gid, model, state);
                    }
                    // The rest of the subset goes back on the schedule.
                    for gid in item.subset {
                        if state.untested(gid) {
                            self.scheduler.reschedule(gid);
                        }
                    }
                } else {
                    // Several members falsified: settle each one singly.
                    self.check_singly(state, &item.subset)?;
                }
            } else {
                let unnec = std::mem::take(&mut item.unnec_gids);
                if item.version == state.version() {
                    for g in &unnec {
                        state.mark_removed(*g);
                        self.scheduler.update_classified(*g);
                    }
                    state.incr_version();
                }
                self.stats.unsat_outcomes += 1;
                self.stats.ref_groups += unnec.len().saturating_sub(item.subset.len());
                unsat_outcomes += 1;
            }

            if unsat_limit > 0 && unsat_outcomes >= unsat_limit {
                log::debug!(target: targets::STRATEGY, "UNSAT-outcome limit reached, falling back to deletion");
                break;
            }
            if self.out_of_time() {
                self.set_interrupted();
                return Ok(());
            }
        }

        // Whatever is left goes through the deletion loop.
        if state.num_untested() > 0 && !self.interrupted() {
            self.run_deletion(state)?;
        }
        Ok(())
    }

    /// Up to `size` untested groups in scheduling order.
    fn make_order_subset(&mut self, state: &MusState, size: usize) -> BTreeSet<Gid> {
        let mut subset = BTreeSet::new();
        while subset.len() < size {
            match self.scheduler.next_group() {
                Some(gid) => {
                    if gid != 0 && state.untested(gid) {
                        subset.insert(gid);
                    }
                }
                None => break,
            }
        }
        subset
    }

    /// A seed group plus resolution-graph neighbours, nearest first, up to `size` groups.
    ///
    /// Two clauses are neighbours when one holds the complement of a literal of
    /// the other. The walk is a breadth-first traversal from the seed's clauses,
    /// marking visits with the clause generation counter and recording the
    /// literal and parent each clause was reached through; levels past the
    /// 1-neighbourhood are only entered when the nearer ones run dry.
    fn make_rgraph_subset(&mut self, state: &mut MusState, size: usize) -> BTreeSet<Gid> {
        let seed = loop {
            match self.scheduler.next_group() {
                Some(gid) => {
                    if gid != 0 && state.untested(gid) {
                        break gid;
                    }
                }
                None => return BTreeSet::new(),
            }
        };

        self.rgraph_gen += 1;
        let generation = self.rgraph_gen;
        let mut subset = BTreeSet::from([seed]);

        let mut frontier: std::collections::VecDeque<crate::structures::ClauseId> =
            std::collections::VecDeque::new();
        for cid in state.gset().gclauses(seed).to_vec() {
            if !state.gset().clause(cid).removed() {
                state.gset_mut().clause_mut(cid).visited_gen = generation;
                frontier.push_back(cid);
            }
        }

        'walk: while let Some(cid) = frontier.pop_front() {
            let lits: Vec<_> = state.gset().clause(cid).lits().to_vec();
            for lit in lits {
                let partners: Vec<_> = state.gset().occs().clauses(lit.negate()).to_vec();
                for other_cid in partners {
                    let (removed, visited, gid) = {
                        let other = state.gset().clause(other_cid);
                        (other.removed(), other.visited_gen == generation, other.gid())
                    };
                    if removed || visited {
                        continue;
                    }
                    {
                        let other = state.gset_mut().clause_mut(other_cid);
                        other.visited_gen = generation;
                        other.incoming_lit = Some(lit.negate());
                        other.incoming_parent = Some(cid);
                    }
                    frontier.push_back(other_cid);
                    if gid != 0 && gid != seed && state.untested(gid) {
                        subset.insert(gid);
                        if size > 0 && subset.len() >= size {
                            break 'walk;
                        }
                    }
                }
            }
        }
        subset
    }

    /// The subset members with a falsified clause under the witness.
    fn falsified_members(&self, state: &MusState, item: &CheckSubsetStatus) -> Vec<Gid> {
        let gset = state.gset();
        item.subset
            .iter()
            .copied()
            .filter(|gid| {
                gset.gclauses(*gid)
                    .iter()
                    .map(|cid| gset.clause(*cid))
                    .any(|cl| !cl.removed() && item.model.tv_clause(cl) == -1)
            })
            .collect()
    }

    /// Settles every group of the subset with single-group checks.
    fn check_singly(&mut self, state: &mut MusState, subset: &BTreeSet<Gid>) -> Result<(), ErrorKind> {
        use crate::work::CheckGroupStatus;

        let mut item = CheckGroupStatus::default();
        item.refine = self.config.refine;
        item.need_model = self.config.rotating();

        for gid in subset {
            if state.r(*gid) || state.nec(*gid) {
                continue;
            }
            item.reset();
            item.gid = *gid;
            let completed = self.checker.process_group(&mut item, state)?;
            if completed {
                if item.status {
                    state.mark_necessary(*gid);
                    self.scheduler.update_classified(*gid);
                    self.stats.sat_outcomes += 1;
                    if self.config.rotating() {
                        let model = std::mem::take(&mut item.model);
                        self.rotate_and_mark(*gid, model, state);
                    }
                } else {
                    let unnec = std::mem::take(&mut item.unnec_gids);
                    for g in &unnec {
                        state.mark_removed(*g);
                        self.scheduler.update_classified(*g);
                    }
                    state.incr_version();
                    self.stats.unsat_outcomes += 1;
                    self.stats.ref_groups += unnec.len().saturating_sub(1);
                }
            } else if state.untested(*gid) {
                self.apply_unknown_policy(*gid, state)?;
            }
        }
        Ok(())
    }
}
