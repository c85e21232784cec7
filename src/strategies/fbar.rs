/*!
Abstraction-refinement extraction, for instances hiding a small core inside a mostly satisfiable formula.

Two phases.
First a CEGAR-style over-approximation: only the background is enabled, and every round enables the untested groups the current model leaves unsatisfied, until the enabled set turns UNSAT.
Groups never enabled are unnecessary outright, and the final core refines the enabled candidates further.

Second, cleanup: each surviving candidate is re-checked by deactivation, removed on UNSAT and kept with a refreshed witness on SAT.
A per-group witness cache short-circuits the call when a stored witness still satisfies the remaining candidates and falsifies its group.
*/

use std::collections::{BTreeSet, HashMap};

use crate::{
    db::state::MusState,
    misc::log::targets,
    oracle::Outcome,
    strategies::Extraction,
    structures::{Assignment, Gid},
    types::err::{ErrorKind, OracleError},
};

impl Extraction<'_> {
    pub(crate) fn run_fbar(&mut self, state: &mut MusState) -> Result<(), ErrorKind> {
        let mut untested: BTreeSet<Gid> = state.untested_gids().collect();
        let mut cand: BTreeSet<Gid> = BTreeSet::new();

        // When trimming already populated the oracle the untested groups are
        // deactivated in place; otherwise only the background is loaded and
        // candidate groups are added on demand.
        let untrimmed = self.checker.oracle().group_count() == 0;
        if untrimmed {
            self.checker.imgr_mut().register(state.gset().max_var());
            self.checker.oracle().set_max_problem_var(state.gset().max_var());
            if state.gset().has_g0() {
                self.checker.load_group(state, 0, true);
            }
        } else {
            self.checker.sync(state);
            for gid in &untested {
                if self.checker.oracle().is_group_active(*gid) {
                    self.checker.oracle().deactivate_group(*gid);
                }
            }
        }

        // The background alone: UNSAT means every group is redundant.
        match self.checker.solve(&[])? {
            Outcome::Unsatisfiable => {
                log::debug!(target: targets::STRATEGY, "Background is unsatisfiable on its own");
                state.make_empty_mus();
                self.finish_fbar(state, &untested);
                return Ok(());
            }
            Outcome::Unknown => return Err(OracleError::Undetermined.into()),
            Outcome::Satisfiable => {}
        }

        // Witnesses of necessity, cached per group.
        let mut witnesses: HashMap<Gid, Assignment> = HashMap::new();

        // CEGAR rounds: enable whatever the model leaves unsatisfied.
        loop {
            let unsatisfied: Vec<Gid> = {
                let gset = state.gset();
                let model = self.checker.oracle().model().clone();
                untested
                    .iter()
                    .copied()
                    .filter(|gid| {
                        model.tv_clauses(
                            gset.gclauses(*gid)
                                .iter()
                                .map(|cid| gset.clause(*cid))
                                .filter(|cl| !cl.removed()),
                        ) != 1
                    })
                    .collect()
            };
            if unsatisfied.is_empty() {
                // The model satisfies every group: the formula is satisfiable.
                return Err(crate::types::err::StateError::Satisfiable.into());
            }
            if let [lone] = unsatisfied.as_slice() {
                // The model satisfies everything else: a candidate witness of necessity.
                witnesses.insert(*lone, self.checker.oracle().model().clone());
            }
            for gid in &unsatisfied {
                match untrimmed {
                    true => self.checker.load_group(state, *gid, false),
                    false => self.checker.oracle().activate_group(*gid),
                }
                cand.insert(*gid);
                untested.remove(gid);
            }
            log::debug!(target: targets::STRATEGY, "CEGAR round enabled {} groups, {} candidates",
                unsatisfied.len(), cand.len());

            match self.checker.solve(&[])? {
                Outcome::Unsatisfiable => break,
                Outcome::Satisfiable => self.stats.sat_outcomes += 1,
                Outcome::Unknown => return Err(OracleError::Undetermined.into()),
            }

            if self.out_of_time() {
                // Partial: keep the candidates as potentially necessary.
                self.set_interrupted();
                for gid in &cand {
                    state.mark_necessary_fake(*gid);
                }
                self.finish_fbar(state, &untested);
                return Ok(());
            }
        }
        self.stats.unsat_outcomes += 1;

        // Refinement: the never-enabled groups, and the candidates outside the core.
        self.stats.ref_groups += untested.len();
        for gid in std::mem::take(&mut untested) {
            state.mark_removed(gid);
        }
        let core = self.checker.oracle().group_core().clone();
        let outside: Vec<Gid> = cand.iter().copied().filter(|g| !core.contains(g)).collect();
        self.stats.ref_groups += outside.len();
        for gid in outside {
            self.checker.oracle().del_group(gid);
            state.mark_removed(gid);
            cand.remove(&gid);
        }
        state.incr_version();
        log::debug!(target: targets::STRATEGY, "{} candidates after abstraction", cand.len());

        // Cleanup: deletion over the candidates, with the witness cache.
        let members: Vec<Gid> = cand.iter().copied().collect();
        for gid in members {
            if state.r(gid) {
                continue;
            }
            if let Some(witness) = witnesses.get(&gid) {
                if self.witness_holds(state, &cand, gid, witness) {
                    log::trace!(target: targets::STRATEGY, "Cached witness settles group {gid}");
                    continue;
                }
                witnesses.remove(&gid);
            }

            self.checker.oracle().deactivate_group(gid);
            match self.checker.solve(&[])? {
                Outcome::Unsatisfiable => {
                    self.stats.unsat_outcomes += 1;
                    self.checker.oracle().del_group(gid);
                    state.mark_removed(gid);
                    cand.remove(&gid);
                    // The rest of the core refines the remaining candidates.
                    if self.config.refine {
                        let core = self.checker.oracle().group_core().clone();
                        let outside: Vec<Gid> =
                            cand.iter().copied().filter(|g| !core.contains(g)).collect();
                        self.stats.ref_groups += outside.len();
                        for g in outside {
                            self.checker.oracle().del_group(g);
                            state.mark_removed(g);
                            cand.remove(&g);
                            witnesses.remove(&g);
                        }
                    }
                    state.incr_version();
                }
                Outcome::Satisfiable => {
                    self.stats.sat_outcomes += 1;
                    witnesses.insert(gid, self.checker.oracle().model().clone());
                    self.checker.oracle().activate_group(gid);
                }
                Outcome::Unknown => {
                    self.checker.oracle().activate_group(gid);
                    self.apply_unknown_policy(gid, state)?;
                    cand.remove(&gid);
                }
            }

            if self.out_of_time() {
                self.set_interrupted();
                break;
            }
        }

        for gid in &cand {
            if state.untested(*gid) {
                state.mark_necessary(*gid);
            }
        }
        self.finish_fbar(state, &BTreeSet::new());
        Ok(())
    }

    /// True when the cached witness still falsifies its group and satisfies the other candidates.
    fn witness_holds(
        &self,
        state: &MusState,
        cand: &BTreeSet<Gid>,
        gid: Gid,
        witness: &Assignment,
    ) -> bool {
        let gset = state.gset();
        let group_falsified = gset
            .gclauses(gid)
            .iter()
            .map(|cid| gset.clause(*cid))
            .any(|cl| !cl.removed() && witness.tv_clause(cl) == -1);
        if !group_falsified {
            return false;
        }
        for other in cand {
            if *other == gid || state.r(*other) {
                continue;
            }
            let satisfied = witness.tv_clauses(
                gset.gclauses(*other)
                    .iter()
                    .map(|cid| gset.clause(*cid))
                    .filter(|cl| !cl.removed()),
            ) == 1;
            if !satisfied {
                return false;
            }
        }
        true
    }

    /// Leaves the oracle consistent with the final classification.
    fn finish_fbar(&mut self, state: &mut MusState, leftover: &BTreeSet<Gid>) {
        for gid in leftover {
            if state.untested(*gid) {
                state.mark_removed(*gid);
            }
        }
        state.incr_version();
        self.checker.sync(state);
        state.clear_lists();
    }
}
