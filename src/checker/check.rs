/*!
Processing of the check-style work items.
*/

use crate::{
    checker::{neg::neg_product, SatChecker},
    db::state::MusState,
    misc::log::targets,
    oracle::Outcome,
    structures::{Gid, Lit, Var},
    types::err::ErrorKind,
    work::{
        CheckGroupStatus, CheckGroupStatusChunk, CheckRangeStatus, CheckSubsetStatus, CheckUnsat,
        WorkItem,
    },
};

impl SatChecker {
    /// Runs a single-group check. Returns true when the item completed.
    pub fn process_group(
        &mut self,
        item: &mut CheckGroupStatus,
        state: &MusState,
    ) -> Result<bool, ErrorKind> {
        let gid = item.gid;
        debug_assert!(gid != 0, "the background group is never checked");

        log::debug!(target: targets::CHECKER, "Checking group {gid}");
        self.sync(state);
        item.version = state.version();

        // The status may have been settled between scheduling and execution.
        if state.r(gid) || state.nec(gid) {
            return Ok(false);
        }

        self.oracle.deactivate_group(gid);

        // Redundancy removal: a fresh group carrying the CNF of the negation of `gid`.
        let mut rr_gid = None;
        if item.use_rr {
            let gset = state.gset();
            let member_clauses: Vec<&crate::structures::Clause> = gset
                .gclauses(gid)
                .iter()
                .map(|cid| gset.clause(*cid))
                .filter(|cl| !cl.removed())
                .collect();
            let negation = neg_product(&member_clauses);
            if !negation.is_empty() {
                let fresh_gid = self.oracle.max_gid() + 1;
                let slices: Vec<&[Lit]> = negation.iter().map(|cl| cl.as_slice()).collect();
                self.oracle
                    .add_group_clauses(&mut self.imgr, fresh_gid, &slices, false);
                rr_gid = Some(fresh_gid);
            }
        }

        if item.conflict_budget > 0 {
            self.oracle.set_conflict_budget(item.conflict_budget);
        }

        let outcome = self.solve(&[])?;
        match outcome {
            Outcome::Unsatisfiable => {
                if item.refine {
                    item.tainted_core = self.refine(state, &mut item.unnec_gids, rr_gid);
                }
                item.unnec_gids.insert(gid);
                item.status = false;
                item.set_completed();
            }

            Outcome::Satisfiable => {
                if item.need_model {
                    item.model = self.oracle.model().clone();
                    item.model.ensure_var(state.gset().max_var());
                }
                item.status = true;
                item.set_completed();
            }

            // The item stays incomplete; the strategy's approximation policy decides.
            Outcome::Unknown => {}
        }

        self.oracle.activate_group(gid);
        if let Some(rr) = rr_gid {
            self.oracle.del_group(rr);
        }

        Ok(item.completed())
    }

    /// Runs a group check within a persistent chunk whose negation is asserted.
    pub fn process_chunk(
        &mut self,
        item: &mut CheckGroupStatusChunk,
        state: &MusState,
    ) -> Result<bool, ErrorKind> {
        let gid = item.gid;
        debug_assert!(gid != 0 && item.chunk.contains(&gid));

        self.sync(state);
        item.version = state.version();

        if state.r(gid) || state.nec(gid) {
            return Ok(false);
        }

        // First call for this chunk: drop any previous negation, load this one.
        if item.first {
            self.drop_chunk_negation();

            let mut long_lits: Vec<Lit> = Vec::new();
            let gset = state.gset();
            for chunk_gid in &item.chunk {
                let mut auxes: Vec<Var> = Vec::new();
                for cid in gset.gclauses(*chunk_gid) {
                    let clause = gset.clause(*cid);
                    if clause.removed() {
                        continue;
                    }
                    let aux = self.imgr.fresh();
                    for lit in clause.lits() {
                        self.oracle.add_final_clause(&[lit.negate(), Lit::new(aux, false)]);
                    }
                    long_lits.push(Lit::new(aux, true));
                    auxes.push(aux);
                }
                if !auxes.is_empty() {
                    self.aux_map.insert(*chunk_gid, auxes);
                }
            }

            // The long clause completes the negation; its own group keeps it deletable.
            let long_gid = self.oracle.max_gid() + 1;
            self.oracle
                .add_group_clauses(&mut self.imgr, long_gid, &[&long_lits], false);
            self.aux_long_gid = Some(long_gid);
            log::debug!(target: targets::CHECKER, "Loaded chunk negation of {} groups as group {long_gid}", item.chunk.len());
        }

        self.oracle.deactivate_group(gid);
        let outcome = self.solve(&[])?;
        match outcome {
            Outcome::Unsatisfiable => {
                if item.refine {
                    // Restricted refinement: only chunk members are considered.
                    let core = self.oracle.group_core();
                    for chunk_gid in &item.chunk {
                        if state.untested(*chunk_gid) && !core.contains(chunk_gid) {
                            item.unnec_gids.insert(*chunk_gid);
                        }
                    }
                }
                item.unnec_gids.insert(gid);
                item.status = false;
                item.set_completed();
            }

            Outcome::Satisfiable => {
                if item.need_model {
                    item.model = self.oracle.model().clone();
                    item.model.ensure_var(state.gset().max_var());
                }
                item.status = true;
                item.set_completed();
            }

            Outcome::Unknown => {}
        }

        self.oracle.activate_group(gid);
        Ok(item.completed())
    }

    /// Runs a simultaneous check of a set of groups.
    pub fn process_subset(
        &mut self,
        item: &mut CheckSubsetStatus,
        state: &MusState,
    ) -> Result<bool, ErrorKind> {
        debug_assert!(!item.subset.contains(&0));

        self.sync(state);
        item.version = state.version();

        for gid in &item.subset {
            if state.r(*gid) || state.nec(*gid) {
                return Ok(false);
            }
        }

        for gid in &item.subset {
            self.oracle.deactivate_group(*gid);
        }

        let outcome = self.solve(&[])?;
        match outcome {
            Outcome::Unsatisfiable => {
                if item.refine {
                    self.refine(state, &mut item.unnec_gids, None);
                } else {
                    item.unnec_gids.extend(item.subset.iter().copied());
                }
                item.status = false;
                item.set_completed();
            }

            Outcome::Satisfiable => {
                if item.need_model {
                    item.model = self.oracle.model().clone();
                    item.model.ensure_var(state.gset().max_var());
                }
                item.status = true;
                item.set_completed();
            }

            Outcome::Unknown => {}
        }

        for gid in &item.subset {
            self.oracle.activate_group(*gid);
        }
        Ok(item.completed())
    }

    /// Runs a range check over the working vector `gids`.
    ///
    /// The oracle is synchronised range-style: the background and every finalised group are committed, groups of `[begin, end)` are enabled, and groups of `[end, all_end)` disabled.
    pub fn process_range(
        &mut self,
        item: &mut CheckRangeStatus,
        state: &MusState,
        gids: &[Gid],
    ) -> Result<bool, ErrorKind> {
        // Range-style synchronisation.
        if self.oracle.group_count() == 0 {
            self.imgr.register(state.gset().max_var());
            self.oracle.set_max_problem_var(state.gset().max_var());
            if state.gset().has_g0() {
                self.load_group(state, 0, true);
            }
            let necessary: Vec<Gid> = state.necessary_gids().collect();
            for gid in necessary {
                self.load_group(state, gid, true);
            }
        } else {
            let removed: Vec<Gid> = state.r_list().iter().copied().collect();
            for gid in removed {
                if self.oracle.exists_group(gid) {
                    self.oracle.del_group(gid);
                }
            }
            let finalised: Vec<Gid> = state.f_list().iter().copied().collect();
            for gid in finalised {
                if self.oracle.exists_group(gid) {
                    if !self.oracle.is_group_final(gid) {
                        self.oracle.make_group_final(gid);
                    }
                } else {
                    self.load_group(state, gid, true);
                }
            }
        }
        item.version = state.version();

        // Enable [begin, end), disable [end, all_end).
        for gid in &gids[item.begin..item.end] {
            if self.oracle.exists_group(*gid) {
                if !self.oracle.is_group_active(*gid) {
                    self.oracle.activate_group(*gid);
                }
            } else {
                self.load_group(state, *gid, false);
            }
        }
        for gid in &gids[item.end..item.all_end] {
            if self.oracle.exists_group(*gid)
                && !self.oracle.is_group_final(*gid)
                && self.oracle.is_group_active(*gid)
            {
                self.oracle.deactivate_group(*gid);
            }
        }

        let outcome = self.solve(&[])?;
        match outcome {
            Outcome::Unsatisfiable => {
                if item.refine {
                    let core = self.oracle.group_core();
                    for gid in &gids[item.begin..item.end] {
                        if !core.contains(gid) {
                            item.unnec_gids.insert(*gid);
                        }
                    }
                }
                item.status = false;
                item.set_completed();
            }

            Outcome::Satisfiable => {
                if item.need_model {
                    item.model = self.oracle.model().clone();
                    item.model.ensure_var(state.gset().max_var());
                }
                item.status = true;
                item.set_completed();
            }

            Outcome::Unknown => {}
        }

        Ok(item.completed())
    }

    /// Runs a plain unsatisfiability check of the current formula.
    pub fn process_unsat(
        &mut self,
        item: &mut CheckUnsat,
        state: &MusState,
    ) -> Result<bool, ErrorKind> {
        self.sync(state);
        match self.solve(&[])? {
            Outcome::Unsatisfiable => item.set_unsat(),
            Outcome::Satisfiable => {}
            Outcome::Unknown => return Ok(false),
        }
        item.set_completed();
        Ok(item.completed())
    }
}
