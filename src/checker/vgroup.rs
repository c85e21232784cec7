/*!
Variable-group operations.

In variable-group mode every clause is its own (clause) group in the oracle, and a *variable group* is driven through the occurrence lists of its variables: toggling the variable group toggles every clause touching one of them.

A clause belongs to the induced formula of the remaining variable groups as long as none of its variable groups has been removed, so:

- removing a variable group permanently removes every clause containing one of its variables;
- a clause is finalised only once *all* of its non-background variables have been settled necessary --- a per-clause counter tracks the settled hits;
- deactivation and activation must be paired immediately: two overlapping deactivations do not commute with a single activation.
*/

use std::collections::BTreeSet;

use crate::{
    checker::SatChecker,
    db::state::MusState,
    misc::log::targets,
    oracle::Outcome,
    structures::{ClauseId, Gid, Lit},
    types::err::ErrorKind,
    work::{CheckGroupStatus, WorkItem},
};

/// The clause ids touched by the variables of a variable group, deduplicated.
fn vgroup_clauses(state: &MusState, vgid: Gid) -> Vec<ClauseId> {
    let gset = state.gset();
    let mut seen = BTreeSet::new();
    for var in gset.vgvars(vgid) {
        for polarity in [true, false] {
            for cid in gset.occs().clauses(Lit::new(*var, polarity)) {
                seen.insert(*cid);
            }
        }
    }
    seen.into_iter().collect()
}

impl SatChecker {
    /// The variable-group form of [sync](SatChecker::sync).
    ///
    /// Both logs are applied in full --- a clause group may be affected by several variable groups, so there is no early stop; the caller clears the logs once synchronised.
    pub fn vsync(&mut self, state: &mut MusState) {
        if self.oracle.group_count() == 0 {
            let max_var = state.gset().max_var();
            self.imgr.register(max_var);
            self.oracle.set_max_problem_var(max_var);

            // Clauses over background variables alone are final from the start.
            let cids: Vec<ClauseId> = state.gset().clauses().iter().map(|cl| cl.id()).collect();
            for cid in cids {
                let (removed, g0v_count, asize, gid, lits): (bool, usize, usize, Gid, Vec<Lit>) = {
                    let gset = state.gset();
                    let clause = gset.clause(cid);
                    let g0v = clause.vars().filter(|v| gset.var_group(*v) == 0).count();
                    (
                        clause.removed(),
                        g0v,
                        clause.asize(),
                        clause.gid(),
                        clause.lits().to_vec(),
                    )
                };
                if removed {
                    continue;
                }
                state.gset_mut().clause_mut(cid).g0v_count = g0v_count;
                if g0v_count == asize {
                    self.oracle.add_final_clause(&lits);
                } else {
                    self.oracle
                        .add_group_clauses(&mut self.imgr, gid, &[&lits], false);
                }
            }
        }

        let removed: Vec<Gid> = state.r_list().iter().copied().collect();
        for vgid in removed {
            self.del_vgroup(state, vgid);
        }
        let finalised: Vec<Gid> = state.f_list().iter().copied().collect();
        for vgid in finalised {
            self.make_vgroup_final(state, vgid);
        }
    }

    /// Permanently removes every clause touching the variable group.
    pub fn del_vgroup(&mut self, state: &mut MusState, vgid: Gid) {
        for cid in vgroup_clauses(state, vgid) {
            let cgid = state.gset().clause(cid).gid();
            if self.oracle.exists_group(cgid) {
                self.oracle.del_group(cgid);
            }
            if !state.gset().clause(cid).removed() {
                state.gset_mut().remove_clause(cid);
            }
        }
        // The stale occurrence entries of the group's variables are dropped here.
        let vars: Vec<_> = state.gset().vgvars(vgid).to_vec();
        for var in vars {
            for polarity in [true, false] {
                state.gset_mut().compact_occs(Lit::new(var, polarity));
            }
        }
        log::trace!(target: targets::SYNC, "Removed variable group {vgid}");
    }

    /// Counts the settled variables of every touched clause, finalising clauses with none left open.
    pub fn make_vgroup_final(&mut self, state: &mut MusState, vgid: Gid) {
        let vars: Vec<_> = state.gset().vgvars(vgid).to_vec();
        for var in vars {
            for polarity in [true, false] {
                let cids: Vec<ClauseId> = state
                    .gset()
                    .occs()
                    .clauses(Lit::new(var, polarity))
                    .to_vec();
                for cid in cids {
                    if state.gset().clause(cid).removed() {
                        continue;
                    }
                    let (cgid, settled) = {
                        let clause = state.gset_mut().clause_mut(cid);
                        clause.nv_count += 1;
                        (
                            clause.gid(),
                            clause.nv_count + clause.g0v_count == clause.asize(),
                        )
                    };
                    if settled
                        && self.oracle.exists_group(cgid)
                        && !self.oracle.is_group_final(cgid)
                    {
                        self.oracle.make_group_final(cgid);
                    }
                }
            }
        }
    }

    fn deactivate_vgroup(&mut self, state: &MusState, vgid: Gid) {
        for cid in vgroup_clauses(state, vgid) {
            let cgid = state.gset().clause(cid).gid();
            if self.oracle.exists_group(cgid)
                && !self.oracle.is_group_final(cgid)
                && self.oracle.is_group_active(cgid)
            {
                self.oracle.deactivate_group(cgid);
            }
        }
    }

    fn activate_vgroup(&mut self, state: &MusState, vgid: Gid) {
        for cid in vgroup_clauses(state, vgid) {
            let cgid = state.gset().clause(cid).gid();
            if self.oracle.exists_group(cgid)
                && !self.oracle.is_group_final(cgid)
                && !self.oracle.is_group_active(cgid)
            {
                self.oracle.activate_group(cgid);
            }
        }
    }

    /// Runs a single variable-group check.
    pub fn process_vgroup(
        &mut self,
        item: &mut CheckGroupStatus,
        state: &mut MusState,
    ) -> Result<bool, ErrorKind> {
        let vgid = item.gid;
        debug_assert!(vgid != 0, "the background variable group is never checked");

        self.vsync(state);
        state.clear_lists();
        item.version = state.version();

        if state.r(vgid) || state.nec(vgid) {
            return Ok(false);
        }

        // Redundancy removal over the induced clauses, with auxiliary variables:
        // the product encoding would be exponential in the clause count here.
        let mut rr_gid = None;
        if item.use_rr {
            let fresh_gid = self.oracle.max_gid() + 1;
            let mut rr_clauses: Vec<Vec<Lit>> = Vec::new();
            let mut long_lits: Vec<Lit> = Vec::new();
            for cid in vgroup_clauses(state, vgid) {
                let gset = state.gset();
                let clause = gset.clause(cid);
                if clause.removed() {
                    continue;
                }
                let aux = self.imgr.fresh();
                for lit in clause.lits() {
                    rr_clauses.push(vec![lit.negate(), Lit::new(aux, false)]);
                }
                long_lits.push(Lit::new(aux, true));
            }
            rr_clauses.push(long_lits);
            let slices: Vec<&[Lit]> = rr_clauses.iter().map(|cl| cl.as_slice()).collect();
            self.oracle
                .add_group_clauses(&mut self.imgr, fresh_gid, &slices, false);
            rr_gid = Some(fresh_gid);
        }

        self.deactivate_vgroup(state, vgid);
        let outcome = self.solve(&[])?;
        match outcome {
            Outcome::Unsatisfiable => {
                if item.refine {
                    item.tainted_core = self.vrefine(state, item, rr_gid);
                }
                item.unnec_gids.insert(vgid);
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

        self.activate_vgroup(state, vgid);
        if let Some(rr) = rr_gid {
            self.oracle.del_group(rr);
        }

        Ok(item.completed())
    }

    /// The variable-group form of refinement.
    ///
    /// The clause core is lifted to the variable groups appearing in its clauses; variable groups outside go to `unnec_gids` when the core is clean, and to the fast-track set when tainted.
    fn vrefine(&self, state: &MusState, item: &mut CheckGroupStatus, rr_gid: Option<Gid>) -> bool {
        let gset = state.gset();
        let core = self.oracle.group_core();

        let mut vgcore: BTreeSet<Gid> = BTreeSet::new();
        let mut clean = true;
        for cgid in core {
            if Some(*cgid) == rr_gid {
                clean = false;
                continue;
            }
            for cid in gset.gclauses(*cgid) {
                let clause = gset.clause(*cid);
                if clause.removed() {
                    continue;
                }
                for var in clause.vars() {
                    vgcore.insert(gset.var_group(var));
                }
            }
        }

        for vgid in gset.vgroup_gids() {
            if vgid != 0 && state.untested(vgid) && !vgcore.contains(&vgid) {
                match clean {
                    true => item.unnec_gids.insert(vgid),
                    false => item.ft_gids.insert(vgid),
                };
            }
        }
        !clean
    }
}
