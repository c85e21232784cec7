/*!
Deletion-based extraction: the baseline.

Each scheduled group is checked in turn.
An UNSAT outcome removes the group and, under refinement, everything outside the core; a SAT outcome proves it necessary and feeds the witness to model rotation.
*/

use crate::{
    config::RedundancyMode,
    db::state::MusState,
    misc::log::targets,
    strategies::Extraction,
    structures::{Assignment, Gid},
    types::err::ErrorKind,
    work::{CheckGroupStatus, WorkItem},
};

/// True when the model satisfies every active clause of the group.
fn group_satisfied(state: &MusState, gid: Gid, model: &Assignment) -> bool {
    let gset = state.gset();
    match state.var_mode() {
        false => {
            model.tv_clauses(
                gset.gclauses(gid)
                    .iter()
                    .map(|cid| gset.clause(*cid))
                    .filter(|cl| !cl.removed()),
            ) == 1
        }
        // Variable-group necessity has no clause set of its own to test.
        true => false,
    }
}

impl Extraction<'_> {
    pub(crate) fn run_deletion(&mut self, state: &mut MusState) -> Result<(), ErrorKind> {
        let mut item = CheckGroupStatus::default();
        item.refine = self.config.refine;
        item.need_model = self.config.rotating();
        item.use_rr = self.initial_rr();
        item.conflict_budget = self.config.conflict_budget.value;

        // A version mismatch re-checks the same group instead of taking the next.
        let mut retry: Option<Gid> = None;

        loop {
            let gid = match retry.take() {
                Some(gid) => gid,
                None => match self.scheduler.next_group() {
                    Some(gid) => gid,
                    None => break,
                },
            };
            if gid == 0 {
                continue;
            }

            // Refinement or rotation may have settled the group since scheduling.
            if state.r(gid) || state.nec(gid) {
                continue;
            }

            // Parameters survive the reset; only results are cleared.
            item.reset();
            item.gid = gid;
            log::debug!(target: targets::STRATEGY, "Checking group {gid}");

            let completed = match state.var_mode() {
                false => self.checker.process_group(&mut item, state)?,
                true => self.checker.process_vgroup(&mut item, state)?,
            };

            if completed {
                if item.status {
                    // A witness satisfying the checked group as well satisfies the
                    // whole instance: nothing here is unsatisfiable.
                    if !item.model.is_empty() && group_satisfied(state, gid, &item.model) {
                        return Err(crate::types::err::StateError::Satisfiable.into());
                    }
                    // SAT: the group is necessary; rotate the witness.
                    state.mark_necessary(gid);
                    self.scheduler.update_classified(gid);
                    self.stats.sat_outcomes += 1;
                    if self.config.rotating() {
                        let model = std::mem::take(&mut item.model);
                        self.rotate_and_mark(gid, model, state);
                    }
                    if self.config.redundancy == RedundancyMode::Adaptive {
                        item.use_rr = true;
                    }
                } else {
                    // UNSAT: the group, and whatever refinement found, is unnecessary.
                    let unnec = std::mem::take(&mut item.unnec_gids);
                    if item.version == state.version() {
                        for g in &unnec {
                            state.mark_removed(*g);
                            self.scheduler.update_classified(*g);
                        }
                        state.incr_version();
                        if item.tainted_core {
                            self.stats.tainted_cores += 1;
                            if self.config.redundancy == RedundancyMode::Adaptive {
                                log::debug!(target: targets::STRATEGY, "Tainted core, backing off redundancy removal");
                                item.use_rr = false;
                            }
                        }
                    } else {
                        retry = Some(gid);
                    }
                    for ft in std::mem::take(&mut item.ft_gids) {
                        if state.untested(ft) {
                            self.scheduler.fasttrack(ft);
                        }
                    }
                    self.stats.unsat_outcomes += 1;
                    self.stats.ref_groups += unnec.len().saturating_sub(1);
                }
            } else if state.untested(gid) {
                self.apply_unknown_policy(gid, state)?;
            }

            if self.out_of_time() {
                self.set_interrupted();
                break;
            }
        }

        // Sync the results of the very last check.
        match state.var_mode() {
            false => self.checker.sync(state),
            true => {
                self.checker.vsync(state);
                state.clear_lists();
            }
        }
        Ok(())
    }
}
