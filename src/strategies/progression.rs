/*!
Progression-based extraction.

Target sets of geometrically growing size are probed from the tail of the unknown region.
An UNSAT probe drops the whole target (plus refinement) and doubles the size; a SAT probe analyses the target --- by binary search or linear scan, optionally restricted to the groups falsified by the witness --- to extract one necessary group, then resets the size to one.
*/

use std::collections::BTreeSet;

use crate::{
    config::ProgressionSearch,
    db::state::MusState,
    misc::log::targets,
    strategies::{stable_partition, Extraction},
    structures::{Assignment, Gid},
    types::err::{ErrorKind, OracleError},
    work::{CheckRangeStatus, WorkItem},
};

/// The cursors and the working vector of one progression run.
struct Progression {
    all: Vec<Gid>,
    p_unknown: usize,
    p_removed: usize,
    last_model: Assignment,

    /// The refinement set of the most recent UNSAT range check.
    unnec: BTreeSet<Gid>,
}

impl Extraction<'_> {
    pub(crate) fn run_progression(&mut self, state: &mut MusState) -> Result<(), ErrorKind> {
        let mut all: Vec<Gid> = Vec::new();
        while let Some(gid) = self.scheduler.next_group() {
            all.push(gid);
        }
        let mut run = Progression {
            p_removed: all.len(),
            all,
            p_unknown: 0,
            last_model: Assignment::default(),
            unnec: BTreeSet::new(),
        };

        // Loop invariant: [0, p_removed) is unsatisfiable with the background, and
        // [0, p_unknown) lies in every MUS of it.
        let mut target_size = 1usize;
        while run.p_unknown < run.p_removed {
            let p_target =
                run.p_removed - std::cmp::min(target_size, run.p_removed - run.p_unknown);
            log::debug!(target: targets::STRATEGY, "Main loop: {} necessary, {} unknown, target size {}",
                run.p_unknown, run.p_removed - run.p_unknown, target_size);

            if self.check_range(state, &mut run, p_target)? {
                self.analyze_target(state, &mut run, p_target)?;
                target_size = 1;
            } else {
                for gid in &run.all[p_target..run.p_removed] {
                    state.mark_removed(*gid);
                }
                state.incr_version();
                run.p_removed = p_target;
                if self.config.refine {
                    let unnec = std::mem::take(&mut run.unnec);
                    let p_unknown = run.p_unknown;
                    self.refine_region(state, &mut run, p_unknown, true, &unnec);
                }
                target_size <<= 1;
            }

            if self.out_of_time() {
                self.set_interrupted();
                break;
            }
        }
        Ok(())
    }

    /// Checks the status of `[p_unknown, p_range)`, saving the witness on SAT
    /// and the refinement set on UNSAT.
    fn check_range(
        &mut self,
        state: &mut MusState,
        run: &mut Progression,
        p_range: usize,
    ) -> Result<bool, ErrorKind> {
        let mut item = CheckRangeStatus::default();
        item.refine = self.config.refine;
        item.need_model = true;
        item.begin = run.p_unknown;
        item.end = p_range;
        item.all_end = run.p_removed;

        self.checker.process_range(&mut item, state, &run.all)?;
        state.clear_lists();
        if !item.completed() {
            return Err(OracleError::Undetermined.into());
        }
        if item.status {
            run.last_model = std::mem::take(&mut item.model);
            self.stats.sat_outcomes += 1;
        } else {
            run.unnec = std::mem::take(&mut item.unnec_gids);
            self.stats.unsat_outcomes += 1;
        }
        Ok(item.status)
    }

    /// Drops the members of `unnec` from `[p_from, p_removed)`.
    ///
    /// Returns the number of groups dropped. With `fast` the surviving order may
    /// be reshuffled; the order-preserving form keeps cursors into the region valid.
    fn refine_region(
        &mut self,
        state: &mut MusState,
        run: &mut Progression,
        p_from: usize,
        fast: bool,
        unnec: &BTreeSet<Gid>,
    ) -> usize {
        if unnec.is_empty() {
            return 0;
        }
        let split = match fast {
            true => {
                let region = &mut run.all[p_from..run.p_removed];
                let mut left = 0;
                let mut right = region.len();
                while left < right {
                    if !unnec.contains(&region[left]) {
                        left += 1;
                    } else {
                        right -= 1;
                        region.swap(left, right);
                    }
                }
                p_from + left
            }
            false => {
                stable_partition(&mut run.all[p_from..run.p_removed], |g| !unnec.contains(g))
                    + p_from
            }
        };
        let dropped = run.p_removed - split;
        for gid in &run.all[split..run.p_removed] {
            state.mark_removed(*gid);
        }
        if dropped > 0 {
            state.incr_version();
        }
        run.p_removed = split;
        self.stats.ref_groups += dropped;
        log::debug!(target: targets::STRATEGY, "Removed {dropped} additional groups with refinement");
        dropped
    }

    /// Staged refinement during target analysis: first the target region, which
    /// leaves the cursor untouched, then the rest, order-preserving, which shifts
    /// the cursor left by the number dropped before it.
    fn refine_staged(
        &mut self,
        state: &mut MusState,
        run: &mut Progression,
        p_target: &mut usize,
    ) {
        if !self.config.refine {
            return;
        }
        let unnec = std::mem::take(&mut run.unnec);
        self.refine_region(state, run, *p_target, true, &unnec);
        *p_target -= self.refine_region(state, run, run.p_unknown, false, &unnec);
    }

    /// Extracts one necessary group from the target interval `[p_target, p_removed)`.
    ///
    /// Precondition: `[p_unknown, p_target)` is satisfiable and `last_model` witnesses it.
    fn analyze_target(
        &mut self,
        state: &mut MusState,
        run: &mut Progression,
        p_target: usize,
    ) -> Result<(), ErrorKind> {
        let mut p_target = p_target;
        match self.config.progression_search {
            ProgressionSearch::BinaryFalsified | ProgressionSearch::LinearFalsified => {
                p_target = self.shift_falsified(state, run, p_target);
            }
            _ => {}
        }
        match self.config.progression_search {
            ProgressionSearch::Binary | ProgressionSearch::BinaryFalsified => {
                self.analyze_binary(state, run, p_target)
            }
            ProgressionSearch::Linear | ProgressionSearch::LinearFalsified => {
                self.analyze_linear(state, run, p_target)
            }
        }
    }

    fn analyze_binary(
        &mut self,
        state: &mut MusState,
        run: &mut Progression,
        mut p_target: usize,
    ) -> Result<(), ErrorKind> {
        while p_target + 1 < run.p_removed {
            let p_mid = p_target + (run.p_removed - p_target) / 2;
            if self.check_range(state, run, p_mid)? {
                p_target = p_mid;
            } else {
                for gid in &run.all[p_mid..run.p_removed] {
                    state.mark_removed(*gid);
                }
                state.incr_version();
                run.p_removed = p_mid;
                self.refine_staged(state, run, &mut p_target);
            }
        }
        self.take_transition(state, run, p_target)
    }

    fn analyze_linear(
        &mut self,
        state: &mut MusState,
        run: &mut Progression,
        mut p_target: usize,
    ) -> Result<(), ErrorKind> {
        // The probe always drops the last group of the region; a SAT outcome
        // pins the transition, an UNSAT outcome removes the group and retries.
        while p_target + 1 <= run.p_removed {
            let p_curr = run.p_removed - 1;
            if p_curr == p_target {
                break;
            }
            if self.check_range(state, run, p_curr)? {
                p_target = p_curr;
                break;
            }
            state.mark_removed(run.all[p_curr]);
            state.incr_version();
            run.p_removed = p_curr;
            self.refine_staged(state, run, &mut p_target);
        }
        self.take_transition(state, run, p_target)
    }

    /// Marks the transition group necessary and rotates its witness.
    fn take_transition(
        &mut self,
        state: &mut MusState,
        run: &mut Progression,
        p_target: usize,
    ) -> Result<(), ErrorKind> {
        run.all.swap(run.p_unknown, p_target);
        let transition = run.all[run.p_unknown];
        state.mark_necessary(transition);
        run.p_unknown += 1;
        log::debug!(target: targets::STRATEGY, "Found necessary group {transition}");

        if self.config.rotating() && !run.last_model.is_empty() {
            let model = run.last_model.clone();
            let nec: BTreeSet<Gid> = self.rotation_gids(transition, model, state);
            if !nec.is_empty() {
                // Everything rotation finds lies in the unknown region; pull it to the front.
                let split = stable_partition(&mut run.all[run.p_unknown..run.p_removed], |g| {
                    nec.contains(g)
                }) + run.p_unknown;
                for gid in &run.all[run.p_unknown..split] {
                    state.mark_necessary(*gid);
                }
                self.stats.rot_groups += split - run.p_unknown;
                run.p_unknown = split;
            }
        }
        Ok(())
    }

    /// Moves the groups satisfied by the witness to the front of the target region.
    ///
    /// Returns the new target cursor: from it on, every group is falsified by the witness.
    fn shift_falsified(
        &mut self,
        state: &MusState,
        run: &mut Progression,
        p_target: usize,
    ) -> usize {
        let gset = state.gset();
        let model = &run.last_model;
        let region = &mut run.all[p_target..run.p_removed];
        let mut left = 0;
        let mut right = region.len();
        while left < right {
            let satisfied = model.tv_clauses(
                gset.gclauses(region[left])
                    .iter()
                    .map(|cid| gset.clause(*cid))
                    .filter(|cl| !cl.removed()),
            ) == 1;
            if satisfied {
                left += 1;
            } else {
                right -= 1;
                region.swap(left, right);
            }
        }
        p_target + left
    }
}
