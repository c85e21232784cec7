/*!
Insertion-based extraction.

The working vector is partitioned by two cursors: `[0, p_unknown)` is the growing MUS, `[p_unknown, p_removed)` is unknown, `[p_removed, ..)` is gone.
The inner loop extends a prefix of the unknown region one group at a time until the range check turns UNSAT; the last added group is the next necessary one, everything past the prefix is refinable, and rotation may settle more.
*/

use std::collections::BTreeSet;

use crate::{
    db::state::MusState,
    misc::log::targets,
    strategies::{stable_partition, Extraction},
    structures::{Assignment, Gid},
    types::err::{ErrorKind, OracleError, StateError},
    work::{CheckRangeStatus, WorkItem},
};

impl Extraction<'_> {
    pub(crate) fn run_insertion(&mut self, state: &mut MusState) -> Result<(), ErrorKind> {
        let mut all: Vec<Gid> = Vec::new();
        while let Some(gid) = self.scheduler.next_group() {
            all.push(gid);
        }
        let mut p_unknown = 0usize;
        let mut p_removed = all.len();

        let mut item = CheckRangeStatus::default();
        item.refine = self.config.refine;
        item.need_model = self.config.rotating();

        while p_unknown != p_removed {
            log::debug!(target: targets::STRATEGY, "Main loop: {} necessary, {} unknown, {} removed",
                p_unknown, p_removed - p_unknown, all.len() - p_removed);

            // Extend the prefix until UNSAT.
            let mut last_model = Assignment::default();
            let mut p_curr = p_unknown;
            let mut ended_sat = true;
            while p_curr <= p_removed {
                item.reset();
                item.begin = p_unknown;
                item.end = p_curr;
                item.all_end = p_removed;
                self.checker.process_range(&mut item, state, &all)?;
                state.clear_lists();
                if !item.completed() {
                    return Err(OracleError::Undetermined.into());
                }
                if item.status {
                    if self.config.rotating() {
                        last_model = std::mem::take(&mut item.model);
                    }
                    self.stats.sat_outcomes += 1;
                    p_curr += 1;
                } else {
                    self.stats.unsat_outcomes += 1;
                    ended_sat = false;
                    break;
                }
            }
            if ended_sat {
                // The whole working set is satisfiable together with the background.
                return Err(StateError::Satisfiable.into());
            }

            // The groups beyond the prefix are unnecessary; refinement may add more
            // from inside it. The transition group cannot be among them.
            if self.config.refine {
                let unnec = std::mem::take(&mut item.unnec_gids);
                let split =
                    stable_partition(&mut all[p_unknown..p_curr], |g| !unnec.contains(g))
                        + p_unknown;
                self.stats.ref_groups += unnec.len();
                p_curr = split;
            }
            for gid in &all[p_curr..p_removed] {
                state.mark_removed(*gid);
            }
            state.incr_version();
            log::debug!(target: targets::STRATEGY, "{} unnecessary groups", p_removed - p_curr);
            p_removed = p_curr;

            // The transition group, plus whatever rotation finds inside the region.
            if p_unknown < p_removed {
                let transition = all[p_curr - 1];
                let mut nec: BTreeSet<Gid> = match last_model.is_empty() {
                    true => BTreeSet::new(),
                    false => self.rotation_gids(transition, last_model, state),
                };
                nec.insert(transition);
                self.stats.rot_groups += nec.len() - 1;

                let split =
                    stable_partition(&mut all[p_unknown..p_removed], |g| nec.contains(g))
                        + p_unknown;
                for gid in &all[p_unknown..split] {
                    state.mark_necessary(*gid);
                }
                log::debug!(target: targets::STRATEGY, "{} necessary groups", split - p_unknown);
                p_unknown = split;
            }

            if self.out_of_time() {
                self.set_interrupted();
                break;
            }
        }
        Ok(())
    }
}
