/*!
Dichotomic extraction.

Insertion's data layout, with the linear search for the next transition group replaced by a binary one: test the prefix up to a midpoint, move the lower bound right on SAT and the upper bound left on UNSAT.
When the window closes the single group at its lower edge is the next necessary group, and every UNSAT step refines the region past the midpoint away en masse.
*/

use std::collections::BTreeSet;

use crate::{
    db::state::MusState,
    misc::log::targets,
    strategies::{stable_partition, Extraction},
    structures::{Assignment, Gid},
    types::err::{ErrorKind, OracleError},
    work::{CheckRangeStatus, WorkItem},
};

impl Extraction<'_> {
    pub(crate) fn run_dichotomic(&mut self, state: &mut MusState) -> Result<(), ErrorKind> {
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

            let mut last_model = Assignment::default();
            let mut p_min = p_unknown;
            let mut p_max = p_removed;
            let mut p_mid = p_unknown;

            loop {
                item.reset();
                item.begin = p_unknown;
                item.end = p_mid;
                item.all_end = p_removed;
                self.checker.process_range(&mut item, state, &all)?;
                state.clear_lists();
                if !item.completed() {
                    return Err(OracleError::Undetermined.into());
                }

                if item.status {
                    p_min = p_mid;
                    if self.config.rotating() {
                        last_model = std::mem::take(&mut item.model);
                    }
                    self.stats.sat_outcomes += 1;
                } else {
                    // Beyond [p_mid, p_removed), refinement may drop groups inside
                    // the prefix; every drop before p_min pulls p_min left.
                    if self.config.refine {
                        let unnec = std::mem::take(&mut item.unnec_gids);
                        let dropped_before_min = all[p_unknown..p_min]
                            .iter()
                            .filter(|g| unnec.contains(g))
                            .count();
                        p_min = std::cmp::max(p_min - dropped_before_min, p_unknown);
                        let split =
                            stable_partition(&mut all[p_unknown..p_mid], |g| !unnec.contains(g))
                                + p_unknown;
                        self.stats.ref_groups += unnec.len();
                        p_mid = split;
                    }
                    for gid in &all[p_mid..p_removed] {
                        state.mark_removed(*gid);
                    }
                    state.incr_version();
                    log::debug!(target: targets::STRATEGY, "{} unnecessary groups", p_removed - p_mid);
                    p_removed = p_mid;
                    p_max = p_mid;
                    self.stats.unsat_outcomes += 1;
                }

                p_mid = p_min + (p_max - p_min) / 2;
                if p_min + 1 >= p_max {
                    break;
                }
            }

            // Either the window closed on the next transition group, or the MUS is complete.
            debug_assert!(p_min + 1 == p_max || (p_min == p_max && p_min == p_unknown));
            if p_min + 1 == p_max {
                let transition = all[p_min];
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
