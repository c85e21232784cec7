/*!
Trimming: pre-extraction shrinking by iterated UNSAT cores.
*/

use crate::{
    checker::SatChecker,
    db::state::MusState,
    misc::log::targets,
    oracle::Outcome,
    structures::Gid,
    types::err::ErrorKind,
    work::{TrimGroupSet, WorkItem},
};

impl SatChecker {
    /// Repeatedly solves and keeps only core groups.
    ///
    /// Terminates on an iteration removing nothing, the iteration cap, a relative reduction under the percentage threshold, or a SAT outcome (the formula was satisfiable to begin with).
    /// The oracle is rebuilt between iterations so removed groups do not linger.
    pub fn process_trim(
        &mut self,
        item: &mut TrimGroupSet,
        state: &mut MusState,
    ) -> Result<bool, ErrorKind> {
        let mut prev_size = state.gset().gsize();
        let mut num_iter: u32 = 0;

        loop {
            num_iter += 1;
            log::debug!(target: targets::TRIM, "Trim iteration {num_iter}, size {prev_size}");

            self.sync(state);
            let outcome = self.solve(&[])?;
            match outcome {
                Outcome::Satisfiable => {
                    log::debug!(target: targets::TRIM, "Instance is satisfiable, stopping");
                    break;
                }
                Outcome::Unknown => break,
                Outcome::Unsatisfiable => {}
            }
            item.set_unsat();

            // Every active non-core group goes.
            let core = self.oracle.group_core().clone();
            let candidates: Vec<Gid> = state
                .candidate_gids()
                .filter(|gid| !state.r(*gid) && !core.contains(gid))
                .collect();
            let r_count = candidates.len();
            for gid in candidates {
                state.mark_removed(gid);
                if self.oracle.exists_group(gid) {
                    self.oracle.del_group(gid);
                }
            }
            state.incr_version();
            log::debug!(target: targets::TRIM, "Iteration removed {r_count} groups");

            if r_count == 0 {
                break;
            }
            if !item.fixpoint {
                if item.iter_limit > 0 {
                    if num_iter >= item.iter_limit {
                        break;
                    }
                } else if item.pct_limit > 0 {
                    if (r_count as f64) < (prev_size as f64) * (item.pct_limit as f64) / 100.0 {
                        break;
                    }
                } else {
                    break;
                }
            }
            prev_size -= r_count;

            // Fresh oracle for the next iteration; the next sync reloads the survivors.
            self.oracle.reset();
        }

        item.set_completed();
        Ok(item.completed())
    }
}
