/*!
Chunked deletion.

A chunk of groups has its negation loaded into the oracle once, through auxiliary variables, after which testing any group of the chunk is a single activation toggle: with the group disabled and the negation asserted, UNSAT rejects the group as unnecessary, while a model must falsify the group itself and so witnesses its necessity.
On chunk exhaustion the negation is retired and the next chunk loaded, amortising the encoding cost.
*/

use std::collections::BTreeSet;

use crate::{
    db::state::MusState,
    misc::log::targets,
    strategies::Extraction,
    structures::Gid,
    types::err::ErrorKind,
    work::{CheckGroupStatusChunk, WorkItem},
};

impl Extraction<'_> {
    pub(crate) fn run_chunked(&mut self, state: &mut MusState) -> Result<(), ErrorKind> {
        let chunk_size = match self.config.chunk_size.value {
            0 => state.gset().gsize(),
            size => size,
        };

        'chunk_loop: loop {
            // Collect the next chunk of untested groups.
            let mut chunk: BTreeSet<Gid> = BTreeSet::new();
            while chunk.len() < chunk_size {
                match self.scheduler.next_group() {
                    Some(gid) => {
                        if state.untested(gid) && gid != 0 {
                            chunk.insert(gid);
                        }
                    }
                    None => break,
                }
            }
            if chunk.is_empty() {
                break 'chunk_loop;
            }
            log::debug!(target: targets::STRATEGY, "Next chunk of {} groups", chunk.len());

            let members: Vec<Gid> = chunk.iter().copied().collect();
            let mut item = CheckGroupStatusChunk::new(chunk);
            item.refine = self.config.refine;
            item.need_model = self.config.rotating();
            item.first = true;

            for gid in members {
                if state.r(gid) || state.nec(gid) {
                    continue;
                }
                let first = item.first;
                item.reset();
                item.first = first;
                item.gid = gid;

                let completed = self.checker.process_chunk(&mut item, state)?;
                item.first = false;

                if completed {
                    if item.status {
                        state.mark_necessary(gid);
                        self.scheduler.update_classified(gid);
                        self.stats.sat_outcomes += 1;
                        if self.config.rotating() {
                            let model = std::mem::take(&mut item.model);
                            self.rotate_and_mark(gid, model, state);
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
                        self.stats.ref_groups += unnec.len().saturating_sub(1);
                    }
                } else if state.untested(gid) {
                    self.apply_unknown_policy(gid, state)?;
                }

                if self.out_of_time() {
                    self.set_interrupted();
                    break 'chunk_loop;
                }
            }
        }

        // Retire whatever negation is still loaded and sync the final classification.
        self.checker.sync(state);
        self.checker.drop_chunk_negation();
        Ok(())
    }
}
