/*!
The group scheduler: the ordering policy over candidate groups.

The base order is fixed when the scheduler is built; rotation output may be *fast-tracked* to the front of the queue, and a group whose check came back undetermined may be rescheduled to the back.
*/

use std::collections::{HashSet, VecDeque};

use rand::{seq::SliceRandom, SeedableRng};

use crate::{
    config::{Config, GroupOrder},
    db::state::MusState,
    generic::minimal_pcg::MinimalPCG32,
    misc::log::targets,
    structures::Gid,
};

/// Hands out candidate groups in the configured order.
pub struct GroupScheduler {
    /// The queue of groups still to hand out.
    queue: VecDeque<Gid>,

    /// Members of the queue, to keep fast-track insertions unique.
    queued: HashSet<Gid>,

    /// Count of fast-track elevations performed.
    fasttracked: usize,
}

impl GroupScheduler {
    /// A scheduler over the untested groups of `state`, ordered per the configuration.
    pub fn new(config: &Config, state: &MusState) -> Self {
        let mut gids: Vec<Gid> = state.untested_gids().collect();

        match config.order {
            // Largest group id first.
            GroupOrder::Default => gids.sort_unstable_by(|a, b| b.cmp(a)),

            GroupOrder::Reverse => gids.sort_unstable(),

            GroupOrder::LongestFirst => {
                gids.sort_unstable_by_key(|gid| std::cmp::Reverse(group_length(state, *gid)));
            }

            GroupOrder::ShortestFirst => {
                gids.sort_unstable_by_key(|gid| group_length(state, *gid));
            }

            GroupOrder::Random => {
                let mut rng = MinimalPCG32::from_seed(config.seed.to_le_bytes());
                gids.sort_unstable();
                gids.shuffle(&mut rng);
            }
        }

        log::debug!(target: targets::SCHEDULE, "Scheduled {} groups ({:?})", gids.len(), config.order);

        let queued: HashSet<Gid> = gids.iter().copied().collect();
        GroupScheduler {
            queue: gids.into(),
            queued,
            fasttracked: 0,
        }
    }

    /// The next group to check, if any.
    pub fn next_group(&mut self) -> Option<Gid> {
        let gid = self.queue.pop_front();
        if let Some(gid) = gid {
            self.queued.remove(&gid);
        }
        gid
    }

    /// Elevates a group to the front of the queue.
    pub fn fasttrack(&mut self, gid: Gid) {
        if self.queued.insert(gid) {
            self.queue.push_front(gid);
            self.fasttracked += 1;
        } else if self.queue.front() != Some(&gid) {
            self.queue.retain(|g| *g != gid);
            self.queue.push_front(gid);
            self.fasttracked += 1;
        }
    }

    /// Puts a group back at the end of the queue.
    pub fn reschedule(&mut self, gid: Gid) {
        if self.queued.insert(gid) {
            self.queue.push_back(gid);
        }
    }

    /// Notification that a group was classified; nothing to hand out for it.
    pub fn update_classified(&mut self, gid: Gid) {
        if self.queued.remove(&gid) {
            self.queue.retain(|g| *g != gid);
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn fasttracked(&self) -> usize {
        self.fasttracked
    }
}

/// The summed active clause length of a group, or its occurrence total in variable-group mode.
fn group_length(state: &MusState, gid: Gid) -> usize {
    let gset = state.gset();
    match state.var_mode() {
        false => gset.group_length(gid),
        true => gset
            .vgvars(gid)
            .iter()
            .map(|var| {
                use crate::structures::Lit;
                gset.occs().active_size(Lit::new(*var, true))
                    + gset.occs().active_size(Lit::new(*var, false))
            })
            .sum(),
    }
}

#[cfg(test)]
mod schedule_tests {
    use super::*;
    use crate::db::group_set::GroupSet;
    use crate::structures::Lit;

    fn state() -> MusState {
        let mut gs = GroupSet::new();
        gs.add_clause(1, vec![Lit::from_int(1)]);
        gs.add_clause(2, vec![Lit::from_int(-1), Lit::from_int(2)]);
        gs.add_clause(3, vec![Lit::from_int(-2)]);
        gs.seal();
        MusState::new(gs)
    }

    #[test]
    fn default_order_is_descending() {
        let sched_state = state();
        let mut sched = GroupScheduler::new(&Config::default(), &sched_state);
        assert_eq!(sched.next_group(), Some(3));
        assert_eq!(sched.next_group(), Some(2));
        assert_eq!(sched.next_group(), Some(1));
        assert_eq!(sched.next_group(), None);
    }

    #[test]
    fn fasttrack_jumps_the_queue() {
        let sched_state = state();
        let mut sched = GroupScheduler::new(&Config::default(), &sched_state);
        sched.fasttrack(1);
        assert_eq!(sched.next_group(), Some(1));
        assert_eq!(sched.next_group(), Some(3));
    }

    #[test]
    fn random_order_is_reproducible() {
        let sched_state = state();
        let mut cfg = Config::default();
        cfg.order = GroupOrder::Random;
        let draws = |cfg: &Config| {
            let mut sched = GroupScheduler::new(cfg, &sched_state);
            let mut gids = Vec::new();
            while let Some(gid) = sched.next_group() {
                gids.push(gid);
            }
            gids
        };
        assert_eq!(draws(&cfg), draws(&cfg));
    }
}
