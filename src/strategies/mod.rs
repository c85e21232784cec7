/*!
The extraction strategies.

Every strategy shares the same contract: given the extraction state, classify every candidate group as necessary or removed, issuing work items to the checker and consuming SAT outcomes through model rotation.
At each iteration the invariants hold that the necessary groups together with the untested ones (and the background) are unsatisfiable, and that removing any necessary group from that set makes it satisfiable.

The strategies differ in how they pick what to test next:

- deletion tries to remove one scheduled group at a time;
- insertion grows a prefix of an ordered working vector until it turns unsatisfiable;
- dichotomic finds each transition group by binary search;
- progression probes geometrically growing target sets from the tail;
- chunked amortises negation encodings over fixed-size chunks;
- subset tests scheduler-picked subsets at once;
- fbar runs a CEGAR-style over-approximation followed by cleanup.

A wall-clock deadline is checked between work items; on expiry the strategy stops and the partial classification stands as an over-approximation.
*/

mod chunked;
mod deletion;
mod dichotomic;
mod fbar;
mod insertion;
mod progression;
mod subset;

use std::collections::BTreeSet;
use std::time::Instant;

use crate::{
    checker::SatChecker,
    config::{ApproxPolicy, Config, RedundancyMode},
    db::state::MusState,
    misc::log::targets,
    rotation::{self, ModelRotator},
    schedule::GroupScheduler,
    structures::{Assignment, Gid},
    types::err::ErrorKind,
    work::{RotateModel, WorkItem},
};

/// Counters kept across one strategy run.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExtractionStats {
    /// SAT outcomes observed.
    pub sat_outcomes: u32,

    /// UNSAT outcomes observed.
    pub unsat_outcomes: u32,

    /// Undetermined outcomes observed.
    pub unknown_outcomes: u32,

    /// Groups proved necessary by rotation rather than an oracle call.
    pub rot_groups: usize,

    /// Groups removed by refinement beyond the tested ones.
    pub ref_groups: usize,

    /// UNSAT outcomes whose core was tainted by a redundancy-removal group.
    pub tainted_cores: u32,
}

/// One strategy run: the workers, the schedule, the clock, and the counters.
pub struct Extraction<'a> {
    pub(crate) config: &'a Config,

    pub(crate) checker: &'a mut SatChecker,

    pub(crate) rotator: Option<Box<dyn ModelRotator>>,

    pub(crate) scheduler: GroupScheduler,

    /// The moment the deadline passes, if one is set.
    deadline: Option<Instant>,

    pub stats: ExtractionStats,

    /// Set when the deadline cut the run short; the result is an over-approximation.
    interrupted: bool,

    /// Traversal generation for resolution-graph walks; bumped per walk.
    pub(crate) rgraph_gen: u64,
}

impl<'a> Extraction<'a> {
    pub fn new(config: &'a Config, checker: &'a mut SatChecker, state: &MusState) -> Self {
        let deadline = match config.timeout.value {
            0 => None,
            secs => Some(Instant::now() + std::time::Duration::from_secs(secs)),
        };
        Extraction {
            config,
            checker,
            rotator: rotation::build_rotator(config),
            scheduler: GroupScheduler::new(config, state),
            deadline,
            stats: ExtractionStats::default(),
            interrupted: false,
            rgraph_gen: 0,
        }
    }

    /// True once the deadline has passed.
    pub(crate) fn out_of_time(&self) -> bool {
        match self.deadline {
            Some(deadline) => Instant::now() >= deadline,
            None => false,
        }
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted
    }

    pub(crate) fn set_interrupted(&mut self) {
        self.interrupted = true;
        log::warn!(target: targets::STRATEGY, "Deadline reached, stopping with partial results");
    }

    pub fn rotation_points(&self) -> u64 {
        match &self.rotator {
            Some(rotator) => rotator.num_points(),
            None => 0,
        }
    }

    /// Dispatches to the configured strategy.
    pub fn run(&mut self, state: &mut MusState) -> Result<(), ErrorKind> {
        use crate::config::ExtractionMode::*;
        match self.config.extraction {
            Deletion => self.run_deletion(state),
            Insertion => self.run_insertion(state),
            Dichotomic => self.run_dichotomic(state),
            Progression => self.run_progression(state),
            Chunked => self.run_chunked(state),
            Subset => self.run_subset(state),
            Fbar => self.run_fbar(state),
        }
    }

    /// Runs rotation from a group just shown necessary and returns the discovered groups.
    ///
    /// The returned set contains neither the seed nor any group already classified.
    pub(crate) fn rotation_gids(
        &mut self,
        gid: Gid,
        model: Assignment,
        state: &MusState,
    ) -> BTreeSet<Gid> {
        let Some(rotator) = self.rotator.as_mut() else {
            return BTreeSet::new();
        };
        let mut item = RotateModel::new(gid, model);
        rotation::configure_item(&mut item, self.config);
        item.version = state.version();
        rotator.process(&mut item, state);
        if !item.completed() {
            return BTreeSet::new();
        }

        if self.config.reorder {
            for ft in &item.ft_gids {
                if state.untested(*ft) {
                    self.scheduler.fasttrack(*ft);
                }
            }
        }

        item.nec_gids
            .iter()
            .copied()
            .filter(|g| *g != 0 && *g != gid && state.untested(*g))
            .collect()
    }

    /// Rotation in the deletion style: discovered groups are marked necessary immediately.
    pub(crate) fn rotate_and_mark(
        &mut self,
        gid: Gid,
        model: Assignment,
        state: &mut MusState,
    ) {
        if state.num_untested() == 0 {
            return;
        }
        let found = self.rotation_gids(gid, model, state);
        let count = found.len();
        for g in found {
            state.mark_necessary(g);
            self.scheduler.update_classified(g);
        }
        if count > 0 {
            log::debug!(target: targets::STRATEGY, "{count} groups necessary due to rotation");
            self.stats.rot_groups += count;
        }
    }

    /// Applies the configured policy to a group whose check came back undetermined.
    pub(crate) fn apply_unknown_policy(
        &mut self,
        gid: Gid,
        state: &mut MusState,
    ) -> Result<(), ErrorKind> {
        self.stats.unknown_outcomes += 1;
        match self.config.approx {
            ApproxPolicy::Under => {
                state.mark_removed_fake(gid);
                state.incr_version();
                self.scheduler.update_classified(gid);
            }
            ApproxPolicy::Reschedule => {
                self.scheduler.reschedule(gid);
            }
            // Without a policy the group is reported potentially necessary and the
            // run continues; the result over-approximates the MUS.
            ApproxPolicy::Over | ApproxPolicy::Off => {
                state.mark_necessary_fake(gid);
                self.scheduler.update_classified(gid);
            }
        }
        Ok(())
    }

    /// True when redundancy removal should currently be used (static, or adaptive and not backed off).
    pub(crate) fn initial_rr(&self) -> bool {
        self.config.redundancy != RedundancyMode::Off
    }
}

/// Partitions `slice` so elements satisfying `pred` precede the rest, preserving relative order.
/// Returns the index of the first non-satisfying element.
pub(crate) fn stable_partition<T: Copy>(slice: &mut [T], pred: impl Fn(&T) -> bool) -> usize {
    let mut kept: Vec<T> = Vec::with_capacity(slice.len());
    let mut dropped: Vec<T> = Vec::new();
    for item in slice.iter() {
        match pred(item) {
            true => kept.push(*item),
            false => dropped.push(*item),
        }
    }
    let split = kept.len();
    kept.extend(dropped);
    slice.copy_from_slice(&kept);
    split
}

#[cfg(test)]
mod partition_tests {
    use super::*;

    #[test]
    fn stable_partition_preserves_order() {
        let mut items = [5, 2, 8, 1, 9, 4];
        let split = stable_partition(&mut items, |x| *x % 2 == 0);
        assert_eq!(split, 3);
        assert_eq!(items, [2, 8, 4, 5, 1, 9]);
    }
}
