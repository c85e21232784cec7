/*!
The model-rotation work item.
*/

use std::collections::BTreeSet;

use crate::{
    structures::{Assignment, Gid},
    work::WorkItem,
};

/// Rotate a witnessing model of a necessary group to discover further necessary groups.
///
/// The inputs are the group just shown necessary and an assignment satisfying every remaining group except it.
/// The outputs are further necessary groups and, optionally, a set of groups to fast-track in the schedule.
#[derive(Debug, Default)]
pub struct RotateModel {
    // Parameters.
    /// The group to rotate from.
    pub gid: Gid,

    /// The witnessing assignment.
    pub model: Assignment,

    /// Collect groups for scheduler priority elevation.
    pub collect_ft_gids: bool,

    /// Depth bound: visits per group (extended) or per (group, literal) pair (visit-capped).
    pub rot_depth: u32,

    /// Width bound on falsified group sets (extended rotation).
    pub rot_width: u32,

    /// Do not rotate into background clauses.
    pub ignore_g0: bool,

    /// Rotate through globally necessary groups; rotation state is call-local.
    pub ignore_global: bool,

    // Results.
    /// Further necessary groups.
    pub nec_gids: BTreeSet<Gid>,

    /// Groups to fast-track, when collection is on.
    pub ft_gids: BTreeSet<Gid>,

    /// The state version the results were computed against.
    pub version: u64,

    completed: bool,
}

impl RotateModel {
    pub fn new(gid: Gid, model: Assignment) -> Self {
        RotateModel {
            gid,
            model,
            ignore_global: true,
            ..RotateModel::default()
        }
    }
}

impl WorkItem for RotateModel {
    fn completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self) {
        self.completed = true;
    }

    fn reset(&mut self) {
        self.completed = false;
        self.nec_gids.clear();
        self.ft_gids.clear();
        self.version = 0;
    }
}
