/*!
Check-style work items: each one describes a satisfiability question over some part of the group structure.
*/

use std::collections::BTreeSet;

use crate::{
    structures::{Assignment, Gid},
    work::WorkItem,
};

/// Check whether a single group is necessary.
///
/// The check deactivates the group and solves; SAT means the group is necessary and the model witnesses it, UNSAT means the group (and, under refinement, everything outside the core) is not.
#[derive(Debug, Default)]
pub struct CheckGroupStatus {
    // Parameters.
    /// The group to check.
    pub gid: Gid,

    /// On UNSAT, collect further unnecessary groups from the core.
    pub refine: bool,

    /// On SAT, save the witnessing model.
    pub need_model: bool,

    /// Assert the negation of the group during the check.
    pub use_rr: bool,

    /// Conflict budget for the oracle call; 0 means none.
    pub conflict_budget: u64,

    // Results.
    /// True if SAT (the group is necessary).
    pub status: bool,

    /// Groups established unnecessary; includes `gid` itself on UNSAT.
    pub unnec_gids: BTreeSet<Gid>,

    /// The redundancy-removal group appeared in the core; refinement was skipped.
    pub tainted_core: bool,

    /// Variable-group checks only: groups outside a tainted core, recorded for fast-tracking.
    pub ft_gids: BTreeSet<Gid>,

    /// The witnessing model, when requested.
    pub model: Assignment,

    /// The state version the results were computed against.
    pub version: u64,

    completed: bool,
}

impl CheckGroupStatus {
    pub fn new(gid: Gid) -> Self {
        CheckGroupStatus {
            gid,
            ..CheckGroupStatus::default()
        }
    }
}

impl WorkItem for CheckGroupStatus {
    fn completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self) {
        self.completed = true;
    }

    fn reset(&mut self) {
        self.completed = false;
        self.status = false;
        self.unnec_gids.clear();
        self.tainted_core = false;
        self.ft_gids.clear();
        self.model.clear();
        self.version = 0;
    }
}

/// Check a single group within a persistent chunk whose negation is asserted.
///
/// The first check of a chunk loads the negation encoding; subsequent checks only toggle one activation literal.
#[derive(Debug, Default)]
pub struct CheckGroupStatusChunk {
    // Parameters.
    pub gid: Gid,

    /// The chunk the group belongs to.
    pub chunk: BTreeSet<Gid>,

    /// True on the first check of this chunk.
    pub first: bool,

    pub refine: bool,

    pub need_model: bool,

    // Results.
    pub status: bool,

    pub unnec_gids: BTreeSet<Gid>,

    pub model: Assignment,

    pub version: u64,

    completed: bool,
}

impl CheckGroupStatusChunk {
    pub fn new(chunk: BTreeSet<Gid>) -> Self {
        CheckGroupStatusChunk {
            chunk,
            first: true,
            ..CheckGroupStatusChunk::default()
        }
    }
}

impl WorkItem for CheckGroupStatusChunk {
    fn completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self) {
        self.completed = true;
    }

    fn reset(&mut self) {
        self.completed = false;
        self.first = false;
        self.status = false;
        self.unnec_gids.clear();
        self.model.clear();
        self.version = 0;
    }
}

/// Check the first `end` groups of an ordered working vector.
///
/// The worker enables `[begin, end)`, disables `[end, all_end)`, and solves together with the background and every finalised group.
#[derive(Debug, Default)]
pub struct CheckRangeStatus {
    // Parameters. Indices into the working vector handed to the worker.
    pub begin: usize,

    pub end: usize,

    pub all_end: usize,

    pub refine: bool,

    pub need_model: bool,

    // Results.
    pub status: bool,

    /// On UNSAT with refinement, the groups of `[begin, end)` outside the core.
    pub unnec_gids: BTreeSet<Gid>,

    pub model: Assignment,

    pub version: u64,

    completed: bool,
}

impl WorkItem for CheckRangeStatus {
    fn completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self) {
        self.completed = true;
    }

    fn reset(&mut self) {
        self.completed = false;
        self.status = false;
        self.unnec_gids.clear();
        self.model.clear();
        self.version = 0;
    }
}

/// Check an arbitrary set of groups at once.
#[derive(Debug, Default)]
pub struct CheckSubsetStatus {
    // Parameters.
    pub subset: BTreeSet<Gid>,

    pub refine: bool,

    pub need_model: bool,

    // Results.
    pub status: bool,

    /// On UNSAT: the subset, plus refinement finds, is unnecessary.
    pub unnec_gids: BTreeSet<Gid>,

    pub model: Assignment,

    pub version: u64,

    completed: bool,
}

impl CheckSubsetStatus {
    pub fn new(subset: BTreeSet<Gid>) -> Self {
        CheckSubsetStatus {
            subset,
            ..CheckSubsetStatus::default()
        }
    }
}

impl WorkItem for CheckSubsetStatus {
    fn completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self) {
        self.completed = true;
    }

    fn reset(&mut self) {
        self.completed = false;
        self.status = false;
        self.unnec_gids.clear();
        self.model.clear();
        self.version = 0;
    }
}

/// Is the current formula unsatisfiable?
#[derive(Debug, Default)]
pub struct CheckUnsat {
    // Results.
    is_unsat: bool,

    completed: bool,
}

impl CheckUnsat {
    pub fn new() -> Self {
        CheckUnsat::default()
    }

    pub fn is_unsat(&self) -> bool {
        self.is_unsat
    }

    pub fn set_unsat(&mut self) {
        self.is_unsat = true;
    }
}

impl WorkItem for CheckUnsat {
    fn completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self) {
        self.completed = true;
    }

    fn reset(&mut self) {
        self.completed = false;
        self.is_unsat = false;
    }
}

/// Iterated refinement: repeatedly keep only the groups of the UNSAT core.
#[derive(Debug, Default)]
pub struct TrimGroupSet {
    // Parameters.
    /// Trim until no iteration removes a group.
    pub fixpoint: bool,

    /// Iteration cap; 0 means none.
    pub iter_limit: u32,

    /// Stop once an iteration removes less than this percentage; 0 means unused.
    pub pct_limit: u32,

    // Results.
    is_unsat: bool,

    completed: bool,
}

impl TrimGroupSet {
    pub fn is_unsat(&self) -> bool {
        self.is_unsat
    }

    pub fn set_unsat(&mut self) {
        self.is_unsat = true;
    }
}

impl WorkItem for TrimGroupSet {
    fn completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self) {
        self.completed = true;
    }

    fn reset(&mut self) {
        self.completed = false;
        self.is_unsat = false;
    }
}
