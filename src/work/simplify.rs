/*!
Preprocessing work items.
*/

use crate::{
    structures::{ClauseId, Var},
    work::WorkItem,
};

/// Per-variable data kept by the BCP simplifier, for solution reconstruction.
#[derive(Clone, Copy, Debug, Default)]
pub struct BcpVarData {
    /// -1, 0, or +1.
    pub value: i8,

    /// The clause that propagated the assignment; `None` for an initial unit.
    pub reason: Option<ClauseId>,
}

/// Simplify the instance by top-level unit propagation.
///
/// A top-level conflict is recorded in the conflict clause rather than unwound through the call stack; the conflict clause is shrunk to size zero so it reads as the empty clause.
#[derive(Debug, Default)]
pub struct SimplifyBcp {
    // Parameters.
    /// Propagate only background units; group units say nothing about necessity.
    pub group_mode: bool,

    // Results.
    /// The clause a top-level conflict was found on.
    pub conflict: Option<ClauseId>,

    /// Count of clauses removed.
    pub rcl_count: usize,

    /// Count of groups removed.
    pub rg_count: usize,

    /// Count of unit assignments made.
    pub ua_count: usize,

    /// Top-level assignment per variable, for reconstruction.
    pub var_data: Vec<BcpVarData>,

    /// Clauses shrunk by propagation, most recent last.
    pub shrunk: Vec<ClauseId>,

    /// Clauses removed as satisfied, for restoration into surviving groups.
    pub removed_satisfied: Vec<ClauseId>,

    completed: bool,
}

impl SimplifyBcp {
    pub fn new(group_mode: bool) -> Self {
        SimplifyBcp {
            group_mode,
            ..SimplifyBcp::default()
        }
    }

    pub fn ensure_var(&mut self, max_var: Var) {
        if self.var_data.len() <= max_var as usize {
            self.var_data.resize(max_var as usize + 1, BcpVarData::default());
        }
    }

    pub fn conflict(&self) -> bool {
        self.conflict.is_some()
    }
}

impl WorkItem for SimplifyBcp {
    fn completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self) {
        self.completed = true;
    }

    fn reset(&mut self) {
        self.completed = false;
        self.conflict = None;
        self.rcl_count = 0;
        self.rg_count = 0;
        self.ua_count = 0;
        self.var_data.clear();
        self.shrunk.clear();
        self.removed_satisfied.clear();
    }
}

/// Simplify the instance by blocked-clause elimination.
#[derive(Debug, Default)]
pub struct SimplifyBce {
    // Parameters.
    /// Move blocked clauses into group 0 instead of removing them.
    pub blocked_to_g0: bool,

    /// Leave group-0 clauses untouched (unsound in general).
    pub ignore_g0: bool,

    // Results.
    /// Count of clauses removed or moved.
    pub rcl_count: usize,

    /// Count of groups removed.
    pub rg_count: usize,

    pub(crate) completed: bool,
}

impl WorkItem for SimplifyBce {
    fn completed(&self) -> bool {
        self.completed
    }

    fn set_completed(&mut self) {
        self.completed = true;
    }

    fn reset(&mut self) {
        self.completed = false;
        self.rcl_count = 0;
        self.rg_count = 0;
    }
}
