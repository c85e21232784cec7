/*!
The incremental SAT oracle with per-group control.

A group is the conjunction of its clauses.
Adding a fresh *activation variable* `a` to every clause of the group makes each clause a tautology whenever `a` is true; passing `¬a` as an assumption forces `a` false and re-enables the clauses.
Group add / remove / enable / disable thereby reduce to O(1) assumption toggles, and asserting a unit on the activation variable turns the group into a permanent fixture --- final (`¬a`) or removed (`a`) --- letting the back-end reclaim the literals.

The adapter keeps a signed activation entry per group: negative while the group is active (the assumption is `¬a`), positive while deactivated (the assumption is `a`), and zero once the group is final.
Every solve passes one assumption per non-final group, plus whatever extra assumptions the caller supplies.
A reverse map from activation variables to group ids turns assumption-failure cores into group cores in O(core).

Any back-end capable of assumption-based solving and failed-assumption extraction satisfies the contract; phase selection, conflict budgets, and variable freezing for back-end preprocessing are best-effort.
*/

mod varisat;
pub use varisat::VarisatOracle;

use std::collections::BTreeSet;

use crate::{
    config::PhasePolicy,
    generic::id_manager::IdManager,
    structures::{Assignment, Gid, Lit, Var},
    types::err::OracleError,
};

/// The outcome of an oracle call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// A satisfying assignment was found.
    Satisfiable,

    /// Unsatisfiability was established.
    Unsatisfiable,

    /// The call ended without a verdict, e.g. on budget exhaustion.
    Unknown,
}

/// An incremental SAT oracle with per-group activation control.
pub trait GroupOracle {
    /// Adds the clauses of a group.
    ///
    /// For a non-final group a fresh activation variable is allocated from `imgr` and appended to every clause; the group starts active.
    /// A final group is committed permanently, with no activation variable.
    fn add_group_clauses(
        &mut self,
        imgr: &mut IdManager,
        gid: Gid,
        clauses: &[&[Lit]],
        final_group: bool,
    );

    /// Commits a clause permanently.
    fn add_final_clause(&mut self, lits: &[Lit]);

    /// Commits a unit clause permanently.
    fn add_final_unit(&mut self, lit: Lit) {
        self.add_final_clause(&[lit]);
    }

    /// True if the group has been added and not deleted.
    fn exists_group(&self, gid: Gid) -> bool;

    /// True if the group is final, or non-final and active.
    fn is_group_active(&self, gid: Gid) -> bool;

    /// True if the group is final.
    fn is_group_final(&self, gid: Gid) -> bool;

    /// Restores the activation assumption of a deactivated group.
    fn activate_group(&mut self, gid: Gid);

    /// Drops the activation assumption of an active group; its clauses are disabled.
    fn deactivate_group(&mut self, gid: Gid);

    /// Permanently removes a group by asserting its activation variable.
    fn del_group(&mut self, gid: Gid);

    /// Permanently enables a group by asserting the negated activation variable.
    fn make_group_final(&mut self, gid: Gid);

    /// The number of groups held, the background included.
    fn group_count(&self) -> usize;

    /// The largest group id ever added.
    fn max_gid(&self) -> Gid;

    /// The activation literal of a group; `None` once final.
    fn activation_lit(&self, gid: Gid) -> Option<Lit>;

    /// Solves under the current activation assumptions.
    fn solve(&mut self) -> Result<Outcome, OracleError> {
        self.solve_with(&[])
    }

    /// Solves under the current activation assumptions united with `extra`.
    fn solve_with(&mut self, extra: &[Lit]) -> Result<Outcome, OracleError>;

    /// The model of the last satisfiable call, over the problem variables.
    fn model(&self) -> &Assignment;

    /// The group ids whose activation variables appeared in the failure core of the last unsatisfiable call.
    fn group_core(&self) -> &BTreeSet<Gid>;

    /// Bounds model extraction to the problem variables.
    fn set_max_problem_var(&mut self, var: Var);

    /// Requests a default polarity; returns false if the back-end cannot honour it.
    fn set_phase(&mut self, _phase: PhasePolicy) -> bool {
        false
    }

    /// Requests a per-call conflict budget; returns false if the back-end cannot honour it.
    fn set_conflict_budget(&mut self, _budget: u64) -> bool {
        false
    }

    /// Freezes a variable against back-end preprocessing; no-op where no preprocessing runs.
    fn freeze_var(&mut self, _var: Var) {}

    /// Drops every clause and group, returning the oracle to its initial state.
    fn reset(&mut self);
}
