/*!
The SAT-check worker: turns check-style work items into oracle calls and interprets the results.

The worker owns the oracle and keeps it synchronised with the extraction state.
Synchronisation maintains the invariant that the oracle holds exactly the clauses of the non-removed groups, every non-final non-removed group has its activation assumption pending, every finalised group is a permanent unit on its activation variable, and every removed group is the opposite permanent unit.

The sync procedure walks the `r_list` / `f_list` logs head-first, stopping at the first entry already applied --- older entries were processed by an earlier sync.
When a group with an auxiliary negation mapping is removed or finalised, the mapping is retired with permanent units on the auxiliaries.
*/

mod check;
mod neg;
pub use neg::neg_product;
mod trim;
mod vgroup;

use std::collections::BTreeMap;
use std::time::Instant;

use crate::{
    db::state::MusState,
    generic::id_manager::IdManager,
    misc::log::targets,
    oracle::{GroupOracle, Outcome},
    structures::{Gid, Lit, Var},
    types::err::OracleError,
};

/// A worker that executes check-style work items against an oracle.
pub struct SatChecker {
    pub(crate) oracle: Box<dyn GroupOracle>,

    pub(crate) imgr: IdManager,

    /// Auxiliary variables of the negation encoding, per group.
    pub(crate) aux_map: BTreeMap<Gid, Vec<Var>>,

    /// The deletable group holding the long clause of the chunk negation.
    pub(crate) aux_long_gid: Option<Gid>,

    // Statistics.
    sat_calls: u32,
    sat_time: f64,
    sat_time_sat: f64,
    sat_time_unsat: f64,
}

impl SatChecker {
    pub fn new(oracle: Box<dyn GroupOracle>) -> Self {
        SatChecker {
            oracle,
            imgr: IdManager::default(),
            aux_map: BTreeMap::new(),
            aux_long_gid: None,
            sat_calls: 0,
            sat_time: 0.0,
            sat_time_sat: 0.0,
            sat_time_unsat: 0.0,
        }
    }

    pub fn oracle(&mut self) -> &mut dyn GroupOracle {
        self.oracle.as_mut()
    }

    pub fn imgr_mut(&mut self) -> &mut IdManager {
        &mut self.imgr
    }

    pub fn sat_calls(&self) -> u32 {
        self.sat_calls
    }

    pub fn sat_time(&self) -> f64 {
        self.sat_time
    }

    pub fn sat_time_sat(&self) -> f64 {
        self.sat_time_sat
    }

    pub fn sat_time_unsat(&self) -> f64 {
        self.sat_time_unsat
    }

    /// Invokes the oracle, tracking call counts and times.
    pub(crate) fn solve(&mut self, extra: &[Lit]) -> Result<Outcome, OracleError> {
        let started = Instant::now();
        let outcome = self.oracle.solve_with(extra)?;
        let elapsed = started.elapsed().as_secs_f64();
        self.sat_calls += 1;
        self.sat_time += elapsed;
        match outcome {
            Outcome::Satisfiable => self.sat_time_sat += elapsed,
            Outcome::Unsatisfiable => self.sat_time_unsat += elapsed,
            Outcome::Unknown => {}
        }
        Ok(outcome)
    }

    /// Loads the group set into an empty oracle: removed groups skipped, background and finalised groups committed.
    pub(crate) fn load_groupset(&mut self, state: &MusState) {
        debug_assert_eq!(self.oracle.group_count(), 0);
        let gset = state.gset();
        self.imgr.register(gset.max_var());
        self.oracle.set_max_problem_var(gset.max_var());

        for gid in gset.gids() {
            let clauses: Vec<&[Lit]> = gset
                .gclauses(gid)
                .iter()
                .map(|cid| gset.clause(*cid))
                .filter(|cl| !cl.removed())
                .map(|cl| cl.lits())
                .collect();
            if gid == 0 || !clauses.is_empty() {
                self.oracle
                    .add_group_clauses(&mut self.imgr, gid, &clauses, gid == 0);
            }
        }
        for gid in state.r_list() {
            if self.oracle.exists_group(*gid) {
                self.oracle.del_group(*gid);
            }
        }
        for gid in state.f_list() {
            if self.oracle.exists_group(*gid) && !self.oracle.is_group_final(*gid) {
                self.oracle.make_group_final(*gid);
            }
        }
        log::debug!(target: targets::SYNC, "Loaded {} groups", self.oracle.group_count());
    }

    /// Adds one group of the group set to the oracle.
    pub(crate) fn load_group(&mut self, state: &MusState, gid: Gid, final_group: bool) {
        let gset = state.gset();
        let clauses: Vec<&[Lit]> = gset
            .gclauses(gid)
            .iter()
            .map(|cid| gset.clause(*cid))
            .filter(|cl| !cl.removed())
            .map(|cl| cl.lits())
            .collect();
        if gid == 0 || !clauses.is_empty() {
            self.oracle
                .add_group_clauses(&mut self.imgr, gid, &clauses, final_group);
        }
    }

    /// Synchronises the oracle with the current extraction state.
    ///
    /// Either the oracle is empty and the whole group set is loaded, or the new entries of `r_list` / `f_list` are applied, walking each log head-first and stopping at the first entry already processed.
    pub fn sync(&mut self, state: &MusState) {
        if self.oracle.group_count() == 0 {
            self.load_groupset(state);
            return;
        }

        let removed: Vec<Gid> = state.r_list().iter().copied().collect();
        for gid in removed {
            if self.oracle.exists_group(gid) {
                self.oracle.del_group(gid);
                self.retire_aux(gid);
            } else {
                break;
            }
        }

        let finalised: Vec<Gid> = state.f_list().iter().copied().collect();
        for gid in finalised {
            if !self.oracle.exists_group(gid) {
                self.load_group(state, gid, true);
                self.retire_aux(gid);
            } else if !self.oracle.is_group_final(gid) {
                self.oracle.make_group_final(gid);
                self.retire_aux(gid);
            } else {
                break;
            }
        }
    }

    /// Retires the auxiliary negation mapping of a settled group with permanent units.
    pub(crate) fn retire_aux(&mut self, gid: Gid) {
        if let Some(auxes) = self.aux_map.remove(&gid) {
            for aux in auxes {
                self.oracle.add_final_unit(Lit::new(aux, false));
            }
            log::trace!(target: targets::SYNC, "Retired negation auxiliaries of group {gid}");
        }
    }

    /// Drops any chunk negation still loaded: retires every auxiliary and deletes the long clause.
    pub(crate) fn drop_chunk_negation(&mut self) {
        let gids: Vec<Gid> = self.aux_map.keys().copied().collect();
        for gid in gids {
            if let Some(auxes) = self.aux_map.remove(&gid) {
                for aux in auxes {
                    self.oracle.add_final_unit(Lit::new(aux, false));
                }
            }
        }
        if let Some(long_gid) = self.aux_long_gid.take() {
            if self.oracle.exists_group(long_gid) {
                self.oracle.del_group(long_gid);
            }
        }
    }

    /// On UNSAT, adds every untested group whose activation variable is absent from the core to `unnec_gids`.
    ///
    /// When a redundancy-removal group appears in the core, the core proves only that the encoded negation causes unsatisfiability; no group can be removed and the set is left empty --- the caller observes the taint through the flag it maintains.
    pub(crate) fn refine(
        &self,
        state: &MusState,
        unnec_gids: &mut std::collections::BTreeSet<Gid>,
        rr_gid: Option<Gid>,
    ) -> bool {
        let core = self.oracle.group_core();
        if let Some(rr) = rr_gid {
            if core.contains(&rr) {
                log::debug!(target: targets::REFINE, "Tainted core, refinement skipped");
                return true;
            }
        }
        for gid in state.candidate_gids() {
            if state.untested(gid) && !core.contains(&gid) {
                unnec_gids.insert(gid);
            }
        }
        log::debug!(target: targets::REFINE, "Refinement found {} unnecessary groups", unnec_gids.len());
        false
    }
}
