/*!
The [varisat](https://docs.rs/varisat) back-end for the oracle contract.

varisat provides assumption-based incremental solving with failed-assumption extraction, which is exactly the contract's required surface.
It exposes no phase or budget control and runs no clause-eliminating preprocessing, so the best-effort operations report unsupported and freezing is a no-op.
*/

use std::collections::{BTreeMap, BTreeSet, HashMap};

use varisat::{ExtendFormula, Solver};

use crate::{
    generic::id_manager::IdManager,
    misc::log::targets,
    oracle::{GroupOracle, Outcome},
    structures::{Assignment, Gid, Lit, Var},
    types::err::OracleError,
};

/// An oracle over a [varisat::Solver].
pub struct VarisatOracle {
    solver: Solver<'static>,

    /// Signed activation entry per group: negative = active, positive = deactivated, zero = final.
    g2a: BTreeMap<Gid, i32>,

    /// Activation variable to group id.
    a2g: HashMap<Var, Gid>,

    /// Group core of the last unsatisfiable call.
    gcore: BTreeSet<Gid>,

    /// Model of the last satisfiable call.
    model: Assignment,

    /// Model extraction is bounded to variables up to this.
    max_problem_var: Var,

    /// True once the background group has been committed.
    has_g0: bool,

    max_gid: Gid,
}

impl Default for VarisatOracle {
    fn default() -> Self {
        VarisatOracle::new()
    }
}

impl VarisatOracle {
    pub fn new() -> Self {
        VarisatOracle {
            solver: Solver::new(),
            g2a: BTreeMap::new(),
            a2g: HashMap::new(),
            gcore: BTreeSet::new(),
            model: Assignment::default(),
            max_problem_var: 0,
            has_g0: false,
            max_gid: 0,
        }
    }

    fn vlit(lit: Lit) -> varisat::Lit {
        varisat::Lit::from_dimacs(lit.as_int() as isize)
    }

    fn push_clause(&mut self, lits: &[Lit], activation: Option<Var>) {
        let mut vlits: Vec<varisat::Lit> = lits.iter().map(|l| Self::vlit(*l)).collect();
        if let Some(var) = activation {
            vlits.push(varisat::Lit::from_dimacs(var as isize));
        }
        self.solver.add_clause(&vlits);
    }

    fn extract_model(&mut self) {
        self.model = Assignment::new(self.max_problem_var);
        if let Some(model) = self.solver.model() {
            for vlit in model {
                let int = vlit.to_dimacs();
                let var = int.unsigned_abs() as Var;
                if var <= self.max_problem_var {
                    self.model.set(var, if int > 0 { 1 } else { -1 });
                }
            }
        }
    }

    fn extract_core(&mut self) {
        self.gcore.clear();
        if let Some(core) = self.solver.failed_core() {
            for vlit in core {
                let var = vlit.to_dimacs().unsigned_abs() as Var;
                if let Some(gid) = self.a2g.get(&var) {
                    self.gcore.insert(*gid);
                }
            }
        }
    }
}

impl GroupOracle for VarisatOracle {
    fn add_group_clauses(
        &mut self,
        imgr: &mut IdManager,
        gid: Gid,
        clauses: &[&[Lit]],
        final_group: bool,
    ) {
        if gid > self.max_gid {
            self.max_gid = gid;
        }

        if gid == 0 || final_group {
            for lits in clauses {
                self.push_clause(lits, None);
            }
            if gid == 0 {
                self.has_g0 = true;
            } else if !clauses.is_empty() {
                self.g2a.insert(gid, 0);
            }
            return;
        }

        if clauses.is_empty() {
            return;
        }

        let activation = imgr.fresh();
        for lits in clauses {
            self.push_clause(lits, Some(activation));
        }
        self.freeze_var(activation);
        self.g2a.insert(gid, -(activation as i32));
        self.a2g.insert(activation, gid);
        log::trace!(target: targets::ORACLE, "Added group {gid} with activation {activation}");
    }

    fn add_final_clause(&mut self, lits: &[Lit]) {
        self.push_clause(lits, None);
    }

    fn exists_group(&self, gid: Gid) -> bool {
        match gid {
            0 => self.has_g0,
            _ => self.g2a.contains_key(&gid),
        }
    }

    fn is_group_active(&self, gid: Gid) -> bool {
        match self.g2a.get(&gid) {
            Some(entry) => *entry <= 0,
            None => gid == 0 && self.has_g0,
        }
    }

    fn is_group_final(&self, gid: Gid) -> bool {
        match self.g2a.get(&gid) {
            Some(entry) => *entry == 0,
            None => gid == 0 && self.has_g0,
        }
    }

    fn activate_group(&mut self, gid: Gid) {
        let entry = self.g2a.get_mut(&gid).expect("activate of a held group");
        debug_assert!(*entry > 0, "activate of a group not deactivated");
        *entry = -*entry;
    }

    fn deactivate_group(&mut self, gid: Gid) {
        let entry = self.g2a.get_mut(&gid).expect("deactivate of a held group");
        debug_assert!(*entry < 0, "deactivate of a final or deactivated group");
        *entry = -*entry;
    }

    fn del_group(&mut self, gid: Gid) {
        let Some(entry) = self.g2a.remove(&gid) else {
            log::warn!(target: targets::ORACLE, "Delete of missing group {gid}");
            return;
        };
        if entry != 0 {
            let activation = entry.unsigned_abs();
            self.add_final_unit(Lit::new(activation, true));
            self.a2g.remove(&activation);
        }
        log::trace!(target: targets::ORACLE, "Deleted group {gid}");
    }

    fn make_group_final(&mut self, gid: Gid) {
        let entry = self.g2a.get_mut(&gid).expect("finalise of a held group");
        if *entry == 0 {
            return;
        }
        let activation = entry.unsigned_abs();
        *entry = 0;
        self.a2g.remove(&activation);
        self.add_final_unit(Lit::new(activation, false));
        log::trace!(target: targets::ORACLE, "Finalised group {gid}");
    }

    fn group_count(&self) -> usize {
        self.g2a.len() + self.has_g0 as usize
    }

    fn max_gid(&self) -> Gid {
        self.max_gid
    }

    fn activation_lit(&self, gid: Gid) -> Option<Lit> {
        match self.g2a.get(&gid) {
            Some(entry) if *entry != 0 => Some(Lit::from_int(*entry)),
            _ => None,
        }
    }

    fn solve_with(&mut self, extra: &[Lit]) -> Result<Outcome, OracleError> {
        let mut assumptions: Vec<varisat::Lit> = self
            .g2a
            .values()
            .filter(|entry| **entry != 0)
            .map(|entry| varisat::Lit::from_dimacs(*entry as isize))
            .collect();
        assumptions.extend(extra.iter().map(|l| Self::vlit(*l)));
        self.solver.assume(&assumptions);

        log::debug!(target: targets::ORACLE, "Solving with {} assumptions", assumptions.len());

        match self.solver.solve() {
            Ok(true) => {
                self.extract_model();
                Ok(Outcome::Satisfiable)
            }
            Ok(false) => {
                self.extract_core();
                Ok(Outcome::Unsatisfiable)
            }
            Err(e) => Err(OracleError::Backend(format!("{e}"))),
        }
    }

    fn model(&self) -> &Assignment {
        &self.model
    }

    fn group_core(&self) -> &BTreeSet<Gid> {
        &self.gcore
    }

    fn set_max_problem_var(&mut self, var: Var) {
        self.max_problem_var = var;
    }

    fn reset(&mut self) {
        self.solver = Solver::new();
        self.g2a.clear();
        self.a2g.clear();
        self.gcore.clear();
        self.model.clear();
        self.has_g0 = false;
        self.max_gid = 0;
    }
}

#[cfg(test)]
mod varisat_tests {
    use super::*;

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|i| Lit::from_int(*i)).collect()
    }

    #[test]
    fn activation_toggling() {
        let mut imgr = IdManager::new(2);
        let mut oracle = VarisatOracle::new();
        oracle.set_max_problem_var(2);

        // Background forces 1; group 1 forces -1 via 2; group 2 forces -2.
        oracle.add_group_clauses(&mut imgr, 0, &[&lits(&[1])], true);
        oracle.add_group_clauses(&mut imgr, 1, &[&lits(&[-1, 2])], false);
        oracle.add_group_clauses(&mut imgr, 2, &[&lits(&[-2])], false);

        assert_eq!(oracle.solve().unwrap(), Outcome::Unsatisfiable);
        let core: Vec<Gid> = oracle.group_core().iter().copied().collect();
        assert!(core.contains(&1) && core.contains(&2));

        oracle.deactivate_group(2);
        assert_eq!(oracle.solve().unwrap(), Outcome::Satisfiable);
        assert_eq!(oracle.model().value_of(1), 1);
        assert_eq!(oracle.model().value_of(2), 1);

        oracle.activate_group(2);
        assert_eq!(oracle.solve().unwrap(), Outcome::Unsatisfiable);
    }

    #[test]
    fn deletion_is_permanent() {
        let mut imgr = IdManager::new(1);
        let mut oracle = VarisatOracle::new();
        oracle.set_max_problem_var(1);

        oracle.add_group_clauses(&mut imgr, 0, &[&lits(&[1])], true);
        oracle.add_group_clauses(&mut imgr, 1, &[&lits(&[-1])], false);

        assert_eq!(oracle.solve().unwrap(), Outcome::Unsatisfiable);
        oracle.del_group(1);
        assert!(!oracle.exists_group(1));
        assert_eq!(oracle.solve().unwrap(), Outcome::Satisfiable);
    }

    #[test]
    fn finalised_groups_leave_the_assumption_set() {
        let mut imgr = IdManager::new(2);
        let mut oracle = VarisatOracle::new();
        oracle.set_max_problem_var(2);

        oracle.add_group_clauses(&mut imgr, 1, &[&lits(&[1, 2])], false);
        oracle.make_group_final(1);
        assert!(oracle.is_group_final(1));
        assert!(oracle.activation_lit(1).is_none());
        assert_eq!(oracle.solve().unwrap(), Outcome::Satisfiable);
    }
}
