/*!
Total and partial assignments over the problem variables.

An assignment stores one of `-1 / 0 / +1` per variable, 0 meaning unassigned.
Model rotation works on assignments by single-variable flips; a *delta* --- a sparse list of variables to flip --- carries a rotated assignment relative to the original model.
*/

use crate::structures::{Clause, Lit, Var};

/// An assignment of truth values to variables, indexed from 1.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Assignment {
    values: Vec<i8>,
}

impl Assignment {
    /// An empty assignment over variables `1..=max_var`.
    pub fn new(max_var: Var) -> Self {
        Assignment {
            values: vec![0; max_var as usize + 1],
        }
    }

    /// An assignment from raw values; index 0 is ignored.
    pub fn from_values(values: Vec<i8>) -> Self {
        Assignment { values }
    }

    /// Grows the assignment to cover `max_var`, leaving new variables unassigned.
    pub fn ensure_var(&mut self, max_var: Var) {
        if self.values.len() <= max_var as usize {
            self.values.resize(max_var as usize + 1, 0);
        }
    }

    pub fn max_var(&self) -> Var {
        (self.values.len().saturating_sub(1)) as Var
    }

    pub fn is_empty(&self) -> bool {
        self.values.len() <= 1
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// The raw value of a variable: -1, 0, or +1.
    pub fn value_of(&self, var: Var) -> i8 {
        match self.values.get(var as usize) {
            Some(v) => *v,
            None => 0,
        }
    }

    pub fn set(&mut self, var: Var, value: i8) {
        self.ensure_var(var);
        self.values[var as usize] = value;
    }

    /// Assigns `lit.var()` so that `lit` is true.
    pub fn assign_true(&mut self, lit: Lit) {
        self.set(lit.var(), if lit.polarity() { 1 } else { -1 });
    }

    /// The truth value of a literal: -1, 0, or +1.
    pub fn tv_lit(&self, lit: Lit) -> i8 {
        let value = self.value_of(lit.var());
        if value == 0 {
            0
        } else if (value > 0) == lit.polarity() {
            1
        } else {
            -1
        }
    }

    /// The truth value of a clause: +1 if some literal is true, -1 if every literal is false, 0 otherwise.
    pub fn tv_clause(&self, clause: &Clause) -> i8 {
        let mut false_count = 0;
        for lit in clause.lits() {
            match self.tv_lit(*lit) {
                1 => return 1,
                -1 => false_count += 1,
                _ => {}
            }
        }
        if false_count == clause.asize() {
            -1
        } else {
            0
        }
    }

    /// The number of true literals in the clause.
    pub fn num_true(&self, clause: &Clause) -> usize {
        clause.lits().iter().filter(|l| self.tv_lit(**l) == 1).count()
    }

    /// The truth value of a set of clauses: -1 if some clause is false, +1 if all are true, 0 otherwise.
    pub fn tv_clauses<'c>(&self, clauses: impl Iterator<Item = &'c Clause>) -> i8 {
        let mut sat = true;
        for clause in clauses {
            match self.tv_clause(clause) {
                -1 => return -1,
                0 => sat = false,
                _ => {}
            }
        }
        if sat {
            1
        } else {
            0
        }
    }

    /// Flips the value of an assigned variable.
    pub fn flip(&mut self, var: Var) {
        let value = self.values[var as usize];
        debug_assert!(value != 0);
        self.values[var as usize] = -value;
    }

    /// Applies a sparse delta by flipping each listed variable.
    pub fn multiflip(&mut self, delta: &[Var]) {
        for var in delta {
            self.flip(*var);
        }
    }
}

#[cfg(test)]
mod assignment_tests {
    use super::*;
    use crate::structures::ClauseId;

    fn clause(id: ClauseId, ints: &[i32]) -> Clause {
        Clause::new(id, id, ints.iter().map(|i| Lit::from_int(*i)).collect())
    }

    #[test]
    fn clause_truth_values() {
        let mut ass = Assignment::new(3);
        ass.assign_true(Lit::from_int(1));
        ass.assign_true(Lit::from_int(-2));

        let satisfied = clause(1, &[1, 3]);
        let falsified = clause(2, &[-1, 2]);
        let open = clause(3, &[-1, 3]);

        assert_eq!(ass.tv_clause(&satisfied), 1);
        assert_eq!(ass.tv_clause(&falsified), -1);
        assert_eq!(ass.tv_clause(&open), 0);
    }

    #[test]
    fn delta_round_trip() {
        let mut ass = Assignment::new(3);
        for v in 1..=3 {
            ass.set(v, 1);
        }
        let reference = ass.clone();
        let delta = vec![1, 3];
        ass.multiflip(&delta);
        assert_eq!(ass.value_of(1), -1);
        assert_eq!(ass.value_of(2), 1);
        ass.multiflip(&delta);
        assert_eq!(ass, reference);
    }
}
