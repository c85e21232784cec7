/*!
Negation encodings of groups.

A group is a conjunction of clauses, so its negation is a disjunction of per-clause conjunctions.
Two encodings are used:

- [neg_product] distributes the disjunction into CNF directly: one clause per choice of a literal from each member clause, every literal negated.
  Exponential in the member count, and intended for the singleton groups of plain-CNF redundancy removal.
- The chunked checks use auxiliary variables instead: per member clause `Cᵢ` a fresh `aᵢ` with binaries `(¬aᵢ ∨ ¬l)` for each `l ∈ Cᵢ`, and one long clause over all the auxiliaries of the chunk.
  That encoding lives with the chunk processing in the worker, as the auxiliaries must be retired through the sync machinery.
*/

use crate::structures::{Clause, Lit};

/// The CNF of the negation of a conjunction of clauses, by product distribution.
///
/// Each output clause picks one literal from every input clause and negates it.
pub fn neg_product(clauses: &[&Clause]) -> Vec<Vec<Lit>> {
    // A group holding the empty clause negates to a tautology: nothing to assert.
    if clauses.is_empty() || clauses.iter().any(|cl| cl.asize() == 0) {
        return Vec::new();
    }

    let mut products = Vec::new();
    let mut cursors = vec![0usize; clauses.len()];

    'product_loop: loop {
        let product: Vec<Lit> = cursors
            .iter()
            .enumerate()
            .map(|(at, cursor)| clauses[at].lits()[*cursor].negate())
            .collect();
        products.push(product);

        // Odometer step over the literal positions.
        for at in (0..cursors.len()).rev() {
            cursors[at] += 1;
            if cursors[at] < clauses[at].asize() {
                continue 'product_loop;
            }
            cursors[at] = 0;
        }
        break;
    }

    products
}

#[cfg(test)]
mod neg_tests {
    use super::*;
    use crate::structures::ClauseId;

    fn clause(id: ClauseId, ints: &[i32]) -> Clause {
        Clause::new(id, id, ints.iter().map(|i| Lit::from_int(*i)).collect())
    }

    #[test]
    fn singleton_group_negates_literally() {
        let c = clause(1, &[1, -2, 3]);
        let neg = neg_product(&[&c]);
        let ints: Vec<Vec<i32>> = neg
            .iter()
            .map(|cl| cl.iter().map(|l| l.as_int()).collect())
            .collect();
        assert_eq!(ints, vec![vec![-1], vec![2], vec![-3]]);
    }

    #[test]
    fn product_covers_every_choice() {
        let a = clause(1, &[1, 2]);
        let b = clause(2, &[3]);
        let neg = neg_product(&[&a, &b]);
        assert_eq!(neg.len(), 2);
        for product in &neg {
            assert_eq!(product.len(), 2);
        }
    }
}
