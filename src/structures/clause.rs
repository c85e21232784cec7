/*!
Clauses, as stored by the group set.

A clause keeps its literals sorted by variable, deduplicated, with an *active size* distinct from the full size: top-level propagation shrinks falsified literals off the tail without deallocating them, and the active prefix is what every consumer reads.

Removal is lazy: a removed clause keeps its storage and stays reachable through occurrence lists until those are compacted.

The 64-bit *abstraction* is a bitmask over the variables of the clause, used as a cheap prefilter for the subsumption and tautological-resolvent checks.
*/

use crate::structures::{Gid, Lit, Var};

/// A stable clause identifier: the dense 1-based index of the clause in input order.
pub type ClauseId = u32;

/// A clause of the group set.
#[derive(Clone, Debug)]
pub struct Clause {
    /// The stable identifier of the clause.
    id: ClauseId,

    /// The group the clause belongs to.
    gid: Gid,

    /// The literals, sorted by variable over the active prefix.
    lits: Vec<Lit>,

    /// The active size. Literals past this point have been shrunk off.
    asize: usize,

    /// Lazy removal flag.
    removed: bool,

    /// Bitmask over the variables of the active prefix.
    abstraction: u64,

    /// Set when shrinking disturbed the literal order; re-established by [resort](Clause::resort).
    unsorted: bool,

    /// Traversal generation, for resolution-graph walks.
    pub visited_gen: u64,

    /// The literal through which a graph walk reached this clause.
    pub incoming_lit: Option<Lit>,

    /// The clause from which a graph walk reached this clause.
    pub incoming_parent: Option<ClauseId>,

    /// Count of background variables in the clause (variable-group mode).
    pub g0v_count: usize,

    /// Count of variables settled necessary (variable-group mode).
    pub nv_count: usize,
}

impl Clause {
    /// A fresh clause over `lits`, sorted and deduplicated.
    pub fn new(id: ClauseId, gid: Gid, mut lits: Vec<Lit>) -> Self {
        lits.sort_unstable_by_key(|l| (l.var(), !l.polarity()));
        lits.dedup();

        let mut clause = Clause {
            id,
            gid,
            asize: lits.len(),
            lits,
            removed: false,
            abstraction: 0,
            unsorted: false,
            visited_gen: 0,
            incoming_lit: None,
            incoming_parent: None,
            g0v_count: 0,
            nv_count: 0,
        };
        clause.abstraction = clause.compute_abstraction();
        clause
    }

    pub fn id(&self) -> ClauseId {
        self.id
    }

    pub fn gid(&self) -> Gid {
        self.gid
    }

    pub fn set_gid(&mut self, gid: Gid) {
        self.gid = gid;
    }

    /// The active literals of the clause.
    pub fn lits(&self) -> &[Lit] {
        &self.lits[..self.asize]
    }

    /// All literals, including any shrunk off the tail.
    pub fn all_lits(&self) -> &[Lit] {
        &self.lits
    }

    /// The active size of the clause.
    pub fn asize(&self) -> usize {
        self.asize
    }

    /// The full size of the clause.
    pub fn size(&self) -> usize {
        self.lits.len()
    }

    pub fn removed(&self) -> bool {
        self.removed
    }

    pub fn mark_removed(&mut self) {
        self.removed = true;
    }

    /// Clears the removal flag; used when preprocessing restores clauses for output.
    pub fn unmark_removed(&mut self) {
        self.removed = false;
    }

    pub fn abstraction(&self) -> u64 {
        self.abstraction
    }

    pub fn unsorted(&self) -> bool {
        self.unsorted
    }

    /// True if the active prefix contains `lit`.
    pub fn contains(&self, lit: Lit) -> bool {
        self.lits().contains(&lit)
    }

    /// Shrinks the clause by moving `lit` to the end of the active prefix and cutting it off.
    ///
    /// Returns false if `lit` is not active.
    pub fn shrink_literal(&mut self, lit: Lit) -> bool {
        let Some(at) = self.lits[..self.asize].iter().position(|l| *l == lit) else {
            return false;
        };
        let last = self.asize - 1;
        if at != last {
            self.lits.swap(at, last);
            self.unsorted = true;
        }
        self.asize = last;
        self.abstraction = self.compute_abstraction();
        true
    }

    /// Shrinks the active size to zero. Used to record a top-level conflict clause.
    pub fn shrink_all(&mut self) {
        self.asize = 0;
        self.abstraction = 0;
    }

    /// Restores the full size, e.g. when reconstructing a solution after preprocessing.
    pub fn unshrink(&mut self) {
        self.asize = self.lits.len();
        self.resort();
    }

    /// Re-establishes the sorted order of the active prefix. Idempotent.
    pub fn resort(&mut self) {
        if self.unsorted {
            self.lits[..self.asize].sort_unstable_by_key(|l| (l.var(), !l.polarity()));
            self.unsorted = false;
        }
        self.abstraction = self.compute_abstraction();
    }

    fn compute_abstraction(&self) -> u64 {
        self.lits[..self.asize]
            .iter()
            .fold(0, |acc, l| acc | (1u64 << (l.var() % 64)))
    }

    /// A hash over the active literal content, for the duplicate-detection index.
    pub fn content_hash(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.lits().hash(&mut hasher);
        hasher.finish()
    }

    /// The variables of the active prefix.
    pub fn vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.lits().iter().map(|l| l.var())
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for lit in self.lits() {
            write!(f, "{lit} ")?;
        }
        write!(f, "0")
    }
}

/// True if `c1` subsumes `c2`.
///
/// Relies on the active literals being sorted by variable; callers resort first if in doubt.
pub fn subsumes(c1: &Clause, c2: &Clause) -> bool {
    debug_assert!(!c1.unsorted() && !c2.unsorted());
    if c1.asize() >= c2.asize() {
        return false;
    }
    // Fast check: a variable set in c1's abstraction but not c2's rules subsumption out.
    if c1.abstraction() & !c2.abstraction() != 0 {
        return false;
    }
    let mut second = c2.lits().iter();
    'first_literals: for lit in c1.lits() {
        for candidate in second.by_ref() {
            if candidate == lit {
                continue 'first_literals;
            }
        }
        return false;
    }
    true
}

/// True if the resolvent of the two clauses on `lit` is tautological.
///
/// `lit` is taken as it appears in `c1`; the complementary pair on `lit.var()` is skipped and any other clashing pair makes the resolvent tautological.
pub fn taut_resolvent(c1: &Clause, c2: &Clause, lit: Lit) -> bool {
    debug_assert!(!c1.unsorted() && !c2.unsorted());
    let mut p1 = c1.lits().iter().peekable();
    let mut p2 = c2.lits().iter().peekable();
    while let (Some(l1), Some(l2)) = (p1.peek(), p2.peek()) {
        let (v1, v2) = (l1.var(), l2.var());
        if v1 < v2 {
            p1.next();
        } else if v1 > v2 {
            p2.next();
        } else if v1 == lit.var() {
            p1.next();
            p2.next();
        } else if l1.polarity() == l2.polarity() {
            p1.next();
            p2.next();
        } else {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod clause_tests {
    use super::*;

    fn clause(id: ClauseId, ints: &[i32]) -> Clause {
        Clause::new(id, id, ints.iter().map(|i| Lit::from_int(*i)).collect())
    }

    #[test]
    fn normalises_on_creation() {
        let c = clause(1, &[3, -1, 2, 3]);
        let ints: Vec<i32> = c.lits().iter().map(|l| l.as_int()).collect();
        assert_eq!(ints, vec![-1, 2, 3]);
        assert_eq!(c.asize(), 3);
    }

    #[test]
    fn shrink_and_unshrink() {
        let mut c = clause(1, &[-1, 2, 3]);
        assert!(c.shrink_literal(Lit::from_int(-1)));
        assert_eq!(c.asize(), 2);
        assert!(!c.contains(Lit::from_int(-1)));
        c.unshrink();
        assert_eq!(c.asize(), 3);
        assert!(c.contains(Lit::from_int(-1)));
        assert!(!c.unsorted());
    }

    #[test]
    fn subsumption_checks() {
        let a = clause(1, &[1, 3]);
        let b = clause(2, &[1, 2, 3]);
        let c = clause(3, &[1, -3]);
        assert!(subsumes(&a, &b));
        assert!(!subsumes(&b, &a));
        assert!(!subsumes(&c, &b));
    }

    #[test]
    fn tautological_resolvents() {
        let a = clause(1, &[1, 2]);
        let b = clause(2, &[-1, -2]);
        // Resolving on 1 leaves the clash on 2.
        assert!(taut_resolvent(&a, &b, Lit::from_int(1)));
        let c = clause(3, &[-1, 3]);
        assert!(!taut_resolvent(&a, &c, Lit::from_int(1)));
    }
}
