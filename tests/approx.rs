mod common;

use common::state;

use std::collections::BTreeSet;

use musket::checker::SatChecker;
use musket::config::{ApproxPolicy, Config, PhasePolicy};
use musket::extractor::MusExtractor;
use musket::generic::id_manager::IdManager;
use musket::oracle::{GroupOracle, Outcome, VarisatOracle};
use musket::structures::{Assignment, Gid, Lit, Var};
use musket::types::err::OracleError;

/// A back-end returning Unknown for the first few calls, then delegating.
struct Hesitant {
    inner: VarisatOracle,
    unknowns: u32,
}

impl Hesitant {
    fn new(unknowns: u32) -> Self {
        Hesitant {
            inner: VarisatOracle::new(),
            unknowns,
        }
    }
}

impl GroupOracle for Hesitant {
    fn add_group_clauses(
        &mut self,
        imgr: &mut IdManager,
        gid: Gid,
        clauses: &[&[Lit]],
        final_group: bool,
    ) {
        self.inner.add_group_clauses(imgr, gid, clauses, final_group)
    }

    fn add_final_clause(&mut self, lits: &[Lit]) {
        self.inner.add_final_clause(lits)
    }

    fn exists_group(&self, gid: Gid) -> bool {
        self.inner.exists_group(gid)
    }

    fn is_group_active(&self, gid: Gid) -> bool {
        self.inner.is_group_active(gid)
    }

    fn is_group_final(&self, gid: Gid) -> bool {
        self.inner.is_group_final(gid)
    }

    fn activate_group(&mut self, gid: Gid) {
        self.inner.activate_group(gid)
    }

    fn deactivate_group(&mut self, gid: Gid) {
        self.inner.deactivate_group(gid)
    }

    fn del_group(&mut self, gid: Gid) {
        self.inner.del_group(gid)
    }

    fn make_group_final(&mut self, gid: Gid) {
        self.inner.make_group_final(gid)
    }

    fn group_count(&self) -> usize {
        self.inner.group_count()
    }

    fn max_gid(&self) -> Gid {
        self.inner.max_gid()
    }

    fn activation_lit(&self, gid: Gid) -> Option<Lit> {
        self.inner.activation_lit(gid)
    }

    fn solve_with(&mut self, extra: &[Lit]) -> Result<Outcome, OracleError> {
        if self.unknowns > 0 {
            self.unknowns -= 1;
            return Ok(Outcome::Unknown);
        }
        self.inner.solve_with(extra)
    }

    fn model(&self) -> &Assignment {
        self.inner.model()
    }

    fn group_core(&self) -> &BTreeSet<Gid> {
        self.inner.group_core()
    }

    fn set_max_problem_var(&mut self, var: Var) {
        self.inner.set_max_problem_var(var)
    }

    fn set_phase(&mut self, phase: PhasePolicy) -> bool {
        self.inner.set_phase(phase)
    }

    fn reset(&mut self) {
        self.inner.reset()
    }
}

fn run_with_unknowns(policy: ApproxPolicy, unknowns: u32) -> (musket::db::state::MusState, bool) {
    let mut cfg = Config::default();
    cfg.approx = policy;
    let mut md = state(&[
        (1, &[1, 2]),
        (2, &[-1]),
        (3, &[-2]),
        (4, &[1, 2, 3]),
    ]);
    let mut extractor = MusExtractor::new(cfg);
    extractor.set_checker(SatChecker::new(Box::new(Hesitant::new(unknowns))));
    let outcome = extractor.process(&mut md).unwrap();
    (md, outcome.approximate)
}

#[test]
fn over_approximation_keeps_undetermined_groups() {
    let (md, approximate) = run_with_unknowns(ApproxPolicy::Over, 1);
    assert!(approximate);
    // The first scheduled group came back undetermined and stays in the result.
    assert!(md.nec(4));
    assert!(md.fake(4));
    // The real core is still found underneath.
    assert!(md.nec(1) && md.nec(2) && md.nec(3));
}

#[test]
fn under_approximation_drops_undetermined_groups() {
    let (md, approximate) = run_with_unknowns(ApproxPolicy::Under, 1);
    assert!(approximate);
    assert!(md.r(4));
    assert!(md.fake(4));
}

#[test]
fn rescheduled_groups_are_eventually_settled() {
    let (md, approximate) = run_with_unknowns(ApproxPolicy::Reschedule, 1);
    assert!(!approximate);
    assert!(md.r(4));
    assert!(md.nec(1) && md.nec(2) && md.nec(3));
}

#[test]
fn without_a_policy_undetermined_groups_are_potentially_necessary() {
    let (md, approximate) = run_with_unknowns(ApproxPolicy::Off, 1);
    assert!(approximate);
    assert!(md.nec(4));
    assert!(md.fake(4));
}
