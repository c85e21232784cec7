/*!
Correctness testing of a computed result.

The background and the necessary groups are copied into a fresh group set; the copy must be unsatisfiable, and re-running extraction over it must keep every group --- otherwise the original result was not minimal.
*/

use crate::{
    checker::SatChecker,
    config::Config,
    db::{group_set::GroupSet, state::MusState},
    misc::log::targets,
    oracle::VarisatOracle,
    structures::Gid,
    types::err::ErrorKind,
    work::{CheckUnsat, WorkItem},
};

/// The verdict on a tested result.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TestVerdict {
    /// The copy is unsatisfiable and minimal.
    Minimal,

    /// The copy is unsatisfiable but some groups are redundant.
    NotMinimal(usize),

    /// The copy is satisfiable; the result is not an unsatisfiable subformula at all.
    Satisfiable,
}

impl std::fmt::Display for TestVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimal => write!(f, "the result is a minimal unsatisfiable subformula"),
            Self::NotMinimal(extra) => {
                write!(f, "the result is unsatisfiable but {extra} groups are redundant")
            }
            Self::Satisfiable => write!(f, "the result is satisfiable"),
        }
    }
}

/// Re-runs extraction over the result to verify minimality.
pub struct Tester {
    config: Config,
}

impl Tester {
    /// A tester running a deletion-based extraction with refinement and rotation.
    pub fn new(base: &Config) -> Self {
        let mut config = Config::default();
        config.grp_mode = base.grp_mode;
        Tester { config }
    }

    /// Tests the classification held by `state`.
    pub fn process(&mut self, state: &MusState) -> Result<TestVerdict, ErrorKind> {
        log::debug!(target: targets::CHECKER, "Testing the result for minimality");
        let gset = state.gset();

        // The background plus the necessary groups, relabelled 0 and 1..
        let mut test_gset = GroupSet::new();
        for cid in gset.gclauses(0) {
            let clause = gset.clause(*cid);
            if !clause.removed() {
                test_gset.add_clause(0, clause.lits().to_vec());
            }
        }
        let necessary: Vec<Gid> = state.necessary_gids().collect();
        for (at, gid) in necessary.iter().enumerate() {
            for cid in gset.gclauses(*gid) {
                let clause = gset.clause(*cid);
                if !clause.removed() {
                    test_gset.add_clause((at + 1) as Gid, clause.lits().to_vec());
                }
            }
        }
        test_gset.seal();

        let mut test_state = MusState::new(test_gset);
        let mut checker = SatChecker::new(Box::new(VarisatOracle::new()));

        // Satisfiable results fail outright.
        let mut unsat_item = CheckUnsat::new();
        checker.process_unsat(&mut unsat_item, &test_state)?;
        if !(unsat_item.completed() && unsat_item.is_unsat()) {
            return Ok(TestVerdict::Satisfiable);
        }

        // Re-extract and compare sizes.
        let mut extractor = crate::extractor::MusExtractor::new(self.config.clone());
        extractor.set_checker(checker);
        extractor.process(&mut test_state)?;

        let original = necessary.len();
        let retained = test_state.num_necessary();
        match retained == original {
            true => Ok(TestVerdict::Minimal),
            false => Ok(TestVerdict::NotMinimal(original - retained)),
        }
    }
}
