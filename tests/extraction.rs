mod common;

use common::{necessary, state};

use musket::config::Config;
use musket::extractor::MusExtractor;

#[test]
fn fully_minimal_instance_keeps_every_group() {
    // (-1 -2), (1), (2): dropping any clause leaves a satisfiable remainder.
    let mut md = state(&[(1, &[-1, -2]), (2, &[1]), (3, &[2])]);
    let outcome = MusExtractor::new(Config::default()).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert!(outcome.exact());
    assert_eq!(necessary(&md), vec![1, 2, 3]);
}

#[test]
fn redundant_group_is_dropped() {
    // Group 4 is implied by group 1 and contributes nothing to unsatisfiability.
    let mut md = state(&[
        (1, &[1, 2]),
        (2, &[-1]),
        (3, &[-2]),
        (4, &[1, 2, 3]),
    ]);
    let outcome = MusExtractor::new(Config::default()).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1, 2, 3]);
    assert!(md.r(4));
}

#[test]
fn one_of_two_competing_cores_is_returned() {
    // {1, 2} and {3, 4} are both minimal; the result must be exactly one of them.
    let mut md = state(&[
        (1, &[1]),
        (2, &[-1]),
        (3, &[2]),
        (4, &[-2]),
        (5, &[1, 2]),
    ]);
    let outcome = MusExtractor::new(Config::default()).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    let found = necessary(&md);
    assert!(
        found == vec![1, 2] || found == vec![3, 4],
        "unexpected core {found:?}"
    );
}

#[test]
fn unsatisfiable_background_empties_the_result() {
    let mut cfg = Config::default();
    cfg.grp_mode = true;
    cfg.init_unsat_check = true;
    let mut md = state(&[
        (0, &[5]),
        (0, &[-5]),
        (1, &[1, 2]),
        (2, &[-1]),
        (3, &[2, 3]),
    ]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert!(necessary(&md).is_empty());
    assert_eq!(md.num_removed(), 3);
}

#[test]
fn empty_clause_in_a_group_is_the_whole_core() {
    let mut cfg = Config::default();
    cfg.grp_mode = true;
    let mut md = state(&[(0, &[1]), (0, &[-2]), (1, &[])]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1]);
}

#[test]
fn empty_input_reports_satisfiable() {
    let mut md = state(&[]);
    let outcome = MusExtractor::new(Config::default()).process(&mut md).unwrap();

    assert!(!outcome.is_unsat());
    assert!(necessary(&md).is_empty());
}

#[test]
fn satisfiable_single_group_is_reported() {
    let mut cfg = Config::default();
    cfg.init_unsat_check = true;
    let mut md = state(&[(1, &[1, 2])]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(!outcome.is_unsat());
}

#[test]
fn satisfiable_instance_is_caught_by_the_witness_screen() {
    // Deactivating group 3 leaves a model that happens to satisfy it too.
    let mut md = state(&[(1, &[1]), (2, &[2]), (3, &[1, 2])]);
    let outcome = MusExtractor::new(Config::default()).process(&mut md).unwrap();

    assert!(!outcome.is_unsat());
}

#[test]
fn unsatisfiable_single_group_is_kept() {
    let mut cfg = Config::default();
    cfg.grp_mode = true;
    let mut md = state(&[(1, &[1]), (1, &[-1])]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1]);
}

#[test]
fn duplicate_clauses_across_groups_are_independent() {
    // Both groups carry (1); only one of them is needed, the other is removed.
    let mut cfg = Config::default();
    cfg.grp_mode = true;
    let mut md = state(&[(1, &[1]), (2, &[1]), (3, &[-1])]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    let found = necessary(&md);
    assert_eq!(found.len(), 2);
    assert!(found.contains(&3));
    assert!(found.contains(&1) ^ found.contains(&2));
}

#[test]
fn background_only_input_stays_as_it_is() {
    let mut cfg = Config::default();
    cfg.grp_mode = true;
    let mut md = state(&[(0, &[1]), (0, &[-1])]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert!(necessary(&md).is_empty());
    assert_eq!(md.real_gsize(), 1);
}

#[test]
fn extraction_of_an_extraction_is_stable() {
    // Re-running on the surviving clauses returns the same instance.
    let mut md = state(&[
        (1, &[1, 2]),
        (2, &[-1]),
        (3, &[-2]),
        (4, &[1, 2, 3]),
    ]);
    MusExtractor::new(Config::default()).process(&mut md).unwrap();

    let survivors: Vec<&[i32]> = vec![&[1, 2], &[-1], &[-2]];
    let second: Vec<(u32, &[i32])> = survivors
        .iter()
        .enumerate()
        .map(|(at, lits)| ((at + 1) as u32, *lits))
        .collect();
    let mut again = state(&second);
    let outcome = MusExtractor::new(Config::default()).process(&mut again).unwrap();

    assert!(outcome.is_unsat());
    assert_eq!(necessary(&again), vec![1, 2, 3]);
}

#[test]
fn verified_minimality_of_a_result() {
    use musket::verify::{TestVerdict, Tester};

    let cfg = Config::default();
    let mut md = state(&[
        (1, &[1, 2]),
        (2, &[-1]),
        (3, &[-2]),
        (4, &[1, 2, 3]),
    ]);
    MusExtractor::new(cfg.clone()).process(&mut md).unwrap();

    let verdict = Tester::new(&cfg).process(&md).unwrap();
    assert_eq!(verdict, TestVerdict::Minimal);
}
