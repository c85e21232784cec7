mod common;

use common::{necessary, state};

use musket::config::Config;
use musket::extractor::MusExtractor;

#[test]
fn bcp_before_extraction_preserves_the_core() {
    // The unit (3) satisfies group 4 away before any oracle call.
    let mut cfg = Config::default();
    cfg.grp_mode = true;
    cfg.bcp = true;
    let mut md = state(&[
        (0, &[3]),
        (1, &[1, 2]),
        (2, &[-1]),
        (3, &[-2]),
        (4, &[3, 4]),
    ]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1, 2, 3]);
    assert!(md.r(4));
}

#[test]
fn bcp_conflict_leaves_the_background_alone() {
    let mut cfg = Config::default();
    cfg.grp_mode = true;
    cfg.bcp = true;
    let mut md = state(&[(0, &[1]), (0, &[-1]), (1, &[2, 3])]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert!(necessary(&md).is_empty());
    assert_eq!(outcome.sat_calls, 0);
}

#[test]
fn bcp_reconstruction_restores_satisfied_clauses() {
    let mut cfg = Config::default();
    cfg.grp_mode = true;
    cfg.bcp = true;
    let mut md = state(&[
        (0, &[1]),
        (1, &[1, 2]),
        (1, &[-1, 3]),
        (2, &[-3]),
    ]);
    let mut extractor = MusExtractor::new(cfg);
    extractor.process(&mut md).unwrap();
    extractor.reconstruct(&mut md);

    // Whatever survived extraction carries its full clauses again.
    for clause in md.gset().clauses() {
        let gid = clause.gid();
        if gid == 0 || !md.r(gid) {
            assert!(!clause.removed(), "clause of surviving group {gid} still removed");
            assert_eq!(clause.asize(), clause.size());
        }
    }
}

#[test]
fn bce_removes_blocked_clauses_before_extraction() {
    // (3 4) is blocked on both literals: no partner clause exists at all.
    let mut cfg = Config::default();
    cfg.grp_mode = true;
    cfg.bce = true;
    let mut md = state(&[
        (0, &[1]),
        (1, &[-1, 2]),
        (2, &[-2]),
        (3, &[3, 4]),
    ]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1, 2]);
    assert!(md.r(3));
}
