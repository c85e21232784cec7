mod common;

use common::{necessary, state};

use musket::config::Config;
use musket::extractor::MusExtractor;

#[test]
fn rotation_saves_oracle_calls_on_a_chain() {
    // (1), (-1 2), (-2): one SAT outcome and two rotations settle everything.
    let mut md = state(&[(1, &[1]), (2, &[-1, 2]), (3, &[-2])]);
    let outcome = MusExtractor::new(Config::default()).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1, 2, 3]);

    let m = md.num_necessary() as u32;
    let k = outcome.stats.rot_groups as u32;
    assert!(k >= 1, "rotation found nothing");
    assert!(
        outcome.sat_calls <= m - k + 1,
        "{} calls for {m} groups with {k} rotated",
        outcome.sat_calls
    );
}

#[test]
fn rotation_respects_classified_groups() {
    // Rotation output never resurrects a removed group.
    let mut md = state(&[
        (1, &[1, 2]),
        (2, &[-1]),
        (3, &[-2]),
        (4, &[1, 2, 3]),
    ]);
    MusExtractor::new(Config::default()).process(&mut md).unwrap();
    assert!(md.r(4));
    assert!(!md.nec(4));
}

#[test]
fn longer_chain_needs_a_single_call() {
    let mut md = state(&[
        (1, &[1]),
        (2, &[-1, 2]),
        (3, &[-2, 3]),
        (4, &[-3, 4]),
        (5, &[-4]),
    ]);
    let outcome = MusExtractor::new(Config::default()).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1, 2, 3, 4, 5]);
    assert_eq!(outcome.sat_calls, 1);
    assert_eq!(outcome.stats.rot_groups, 4);
}

#[test]
fn fast_tracking_reorders_the_schedule() {
    let mut cfg = Config::default();
    cfg.reorder = true;
    let mut md = state(&[
        (1, &[1, 2]),
        (2, &[-1]),
        (3, &[-2]),
        (4, &[1, 2, 3]),
    ]);
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();

    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1, 2, 3]);
}
