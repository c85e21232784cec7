mod common;

use common::necessary;

use musket::builder::{dimacs, gcnf, vgcnf};
use musket::config::Config;
use musket::db::state::MusState;
use musket::extractor::MusExtractor;
use musket::reports::write;

#[test]
fn cnf_input_extracts_and_writes() {
    let input = b"c redundant last clause\np cnf 3 4\n1 2 0\n-1 0\n-2 0\n1 2 3 0\n";
    let gset = dimacs::read_cnf(&input[..]).unwrap();
    let mut md = MusState::new(gset);

    let outcome = MusExtractor::new(Config::default()).process(&mut md).unwrap();
    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1, 2, 3]);

    let mut out = Vec::new();
    write::write_cnf(&mut out, &md).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("p cnf 3 3\n"));

    // The written result parses back to the same unsatisfiable instance.
    let again = dimacs::read_cnf(text.as_bytes()).unwrap();
    let mut again_md = MusState::new(again);
    let outcome = MusExtractor::new(Config::default()).process(&mut again_md).unwrap();
    assert!(outcome.is_unsat());
    assert_eq!(again_md.num_necessary(), 3);
}

#[test]
fn gcnf_input_preserves_group_labels() {
    let input = b"p gcnf 3 5 3\n{0} 1 2 0\n{1} -1 0\n{1} -1 3 0\n{2} -2 0\n{3} 3 0\n";
    let gset = gcnf::read_gcnf(&input[..]).unwrap();
    let mut md = MusState::new(gset);

    let mut cfg = Config::default();
    cfg.grp_mode = true;
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();
    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1, 2]);

    let mut out = Vec::new();
    write::write_gcnf(&mut out, &md).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("{0} 1 2 0"));
    assert!(text.contains("{1} -1 0"));
    assert!(!text.contains("{3}"));

    let again = gcnf::read_gcnf(text.as_bytes()).unwrap();
    assert_eq!(again.gsize(), 3); // groups 0, 1, 2
}

#[test]
fn competition_summary_lists_the_core() {
    let input = b"p cnf 2 3\n1 0\n-1 0\n1 2 0\n";
    let gset = dimacs::read_cnf(&input[..]).unwrap();
    let mut md = MusState::new(gset);
    MusExtractor::new(Config::default()).process(&mut md).unwrap();

    let mut out = Vec::new();
    write::write_comp(&mut out, &md).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "v 1 2 0\n");
}

#[test]
fn vgcnf_input_drives_variable_group_extraction() {
    // Variables 1 and 2 carry the contradiction; variable 3 is padding.
    let input = b"p vgcnf 3 4 3\n{1} 1 0\n{2} 2 0\n{3} 3 0\n1 0\n-1 2 0\n-2 0\n3 1 0\n";
    let gset = vgcnf::read_vgcnf(&input[..]).unwrap();
    assert!(gset.var_mode());
    let mut md = MusState::new(gset);

    let mut cfg = Config::default();
    cfg.var_mode = true;
    let outcome = MusExtractor::new(cfg).process(&mut md).unwrap();
    assert!(outcome.is_unsat());
    assert_eq!(necessary(&md), vec![1, 2]);
    assert!(md.r(3));
}

#[test]
fn unknown_first_output_leads_with_unclassified_clauses() {
    use musket::structures::Lit;

    let mut gset = musket::db::group_set::GroupSet::new();
    gset.add_clause(0, vec![Lit::from_int(1)]);
    gset.add_clause(1, vec![Lit::from_int(-1), Lit::from_int(2)]);
    gset.add_clause(2, vec![Lit::from_int(-2)]);
    gset.seal();
    let mut md = MusState::new(gset);
    md.mark_necessary(1);
    // Group 2 stays untested.

    let mut out = Vec::new();
    write::write_cnf_unknown_first(&mut out, &md).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "-2 0");
}

#[test]
fn necessary_g0_output_groups_the_rest() {
    use musket::structures::Lit;

    let mut gset = musket::db::group_set::GroupSet::new();
    gset.add_clause(0, vec![Lit::from_int(1)]);
    gset.add_clause(1, vec![Lit::from_int(-1), Lit::from_int(2)]);
    gset.add_clause(2, vec![Lit::from_int(-2)]);
    gset.seal();
    let mut md = MusState::new(gset);
    md.mark_necessary(1);

    let mut out = Vec::new();
    write::write_gcnf_necessary_g0(&mut out, &md).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("p gcnf 2 3 1\n"));
    assert!(text.contains("{0} 1 0"));
    assert!(text.contains("{0} -1 2 0"));
    assert!(text.contains("{1} -2 0"));
}
