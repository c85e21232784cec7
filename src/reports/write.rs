/*!
Writing the result instance out.

- CNF output holds the non-removed clauses only; the `p cnf` header is recomputed.
- GCNF output keeps the original group labels and omits removed groups.
- The competition summary prints `v g1 g2 … 0` over the surviving group ids.
*/

use std::io::Write;

use crate::{
    db::state::MusState,
    structures::{ClauseId, Gid},
    types::err::{ErrorKind, WriteError},
};

fn io_err(e: std::io::Error) -> ErrorKind {
    WriteError::Io(e.to_string()).into()
}

/// The non-removed clause count.
fn active_clause_count(state: &MusState) -> usize {
    state.gset().clauses().iter().filter(|cl| !cl.removed()).count()
}

/// Writes the surviving clauses as plain DIMACS.
pub fn write_cnf(out: &mut impl Write, state: &MusState) -> Result<(), ErrorKind> {
    let gset = state.gset();
    writeln!(out, "p cnf {} {}", gset.max_var(), active_clause_count(state)).map_err(io_err)?;
    for clause in gset.clauses() {
        if !clause.removed() {
            writeln!(out, "{clause}").map_err(io_err)?;
        }
    }
    Ok(())
}

/// Writes plain DIMACS with the unclassified clauses first.
pub fn write_cnf_unknown_first(out: &mut impl Write, state: &MusState) -> Result<(), ErrorKind> {
    let gset = state.gset();
    writeln!(out, "p cnf {} {}", gset.max_var(), active_clause_count(state)).map_err(io_err)?;
    let untested: Vec<ClauseId> = gset
        .clauses()
        .iter()
        .filter(|cl| !cl.removed() && cl.gid() != 0 && state.untested(cl.gid()))
        .map(|cl| cl.id())
        .collect();
    for cid in &untested {
        writeln!(out, "{}", gset.clause(*cid)).map_err(io_err)?;
    }
    for clause in gset.clauses() {
        if !clause.removed() && !(clause.gid() != 0 && state.untested(clause.gid())) {
            writeln!(out, "{clause}").map_err(io_err)?;
        }
    }
    Ok(())
}

/// Writes GCNF with the necessary clauses in group 0 and one group per unclassified clause.
pub fn write_gcnf_necessary_g0(out: &mut impl Write, state: &MusState) -> Result<(), ErrorKind> {
    let gset = state.gset();
    let clause_count = active_clause_count(state);
    let unknown: Vec<ClauseId> = gset
        .clauses()
        .iter()
        .filter(|cl| !cl.removed() && cl.gid() != 0 && state.untested(cl.gid()))
        .map(|cl| cl.id())
        .collect();
    writeln!(
        out,
        "p gcnf {} {} {}",
        gset.max_var(),
        clause_count,
        unknown.len()
    )
    .map_err(io_err)?;
    for clause in gset.clauses() {
        if !clause.removed() && !unknown.contains(&clause.id()) {
            writeln!(out, "{{0}} {clause}").map_err(io_err)?;
        }
    }
    for (at, cid) in unknown.iter().enumerate() {
        writeln!(out, "{{{}}} {}", at + 1, gset.clause(*cid)).map_err(io_err)?;
    }
    Ok(())
}

/// Writes GCNF with the original labels, removed groups omitted.
pub fn write_gcnf(out: &mut impl Write, state: &MusState) -> Result<(), ErrorKind> {
    let gset = state.gset();
    writeln!(
        out,
        "p gcnf {} {} {}",
        gset.max_var(),
        active_clause_count(state),
        gset.max_gid()
    )
    .map_err(io_err)?;
    for gid in gset.gids() {
        if gid != 0 && state.r(gid) {
            continue;
        }
        for cid in gset.gclauses(gid) {
            let clause = gset.clause(*cid);
            if !clause.removed() {
                writeln!(out, "{{{gid}}} {clause}").map_err(io_err)?;
            }
        }
    }
    Ok(())
}

/// Writes the competition summary: the surviving group ids on a `v` line.
pub fn write_comp(out: &mut impl Write, state: &MusState) -> Result<(), ErrorKind> {
    write!(out, "v").map_err(io_err)?;
    let survivors: Vec<Gid> = state.necessary_gids().collect();
    for gid in survivors {
        write!(out, " {gid}").map_err(io_err)?;
    }
    writeln!(out, " 0").map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod write_tests {
    use super::*;
    use crate::db::group_set::GroupSet;
    use crate::structures::Lit;

    fn lits(ints: &[i32]) -> Vec<Lit> {
        ints.iter().map(|i| Lit::from_int(*i)).collect()
    }

    fn classified_state() -> MusState {
        let mut gs = GroupSet::new();
        gs.add_clause(0, lits(&[1]));
        gs.add_clause(1, lits(&[-1, 2]));
        gs.add_clause(2, lits(&[-2]));
        gs.add_clause(3, lits(&[2, 3]));
        gs.seal();
        let mut state = MusState::new(gs);
        state.mark_necessary(1);
        state.mark_necessary(2);
        state.mark_removed(3);
        state
    }

    #[test]
    fn cnf_output_skips_removed_clauses() {
        let state = classified_state();
        let mut out = Vec::new();
        write_cnf(&mut out, &state).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("p cnf 3 3\n"));
        assert!(!text.contains("2 3 0"));
    }

    #[test]
    fn gcnf_output_keeps_labels() {
        let state = classified_state();
        let mut out = Vec::new();
        write_gcnf(&mut out, &state).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("{0} 1 0"));
        assert!(text.contains("{1} -1 2 0"));
        assert!(!text.contains("{3}"));
    }

    #[test]
    fn competition_line_lists_survivors() {
        let state = classified_state();
        let mut out = Vec::new();
        write_comp(&mut out, &state).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "v 1 2 0\n");
    }
}
