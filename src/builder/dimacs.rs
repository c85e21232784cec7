/*!
The plain DIMACS CNF reader.

Comment and problem lines pass through a skip; every other line contributes whitespace-separated literals, and each `0` terminates a clause.
Clauses may span lines.
In plain-CNF mode the clause id doubles as the group id, so the first clause is group 1.
*/

use std::io::BufRead;

use crate::{
    db::group_set::GroupSet,
    misc::log::targets,
    structures::{Gid, Lit},
    types::err::{ErrorKind, ParseError},
};

/// Reads a plain CNF formula, one group per clause.
pub fn read_cnf(mut reader: impl BufRead) -> Result<GroupSet, ErrorKind> {
    let mut gset = GroupSet::new();
    let mut buffer = String::with_capacity(1024);
    let mut clause_buffer: Vec<Lit> = Vec::new();
    let mut line_counter = 0;
    let mut clause_counter: Gid = 0;

    'formula_loop: loop {
        buffer.clear();
        match reader.read_line(&mut buffer) {
            Ok(0) => break 'formula_loop,
            Ok(_) => line_counter += 1,
            Err(_) => return Err(ParseError::Line(line_counter).into()),
        }

        match buffer.chars().next() {
            Some('c') => continue,
            Some('%') => break 'formula_loop,
            Some('p') => {
                let mut details = buffer.split_whitespace();
                match details.nth(1) {
                    Some("cnf") => {}
                    _ => return Err(ParseError::ProblemSpecification.into()),
                }
                // The variable and clause counts are capacity hints only.
                continue;
            }
            _ => {}
        }

        for token in buffer.split_whitespace() {
            match crate::builder::parse_lit(token, line_counter)? {
                Some(lit) => clause_buffer.push(lit),
                None => {
                    clause_counter += 1;
                    gset.add_clause(clause_counter, std::mem::take(&mut clause_buffer));
                }
            }
        }
    }

    if !clause_buffer.is_empty() {
        return Err(ParseError::UnterminatedClause.into());
    }
    gset.seal();
    log::debug!(target: targets::PARSER, "Read {} clauses over {} variables", gset.size(), gset.max_var());
    Ok(gset)
}

#[cfg(test)]
mod dimacs_tests {
    use super::*;

    #[test]
    fn clauses_become_their_own_groups() {
        let input = b"c a comment\np cnf 3 3\n1 2 0\n-1 3 0 -3 0\n";
        let gset = read_cnf(&input[..]).unwrap();
        assert_eq!(gset.size(), 3);
        assert_eq!(gset.max_var(), 3);
        assert_eq!(gset.gclauses(2).len(), 1);
        assert_eq!(gset.clause(gset.gclauses(3)[0]).lits(), &[Lit::from_int(-3)]);
    }

    #[test]
    fn unterminated_clause_is_an_error() {
        let input = b"p cnf 2 1\n1 2\n";
        assert!(read_cnf(&input[..]).is_err());
    }
}
